//! # Data Store

use log::warn;

use crate::{
    drive_ctrl::{self, DriveDems},
    lift_ctrl::{self, LiftDems},
    op_ctrl::{self, OpDems},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    // OpCtrl
    pub op_ctrl: op_ctrl::OpCtrl,
    pub op_dems: OpDems,
    pub op_ctrl_status_rpt: op_ctrl::StatusReport,

    // Lift axes
    pub four_bar_ctrl: lift_ctrl::LiftCtrl,
    pub four_bar_dems: LiftDems,
    pub four_bar_status_rpt: lift_ctrl::StatusReport,

    pub chain_bar_ctrl: lift_ctrl::LiftCtrl,
    pub chain_bar_dems: LiftDems,
    pub chain_bar_status_rpt: lift_ctrl::StatusReport,

    // DriveCtrl
    pub drive_ctrl: drive_ctrl::DriveCtrl,
    pub drive_dems: DriveDems,
    pub drive_status_rpt: drive_ctrl::StatusReport,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,

    /// Number of consecutive equipment read errors
    pub num_consec_eqpt_read_errors: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform all processing that occurs at the start of a cycle.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64) {
        self.num_cycles += 1;

        self.is_1_hz_cycle = self.num_cycles % (cycle_frequency_hz as u128) == 0;
    }

    /// Record an equipment read error, warning on the first of a run.
    pub fn eqpt_read_error(&mut self, error: &crate::eqpt::EqptError) {
        if self.num_consec_eqpt_read_errors == 0 {
            warn!("Equipment read failed, holding last demands: {}", error);
        }
        self.num_consec_eqpt_read_errors += 1;
    }
}

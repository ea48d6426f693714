//! Implementations for the DriveCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use serde::Serialize;

// Internal
use super::{distance_to_wheel_degrees, DriveCtrlError, Params};
use crate::pid::{PidController, CYCLE_PERIOD_S};
use util::{module::State, params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Drive control module state
#[derive(Default)]
pub struct DriveCtrl {
    pub(crate) params: Params,

    initialised: bool,

    /// Rotational targets for the current move, `None` when no move is in
    /// progress.
    ///
    /// Units: wheel degrees
    targets_deg: Option<(f64, f64)>,

    /// Left side regulator, fresh for each move
    left_pid: PidController,

    /// Right side regulator, fresh for each move
    right_pid: PidController,

    /// Number of cycles processed for the current move
    num_cycles: u64,

    pub(crate) report: StatusReport,
}

/// Input data to Drive Control.
#[derive(Clone, Copy, Default, Debug)]
pub struct InputData {
    /// Left side aggregate position reading.
    ///
    /// Units: wheel degrees, zeroed at move start
    pub left_pos_deg: f64,

    /// Right side aggregate position reading.
    ///
    /// Units: wheel degrees, zeroed at move start
    pub right_pos_deg: f64,
}

/// Output demands from DriveCtrl that the drivetrain must execute.
#[derive(Clone, Copy, Serialize, Debug, Default)]
pub struct DriveDems {
    /// Left side speed demand
    pub left: f64,

    /// Right side speed demand
    pub right: f64,
}

/// Status report for DriveCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// Left side regulation error this cycle.
    ///
    /// Units: wheel degrees
    pub left_error_deg: f64,

    /// Right side regulation error this cycle.
    ///
    /// Units: wheel degrees
    pub right_error_deg: f64,

    /// True once both sides are within the settle tolerance.
    pub settled: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for DriveCtrl {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = InputData;
    type OutputData = DriveDems;
    type StatusReport = StatusReport;
    type ProcError = DriveCtrlError;

    /// Initialise the DriveCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(
        &mut self,
        init_data: Self::InitData,
        _session: &Session,
    ) -> Result<(), Self::InitError> {
        // Load the parameters
        self.params = match params::load(init_data) {
            Ok(p) => p,
            Err(e) => return Err(e),
        };

        self.initialised = true;

        Ok(())
    }

    /// Perform cyclic processing of Drive Control.
    ///
    /// The caller must have set a move target with [`DriveCtrl::set_target`]
    /// and zeroed the drivetrain position sensors before the first cycle.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        if !self.initialised {
            return Err(DriveCtrlError::NotInitialised);
        }

        let (left_target_deg, right_target_deg) = match self.targets_deg {
            Some(t) => t,
            None => return Err(DriveCtrlError::NoTarget),
        };

        self.num_cycles += 1;

        let left_error_deg = left_target_deg - input_data.left_pos_deg;
        let right_error_deg = right_target_deg - input_data.right_pos_deg;

        let dems = DriveDems {
            left: self.left_pid.step(left_target_deg, input_data.left_pos_deg),
            right: self
                .right_pid
                .step(right_target_deg, input_data.right_pos_deg),
        };

        let settled = left_error_deg.abs() <= self.params.settle_tolerance_deg
            && right_error_deg.abs() <= self.params.settle_tolerance_deg;

        // A move which runs out of time without settling has not converged,
        // the caller must force-stop the drivetrain
        if !settled && self.num_cycles as f64 * CYCLE_PERIOD_S >= self.params.timeout_s {
            return Err(DriveCtrlError::DidNotConverge(self.params.timeout_s));
        }

        self.report = StatusReport {
            left_error_deg,
            right_error_deg,
            settled,
        };

        Ok((dems, self.report))
    }
}

impl DriveCtrl {
    /// Set the target for a new point-to-point move.
    ///
    /// Distances are linear, in the same unit as the configured wheel
    /// diameter, one per drive side. Fresh regulators are constructed for
    /// both sides.
    pub fn set_target(&mut self, left_distance: f64, right_distance: f64) {
        let left_target_deg =
            distance_to_wheel_degrees(left_distance, self.params.wheel_diameter);
        let right_target_deg =
            distance_to_wheel_degrees(right_distance, self.params.wheel_diameter);

        debug!(
            "New move target: left {:.2} deg, right {:.2} deg",
            left_target_deg, right_target_deg
        );

        self.left_pid = PidController::new(
            self.params.left_k_p,
            self.params.left_k_i,
            self.params.left_k_d,
        );
        self.right_pid = PidController::new(
            self.params.right_k_p,
            self.params.right_k_i,
            self.params.right_k_d,
        );

        self.targets_deg = Some((left_target_deg, right_target_deg));
        self.num_cycles = 0;
    }

    /// Clear the current move target.
    pub fn clear_target(&mut self) {
        self.targets_deg = None;
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    /// Build a DriveCtrl directly from params, skipping the TOML load.
    fn make_ctrl(params: Params) -> DriveCtrl {
        let mut ctrl = DriveCtrl::default();
        ctrl.params = params;
        ctrl.initialised = true;
        ctrl
    }

    fn symmetric_params(k_p: f64) -> Params {
        Params {
            left_k_p: k_p,
            left_k_i: 0.0,
            left_k_d: 0.0,
            right_k_p: k_p,
            right_k_i: 0.0,
            right_k_d: 0.0,
            wheel_diameter: 4.0,
            settle_tolerance_deg: 5.0,
            timeout_s: 10.0,
        }
    }

    #[test]
    fn test_no_target_errors() {
        let mut ctrl = make_ctrl(symmetric_params(1.0));

        assert!(matches!(
            ctrl.proc(&InputData::default()),
            Err(DriveCtrlError::NoTarget)
        ));
    }

    #[test]
    fn test_symmetric_move_produces_equal_demands() {
        let mut ctrl = make_ctrl(symmetric_params(0.5));

        // Identical distances for both sides
        ctrl.set_target(20.0, 20.0);

        // Feed identical positions for both sides over several cycles, the
        // demands must be identical every cycle
        let mut pos = 0.0;
        for _ in 0..50 {
            let (dems, report) = ctrl
                .proc(&InputData {
                    left_pos_deg: pos,
                    right_pos_deg: pos,
                })
                .unwrap();

            assert_eq!(dems.left, dems.right);
            assert_eq!(report.left_error_deg, report.right_error_deg);

            // Crude plant: the sides move proportionally to the demand
            pos += dems.left * 0.01;
        }
    }

    #[test]
    fn test_settles_within_tolerance() {
        let mut ctrl = make_ctrl(symmetric_params(1.0));
        ctrl.set_target(20.0, 20.0);

        let target_deg = distance_to_wheel_degrees(20.0, 4.0);

        // Far from the target: not settled
        let (_, report) = ctrl
            .proc(&InputData {
                left_pos_deg: 0.0,
                right_pos_deg: 0.0,
            })
            .unwrap();
        assert!(!report.settled);

        // Within the 5 deg band on both sides: settled, exact arrival not
        // required
        let (_, report) = ctrl
            .proc(&InputData {
                left_pos_deg: target_deg - 2.0,
                right_pos_deg: target_deg + 2.0,
            })
            .unwrap();
        assert!(report.settled);

        // One side out of the band is not settled
        let (_, report) = ctrl
            .proc(&InputData {
                left_pos_deg: target_deg,
                right_pos_deg: target_deg - 8.0,
            })
            .unwrap();
        assert!(!report.settled);
    }

    #[test]
    fn test_zero_gains_time_out() {
        // Untuned (all zero) gains never move the robot, the timeout must
        // trip rather than blocking forever
        let mut ctrl = make_ctrl(symmetric_params(0.0));
        ctrl.set_target(20.0, 20.0);

        let max_cycles = (10.0 / CYCLE_PERIOD_S) as u64;

        let mut timed_out = false;
        for _ in 0..max_cycles {
            match ctrl.proc(&InputData::default()) {
                Ok((dems, report)) => {
                    assert_eq!(dems.left, 0.0);
                    assert_eq!(dems.right, 0.0);
                    assert!(!report.settled);
                }
                Err(DriveCtrlError::DidNotConverge(timeout_s)) => {
                    assert_eq!(timeout_s, 10.0);
                    timed_out = true;
                    break;
                }
                Err(e) => panic!("Unexpected error: {}", e),
            }
        }

        assert!(timed_out);
    }

    #[test]
    fn test_set_target_resets_regulators() {
        let mut ctrl = make_ctrl(symmetric_params(2.0));

        ctrl.set_target(20.0, 20.0);
        ctrl.proc(&InputData::default()).unwrap();
        ctrl.proc(&InputData::default()).unwrap();

        // A new move must start from clean regulator state: pure
        // proportional output on its first cycle
        ctrl.set_target(10.0, 10.0);
        let target_deg = distance_to_wheel_degrees(10.0, 4.0);

        let (dems, _) = ctrl.proc(&InputData::default()).unwrap();
        assert_eq!(dems.left, 2.0 * target_deg);
        assert_eq!(dems.right, 2.0 * target_deg);
    }
}

//! Parameters structure for LiftCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for one lift axis.
#[derive(Debug, Default, Deserialize)]
pub struct Params {

    /// Human readable name of the axis, used in logs only.
    pub axis_name: String,

    // ---- HOLD REGULATOR ----

    /// Hold regulator proportional gain
    pub k_p: f64,

    /// Hold regulator integral gain
    pub k_i: f64,

    /// Hold regulator derivative gain
    pub k_d: f64,

    /// Symmetric limit on the regulator's integral accumulation. Omit to
    /// leave the accumulation unbounded.
    pub integral_limit: Option<f64>,

    /// If true the regulator's accumulated state is cleared whenever a new
    /// setpoint is latched at the end of a manual command.
    #[serde(default)]
    pub reset_integral_on_latch: bool,

    // ---- MANUAL COMMAND ----

    /// Drive level commanded while the raise button is held.
    ///
    /// Units: consistent with `act_mode` (velocity or voltage)
    pub raise_level: f64,

    /// Drive level commanded while the lower button is held. Normally
    /// negative.
    ///
    /// Units: consistent with `act_mode` (velocity or voltage)
    pub lower_level: f64,

    /// Which actuation primitive this axis is driven through.
    pub act_mode: ActMode,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The actuation primitive used to drive an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActMode {
    /// Demands are velocity commands
    Velocity,

    /// Demands are raw voltage commands
    Voltage,
}

impl Default for ActMode {
    fn default() -> Self {
        ActMode::Velocity
    }
}

//! Parameters structure for DriveCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for point-to-point drive control.
#[derive(Debug, Default, Deserialize)]
pub struct Params {

    // ---- REGULATORS ----

    /// Left side proportional gain
    pub left_k_p: f64,

    /// Left side integral gain
    pub left_k_i: f64,

    /// Left side derivative gain
    pub left_k_d: f64,

    /// Right side proportional gain
    pub right_k_p: f64,

    /// Right side integral gain
    pub right_k_i: f64,

    /// Right side derivative gain
    pub right_k_d: f64,

    // ---- GEOMETRY ----

    /// Diameter of the drive wheels.
    ///
    /// Units: same linear unit as commanded move distances
    pub wheel_diameter: f64,

    // ---- TERMINATION ----

    /// A side is on target once the magnitude of its error is within this
    /// band.
    ///
    /// Units: wheel degrees
    pub settle_tolerance_deg: f64,

    /// Maximum duration of a move before it is force-stopped as
    /// non-converging.
    ///
    /// Units: seconds
    pub timeout_s: f64,
}

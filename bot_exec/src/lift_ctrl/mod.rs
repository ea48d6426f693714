//! Lift control module
//!
//! One `LiftCtrl` instance manages a single lift axis (the four bar or the
//! chain bar). While the operator holds the axis's raise or lower button the
//! actuator is driven at a fixed level and the hold setpoint tracks the
//! measured position; the instant neither button is held the axis switches to
//! regulating against the last latched setpoint.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during LiftCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum LiftCtrlError {
    #[error("proc() was called before the module was initialised")]
    NotInitialised,
}

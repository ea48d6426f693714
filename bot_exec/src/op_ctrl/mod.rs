//! Operator control module
//!
//! `OpCtrl` maps a gamepad snapshot into demands for the rest of the system:
//! scaled tank-drive values for the chassis (always direct, never regulated)
//! and raise/lower pairs for each lift axis. Which buttons drive which axis
//! is configuration, so the two historical button layouts are just different
//! parameter files.

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

/// Possible errors that can occur during OpCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum OpCtrlError {
    #[error("proc() was called before the module was initialised")]
    NotInitialised,
}

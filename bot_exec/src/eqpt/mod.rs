//! Equipment interfaces
//!
//! The capability set the control modules consume from the hardware: per-axis
//! position sensing and actuation for the lifts, an aggregate two-sided drive
//! command, and the operator's gamepad. The traits keep the control logic
//! independent of what is actually on the other side - real motor hardware or
//! the simulated equipment in [`sim`].

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod sim;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors raised by the equipment layer.
#[derive(Debug, Error)]
pub enum EqptError {
    #[error("Could not read the position sensor: {0}")]
    SensorReadError(String),

    #[error("The actuator rejected the demand: {0}")]
    DemandRejected(String),
}

/// A digital button on the operator's gamepad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Button {
    L1,
    L2,
    R1,
    R2,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A snapshot of the operator's gamepad, polled once per cycle.
///
/// Analog axes are normalised to [-1, 1].
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct GamepadState {
    /// Left stick vertical axis
    pub left_y: f64,

    /// Right stick vertical axis
    pub right_y: f64,

    pub l1: bool,
    pub l2: bool,
    pub r1: bool,
    pub r2: bool,
}

impl GamepadState {
    /// Get the state of the given button.
    pub fn button(&self, button: Button) -> bool {
        match button {
            Button::L1 => self.l1,
            Button::L2 => self.l2,
            Button::R1 => self.r1,
            Button::R2 => self.r2,
        }
    }
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A single lift axis actuator with an integrated position sensor.
///
/// Both actuation primitives are available, which one an axis is driven
/// through is configuration (`lift_ctrl::ActMode`).
pub trait LiftActuator {
    /// Current measured position, arbitrary monotonic unit consistent with
    /// the axis's gain tuning.
    fn position(&mut self) -> Result<f64, EqptError>;

    /// Zero the position reference.
    fn reset_position(&mut self) -> Result<(), EqptError>;

    /// Command a velocity.
    fn set_velocity(&mut self, dem: f64) -> Result<(), EqptError>;

    /// Command a raw voltage.
    fn set_voltage(&mut self, dem_v: f64) -> Result<(), EqptError>;
}

/// The two-sided drivetrain, commanded as left/right aggregates.
pub trait Drivetrain {
    /// Current aggregate (left, right) positions in wheel degrees.
    fn positions_deg(&mut self) -> Result<(f64, f64), EqptError>;

    /// Zero both sides' position references.
    fn reset_positions(&mut self) -> Result<(), EqptError>;

    /// Command both sides' speeds.
    fn tank(&mut self, left: f64, right: f64) -> Result<(), EqptError>;
}

/// The operator's gamepad.
pub trait Gamepad {
    /// Poll the current gamepad state.
    fn state(&mut self) -> Result<GamepadState, EqptError>;
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

//! # Robot library.
//!
//! This library allows the control modules defined for the robot executable to
//! be accessed (and tested) outside of `main.rs` itself.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Global data store for the executable
pub mod data_store;

/// Drive control module - drives both sides of the chassis to a commanded position
pub mod drive_ctrl;

/// Equipment interfaces - the actuator, sensor and gamepad capability set
pub mod eqpt;

/// Lift control module - holds a lift axis at its last manually commanded position
pub mod lift_ctrl;

/// Operator control module - maps gamepad state into drive and lift demands
pub mod op_ctrl;

/// The PID regulator shared by the lift and drive control modules
pub mod pid;

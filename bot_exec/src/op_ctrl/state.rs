//! Implementations for the OpCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use super::{OpCtrlError, Params};
use crate::eqpt::GamepadState;
use util::{maths::clamp, module::State, params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Operator control module state
#[derive(Default)]
pub struct OpCtrl {
    pub(crate) params: Params,

    initialised: bool,

    pub(crate) report: StatusReport,
}

/// Input data to Operator Control.
#[derive(Clone, Copy, Default, Debug)]
pub struct InputData {
    /// The gamepad snapshot for this cycle.
    pub gamepad: GamepadState,
}

/// Manual demand pair for one lift axis.
#[derive(Clone, Copy, Serialize, Debug, Default)]
pub struct ManualDems {
    pub raise: bool,
    pub lower: bool,
}

/// Output demands from OpCtrl.
#[derive(Clone, Copy, Serialize, Debug, Default)]
pub struct OpDems {
    /// Left drive speed demand, scaled joystick value.
    pub left_drive: f64,

    /// Right drive speed demand, scaled joystick value.
    pub right_drive: f64,

    /// Four bar manual demands.
    pub four_bar: ManualDems,

    /// Chain bar manual demands.
    pub chain_bar: ManualDems,
}

/// Status report for OpCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// Raised if a joystick axis read outside [-1, 1] and was clamped.
    pub stick_limited: [bool; 2],
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for OpCtrl {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = InputData;
    type OutputData = OpDems;
    type StatusReport = StatusReport;
    type ProcError = OpCtrlError;

    /// Initialise the OpCtrl module.
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

    /// Perform cyclic processing of Operator Control.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        if !self.initialised {
            return Err(OpCtrlError::NotInitialised);
        }

        // Clear the status report
        self.report = StatusReport::default();

        let gamepad = &input_data.gamepad;

        // Sticks outside the normalised range are hardware faults, clamp
        // and flag them
        let mut left_y = gamepad.left_y;
        let mut right_y = gamepad.right_y;

        if left_y.abs() > 1.0 {
            left_y = clamp(&left_y, &-1.0, &1.0);
            self.report.stick_limited[0] = true;
        }
        if right_y.abs() > 1.0 {
            right_y = clamp(&right_y, &-1.0, &1.0);
            self.report.stick_limited[1] = true;
        }

        let dems = OpDems {
            left_drive: left_y * self.params.drive_scale,
            right_drive: right_y * self.params.drive_scale,
            four_bar: ManualDems {
                raise: gamepad.button(self.params.four_bar_raise),
                lower: gamepad.button(self.params.four_bar_lower),
            },
            chain_bar: ManualDems {
                raise: gamepad.button(self.params.chain_bar_raise),
                lower: gamepad.button(self.params.chain_bar_lower),
            },
        };

        Ok((dems, self.report))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::eqpt::Button;

    fn make_ctrl() -> OpCtrl {
        OpCtrl {
            params: Params::default(),
            initialised: true,
            report: StatusReport::default(),
        }
    }

    #[test]
    fn test_drive_is_scaled_joystick() {
        let mut ctrl = make_ctrl();
        ctrl.params.drive_scale = 0.5;

        let (dems, report) = ctrl
            .proc(&InputData {
                gamepad: GamepadState {
                    left_y: 1.0,
                    right_y: -0.5,
                    ..Default::default()
                },
            })
            .unwrap();

        assert_eq!(dems.left_drive, 0.5);
        assert_eq!(dems.right_drive, -0.25);
        assert_eq!(report.stick_limited, [false, false]);
    }

    #[test]
    fn test_out_of_range_stick_is_clamped() {
        let mut ctrl = make_ctrl();

        let (dems, report) = ctrl
            .proc(&InputData {
                gamepad: GamepadState {
                    left_y: 1.8,
                    right_y: -0.2,
                    ..Default::default()
                },
            })
            .unwrap();

        assert_eq!(dems.left_drive, 1.0);
        assert_eq!(report.stick_limited, [true, false]);
    }

    #[test]
    fn test_button_mapping_follows_params() {
        let mut ctrl = make_ctrl();

        // Revision A mapping: chain bar raise on R2, lower on R1
        ctrl.params.chain_bar_raise = Button::R2;
        ctrl.params.chain_bar_lower = Button::R1;

        let (dems, _) = ctrl
            .proc(&InputData {
                gamepad: GamepadState {
                    r2: true,
                    l2: true,
                    ..Default::default()
                },
            })
            .unwrap();

        assert!(dems.chain_bar.raise);
        assert!(!dems.chain_bar.lower);
        assert!(dems.four_bar.lower);
        assert!(!dems.four_bar.raise);
    }
}

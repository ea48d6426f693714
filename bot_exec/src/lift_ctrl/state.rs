//! Implementations for the LiftCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use serde::Serialize;

// Internal
use super::{ActMode, LiftCtrlError, Params};
use crate::pid::PidController;
use util::{module::State, params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Lift control module state
#[derive(Default)]
pub struct LiftCtrl {
    pub(crate) params: Params,

    initialised: bool,

    /// The hold regulator for this axis
    pid: PidController,

    mode: CtrlMode,

    /// The latched hold setpoint. `None` until the first cycle, which latches
    /// the position the axis is found at.
    setpoint: Option<f64>,

    pub(crate) report: StatusReport,
}

/// Input data to Lift Control.
#[derive(Clone, Copy, Default, Debug)]
pub struct InputData {
    /// True while the operator is holding this axis's raise button.
    pub raise: bool,

    /// True while the operator is holding this axis's lower button.
    pub lower: bool,

    /// The axis's current measured position.
    pub position: f64,
}

/// Output demand from LiftCtrl that the equipment layer must execute.
#[derive(Clone, Copy, Serialize, Debug, Default)]
pub struct LiftDems {
    /// The drive level to command.
    pub demand: f64,

    /// The actuation primitive to command `demand` through.
    pub act_mode: ActMode,
}

/// Status report for LiftCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// The control mode the axis was in this cycle.
    pub mode: CtrlMode,

    /// The current hold setpoint.
    pub setpoint: f64,

    /// Regulation error this cycle (zero while under manual command).
    pub error: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The control mode of a lift axis.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Debug)]
pub enum CtrlMode {
    /// The operator is directly commanding the axis.
    Manual,

    /// The regulator is holding the axis at the latched setpoint.
    Holding,
}

impl Default for CtrlMode {
    fn default() -> Self {
        CtrlMode::Holding
    }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for LiftCtrl {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = InputData;
    type OutputData = LiftDems;
    type StatusReport = StatusReport;
    type ProcError = LiftCtrlError;

    /// Initialise the LiftCtrl module.
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

        // Build the hold regulator from the parameters
        self.pid = match self.params.integral_limit {
            Some(limit) => PidController::with_integral_limit(
                self.params.k_p,
                self.params.k_i,
                self.params.k_d,
                limit,
            ),
            None => PidController::new(self.params.k_p, self.params.k_i, self.params.k_d),
        };

        // The setpoint is latched on the first cycle, when the axis's actual
        // position is known.
        self.setpoint = None;
        self.mode = CtrlMode::Holding;
        self.initialised = true;

        Ok(())
    }

    /// Perform cyclic processing of Lift Control.
    ///
    /// The raise button wins if both buttons are held.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        if !self.initialised {
            return Err(LiftCtrlError::NotInitialised);
        }

        // On the first cycle latch the setpoint to wherever the axis is
        let mut setpoint = match self.setpoint {
            Some(s) => s,
            None => input_data.position,
        };

        let mut error = 0f64;

        let demand = if input_data.raise {
            self.set_mode(CtrlMode::Manual);

            // Track the position so that releasing the button holds the axis
            // where the operator left it
            setpoint = input_data.position;

            self.params.raise_level
        }
        else if input_data.lower {
            self.set_mode(CtrlMode::Manual);

            setpoint = input_data.position;

            self.params.lower_level
        }
        else {
            // The first regulated cycle after a manual command starts holding
            // against the setpoint latched during that command
            if self.mode == CtrlMode::Manual {
                if self.params.reset_integral_on_latch {
                    self.pid.reset();
                }
                self.set_mode(CtrlMode::Holding);
            }

            error = setpoint - input_data.position;

            self.pid.step(setpoint, input_data.position)
        };

        self.setpoint = Some(setpoint);

        self.report = StatusReport {
            mode: self.mode,
            setpoint,
            error,
        };

        Ok((
            LiftDems {
                demand,
                act_mode: self.params.act_mode,
            },
            self.report,
        ))
    }
}

impl LiftCtrl {
    /// Change the control mode, logging the transition.
    fn set_mode(&mut self, mode: CtrlMode) {
        if self.mode != mode {
            debug!(
                "{}: {:?} -> {:?}",
                self.params.axis_name, self.mode, mode
            );
            self.mode = mode;
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    /// Build a LiftCtrl directly from params, skipping the TOML load.
    fn make_ctrl(params: Params) -> LiftCtrl {
        let mut ctrl = LiftCtrl::default();
        ctrl.pid = match params.integral_limit {
            Some(limit) => PidController::with_integral_limit(
                params.k_p, params.k_i, params.k_d, limit,
            ),
            None => PidController::new(params.k_p, params.k_i, params.k_d),
        };
        ctrl.params = params;
        ctrl.initialised = true;
        ctrl
    }

    fn chain_bar_params() -> Params {
        Params {
            axis_name: String::from("chain_bar"),
            k_p: 9.5,
            k_i: 0.0,
            k_d: 9.5,
            integral_limit: None,
            reset_integral_on_latch: false,
            raise_level: 75.0,
            lower_level: -75.0,
            act_mode: ActMode::Velocity,
        }
    }

    #[test]
    fn test_raise_commands_fixed_level_and_latches() {
        let mut ctrl = make_ctrl(chain_bar_params());

        let (dems, report) = ctrl
            .proc(&InputData {
                raise: true,
                lower: false,
                position: 12.0,
            })
            .unwrap();

        assert_eq!(dems.demand, 75.0);
        assert_eq!(dems.act_mode, ActMode::Velocity);
        assert_eq!(report.mode, CtrlMode::Manual);
        assert_eq!(report.setpoint, 12.0);
    }

    #[test]
    fn test_raise_wins_over_lower() {
        let mut ctrl = make_ctrl(chain_bar_params());

        let (dems, _) = ctrl
            .proc(&InputData {
                raise: true,
                lower: true,
                position: 0.0,
            })
            .unwrap();

        assert_eq!(dems.demand, 75.0);
    }

    #[test]
    fn test_setpoint_latched_once_while_holding() {
        let mut ctrl = make_ctrl(chain_bar_params());

        // One manual cycle at position 5 latches the setpoint
        ctrl.proc(&InputData {
            raise: true,
            lower: false,
            position: 5.0,
        })
        .unwrap();

        // The axis sags over the following hold cycles, the setpoint must not
        // follow it
        for position in [5.0, 4.5, 4.0, 3.5].iter() {
            let (_, report) = ctrl
                .proc(&InputData {
                    raise: false,
                    lower: false,
                    position: *position,
                })
                .unwrap();

            assert_eq!(report.mode, CtrlMode::Holding);
            assert_eq!(report.setpoint, 5.0);
        }
    }

    #[test]
    fn test_release_relatches_at_released_position() {
        let mut ctrl = make_ctrl(chain_bar_params());

        // Hold from 0
        ctrl.proc(&InputData {
            raise: false,
            lower: false,
            position: 0.0,
        })
        .unwrap();

        // Lower the axis to -8, then release
        for position in [-2.0, -5.0, -8.0].iter() {
            let (dems, report) = ctrl
                .proc(&InputData {
                    raise: false,
                    lower: true,
                    position: *position,
                })
                .unwrap();

            assert_eq!(dems.demand, -75.0);
            assert_eq!(report.setpoint, *position);
        }

        let (_, report) = ctrl
            .proc(&InputData {
                raise: false,
                lower: false,
                position: -8.0,
            })
            .unwrap();

        assert_eq!(report.mode, CtrlMode::Holding);
        assert_eq!(report.setpoint, -8.0);
    }

    #[test]
    fn test_hold_demand_is_regulated() {
        let mut ctrl = make_ctrl(chain_bar_params());

        // First hold cycle latches setpoint 10; second regulates against a
        // sagged position. error = 2, derivative = 2 - 0 = 2 (first cycle had
        // zero error).
        ctrl.proc(&InputData {
            raise: false,
            lower: false,
            position: 10.0,
        })
        .unwrap();

        let (dems, report) = ctrl
            .proc(&InputData {
                raise: false,
                lower: false,
                position: 8.0,
            })
            .unwrap();

        assert_eq!(report.error, 2.0);
        assert_eq!(dems.demand, 9.5 * 2.0 + 9.5 * 2.0);
    }

    #[test]
    fn test_integral_resets_on_latch_when_configured() {
        let mut params = chain_bar_params();
        params.k_p = 0.0;
        params.k_i = 1.0;
        params.k_d = 0.0;
        params.reset_integral_on_latch = true;

        let mut ctrl = make_ctrl(params);

        // Hold from 5 while the axis sags, winding up the integral
        ctrl.proc(&InputData {
            raise: false,
            lower: false,
            position: 5.0,
        })
        .unwrap();

        for _ in 0..5 {
            ctrl.proc(&InputData {
                raise: false,
                lower: false,
                position: 4.0,
            })
            .unwrap();
        }

        // One manual cycle relatches the setpoint at 4
        ctrl.proc(&InputData {
            raise: true,
            lower: false,
            position: 4.0,
        })
        .unwrap();

        // On release the accumulated integral must not carry over: with a
        // pure-integral regulator the first hold demand is just the fresh
        // error
        let (dems, report) = ctrl
            .proc(&InputData {
                raise: false,
                lower: false,
                position: 3.0,
            })
            .unwrap();

        assert_eq!(report.error, 1.0);
        assert_eq!(dems.demand, 1.0);
    }

    #[test]
    fn test_proc_before_init_errors() {
        let mut ctrl = LiftCtrl::default();

        assert!(matches!(
            ctrl.proc(&InputData::default()),
            Err(LiftCtrlError::NotInitialised)
        ));
    }
}

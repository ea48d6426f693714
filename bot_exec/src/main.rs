//! Main robot executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Operator control loop (default mode):
//!         - Operator input acquisition (scripted in simulation)
//!         - Operator control processing (stick and button mapping)
//!         - Direct tank drive of the chassis
//!         - Lift control processing for the four bar and chain bar axes
//!         - Cycle management
//!     - Point-to-point move (auto mode):
//!         - Drive control processing per cycle until the move settles
//!         - Explicit stop command on termination
//!
//! # Modules
//!
//! All modules (e.g. `lift_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.
//!

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use bot_lib::{
    data_store::DataStore,
    drive_ctrl,
    eqpt::{sim::SimEqpt, Drivetrain, Gamepad, GamepadState, LiftActuator},
    lift_ctrl::{self, ActMode, LiftDems},
    op_ctrl,
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use std::env;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    script_interpreter::{PendingCmds, ScriptInterpreter},
    session::{self, Session},
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle, shared with the regulators.
const CYCLE_PERIOD_S: f64 = bot_lib::pid::CYCLE_PERIOD_S;

/// Number of cycles per second
const CYCLE_FREQUENCY_HZ: f64 = 1.0 / CYCLE_PERIOD_S;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("bot_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Talos Robot Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    // ---- INITIALISE MODULES ----

    ds.op_ctrl
        .init("op_ctrl.toml", &session)
        .wrap_err("Failed to initialise OpCtrl")?;
    info!("OpCtrl init complete");

    ds.four_bar_ctrl
        .init("lift_ctrl_four_bar.toml", &session)
        .wrap_err("Failed to initialise the four bar LiftCtrl")?;
    ds.chain_bar_ctrl
        .init("lift_ctrl_chain_bar.toml", &session)
        .wrap_err("Failed to initialise the chain bar LiftCtrl")?;
    info!("LiftCtrl init complete");

    ds.drive_ctrl
        .init("drive_ctrl.toml", &session)
        .wrap_err("Failed to initialise DriveCtrl")?;
    info!("DriveCtrl init complete");

    info!("Module initialisation complete\n");

    // ---- INITIALISE EQUIPMENT ----

    // Simulated equipment, stepped at the end of each cycle.
    let mut eqpt = SimEqpt::new();
    info!("Simulated equipment initialised\n");

    // ---- MODE DISPATCH ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    match args.get(1).map(|a| a.as_str()) {
        // Default mode is operator control, with an optional input script
        None | Some("opctrl") => {
            let script = match args.get(2) {
                Some(path) => {
                    info!("Loading operator script from \"{}\"", path);

                    let si: ScriptInterpreter<GamepadState> = ScriptInterpreter::new(path)
                        .wrap_err("Failed to load the operator script")?;

                    info!(
                        "Loaded script lasts {:.02} s and contains {} commands\n",
                        si.get_duration(),
                        si.get_num_cmds()
                    );

                    Some(si)
                }
                None => {
                    info!("No operator script provided, the sticks will stay neutral\n");
                    None
                }
            };

            run_opctrl(&mut ds, &mut eqpt, script)
        }
        Some("auto") => {
            if args.len() != 4 {
                return Err(eyre!("Expected: auto <left_distance> <right_distance>"));
            }

            let left_distance: f64 = args[2]
                .parse()
                .wrap_err("Could not parse the left distance")?;
            let right_distance: f64 = args[3]
                .parse()
                .wrap_err("Could not parse the right distance")?;

            run_auto(&mut ds, &mut eqpt, left_distance, right_distance)
        }
        Some(mode) => Err(eyre!("Unknown mode \"{}\"", mode)),
    }
}

/// The operator control loop.
///
/// Runs until the operator script ends (simulation) or the process is
/// stopped.
fn run_opctrl(
    ds: &mut DataStore,
    eqpt: &mut SimEqpt,
    mut script: Option<ScriptInterpreter<GamepadState>>,
) -> Result<(), Report> {
    info!("Begining operator control loop\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        ds.cycle_start(CYCLE_FREQUENCY_HZ);

        // ---- OPERATOR INPUT ----

        // Apply any pending scripted gamepad snapshots
        if let Some(ref mut si) = script {
            match si.get_pending(session::get_elapsed_seconds()) {
                PendingCmds::None => (),
                PendingCmds::Some(states) => {
                    for state in states {
                        eqpt.gamepad.apply(state);
                    }
                }
                // Exit if end of script reached
                PendingCmds::EndOfScript => {
                    info!("End of operator script reached, stopping");
                    break;
                }
            }
        }

        match eqpt.gamepad.state() {
            Ok(gamepad) => {
                // ---- OPERATOR CONTROL PROCESSING ----

                let (op_dems, op_rpt) = ds.op_ctrl.proc(&op_ctrl::InputData { gamepad })?;
                ds.op_dems = op_dems;
                ds.op_ctrl_status_rpt = op_rpt;

                // ---- DRIVE ----

                // Teleoperation of the base is always direct, never
                // regulated
                if let Err(e) = eqpt.drive.tank(op_dems.left_drive, op_dems.right_drive) {
                    warn!("Drivetrain command rejected: {}", e);
                }

                // ---- LIFT AXES ----

                match eqpt.four_bar.position() {
                    Ok(position) => {
                        ds.num_consec_eqpt_read_errors = 0;

                        let (dems, rpt) = ds.four_bar_ctrl.proc(&lift_ctrl::InputData {
                            raise: op_dems.four_bar.raise,
                            lower: op_dems.four_bar.lower,
                            position,
                        })?;

                        if let Err(e) = send_lift_dems(&mut eqpt.four_bar, &dems) {
                            warn!("Four bar command rejected: {}", e);
                        }

                        ds.four_bar_dems = dems;
                        ds.four_bar_status_rpt = rpt;
                    }
                    // A stale reading is not fatal, hold the last demand
                    Err(e) => ds.eqpt_read_error(&e),
                }

                match eqpt.chain_bar.position() {
                    Ok(position) => {
                        ds.num_consec_eqpt_read_errors = 0;

                        let (dems, rpt) = ds.chain_bar_ctrl.proc(&lift_ctrl::InputData {
                            raise: op_dems.chain_bar.raise,
                            lower: op_dems.chain_bar.lower,
                            position,
                        })?;

                        if let Err(e) = send_lift_dems(&mut eqpt.chain_bar, &dems) {
                            warn!("Chain bar command rejected: {}", e);
                        }

                        ds.chain_bar_dems = dems;
                        ds.chain_bar_status_rpt = rpt;
                    }
                    Err(e) => ds.eqpt_read_error(&e),
                }
            }
            Err(e) => ds.eqpt_read_error(&e),
        }

        // ---- STATUS ----

        if ds.is_1_hz_cycle {
            debug!(
                "four_bar: {:?} setpoint {:.2}, chain_bar: {:?} setpoint {:.2}",
                ds.four_bar_status_rpt.mode,
                ds.four_bar_status_rpt.setpoint,
                ds.chain_bar_status_rpt.mode,
                ds.chain_bar_status_rpt.setpoint
            );
        }

        // ---- SIMULATION ----

        eqpt.step(CYCLE_PERIOD_S);

        // ---- CYCLE MANAGEMENT ----

        cycle_sleep(ds, cycle_start_instant);
    }

    Ok(())
}

/// Drive both sides of the chassis to the given linear distances, blocking
/// until the move settles.
///
/// The drivetrain is always left stopped, whether the move settles, times
/// out, or fails.
fn run_auto(
    ds: &mut DataStore,
    eqpt: &mut SimEqpt,
    left_distance: f64,
    right_distance: f64,
) -> Result<(), Report> {
    info!(
        "Point to point move: left {} right {}\n",
        left_distance, right_distance
    );

    // Reset sensor values before use
    eqpt.drive
        .reset_positions()
        .wrap_err("Could not zero the drivetrain position sensors")?;

    ds.drive_ctrl.set_target(left_distance, right_distance);

    let result = loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        ds.cycle_start(CYCLE_FREQUENCY_HZ);

        let (left_pos_deg, right_pos_deg) = match eqpt.drive.positions_deg() {
            Ok(p) => p,
            Err(e) => break Err(Report::new(e).wrap_err("Could not read the drivetrain sensors")),
        };

        let (dems, report) = match ds.drive_ctrl.proc(&drive_ctrl::InputData {
            left_pos_deg,
            right_pos_deg,
        }) {
            Ok(r) => r,
            // DidNotConverge lands here: stop and report
            Err(e) => break Err(Report::new(e)),
        };

        ds.drive_dems = dems;
        ds.drive_status_rpt = report;

        if report.settled {
            info!(
                "Move complete: left error {:.2} deg, right error {:.2} deg",
                report.left_error_deg, report.right_error_deg
            );
            break Ok(());
        }

        if let Err(e) = eqpt.drive.tank(dems.left, dems.right) {
            warn!("Drivetrain command rejected: {}", e);
        }

        // ---- SIMULATION ----

        eqpt.step(CYCLE_PERIOD_S);

        // ---- CYCLE MANAGEMENT ----

        cycle_sleep(ds, cycle_start_instant);
    };

    ds.drive_ctrl.clear_target();

    // Brake the drivetrain right after the move so it does not coast
    eqpt.drive
        .tank(0.0, 0.0)
        .wrap_err("Could not stop the drivetrain")?;

    result
}

/// Sleep out the remainder of the cycle, warning on overruns.
fn cycle_sleep(ds: &mut DataStore, cycle_start_instant: Instant) {
    let cycle_dur = Instant::now() - cycle_start_instant;

    // Get sleep duration
    match Duration::from_secs_f64(CYCLE_PERIOD_S).checked_sub(cycle_dur) {
        Some(d) => {
            ds.num_consec_cycle_overruns = 0;
            thread::sleep(d);
        }
        None => {
            warn!(
                "Cycle overran by {:.06} s",
                cycle_dur.as_secs_f64() - CYCLE_PERIOD_S
            );
            ds.num_consec_cycle_overruns += 1;
        }
    }
}

/// Send a lift demand through the actuation primitive the axis is configured
/// for.
fn send_lift_dems(
    lift: &mut impl LiftActuator,
    dems: &LiftDems,
) -> Result<(), bot_lib::eqpt::EqptError> {
    match dems.act_mode {
        ActMode::Velocity => lift.set_velocity(dems.demand),
        ActMode::Voltage => lift.set_voltage(dems.demand),
    }
}

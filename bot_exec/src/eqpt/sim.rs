//! Simulated equipment
//!
//! Simple kinematic stand-ins for the robot's hardware, used for development
//! runs on a host machine. Each simulated device integrates its last
//! commanded rate over the cycle period when the executable calls
//! [`SimEqpt::step`] at the end of a cycle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use super::{Drivetrain, EqptError, Gamepad, GamepadState, LiftActuator};
use util::maths::lin_map;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Supply voltage assumed by the voltage actuation primitive.
///
/// Units: volts
const MAX_VOLTAGE_V: f64 = 12.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A simulated lift axis: the position integrates the commanded rate.
pub struct SimLift {
    position: f64,
    rate: f64,

    /// Rate produced at full supply voltage, used to map voltage demands
    /// onto rates.
    max_rate: f64,
}

/// A simulated drivetrain: each side's position integrates its commanded
/// speed.
#[derive(Default)]
pub struct SimDrivetrain {
    left_pos_deg: f64,
    right_pos_deg: f64,
    left_rate: f64,
    right_rate: f64,
}

/// A simulated gamepad holding the most recent scripted snapshot.
#[derive(Default)]
pub struct SimGamepad {
    current: GamepadState,
}

/// The full simulated equipment set for the robot.
pub struct SimEqpt {
    pub four_bar: SimLift,
    pub chain_bar: SimLift,
    pub drive: SimDrivetrain,
    pub gamepad: SimGamepad,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimLift {
    pub fn new(max_rate: f64) -> Self {
        Self {
            position: 0f64,
            rate: 0f64,
            max_rate,
        }
    }

    /// Advance the simulation by `dt_s` seconds.
    pub fn step(&mut self, dt_s: f64) {
        self.position += self.rate * dt_s;
    }
}

impl LiftActuator for SimLift {
    fn position(&mut self) -> Result<f64, EqptError> {
        Ok(self.position)
    }

    fn reset_position(&mut self) -> Result<(), EqptError> {
        self.position = 0f64;
        Ok(())
    }

    fn set_velocity(&mut self, dem: f64) -> Result<(), EqptError> {
        self.rate = dem;
        Ok(())
    }

    fn set_voltage(&mut self, dem_v: f64) -> Result<(), EqptError> {
        self.rate = lin_map(
            (-MAX_VOLTAGE_V, MAX_VOLTAGE_V),
            (-self.max_rate, self.max_rate),
            dem_v,
        );
        Ok(())
    }
}

impl SimDrivetrain {
    /// Advance the simulation by `dt_s` seconds.
    pub fn step(&mut self, dt_s: f64) {
        self.left_pos_deg += self.left_rate * dt_s;
        self.right_pos_deg += self.right_rate * dt_s;
    }
}

impl Drivetrain for SimDrivetrain {
    fn positions_deg(&mut self) -> Result<(f64, f64), EqptError> {
        Ok((self.left_pos_deg, self.right_pos_deg))
    }

    fn reset_positions(&mut self) -> Result<(), EqptError> {
        self.left_pos_deg = 0f64;
        self.right_pos_deg = 0f64;
        Ok(())
    }

    fn tank(&mut self, left: f64, right: f64) -> Result<(), EqptError> {
        self.left_rate = left;
        self.right_rate = right;
        Ok(())
    }
}

impl SimGamepad {
    /// Apply a scripted gamepad snapshot.
    pub fn apply(&mut self, state: GamepadState) {
        self.current = state;
    }
}

impl Gamepad for SimGamepad {
    fn state(&mut self) -> Result<GamepadState, EqptError> {
        Ok(self.current)
    }
}

impl SimEqpt {
    pub fn new() -> Self {
        Self {
            // Lift rates roughly matching the real mechanisms at full
            // voltage
            four_bar: SimLift::new(100.0),
            chain_bar: SimLift::new(75.0),
            drive: SimDrivetrain::default(),
            gamepad: SimGamepad::default(),
        }
    }

    /// Advance all simulated devices by `dt_s` seconds.
    pub fn step(&mut self, dt_s: f64) {
        self.four_bar.step(dt_s);
        self.chain_bar.step(dt_s);
        self.drive.step(dt_s);
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lift_integrates_velocity() {
        let mut lift = SimLift::new(100.0);

        lift.set_velocity(10.0).unwrap();
        lift.step(0.5);
        assert_eq!(lift.position().unwrap(), 5.0);

        lift.reset_position().unwrap();
        assert_eq!(lift.position().unwrap(), 0.0);
    }

    #[test]
    fn test_lift_voltage_maps_to_rate() {
        let mut lift = SimLift::new(100.0);

        // Full positive voltage gives the full rate
        lift.set_voltage(12.0).unwrap();
        lift.step(1.0);
        assert_eq!(lift.position().unwrap(), 100.0);

        // Half negative voltage gives half the rate backwards
        lift.set_voltage(-6.0).unwrap();
        lift.step(1.0);
        assert_eq!(lift.position().unwrap(), 50.0);
    }

    #[test]
    fn test_drivetrain_sides_independent() {
        let mut drive = SimDrivetrain::default();

        drive.tank(10.0, -10.0).unwrap();
        drive.step(1.0);

        assert_eq!(drive.positions_deg().unwrap(), (10.0, -10.0));

        drive.reset_positions().unwrap();
        assert_eq!(drive.positions_deg().unwrap(), (0.0, 0.0));
    }
}

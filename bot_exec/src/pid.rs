//! # PID regulator module
//!
//! This module provides the single position regulator used by both the lift
//! hold controllers and the point-to-point drive controllers.
//!
//! The regulator is deliberately not time-aware: the derivative is a plain
//! first difference between calls and the integral is a plain sum of errors,
//! so all gains are tuned against the fixed cycle period [`CYCLE_PERIOD_S`].
//! Every loop that steps a regulator must pace itself with that constant.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use util::maths::clamp;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Period of one control cycle.
///
/// Units: seconds
pub const CYCLE_PERIOD_S: f64 = 0.02;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A PID controller
#[derive(Debug, Serialize, Clone, Default)]
pub struct PidController {
    /// Proportional gain
    k_p: f64,

    /// Integral gain
    k_i: f64,

    /// Dervative gain
    k_d: f64,

    /// Symmetric limit on the integral accumulation. `None` leaves the
    /// accumulation unbounded, matching the hardware-proven tuning.
    integral_limit: Option<f64>,

    /// The integral accumulation
    integral: f64,

    /// Previous error, `None` until the first step
    prev_error: Option<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PidController {

    /// Create a new controller with the given gains.
    pub fn new(k_p: f64, k_i: f64, k_d: f64) -> Self {
        Self {
            k_p, k_i, k_d,
            integral_limit: None,
            integral: 0f64,
            prev_error: None
        }
    }

    /// Create a new controller with the given gains and a symmetric limit on
    /// the integral accumulation.
    pub fn with_integral_limit(k_p: f64, k_i: f64, k_d: f64, limit: f64) -> Self {
        Self {
            k_p, k_i, k_d,
            integral_limit: Some(limit),
            integral: 0f64,
            prev_error: None
        }
    }

    /// Step the regulator, producing the drive demand for the given target
    /// setpoint and measured position.
    ///
    /// No output saturation is applied, the caller is responsible for any
    /// actuator-level limits.
    pub fn step(&mut self, target: f64, measured: f64) -> f64 {
        let error = target - measured;

        // First difference, not normalised by time. On the first step there
        // is no previous error so the derivative term is zero rather than a
        // spike against an arbitrary baseline.
        let derivative = match self.prev_error {
            Some(e) => error - e,
            None => 0f64
        };

        // Accumulate the integral, clamping if a limit is configured
        self.integral += error;
        if let Some(limit) = self.integral_limit {
            self.integral = clamp(&self.integral, &-limit, &limit);
        }

        let out =
            self.k_p * error
            + self.k_i * self.integral
            + self.k_d * derivative;

        // Remember the previous error
        self.prev_error = Some(error);

        out
    }

    /// Reset the regulator's accumulated state, leaving the gains untouched.
    pub fn reset(&mut self) {
        self.integral = 0f64;
        self.prev_error = None;
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_first_step_is_proportional_only() {
        // With no accumulated state the first step must be exactly
        // kP * (target - measured), with zero derivative and integral terms.
        let mut pid = PidController::new(2.0, 3.0, 4.0);
        assert_eq!(pid.step(10.0, 4.0), 2.0 * 6.0 + 3.0 * 6.0);

        // kI zero isolates the pure proportional case
        let mut pid = PidController::new(2.0, 0.0, 4.0);
        assert_eq!(pid.step(10.0, 4.0), 2.0 * 6.0);
        assert_eq!(pid.step(-3.0, 4.0), 2.0 * -7.0 + 4.0 * (-7.0 - 6.0));
    }

    #[test]
    fn test_integral_accumulates_linearly() {
        // With kP = kD = 0 and a constant error e, the Nth step outputs
        // kI * N * e.
        let mut pid = PidController::new(0.0, 2.0, 0.0);

        for n in 1..=10 {
            assert_eq!(pid.step(3.0, 0.0), 2.0 * n as f64 * 3.0);
        }
    }

    #[test]
    fn test_known_scenario() {
        // target = 100, measured = 0, kP = kD = 9.5, prev_error = 0:
        // error = 100, derivative = 100, output = 9.5*100 + 9.5*100 = 1900
        let mut pid = PidController::new(9.5, 0.0, 9.5);
        pid.prev_error = Some(0.0);

        assert_eq!(pid.step(100.0, 0.0), 1900.0);
    }

    #[test]
    fn test_integral_limit() {
        let mut pid = PidController::with_integral_limit(0.0, 1.0, 0.0, 5.0);

        // Error of 2 per step, the accumulation must stop at the limit
        assert_eq!(pid.step(2.0, 0.0), 2.0);
        assert_eq!(pid.step(2.0, 0.0), 4.0);
        assert_eq!(pid.step(2.0, 0.0), 5.0);
        assert_eq!(pid.step(2.0, 0.0), 5.0);

        // A large reversal clamps straight to the opposite limit
        assert_eq!(pid.step(-20.0, 0.0), -5.0);
        assert_eq!(pid.step(-20.0, 0.0), -5.0);
    }

    #[test]
    fn test_reset() {
        let mut pid = PidController::new(1.0, 1.0, 1.0);
        pid.step(10.0, 0.0);
        pid.step(10.0, 5.0);

        pid.reset();

        // After a reset the controller behaves as freshly constructed
        assert_eq!(pid.step(10.0, 4.0), 6.0 + 6.0);
    }
}

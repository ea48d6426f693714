//! Drive control module
//!
//! `DriveCtrl` drives the two sides of the chassis to commanded positions
//! under independent PID regulation. Linear target distances are converted to
//! wheel rotation degrees from the wheel diameter, and the move is considered
//! settled once both sides are within the configured tolerance of their
//! targets. A configured timeout bounds moves that never converge (for
//! example with untuned gains).

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

/// Possible errors that can occur during DriveCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum DriveCtrlError {
    #[error("proc() was called before the module was initialised")]
    NotInitialised,

    #[error("proc() was called with no move target set")]
    NoTarget,

    #[error("The move did not converge within {0} s and was force-stopped")]
    DidNotConverge(f64),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Convert a linear distance into wheel rotation degrees.
///
/// `distance` and `wheel_diameter` must share a unit.
pub fn distance_to_wheel_degrees(distance: f64, wheel_diameter: f64) -> f64 {
    distance * 360.0 / (std::f64::consts::PI * wheel_diameter)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_distance_to_wheel_degrees() {
        // One circumference is exactly one revolution, whatever the wheel
        for diameter in [1.0, 4.0, 0.3].iter() {
            assert_eq!(
                distance_to_wheel_degrees(std::f64::consts::PI * diameter, *diameter),
                360.0
            );
        }

        assert_eq!(distance_to_wheel_degrees(0.0, 4.0), 0.0);

        // Reversing distances produce negative rotations
        assert!(distance_to_wheel_degrees(-10.0, 4.0) < 0.0);
    }
}

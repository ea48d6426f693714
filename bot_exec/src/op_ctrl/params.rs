//! Parameters structure for OpCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use crate::eqpt::Button;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for operator control.
#[derive(Debug, Deserialize)]
pub struct Params {

    // ---- DRIVE ----

    /// Scale factor applied to the joystick axes before they are commanded
    /// to the drivetrain.
    pub drive_scale: f64,

    // ---- BUTTON MAPPING ----

    /// Button which raises the four bar.
    pub four_bar_raise: Button,

    /// Button which lowers the four bar.
    pub four_bar_lower: Button,

    /// Button which raises the chain bar.
    pub chain_bar_raise: Button,

    /// Button which lowers the chain bar.
    pub chain_bar_lower: Button,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            drive_scale: 1.0,
            four_bar_raise: Button::L1,
            four_bar_lower: Button::L2,
            chain_bar_raise: Button::R2,
            chain_bar_lower: Button::R1,
        }
    }
}

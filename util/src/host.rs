//! Host platform utility functions

use std::path::PathBuf;

/// Get the root directory of the software install.
///
/// The root is read from the `TALOS_SW_ROOT` environment variable, which must
/// be set before any executable is run.
pub fn get_talos_sw_root() -> Result<PathBuf, std::env::VarError> {
    Ok(PathBuf::from(std::env::var("TALOS_SW_ROOT")?))
}

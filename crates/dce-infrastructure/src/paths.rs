//! Path management for DCE configuration files.
//!
//! ```text
//! ~/.config/dce/
//! └── config.toml
//! ```

use std::path::PathBuf;

use dce_core::error::{DceError, Result};

const APP_DIR: &str = "dce";

pub struct DcePaths;

impl DcePaths {
    /// Returns the DCE configuration directory (e.g., `~/.config/dce/`).
    ///
    /// # Errors
    ///
    /// Returns a config error when the platform config directory is unknown.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| DceError::config("Cannot find config directory"))
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}

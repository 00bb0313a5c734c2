//! Loads [`DceConfig`] from `~/.config/dce/config.toml` and the environment.

use std::path::Path;

use dce_core::config::DceConfig;
use dce_core::error::{DceError, Result};

use crate::paths::DcePaths;

pub const ENV_POLL_INTERVAL: &str = "DCE_POLL_INTERVAL_SECS";
pub const ENV_COLLABORATOR_TIMEOUT: &str = "DCE_COLLABORATOR_TIMEOUT_SECS";
pub const ENV_LLM_ENDPOINT: &str = "DCE_LLM_ENDPOINT";
pub const ENV_LLM_MODEL: &str = "DCE_LLM_MODEL";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the user config file, then applies environment overrides.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or if
    /// an override is not a valid number.
    pub fn load() -> Result<DceConfig> {
        let path = DcePaths::config_file()?;
        let config = Self::load_from(&path)?;
        Self::apply_overrides(config, |key| std::env::var(key).ok())
    }

    /// Reads a config file, returning defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<DceConfig> {
        if !path.exists() {
            tracing::debug!("No config file at {}; using defaults", path.display());
            return Ok(DceConfig::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| DceError::io(format!("Failed to read {}: {}", path.display(), e)))?;
        let config: DceConfig = toml::from_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Applies overrides looked up through `lookup` (normally the process environment).
    pub fn apply_overrides<F>(mut config: DceConfig, lookup: F) -> Result<DceConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_POLL_INTERVAL) {
            config.poll_interval_secs = parse_secs(ENV_POLL_INTERVAL, &value)?;
        }
        if let Some(value) = lookup(ENV_COLLABORATOR_TIMEOUT) {
            config.collaborator_timeout_secs = parse_secs(ENV_COLLABORATOR_TIMEOUT, &value)?;
        }
        if let Some(value) = lookup(ENV_LLM_ENDPOINT).filter(|v| !v.trim().is_empty()) {
            config.llm.endpoint = value.trim().to_string();
        }
        if let Some(value) = lookup(ENV_LLM_MODEL).filter(|v| !v.trim().is_empty()) {
            config.llm.model = value.trim().to_string();
        }
        Ok(config)
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| DceError::config(format!("{key}='{value}' is not a number of seconds: {e}")))
}

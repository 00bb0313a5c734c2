//! Runtime configuration for the engine.
//!
//! Values come from `~/.config/dce/config.toml` (see `dce-infrastructure`),
//! environment overrides and CLI flags, in that order.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_COLLABORATOR_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SNAPSHOT_CHAR_LIMIT: usize = 4000;
pub const DEFAULT_LLM_ENDPOINT: &str = "http://localhost:11434";
pub const DEFAULT_LLM_MODEL: &str = "qwen3";
pub const DEFAULT_NUM_CTX: u32 = 8192;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DceConfig {
    /// Seconds between background diff polls.
    pub poll_interval_secs: u64,
    /// Upper bound for any single VCS or symbol-extraction call.
    pub collaborator_timeout_secs: u64,
    /// Characters of each code snapshot included in the LLM context.
    pub snapshot_char_limit: usize,
    pub llm: LlmConfig,
}

impl Default for DceConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            collaborator_timeout_secs: DEFAULT_COLLABORATOR_TIMEOUT_SECS,
            snapshot_char_limit: DEFAULT_SNAPSHOT_CHAR_LIMIT,
            llm: LlmConfig::default(),
        }
    }
}

impl DceConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn collaborator_timeout(&self) -> Duration {
        Duration::from_secs(self.collaborator_timeout_secs.max(1))
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
    pub num_ctx: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_LLM_ENDPOINT.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            num_ctx: DEFAULT_NUM_CTX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DceConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.collaborator_timeout(), Duration::from_secs(30));
        assert_eq!(config.llm.endpoint, "http://localhost:11434");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: DceConfig = toml::from_str(
            r#"
            poll_interval_secs = 3

            [llm]
            model = "llama3"
            "#,
        )
        .unwrap();

        assert_eq!(config.poll_interval_secs, 3);
        assert_eq!(config.collaborator_timeout_secs, 30);
        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.llm.num_ctx, 8192);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = DceConfig {
            poll_interval_secs: 0,
            ..DceConfig::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }
}

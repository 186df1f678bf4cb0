mod error;
mod loader;
mod oracle;
mod server;

pub use crate::constants::CONFIG_PATH;
pub use error::ConfigError;
pub use loader::{apply_env_overrides, ensure_env_loaded, load_config, parse_config};
pub use oracle::OracleConfig;
pub use server::ServerConfig;

use crate::constants::{API_KEY_ENV, DEFAULT_MAX_STEPS};
use std::path::Path;
use std::time::Duration;

/// Fully resolved client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub oracle: OracleConfig,
    pub server: ServerConfig,
    pub agent: LoopConfig,
}

/// Limits applied to one question's decision loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopConfig {
    pub max_steps: usize,
    /// `None` keeps tool calls unbounded.
    pub tool_timeout: Option<Duration>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            tool_timeout: None,
        }
    }
}

impl AppConfig {
    /// Load from TOML (explicit path, or the default path when present),
    /// then apply `.env` and process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        load_config(path)
    }

    /// The oracle credential, or [`ConfigError::MissingCredential`].
    pub fn require_credential(&self) -> Result<&str, ConfigError> {
        self.oracle
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingCredential {
                variable: API_KEY_ENV,
            })
    }
}

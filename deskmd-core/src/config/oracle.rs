use crate::constants::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_ORACLE_TIMEOUT_SECS};
use serde::Deserialize;
use std::time::Duration;

/// Connection settings for the chat-completion endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct OracleConfig {
    pub api_key: Option<String>,
    pub model: String,
    /// Stored without a trailing `/`.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_ORACLE_TIMEOUT_SECS),
        }
    }
}

impl OracleConfig {
    pub fn set_base_url(&mut self, url: &str) {
        self.base_url = url.trim().trim_end_matches('/').to_string();
    }
}

// The credential never reaches log output.
impl std::fmt::Debug for OracleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct RawOracle {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl From<RawOracle> for OracleConfig {
    fn from(raw: RawOracle) -> Self {
        let mut config = OracleConfig::default();
        config.api_key = raw.api_key.filter(|key| !key.trim().is_empty());
        if let Some(model) = raw.model.filter(|m| !m.trim().is_empty()) {
            config.model = model.trim().to_string();
        }
        if let Some(url) = raw.base_url.filter(|u| !u.trim().is_empty()) {
            config.set_base_url(&url);
        }
        if let Some(secs) = raw.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }
}

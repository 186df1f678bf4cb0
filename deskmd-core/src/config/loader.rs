use super::error::ConfigError;
use super::oracle::{OracleConfig, RawOracle};
use super::server::RawServer;
use super::{AppConfig, LoopConfig};
use crate::constants::{API_KEY_ENV, BASE_URL_ENV, CONFIG_PATH, ENV_PATH, MODEL_ENV};
use dotenvy::from_filename;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Once;
use std::time::Duration;
use tracing::debug;

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    oracle: RawOracle,
    #[serde(default)]
    server: RawServer,
    #[serde(default)]
    agent: RawAgent,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawAgent {
    max_steps: Option<usize>,
    tool_timeout_secs: Option<u64>,
}

/// Ensures environment variables are loaded from config/.env
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        let _ = from_filename(ENV_PATH);
    });
}

/// Load and validate configuration. An explicit path must exist; the default
/// path is optional and falls back to built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    ensure_env_loaded();
    let content = match path {
        Some(explicit) => Some(read_file(explicit)?),
        None => match read_file(Path::new(CONFIG_PATH)) {
            Ok(content) => Some(content),
            Err(ConfigError::NotFound { .. }) => {
                debug!("No configuration file at default path; using defaults");
                None
            }
            Err(other) => return Err(other),
        },
    };

    let source = path.unwrap_or_else(|| Path::new(CONFIG_PATH));
    let mut config = parse_config(content.as_deref().unwrap_or_default(), source)?;
    apply_env_overrides(&mut config.oracle, |key| std::env::var(key).ok());
    Ok(config)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    debug!(path = %path.display(), "Reading client configuration file");
    fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Parse TOML text into a validated [`AppConfig`] without touching the environment.
pub fn parse_config(content: &str, path: &Path) -> Result<AppConfig, ConfigError> {
    let parsed: RawConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut agent = LoopConfig::default();
    if let Some(max_steps) = parsed.agent.max_steps {
        if max_steps == 0 {
            return Err(ConfigError::InvalidMaxSteps { value: max_steps });
        }
        agent.max_steps = max_steps;
    }
    agent.tool_timeout = parsed
        .agent
        .tool_timeout_secs
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs);

    Ok(AppConfig {
        oracle: OracleConfig::from(parsed.oracle),
        server: parsed.server.resolve()?,
        agent,
    })
}

/// Environment wins over the file for every oracle setting it provides.
pub fn apply_env_overrides<F>(oracle: &mut OracleConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
    if let Some(key) = lookup(API_KEY_ENV) {
        oracle.api_key = Some(key.trim().to_string());
    }
    if let Some(model) = lookup(MODEL_ENV) {
        oracle.model = model.trim().to_string();
    }
    if let Some(url) = lookup(BASE_URL_ENV) {
        oracle.set_base_url(&url);
    }
}

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("failed to read config from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("decision oracle is not configured: set {variable}")]
    MissingCredential { variable: &'static str },

    #[error("agent.max_steps must be at least 1 (got {value})")]
    InvalidMaxSteps { value: usize },

    #[error("failed to locate the tool server executable: {source}")]
    ServerBinary {
        #[source]
        source: io::Error,
    },
}

impl ConfigError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::MissingCredential { variable } => format!(
                "The decision oracle is not configured. Run: export {variable}=\"<your key>\""
            ),
            other => other.to_string(),
        }
    }
}

use super::error::ConfigError;
use crate::constants::SERVER_BINARY;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// How to launch the MCP tool server as a child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub name: String,
    pub command: PathBuf,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub workdir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            name: SERVER_BINARY.to_string(),
            command: command.into(),
            args: Vec::new(),
            env: HashMap::new(),
            workdir: None,
        }
    }

    /// The `deskmd-server` executable installed next to the running binary.
    pub fn sibling_binary() -> Result<Self, ConfigError> {
        let current =
            std::env::current_exe().map_err(|source| ConfigError::ServerBinary { source })?;
        let mut command = current.with_file_name(SERVER_BINARY);
        if cfg!(windows) {
            command.set_extension("exe");
        }
        Ok(Self::new(command))
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct RawServer {
    name: Option<String>,
    command: Option<String>,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    env: HashMap<String, String>,
    workdir: Option<String>,
}

impl RawServer {
    pub(super) fn resolve(self) -> Result<ServerConfig, ConfigError> {
        let expand = |s: &str| -> String {
            shellexpand::full(s)
                .map(|cow| cow.into_owned())
                .unwrap_or_else(|_| s.to_string())
        };

        let mut config = match self.command.as_deref() {
            Some(command) if !command.trim().is_empty() => {
                ServerConfig::new(PathBuf::from(expand(command.trim())))
            }
            _ => ServerConfig::sibling_binary()?,
        };
        if let Some(name) = self.name.filter(|n| !n.trim().is_empty()) {
            config.name = name;
        }
        config.args = self.args.iter().map(|arg| expand(arg)).collect();
        config.env = self
            .env
            .into_iter()
            .map(|(key, value)| (key, expand(&value)))
            .collect();
        config.workdir = self.workdir.map(|d| PathBuf::from(expand(&d)));
        Ok(config)
    }
}

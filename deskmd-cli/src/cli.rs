use clap::Parser;
use deskmd_core::config::{AppConfig, ConfigError, ServerConfig};
use deskmd_server::DIR_ENV;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "deskmd",
    version,
    about = "Ask questions about the .md files in a directory"
)]
pub struct Cli {
    /// TOML configuration file (defaults to config/client.toml when present).
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Chat model name.
    #[arg(long)]
    pub model: Option<String>,
    /// Base URL of the OpenAI-compatible endpoint.
    #[arg(long)]
    pub base_url: Option<String>,
    /// Maximum tool steps per question.
    #[arg(long)]
    pub max_steps: Option<usize>,
    /// Tool server executable.
    #[arg(long)]
    pub server_command: Option<PathBuf>,
    /// Directory served by the tool server.
    #[arg(long)]
    pub dir: Option<String>,
    /// Question to answer. Starts the interactive loop when omitted.
    pub question: Vec<String>,
}

impl Cli {
    /// The positional words as one question, or `None` for interactive mode.
    pub fn question(&self) -> Option<String> {
        let joined = self.question.join(" ");
        let trimmed = joined.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Command-line flags win over file and environment settings.
    pub fn apply(&self, config: &mut AppConfig) -> Result<(), ConfigError> {
        if let Some(model) = self.model.as_deref().filter(|m| !m.trim().is_empty()) {
            config.oracle.model = model.trim().to_string();
        }
        if let Some(url) = &self.base_url {
            config.oracle.set_base_url(url);
        }
        if let Some(max_steps) = self.max_steps {
            if max_steps == 0 {
                return Err(ConfigError::InvalidMaxSteps { value: max_steps });
            }
            config.agent.max_steps = max_steps;
        }
        if let Some(command) = &self.server_command {
            let mut server = ServerConfig::new(command.clone());
            server.env = std::mem::take(&mut config.server.env);
            config.server = server;
        }
        if let Some(dir) = &self.dir {
            config.server.env.insert(DIR_ENV.to_string(), dir.clone());
        }
        Ok(())
    }
}

use super::errors::AgentError;
use crate::config::AppConfig;
use crate::tooling::{McpProcess, ToolProvider};
use crate::types::ToolDescriptor;
use tracing::info;

/// A connected tool provider together with the catalogue it advertised at
/// start-up. The catalogue is never refreshed during the session.
pub struct Session<T: ToolProvider> {
    provider: T,
    tools: Vec<ToolDescriptor>,
}

impl<T: ToolProvider> Session<T> {
    pub async fn start(provider: T) -> Result<Self, AgentError> {
        let tools = provider.list_tools().await.map_err(AgentError::Session)?;
        info!(
            tools = ?tools.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            "Tool session started"
        );
        Ok(Self { provider, tools })
    }

    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn provider(&self) -> &T {
        &self.provider
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.iter().any(|tool| tool.name == name)
    }

    /// `- name: description` lines for diagnostics.
    pub fn catalog(&self) -> String {
        self.tools
            .iter()
            .map(ToolDescriptor::catalog_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Session<McpProcess> {
    /// Spawn the configured tool server and read its catalogue.
    pub async fn connect(config: &AppConfig) -> Result<Self, AgentError> {
        let process =
            McpProcess::with_call_timeout(config.server.clone(), config.agent.tool_timeout);
        Self::start(process).await
    }

    pub async fn close(self) {
        self.provider.shutdown().await;
    }
}

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolInvokeError {
    #[error("failed to spawn MCP server '{server}': {source}")]
    Spawn {
        server: String,
        #[source]
        source: std::io::Error,
    },
    #[error("MCP server '{server}' transport error: {message}")]
    Transport { server: String, message: String },
    #[error("MCP server '{server}' returned invalid JSON: {source}")]
    InvalidJson {
        server: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("MCP server '{server}' returned JSON-RPC error {code}: {message}")]
    Rpc {
        server: String,
        code: i64,
        message: String,
    },
    #[error("tool '{tool}' failed: {message}")]
    ToolFailed { tool: String, message: String },
    #[error("tool '{tool}' did not answer within {limit:?}")]
    Timeout { tool: String, limit: Duration },
    #[error("MCP server '{server}' terminated unexpectedly")]
    Terminated { server: String },
    #[error("MCP server '{server}' request cancelled")]
    Cancelled { server: String },
}

impl ToolInvokeError {
    /// The most specific human-readable cause.
    pub fn user_message(&self) -> String {
        match self {
            ToolInvokeError::ToolFailed { message, .. } => message.clone(),
            ToolInvokeError::Rpc { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

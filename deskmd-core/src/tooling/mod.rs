//! Tool provider seam and the MCP stdio client that implements it.

mod error;
mod process;
mod result;

pub use error::ToolInvokeError;
pub use process::McpProcess;
pub use result::{ContentItem, ToolResult};

use crate::types::ToolDescriptor;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Argument map passed to a tool call.
pub type ToolArguments = Map<String, Value>;

/// Anything that can advertise and execute named tools.
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Enumerate the available tools. Stable for the provider's lifetime.
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ToolInvokeError>;

    /// Execute one tool. A result flagged as an error is returned as
    /// [`ToolInvokeError::ToolFailed`].
    async fn call_tool(
        &self,
        name: &str,
        arguments: ToolArguments,
    ) -> Result<ToolResult, ToolInvokeError>;
}

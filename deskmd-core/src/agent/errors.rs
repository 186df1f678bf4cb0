use super::decision::DecisionError;
use crate::model::ModelError;
use crate::tooling::ToolInvokeError;
use std::error::Error as StdError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("question is empty")]
    EmptyQuestion,
    #[error("decision oracle request failed: {0}")]
    Oracle(#[from] ModelError),
    #[error(transparent)]
    Decision(#[from] DecisionError),
    #[error("oracle requested unknown tool '{tool}'\navailable tools:\n{available}")]
    UnknownTool { tool: String, available: String },
    #[error("tool '{tool}' failed: {source}")]
    ToolInvocation {
        tool: String,
        #[source]
        source: ToolInvokeError,
    },
    #[error("could not start tool session: {0}")]
    Session(#[source] ToolInvokeError),
    #[error("no final answer after {0} tool steps")]
    StepLimitExceeded(usize),
}

impl AgentError {
    /// One human-readable line (or block, for the tool list) describing the
    /// failure, unwrapped to the first underlying cause.
    pub fn user_message(&self) -> String {
        match self {
            AgentError::Oracle(err) => err.user_message(),
            AgentError::ToolInvocation { tool, source } => {
                format!("Tool '{tool}' failed: {}", source.user_message())
            }
            AgentError::Session(source) => {
                format!("Could not start the tool server: {}", source.user_message())
            }
            other => other.to_string(),
        }
    }
}

/// Render any error as a single line built from its innermost cause.
pub fn root_cause_message(err: &(dyn StdError + 'static)) -> String {
    let mut current = err;
    while let Some(next) = current.source() {
        current = next;
    }
    current.to_string()
}

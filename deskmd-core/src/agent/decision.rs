use crate::tooling::ToolArguments;
use serde_json::{Map, Value};
use thiserror::Error;

pub const ACTION_CALL_TOOL: &str = "call_tool";
pub const ACTION_FINAL: &str = "final";

/// What the oracle wants to happen next.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    CallTool {
        tool: String,
        arguments: ToolArguments,
    },
    Final {
        answer: String,
    },
}

/// Ways the oracle's raw output can fail validation.
#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("oracle output is not strict JSON: {source} (raw output: {raw})")]
    MalformedJson {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("oracle JSON is not an object: {raw}")]
    NonObject { raw: String },
    #[error("oracle returned an invalid action '{tag}' (raw: {raw})")]
    InvalidTag { tag: String, raw: String },
    #[error("oracle returned action=final without an answer")]
    EmptyFinalAnswer,
}

impl Decision {
    /// Parse raw oracle text. Plain JSON only: no fence stripping, no repair.
    /// Empty output is read as `{}`.
    pub fn parse(content: &str) -> Result<Self, DecisionError> {
        let trimmed = content.trim();
        let text = if trimmed.is_empty() { "{}" } else { trimmed };
        let value: Value =
            serde_json::from_str(text).map_err(|source| DecisionError::MalformedJson {
                raw: trimmed.to_string(),
                source,
            })?;
        match value {
            Value::Object(map) => Self::from_object(map),
            _ => Err(DecisionError::NonObject {
                raw: trimmed.to_string(),
            }),
        }
    }

    fn from_object(map: Map<String, Value>) -> Result<Self, DecisionError> {
        let tag = match map.get("action") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(action)) => action.trim().to_string(),
            Some(other) => other.to_string(),
        };

        match tag.as_str() {
            ACTION_FINAL => match map.get("answer").and_then(Value::as_str).map(str::trim) {
                Some(answer) if !answer.is_empty() => Ok(Decision::Final {
                    answer: answer.to_string(),
                }),
                _ => Err(DecisionError::EmptyFinalAnswer),
            },
            ACTION_CALL_TOOL => {
                let tool = map
                    .get("tool")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .unwrap_or_default()
                    .to_string();
                let arguments = match map.get("arguments") {
                    Some(Value::Object(arguments)) => arguments.clone(),
                    _ => Map::new(),
                };
                Ok(Decision::CallTool { tool, arguments })
            }
            _ => Err(DecisionError::InvalidTag {
                tag,
                raw: Value::Object(map).to_string(),
            }),
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Decision::CallTool { .. } => ACTION_CALL_TOOL,
            Decision::Final { .. } => ACTION_FINAL,
        }
    }
}

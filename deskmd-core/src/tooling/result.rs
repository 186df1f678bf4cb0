use serde::Deserialize;
use serde_json::Value;

/// One entry of a `tools/call` result's `content` array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    Text { text: String },
    #[serde(other)]
    Other,
}

/// Outcome of one tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub content: Vec<ContentItem>,
    pub is_error: bool,
    raw: Value,
}

impl ToolResult {
    /// Interpret a raw MCP `tools/call` result. Unrecognised content items are
    /// kept as [`ContentItem::Other`]; the raw payload is retained for fallback
    /// rendering.
    pub fn from_value(raw: Value) -> Self {
        let content = raw
            .get("content")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|item| {
                        serde_json::from_value(item.clone()).unwrap_or(ContentItem::Other)
                    })
                    .collect()
            })
            .unwrap_or_default();
        let is_error = raw.get("isError").and_then(Value::as_bool).unwrap_or(false);
        Self {
            content,
            is_error,
            raw,
        }
    }

    /// Convenience constructor for a successful single-text result.
    pub fn text_result(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::from_value(serde_json::json!({
            "content": [{ "type": "text", "text": text }],
            "isError": false
        }))
    }

    /// All non-empty text items joined by newlines, or the compact JSON of the
    /// whole result when there is no text at all.
    pub fn text(&self) -> String {
        let parts: Vec<&str> = self
            .content
            .iter()
            .filter_map(|item| match item {
                ContentItem::Text { text } if !text.is_empty() => Some(text.as_str()),
                _ => None,
            })
            .collect();
        if parts.is_empty() {
            self.raw.to_string()
        } else {
            parts.join("\n")
        }
    }
}

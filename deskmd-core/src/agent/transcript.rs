use crate::tooling::ToolArguments;
use serde::Serialize;
use serde_json::Value;

/// One executed tool call and its text result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptEntry {
    pub tool: String,
    pub arguments: ToolArguments,
    pub result: String,
}

impl TranscriptEntry {
    fn render(&self) -> String {
        let arguments = Value::Object(self.arguments.clone());
        format!(
            "Tool call: {}\nArguments: {}\nTool result:\n{}",
            self.tool, arguments, self.result
        )
    }
}

/// Append-only record of the tool calls made for one question.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The original question followed by every entry, so the oracle sees all
    /// earlier tool results in a single user message.
    pub fn fold_into(&self, question: &str) -> String {
        if self.entries.is_empty() {
            return question.to_string();
        }
        let rendered: Vec<String> = self.entries.iter().map(TranscriptEntry::render).collect();
        format!("{question}\n\n{}", rendered.join("\n\n"))
    }
}

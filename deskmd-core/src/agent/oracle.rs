use super::decision::Decision;
use super::errors::AgentError;
use crate::logging::preview;
use crate::model::{ModelProvider, ModelRequest};
use crate::types::{ChatMessage, ToolDescriptor};
use tracing::{debug, info};

/// Turns a question plus the tool catalogue into one validated [`Decision`].
pub struct DecisionOracle<P: ModelProvider> {
    provider: P,
    model: String,
}

impl<P: ModelProvider> DecisionOracle<P> {
    pub fn new(provider: P, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn compose_system_instructions(tools: &[ToolDescriptor]) -> String {
        let mut lines = vec![
            "You are an assistant with tools. You may call a tool to gather information before answering the user.".to_string(),
            "Output strict JSON only, with no extra text and no code fences.".to_string(),
            "You must choose exactly one of these two JSON shapes:".to_string(),
            r#"1) {"action":"call_tool","tool":"tool_name","arguments":{}}"#.to_string(),
            r#"2) {"action":"final","answer":"your answer"}"#.to_string(),
            "Available tools:".to_string(),
        ];
        lines.extend(tools.iter().map(ToolDescriptor::catalog_line));
        lines.join("\n")
    }

    pub async fn decide(
        &self,
        question: &str,
        tools: &[ToolDescriptor],
    ) -> Result<Decision, AgentError> {
        let messages = vec![
            ChatMessage::system(Self::compose_system_instructions(tools)),
            ChatMessage::user(question),
        ];
        debug!(
            model = self.model.as_str(),
            question = %preview(question, 300),
            "Requesting decision"
        );
        let response = self
            .provider
            .chat(ModelRequest::deterministic(self.model.clone(), messages))
            .await?;
        let decision = Decision::parse(&response.content)?;
        info!(action = decision.action(), ?decision, "Oracle decision");
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructions_list_every_tool() {
        let tools = vec![
            ToolDescriptor::new("count_md_files", "Count the .md files."),
            ToolDescriptor::new("read_md_file", "Read one .md file."),
        ];
        type Oracle = DecisionOracle<crate::model::OpenAiCompatibleClient>;
        let text = Oracle::compose_system_instructions(&tools);
        assert!(text.contains(r#"{"action":"final","answer":"your answer"}"#));
        assert!(text.ends_with(
            "- count_md_files: Count the .md files.\n- read_md_file: Read one .md file."
        ));
    }
}

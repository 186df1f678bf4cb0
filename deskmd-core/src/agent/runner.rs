use super::decision::Decision;
use super::errors::AgentError;
use super::models::{AgentOptions, AgentOutcome};
use super::oracle::DecisionOracle;
use super::session::Session;
use super::transcript::{Transcript, TranscriptEntry};
use crate::logging::preview;
use crate::model::ModelProvider;
use crate::tooling::ToolProvider;
use tracing::{info, warn};

pub struct Agent<P: ModelProvider> {
    oracle: DecisionOracle<P>,
    max_steps: usize,
}

impl<P: ModelProvider> Agent<P> {
    pub fn new(provider: P, options: AgentOptions) -> Self {
        Self {
            oracle: DecisionOracle::new(provider, options.model),
            max_steps: options.max_steps,
        }
    }

    /// Resolve one question. Every failure ends the run; nothing is retried.
    pub async fn run<T: ToolProvider>(
        &self,
        session: &Session<T>,
        question: &str,
    ) -> Result<AgentOutcome, AgentError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AgentError::EmptyQuestion);
        }
        info!(question = %preview(question, 300), "Agent run started");

        let mut transcript = Transcript::new();
        let mut effective_question = question.to_string();

        for round in 0..self.max_steps {
            info!(step = round + 1, max_steps = self.max_steps, "Decision round");
            let decision = self
                .oracle
                .decide(&effective_question, session.tools())
                .await?;

            let (tool, arguments) = match decision {
                Decision::Final { answer } => {
                    info!(length = answer.chars().count(), "Final answer produced");
                    return Ok(AgentOutcome {
                        answer,
                        transcript,
                        rounds: round + 1,
                    });
                }
                Decision::CallTool { tool, arguments } => (tool, arguments),
            };

            if !session.has_tool(&tool) {
                warn!(requested_tool = %tool, "Oracle requested an unknown tool");
                return Err(AgentError::UnknownTool {
                    tool,
                    available: session.catalog(),
                });
            }

            let rendered = serde_json::Value::Object(arguments.clone());
            info!(tool = %tool, arguments = %rendered, "Calling tool");
            let result = session
                .provider()
                .call_tool(&tool, arguments.clone())
                .await
                .map_err(|source| AgentError::ToolInvocation {
                    tool: tool.clone(),
                    source,
                })?;
            let text = result.text();
            info!(
                tool = %tool,
                length = text.chars().count(),
                preview = %preview(&text, 200),
                "Tool returned"
            );

            transcript.push(TranscriptEntry {
                tool,
                arguments,
                result: text,
            });
            effective_question = transcript.fold_into(question);
        }

        warn!(max_steps = self.max_steps, "Step limit reached without a final answer");
        Err(AgentError::StepLimitExceeded(self.max_steps))
    }
}

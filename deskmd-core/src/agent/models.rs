use super::transcript::Transcript;
use crate::config::AppConfig;
use crate::constants::{DEFAULT_MAX_STEPS, DEFAULT_MODEL};

#[derive(Debug, Clone)]
pub struct AgentOutcome {
    pub answer: String,
    pub transcript: Transcript,
    /// Oracle requests made, including the one that produced the answer.
    pub rounds: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentOptions {
    pub model: String,
    pub max_steps: usize,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl AgentOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.oracle.model.clone(),
            max_steps: config.agent.max_steps,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }
}

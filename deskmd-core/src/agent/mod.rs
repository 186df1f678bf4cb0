//! # Agent Module
//!
//! Resolves one question by alternating between a decision from the model and,
//! when asked for, a single tool call.
//!
//! ## Key Types
//!
//! - [`Agent`] - the bounded decision loop
//! - [`Session`] - a started tool provider and its fixed tool catalogue
//! - [`Decision`] - the validated `call_tool` / `final` choice
//! - [`Transcript`] - tool calls made so far for the current question
//! - [`AgentError`] - every way a question can fail
//!
//! ## Agent Loop
//!
//! 1. Ask the oracle for a decision on the question plus the transcript
//! 2. `final`: return the answer
//! 3. `call_tool`: check the tool is advertised, call it, record the result
//! 4. Stop with [`AgentError::StepLimitExceeded`] after `max_steps` rounds

mod decision;
mod errors;
mod models;
mod oracle;
mod runner;
mod session;
mod transcript;

pub use decision::{Decision, DecisionError};
pub use errors::{AgentError, root_cause_message};
pub use models::{AgentOptions, AgentOutcome};
pub use oracle::DecisionOracle;
pub use runner::Agent;
pub use session::Session;
pub use transcript::{Transcript, TranscriptEntry};

//! Decision oracle transport
//!
//! [`ModelProvider`] is the seam the agent talks to; [`OpenAiCompatibleClient`]
//! implements it over a chat-completion HTTP endpoint.

mod client;
mod traits;
mod types;

pub use client::OpenAiCompatibleClient;
pub use traits::ModelProvider;
pub use types::{ModelError, ModelRequest, ModelResponse};

//! # deskmd-core
//!
//! Core of the deskmd client: a bounded decision loop that lets a language
//! model choose between calling a tool on an MCP server and answering the
//! user directly.
//!
//! ## Modules
//!
//! - [`agent`] - the orchestration loop, decision parsing and transcript
//! - [`tooling`] - the [`tooling::ToolProvider`] seam and the MCP stdio client
//! - [`model`] - the [`model::ModelProvider`] seam and the OpenAI-compatible client
//! - [`config`] - TOML, `.env` and environment configuration
//! - [`logging`] - init-once tracing setup

pub mod agent;
pub mod config;
pub mod constants;
pub mod domain;
pub mod logging;
pub mod model;
pub mod tooling;

pub use agent::{Agent, AgentError, AgentOptions, AgentOutcome};
pub use config::{AppConfig, ConfigError};
pub use domain::types;
pub use logging::{LogSettings, Logging};

//! Application constants
//!
//! Single source of truth for paths, defaults and environment variable names.

/// Default configuration file path
pub const CONFIG_PATH: &str = "config/client.toml";

/// Default environment file path
pub const ENV_PATH: &str = "config/.env";

/// Environment variable holding the oracle credential
pub const API_KEY_ENV: &str = "QWEN_API_KEY";

/// Environment variable overriding the oracle model
pub const MODEL_ENV: &str = "QWEN_MODEL";

/// Environment variable overriding the oracle base URL
pub const BASE_URL_ENV: &str = "QWEN_BASE_URL";

pub const DEFAULT_MODEL: &str = "qwen-plus";

pub const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1";

/// Upper bound for a single oracle HTTP call
pub const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 60;

/// Maximum number of decision rounds per question
pub const DEFAULT_MAX_STEPS: usize = 6;

/// Name of the tool server executable looked up next to the client
pub const SERVER_BINARY: &str = "deskmd-server";

/// MCP protocol revision spoken by client and server
pub const PROTOCOL_VERSION: &str = "2025-06-18";

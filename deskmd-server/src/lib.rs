//! # deskmd-server
//!
//! A Model Context Protocol server over stdio that exposes three read-only
//! tools on the Markdown files of a single directory:
//!
//! - `count_md_files` - number of `*.md` files
//! - `list_md_files` - their names
//! - `read_md_file` - the content of one file, confined to the directory

pub mod protocol;
pub mod server;
pub mod tools;

pub use server::McpServer;
pub use tools::{MdDirectory, ToolError};

/// MCP protocol revision this server speaks.
pub const PROTOCOL_VERSION: &str = "2025-06-18";

/// Environment variable naming the served directory.
pub const DIR_ENV: &str = "DESKMD_DIR";

/// Used when neither `--dir` nor `DESKMD_DIR` is given.
pub const DEFAULT_DIR: &str = "~/Desktop";

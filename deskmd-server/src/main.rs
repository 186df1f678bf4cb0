use clap::Parser;
use deskmd_server::{DEFAULT_DIR, DIR_ENV, McpServer, MdDirectory};
use std::error::Error;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(
    name = "deskmd-server",
    version,
    about = "MCP stdio server for the .md files of one directory"
)]
struct Cli {
    /// Directory whose .md files are served.
    #[arg(long, env = DIR_ENV)]
    dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let cli = Cli::parse();
    let raw = cli.dir.unwrap_or_else(|| DEFAULT_DIR.to_string());
    let dir = PathBuf::from(shellexpand::full(&raw)?.into_owned());
    info!(dir = %dir.display(), "Starting deskmd-server");

    McpServer::new(MdDirectory::new(dir)).serve_stdio().await?;
    Ok(())
}

/// Logs go to stderr; stdout carries the protocol.
fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_level(true)
            .init();
    });
}

mod ask;
mod cli;
mod stdio;

use clap::Parser;
use cli::Cli;
use deskmd_core::agent::root_cause_message;
use deskmd_core::config::ensure_env_loaded;
use deskmd_core::{AppConfig, LogSettings, Logging};
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    ensure_env_loaded();
    let _logging = Logging::init(&LogSettings::from_env());
    info!("Starting deskmd");

    let config = match load(&cli) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("Error: {message}");
            return ExitCode::FAILURE;
        }
    };

    match cli.question() {
        Some(question) => match ask::answer(&config, &question).await {
            Ok(outcome) => {
                println!("{}", outcome.answer);
                ExitCode::SUCCESS
            }
            Err(err) => {
                error!(error = %err, cause = %root_cause_message(&err), "Question failed");
                eprintln!("Error: {}", err.user_message());
                ExitCode::FAILURE
            }
        },
        None => match stdio::run(&config).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("Error: {err}");
                ExitCode::FAILURE
            }
        },
    }
}

fn load(cli: &Cli) -> Result<AppConfig, String> {
    let mut config = AppConfig::load(cli.config.as_deref()).map_err(|err| err.user_message())?;
    cli.apply(&mut config).map_err(|err| err.user_message())?;
    config.require_credential().map_err(|err| err.user_message())?;
    Ok(config)
}

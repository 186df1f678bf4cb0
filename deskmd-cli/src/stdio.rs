use crate::ask::answer;
use deskmd_core::AppConfig;
use deskmd_core::agent::root_cause_message;
use thiserror::Error;
use std::io::BufRead;
use std::thread;
use tokio::io::{self, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum StdioError {
    #[error("stdin/stdout I/O error: {0}")]
    Io(#[from] std::io::Error),
}

const EXIT_COMMANDS: [&str; 3] = ["exit", "quit", "q"];

pub fn is_exit_command(input: &str) -> bool {
    EXIT_COMMANDS
        .iter()
        .any(|command| input.eq_ignore_ascii_case(command))
}

/// Interactive loop. Ends on an exit command, EOF, Ctrl-C, or the first
/// failed question.
pub async fn run(config: &AppConfig) -> Result<(), StdioError> {
    let mut stdout = io::stdout();
    let mut lines = spawn_line_reader(std::io::BufReader::new(std::io::stdin()));

    print_banner(&mut stdout, config).await?;

    loop {
        prompt(&mut stdout).await?;
        let line = tokio::select! {
            line = lines.recv() => line.transpose()?,
            _ = tokio::signal::ctrl_c() => {
                write_line(&mut stdout, "").await?;
                break;
            }
        };
        let Some(line) = line else {
            write_line(&mut stdout, "").await?;
            break;
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if is_exit_command(input) {
            break;
        }

        info!("Interactive question received");
        tokio::select! {
            result = answer(config, input) => match result {
                Ok(outcome) => {
                    write_line(&mut stdout, &outcome.answer).await?;
                    write_line(&mut stdout, "").await?;
                }
                Err(err) => {
                    warn!(error = %err, cause = %root_cause_message(&err), "Question failed");
                    write_line(&mut stdout, &format!("Error: {}", err.user_message())).await?;
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                write_line(&mut stdout, "\nInterrupted.").await?;
                break;
            }
        }
    }

    stdout.flush().await?;
    Ok(())
}

/// Read lines on a plain OS thread. A blocked read never holds up runtime
/// shutdown, so Ctrl-C at the prompt exits immediately.
fn spawn_line_reader<R>(reader: R) -> mpsc::Receiver<std::io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(1);
    thread::spawn(move || {
        for line in reader.lines() {
            let failed = line.is_err();
            if tx.blocking_send(line).is_err() || failed {
                break;
            }
        }
        debug!("stdin reader finished");
    });
    rx
}

async fn print_banner(stdout: &mut io::Stdout, config: &AppConfig) -> io::Result<()> {
    write_line(stdout, "deskmd interactive mode.").await?;
    write_line(
        stdout,
        &format!(
            "Model: {} | up to {} tool steps per question.",
            config.oracle.model, config.agent.max_steps
        ),
    )
    .await?;
    write_line(stdout, "Type a question and press Enter. 'exit' to quit.").await?;
    Ok(())
}

async fn prompt(stdout: &mut io::Stdout) -> io::Result<()> {
    stdout.write_all(b"> ").await?;
    stdout.flush().await
}

async fn write_line(stdout: &mut io::Stdout, line: &str) -> io::Result<()> {
    stdout.write_all(line.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await
}

use deskmd_core::agent::Session;
use deskmd_core::model::OpenAiCompatibleClient;
use deskmd_core::{Agent, AgentError, AgentOptions, AgentOutcome, AppConfig};
use tracing::debug;

/// Answer one question on a fresh tool session. The session is closed
/// whether or not the run succeeds.
pub async fn answer(config: &AppConfig, question: &str) -> Result<AgentOutcome, AgentError> {
    let provider = OpenAiCompatibleClient::from_config(&config.oracle)?;
    let agent = Agent::new(provider, AgentOptions::from_config(config));

    let session = Session::connect(config).await?;
    let result = agent.run(&session, question).await;
    session.close().await;

    if let Ok(outcome) = &result {
        debug!(
            rounds = outcome.rounds,
            tool_calls = outcome.transcript.len(),
            "Question resolved"
        );
    }
    result
}

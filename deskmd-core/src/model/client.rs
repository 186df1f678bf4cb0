//! OpenAI-compatible chat-completion client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::traits::ModelProvider;
use super::types::{ModelError, ModelRequest, ModelResponse};
use crate::config::OracleConfig;
use crate::logging::preview;
use crate::types::ChatMessage;

const COMPLETIONS_PATH: &str = "chat/completions";

/// Works with any endpoint speaking the `/chat/completions` dialect
/// (DashScope compatible-mode, OpenAI, vLLM, ...).
#[derive(Clone)]
pub struct OpenAiCompatibleClient {
    endpoint: String,
    api_key: Option<String>,
    http: Client,
}

impl OpenAiCompatibleClient {
    pub fn from_config(config: &OracleConfig) -> Result<Self, ModelError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| ModelError::Client {
                provider: config.base_url.clone(),
                source,
            })?;
        Ok(Self {
            endpoint: config.base_url.clone(),
            api_key: config.api_key.clone(),
            http,
        })
    }

    /// Build URL from endpoint and path
    fn build_url(&self, path: &str) -> String {
        let base = self.endpoint.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    fn require_api_key(&self) -> Result<&str, ModelError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ModelError::missing_api_key(&self.endpoint))
    }
}

#[async_trait]
impl ModelProvider for OpenAiCompatibleClient {
    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let api_key = self.require_api_key()?;
        let url = self.build_url(COMPLETIONS_PATH);

        let payload = CompletionRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            stream: false,
        };

        info!(
            model = request.model.as_str(),
            base_url = self.endpoint.as_str(),
            messages = request.messages.len(),
            "Sending request to chat-completion endpoint"
        );

        let response: CompletionResponse = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ModelError::network(&self.endpoint, e))?
            .error_for_status()
            .map_err(|e| ModelError::network(&self.endpoint, e))?
            .json()
            .await
            .map_err(|e| ModelError::network(&self.endpoint, e))?;

        // No choice at all reads as empty text, which the decision parser
        // then rejects like any other non-decision.
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default();
        let content = content.trim().to_string();
        debug!(preview = %preview(&content, 500), "Raw completion received");

        Ok(ModelResponse::new(content))
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: Option<CompletionMessage>,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

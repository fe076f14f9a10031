//! OpenAI-compatible chat completion provider.
//!
//! One blocking-style call per request: no streaming, no retry, no timeout.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;

use super::{
    ChatMessage, Completion, CompletionProvider, CompletionRequest, LlmConfig, ProviderError,
    ProviderResult,
};

/// Default OpenAI API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Provider for any server speaking the OpenAI chat-completions format.
pub struct OpenAiProvider {
    client: Client,
    config: Arc<LlmConfig>,
}

impl OpenAiProvider {
    /// Create a new provider with the given configuration.
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }

    /// Full URL of the completions endpoint.
    fn completions_url(&self) -> String {
        let base = if self.config.api_base.is_empty() {
            DEFAULT_API_BASE
        } else {
            &self.config.api_base
        };
        format!("{}/chat/completions", base.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn model(&self) -> &str {
        &self.config.model
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    async fn complete(&self, messages: Vec<ChatMessage>) -> ProviderResult<Completion> {
        let request = CompletionRequest::new(&self.config, messages);

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = api_error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
                body,
            });
        }

        let parsed: CompletionResponse = response.json().await?;
        Ok(parsed.into_completion())
    }
}

/// Chat completion response (only the fields we read).
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl CompletionResponse {
    fn into_completion(self) -> Completion {
        let reply = self
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default();

        Completion {
            reply,
            usage: self.usage,
        }
    }
}

/// Error envelope: `{"error": {"message": "..."}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Extract the provider's error message from a failure body.
fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
}

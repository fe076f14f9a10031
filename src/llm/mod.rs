//! LLM client module for the upstream chat-completion API.
//!
//! The endpoint makes exactly one non-streaming call per request through an
//! `LlmClient`, which wraps any `CompletionProvider`. The only concrete
//! provider is the OpenAI-compatible `OpenAiProvider`.

mod openai;
mod provider;

pub use openai::{OpenAiProvider, DEFAULT_API_BASE};
pub use provider::{CompletionProvider, ProviderError, ProviderResult};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::message::{Message, Role};

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default cap on generated tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 600;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Chat message as exchanged with the completion API.
///
/// Unknown keys are ignored on input, so page messages carrying
/// `createdAt` deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        Self::new(message.role, message.content.clone())
    }
}

/// Request body for `POST {api_base}/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl CompletionRequest {
    /// Build a request from the configured generation parameters.
    pub fn new(config: &LlmConfig, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: config.model.clone(),
            messages,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// Result of one completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Text of the first choice, or empty when the provider returned none.
    pub reply: String,
    /// Provider token counters, passed through untouched.
    pub usage: serde_json::Value,
}

/// LLM client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl LlmConfig {
    /// Check if an API key is present.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Load from environment variables, with file config as fallback.
    pub fn from_env_and_config(file_config: Option<&crate::config::LlmConfigFile>) -> Self {
        let mut config = Self::default();

        if let Some(fc) = file_config {
            config.api_base = fc.api_base.clone();
            if let Some(ref key) = fc.api_key {
                config.api_key = key.clone();
            }
            config.model = fc.model.clone();
            config.max_tokens = fc.max_tokens;
            config.temperature = fc.temperature;
        }

        // Environment overrides the file
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.api_key = key;
        }

        if let Ok(base) = std::env::var("OPENAI_API_BASE") {
            config.api_base = base;
        }

        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            config.model = model;
        }

        config
    }
}

/// Cloneable handle over a completion provider.
#[derive(Clone)]
pub struct LlmClient {
    inner: Arc<dyn CompletionProvider>,
}

impl LlmClient {
    /// Create a client backed by the OpenAI-compatible provider.
    pub fn new(config: LlmConfig) -> Self {
        Self {
            inner: Arc::new(OpenAiProvider::new(config)),
        }
    }

    /// Create a client from an existing provider.
    pub fn from_provider(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { inner: provider }
    }

    pub fn is_configured(&self) -> bool {
        self.inner.is_configured()
    }

    pub fn model(&self) -> &str {
        self.inner.model()
    }

    /// Run one completion call.
    pub async fn complete(&self, messages: Vec<ChatMessage>) -> ProviderResult<Completion> {
        self.inner.complete(messages).await
    }
}

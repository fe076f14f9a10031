//! Completion provider trait and error type.
//!
//! The endpoint talks to the upstream chat-completion API through the
//! `CompletionProvider` trait so the HTTP layer never depends on a concrete
//! vendor client, and tests can swap in a fake.

use async_trait::async_trait;
use thiserror::Error;

use super::{ChatMessage, Completion};

/// Trait for chat-completion backends.
///
/// # Example
///
/// ```ignore
/// use jpchat::llm::{ChatMessage, CompletionProvider};
/// use jpchat::message::Role;
///
/// async fn ask(provider: &dyn CompletionProvider) {
///     let messages = vec![ChatMessage::new(Role::User, "Best heist movie?")];
///     let completion = provider.complete(messages).await.unwrap();
///     println!("{}", completion.reply);
/// }
/// ```
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the model identifier sent upstream.
    fn model(&self) -> &str;

    /// Returns whether credentials are present.
    ///
    /// A provider that is not configured can still be called; the upstream
    /// rejects the request and the caller sees a `ProviderError`.
    fn is_configured(&self) -> bool;

    /// Run a single, non-streaming chat completion over `messages`.
    async fn complete(&self, messages: Vec<ChatMessage>) -> ProviderResult<Completion>;
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur while calling the upstream API.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        /// Raw response body as returned by the provider.
        body: String,
    },

    /// The API answered 2xx but the body could not be decoded.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// HTTP status reported by the provider, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw provider response body, if one was received.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Api { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else if err.is_timeout() {
            Self::Network("Request timed out".to_string())
        } else if err.is_connect() {
            Self::Network(format!("Connection failed: {}", err))
        } else {
            Self::Network(err.to_string())
        }
    }
}

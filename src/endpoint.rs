//! Client side of the completion endpoint, used by the chat page.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::Message;

/// Fallback error text when a failed response has no readable body.
const REQUEST_FAILED: &str = "Request failed";

/// Something that can turn a transcript into a reply.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Post the full transcript and return the reply text.
    async fn send(&self, transcript: &[Message]) -> Result<String>;
}

/// HTTP client for `POST /api/chat-direct`.
#[derive(Clone)]
pub struct EndpointClient {
    client: Client,
    url: String,
}

#[derive(Serialize)]
struct ChatDirectRequest<'a> {
    messages: &'a [Message],
}

#[derive(Deserialize)]
struct ChatDirectReply {
    #[serde(default)]
    reply: Value,
}

impl EndpointClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatTransport for EndpointClient {
    async fn send(&self, transcript: &[Message]) -> Result<String> {
        let response = self
            .client
            .post(&self.url)
            .json(&ChatDirectRequest {
                messages: transcript,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| REQUEST_FAILED.to_string());
            return Err(anyhow!("{} ({})", body, status));
        }

        let data: ChatDirectReply = response.json().await?;
        Ok(reply_text(data.reply))
    }
}

/// Render whatever came back in `reply` as text; absent or null is empty.
pub fn reply_text(reply: Value) -> String {
    match reply {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reply_text_variants() {
        assert_eq!(reply_text(json!("Casablanca, obviously.")), "Casablanca, obviously.");
        assert_eq!(reply_text(Value::Null), "");
        assert_eq!(reply_text(json!(42)), "42");
    }

    #[test]
    fn test_missing_reply_deserializes_as_null() {
        let data: ChatDirectReply = serde_json::from_str(r#"{"usage":{}}"#).unwrap();
        assert_eq!(reply_text(data.reply), "");
    }

    #[test]
    fn test_request_body_shape() {
        let transcript = vec![Message::assistant("hello")];
        let body = serde_json::to_value(ChatDirectRequest {
            messages: &transcript,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"messages": [{"role": "assistant", "content": "hello"}]})
        );
    }
}

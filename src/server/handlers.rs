//! Request handlers for the completion endpoint.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::error::{AppError, AppResult};
use super::AppState;
use crate::llm::ChatMessage;
use crate::persona::assemble_messages;

/// Response body of a successful completion.
///
/// `usage` is left out when the provider sent none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatDirectResponse {
    pub reply: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub usage: Value,
}

/// `POST /api/chat-direct`: one completion over the posted transcript.
pub async fn chat_direct(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<ChatDirectResponse>> {
    let incoming = parse_incoming(&body)?;
    let messages = assemble_messages(incoming, state.persona);

    debug!(
        messages = messages.len(),
        model = state.client.model(),
        "forwarding transcript upstream"
    );

    let completion = state.client.complete(messages).await?;

    Ok(Json(ChatDirectResponse {
        reply: completion.reply,
        usage: completion.usage,
    }))
}

/// Any non-POST method on the chat route.
pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        "Method Not Allowed",
    )
}

/// `GET /healthz`: liveness probe.
pub async fn health() -> &'static str {
    "ok"
}

/// Extract the `messages` array from a request body.
///
/// A body that is not JSON, or whose `messages` is missing or not an array,
/// yields an empty list. Entries that are not `{role, content}` objects are
/// an error.
pub fn parse_incoming(body: &[u8]) -> AppResult<Vec<ChatMessage>> {
    let value: Value = serde_json::from_slice(body).unwrap_or(Value::Null);

    match value.get("messages") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| ChatMessage::deserialize(item))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::MalformedMessage(e.to_string())),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    #[test]
    fn test_response_omits_missing_usage() {
        let response = ChatDirectResponse {
            reply: "Try Heat.".to_string(),
            usage: Value::Null,
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({"reply": "Try Heat."})
        );

        let response = ChatDirectResponse {
            reply: String::new(),
            usage: serde_json::json!({"total_tokens": 3}),
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({"reply": "", "usage": {"total_tokens": 3}})
        );
    }

    #[test]
    fn test_parse_incoming_reads_messages() {
        let body = br#"{"messages":[{"role":"user","content":"hi"},{"role":"assistant","content":"hello"}]}"#;
        let parsed = parse_incoming(body).unwrap();
        assert_eq!(
            parsed,
            vec![
                ChatMessage::new(Role::User, "hi"),
                ChatMessage::new(Role::Assistant, "hello"),
            ]
        );
    }

    #[test]
    fn test_parse_incoming_coerces_to_empty() {
        assert!(parse_incoming(b"").unwrap().is_empty());
        assert!(parse_incoming(b"not json").unwrap().is_empty());
        assert!(parse_incoming(b"{}").unwrap().is_empty());
        assert!(parse_incoming(b"[]").unwrap().is_empty());
        assert!(parse_incoming(br#"{"messages":"hi"}"#).unwrap().is_empty());
        assert!(parse_incoming(br#"{"messages":{"role":"user"}}"#).unwrap().is_empty());
        assert!(parse_incoming(br#"{"messages":null}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_incoming_ignores_created_at() {
        let body = br#"{"messages":[{"role":"user","content":"hi","createdAt":1700000000000}]}"#;
        let parsed = parse_incoming(body).unwrap();
        assert_eq!(parsed, vec![ChatMessage::new(Role::User, "hi")]);
    }

    #[test]
    fn test_parse_incoming_rejects_malformed_entries() {
        let err = parse_incoming(br#"{"messages":[{"role":"user"}]}"#).unwrap_err();
        assert!(matches!(err, AppError::MalformedMessage(_)));

        let err = parse_incoming(br#"{"messages":["hi"]}"#).unwrap_err();
        assert!(matches!(err, AppError::MalformedMessage(_)));

        let err = parse_incoming(br#"{"messages":[{"role":"narrator","content":"x"}]}"#).unwrap_err();
        assert!(matches!(err, AppError::MalformedMessage(_)));
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents who sent a message in the chat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Returns the display prefix for this role.
    pub fn prefix(&self) -> &'static str {
        match self {
            Role::System => "System: ",
            Role::User => "You: ",
            Role::Assistant => "JPChat: ",
        }
    }
}

/// A single message in the chat transcript.
///
/// `created_at` travels as epoch milliseconds under `createdAt` and is
/// omitted when the message was never stamped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Create a new unstamped message with the given role and content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: None,
        }
    }

    /// Create a user message stamped with the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content).stamped(Utc::now())
    }

    /// Create an unstamped assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Attach a creation time.
    pub fn stamped(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }
}

//! Persona instructions and transcript assembly.
//!
//! Every list forwarded upstream starts with exactly one system message.
//! Callers may bring their own; otherwise the configured persona is used.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::llm::ChatMessage;
use crate::message::Role;

/// Canned prompt used when there is no conversation at all.
pub const GREETING_PROMPT: &str = "Say hi in one short sentence.";

const REDIRECT_INSTRUCTION: &str = concat!(
    "You are JPChat, an assistant that only responds to questions or conversations related to ",
    "movies, TV shows, cinema history, actors, directors, genres, trivia, recommendations, and ",
    "behind-the-scenes facts.\n",
    "If the user asks about something unrelated to these topics, you must find a creative and ",
    "entertaining way to relate it to a movie, TV show, or cinematic moment, so that the ",
    "conversation always stays connected to film and television.\n",
    "You can respond in any language based on the user's input language."
);

const REFUSE_INSTRUCTION: &str = concat!(
    "You are JPChat, an assistant that only responds to questions or conversations related to ",
    "movies, TV shows, cinema history, actors, directors, genres, trivia, recommendations, and ",
    "behind-the-scenes facts.\n",
    "If the user asks about something unrelated to these topics, politely decline and remind ",
    "them that you can only talk about film and television.\n",
    "You can respond in any language based on the user's input language."
);

/// How the assistant treats off-topic requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    /// Steer off-topic questions back to film and TV.
    #[default]
    Redirect,
    /// Refuse off-topic questions outright.
    Refuse,
}

impl Persona {
    /// The system instruction text.
    pub fn instruction(&self) -> &'static str {
        match self {
            Persona::Redirect => REDIRECT_INSTRUCTION,
            Persona::Refuse => REFUSE_INSTRUCTION,
        }
    }

    /// The instruction as a system-role message.
    pub fn system_message(&self) -> ChatMessage {
        ChatMessage::new(Role::System, self.instruction())
    }
}

/// The two-message seed: persona followed by the greeting prompt.
pub fn default_seed(persona: Persona) -> Vec<ChatMessage> {
    vec![
        persona.system_message(),
        ChatMessage::new(Role::User, GREETING_PROMPT),
    ]
}

/// Build the message list sent upstream.
///
/// - empty input: the default seed
/// - input with any system message: forwarded unchanged
/// - otherwise: persona prepended, order preserved
pub fn assemble_messages(incoming: Vec<ChatMessage>, persona: Persona) -> Vec<ChatMessage> {
    if incoming.is_empty() {
        return default_seed(persona);
    }

    if incoming.iter().any(|m| m.role == Role::System) {
        return incoming;
    }

    let mut messages = Vec::with_capacity(incoming.len() + 1);
    messages.push(persona.system_message());
    messages.extend(incoming);
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(content: &str) -> ChatMessage {
        ChatMessage::new(Role::User, content)
    }

    fn assistant(content: &str) -> ChatMessage {
        ChatMessage::new(Role::Assistant, content)
    }

    #[test]
    fn test_persona_prepended_when_missing() {
        let assembled = assemble_messages(vec![user("hi")], Persona::Redirect);

        assert_eq!(assembled.len(), 2);
        assert_eq!(assembled[0], Persona::Redirect.system_message());
        assert_eq!(assembled[1], user("hi"));
    }

    #[test]
    fn test_order_preserved_after_persona() {
        let incoming = vec![user("a"), assistant("b"), user("c")];
        let assembled = assemble_messages(incoming.clone(), Persona::Redirect);

        assert_eq!(assembled[0].role, Role::System);
        assert_eq!(&assembled[1..], incoming.as_slice());
    }

    #[test]
    fn test_existing_system_message_left_alone() {
        let incoming = vec![
            ChatMessage::new(Role::System, "You only talk about westerns."),
            user("hi"),
        ];
        let assembled = assemble_messages(incoming.clone(), Persona::Redirect);
        assert_eq!(assembled, incoming);
    }

    #[test]
    fn test_system_message_anywhere_counts() {
        let incoming = vec![user("hi"), ChatMessage::new(Role::System, "custom")];
        let assembled = assemble_messages(incoming.clone(), Persona::Refuse);
        assert_eq!(assembled, incoming);
    }

    #[test]
    fn test_empty_input_yields_seed() {
        let assembled = assemble_messages(Vec::new(), Persona::Redirect);
        assert_eq!(assembled, default_seed(Persona::Redirect));
        assert_eq!(assembled.len(), 2);
        assert_eq!(assembled[1], user(GREETING_PROMPT));
    }

    #[test]
    fn test_persona_variants_differ() {
        assert_ne!(Persona::Redirect.instruction(), Persona::Refuse.instruction());
        assert!(Persona::Redirect.instruction().contains("creative"));
        assert!(Persona::Refuse.instruction().contains("decline"));
        assert_eq!(Persona::default(), Persona::Redirect);
    }

    #[test]
    fn test_persona_serde_names() {
        assert_eq!(serde_json::to_string(&Persona::Refuse).unwrap(), "\"refuse\"");
        let parsed: Persona = serde_json::from_str("\"redirect\"").unwrap();
        assert_eq!(parsed, Persona::Redirect);
    }
}

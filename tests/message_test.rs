use chrono::{TimeZone, Utc};
use jpchat::message::{Message, Role};
use serde_json::json;

// ============================================
// Role Tests
// ============================================

#[test]
fn test_role_prefixes() {
    assert_eq!(Role::User.prefix(), "You: ");
    assert_eq!(Role::Assistant.prefix(), "JPChat: ");
    assert_eq!(Role::System.prefix(), "System: ");
}

#[test]
fn test_role_wire_names() {
    assert_eq!(serde_json::to_value(Role::System).unwrap(), json!("system"));
    assert_eq!(serde_json::to_value(Role::User).unwrap(), json!("user"));
    assert_eq!(serde_json::to_value(Role::Assistant).unwrap(), json!("assistant"));
}

#[test]
fn test_role_is_copy() {
    let role = Role::User;
    let role_copy = role; // Copy, not move
    assert_eq!(role, role_copy);
}

// ============================================
// Message Construction Tests
// ============================================

#[test]
fn test_message_user_is_stamped() {
    let before = Utc::now();
    let msg = Message::user("Hello!");

    assert_eq!(msg.role, Role::User);
    assert_eq!(msg.content, "Hello!");
    let stamped = msg.created_at.expect("user messages carry a timestamp");
    assert!(stamped >= before);
}

#[test]
fn test_message_assistant_is_unstamped() {
    let msg = Message::assistant("Hi there!");

    assert_eq!(msg.role, Role::Assistant);
    assert_eq!(msg.content, "Hi there!");
    assert!(msg.created_at.is_none());
}

#[test]
fn test_message_new_is_unstamped() {
    let msg = Message::new(Role::System, "Stay on topic.");
    assert_eq!(msg.role, Role::System);
    assert!(msg.created_at.is_none());
}

#[test]
fn test_message_stamped() {
    let at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
    let msg = Message::assistant("late reply").stamped(at);
    assert_eq!(msg.created_at, Some(at));
}

// ============================================
// Wire Format Tests
// ============================================

#[test]
fn test_message_serializes_created_at_as_millis() {
    let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
    let msg = Message::new(Role::User, "hi").stamped(at);

    assert_eq!(
        serde_json::to_value(&msg).unwrap(),
        json!({"role": "user", "content": "hi", "createdAt": 1_700_000_000_123_i64})
    );
}

#[test]
fn test_message_omits_missing_created_at() {
    let msg = Message::assistant("hello");
    assert_eq!(
        serde_json::to_value(&msg).unwrap(),
        json!({"role": "assistant", "content": "hello"})
    );
}

#[test]
fn test_message_deserializes_without_created_at() {
    let msg: Message = serde_json::from_str(r#"{"role":"assistant","content":"ok"}"#).unwrap();
    assert_eq!(msg, Message::assistant("ok"));
}

#[test]
fn test_message_unicode_content() {
    let content = "Amélie (2001) 🎬 千と千尋の神隠し";
    let msg = Message::user(content);
    assert_eq!(msg.content, content);
}

#[test]
fn test_message_multiline_content() {
    let content = "Line 1\nLine 2\nLine 3";
    let msg = Message::assistant(content);
    assert_eq!(msg.content, content);
}

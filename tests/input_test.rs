use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyModifiers};

use jpchat::app::App;
use jpchat::config::Config;
use jpchat::endpoint::ChatTransport;
use jpchat::input::{handle_key_event, HandleResult};
use jpchat::message::{Message, Role};

/// Transport that records transcripts and answers with a fixed reply.
#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<Vec<Message>>>,
}

#[async_trait]
impl ChatTransport for Recorder {
    async fn send(&self, transcript: &[Message]) -> Result<String> {
        self.seen.lock().unwrap().push(transcript.to_vec());
        Ok("Try The Thing (1982).".to_string())
    }
}

fn press(app: &mut App, code: KeyCode) -> HandleResult {
    handle_key_event(app, code, KeyModifiers::NONE, &Config::default())
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

async fn wait_for_reply(app: &mut App) {
    for _ in 0..100 {
        app.process_reply();
        if !app.is_loading() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("reply never arrived");
}

// ============================================
// Exit Keys
// ============================================

#[test]
fn test_ctrl_c_and_ctrl_d_exit() {
    let mut app = App::new(Arc::new(Recorder::default()));
    let config = Config::default();

    for c in ['c', 'd'] {
        let result = handle_key_event(&mut app, KeyCode::Char(c), KeyModifiers::CONTROL, &config);
        assert_eq!(result, HandleResult::Exit);
    }
    assert!(app.chat.input.is_empty());
}

#[test]
fn test_escape_exits() {
    let mut app = App::new(Arc::new(Recorder::default()));
    assert_eq!(press(&mut app, KeyCode::Esc), HandleResult::Exit);
}

// ============================================
// Editing Keys
// ============================================

#[test]
fn test_typing_and_editing() {
    let mut app = App::new(Arc::new(Recorder::default()));

    type_text(&mut app, "Jaws");
    assert_eq!(app.chat.input, "Jaws");

    press(&mut app, KeyCode::Backspace);
    assert_eq!(app.chat.input, "Jaw");

    press(&mut app, KeyCode::Left);
    press(&mut app, KeyCode::Left);
    press(&mut app, KeyCode::Char('X'));
    assert_eq!(app.chat.input, "JXaw");

    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Char('s'));
    assert_eq!(app.chat.input, "JXaws");
}

#[test]
fn test_enter_on_blank_input_does_nothing() {
    let mut app = App::new(Arc::new(Recorder::default()));

    type_text(&mut app, "   ");
    assert_eq!(press(&mut app, KeyCode::Enter), HandleResult::Continue);

    assert!(app.messages().is_empty());
    assert!(!app.is_loading());
}

// ============================================
// Submission
// ============================================

#[tokio::test]
async fn test_enter_submits_and_reply_arrives() {
    let transport = Arc::new(Recorder::default());
    let mut app = App::new(transport.clone());

    type_text(&mut app, "  scary movie for tonight?  ");
    press(&mut app, KeyCode::Enter);

    assert!(app.is_loading());
    assert!(app.chat.input.is_empty());
    assert_eq!(app.messages().len(), 1);
    assert_eq!(app.messages()[0].content, "scary movie for tonight?");

    wait_for_reply(&mut app).await;

    assert_eq!(app.messages().len(), 2);
    assert_eq!(app.messages()[1].role, Role::Assistant);
    assert_eq!(app.messages()[1].content, "Try The Thing (1982).");

    let seen = transport.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].len(), 1);
}

#[tokio::test]
async fn test_enter_while_loading_keeps_input() {
    let transport = Arc::new(Recorder::default());
    let mut app = App::new(transport.clone());

    type_text(&mut app, "first");
    press(&mut app, KeyCode::Enter);
    type_text(&mut app, "second");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.chat.input, "second");
    assert_eq!(app.messages().len(), 1);

    wait_for_reply(&mut app).await;
    assert_eq!(transport.seen.lock().unwrap().len(), 1);
}

// ============================================
// Scroll Keys
// ============================================

#[test]
fn test_scroll_keys_move_offset() {
    let mut app = App::new(Arc::new(Recorder::default()));
    app.scroll.update(100, 20);
    assert_eq!(app.scroll.offset, 80);

    press(&mut app, KeyCode::Up);
    assert_eq!(app.scroll.offset, 79);
    assert!(!app.scroll.follow);

    press(&mut app, KeyCode::PageUp);
    assert_eq!(app.scroll.offset, 69);

    press(&mut app, KeyCode::Home);
    assert_eq!(app.scroll.offset, 0);

    press(&mut app, KeyCode::Down);
    assert_eq!(app.scroll.offset, 1);

    press(&mut app, KeyCode::PageDown);
    assert_eq!(app.scroll.offset, 11);

    press(&mut app, KeyCode::End);
    assert_eq!(app.scroll.offset, 80);
    assert!(app.scroll.follow);
}

use std::sync::Arc;

use anyhow::anyhow;
use chrono::Utc;
use ratatui::widgets::ScrollbarState;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::endpoint::ChatTransport;
use crate::message::Message;

/// Shown in place of a reply when the request fails.
pub const APOLOGY: &str = "Oops, I couldn't reply right now. Please try again in a moment.";

/// Status of the last exchange with the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Ready to send messages
    Ready,
    /// Waiting for a reply
    Loading,
    /// The last request failed
    Error(String),
}

/// Chat-related state: messages and input.
#[derive(Debug, Default)]
pub struct ChatState {
    /// Chat transcript in conversation order
    pub messages: Vec<Message>,
    /// Current input text
    pub input: String,
    /// Cursor position in input, in characters
    pub cursor_position: usize,
}

impl ChatState {
    /// Create a new ChatState with initial messages.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            input: String::new(),
            cursor_position: 0,
        }
    }

    /// Byte offset of the cursor within `input`.
    fn cursor_byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    /// Handle a character input.
    pub fn handle_char(&mut self, c: char) {
        let index = self.cursor_byte_index();
        self.input.insert(index, c);
        self.cursor_position += 1;
    }

    /// Handle backspace key.
    pub fn handle_backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let index = self.cursor_byte_index();
            self.input.remove(index);
        }
    }

    /// Move cursor left.
    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    /// Move cursor right.
    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    /// Split the input at the cursor.
    pub fn split_input(&self) -> (&str, &str) {
        self.input.split_at(self.cursor_byte_index())
    }

    /// Clear input and reset cursor.
    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
    }
}

/// Scroll state for the message list, measured in rendered lines.
///
/// `max` is written back by the renderer once the wrapped height is known.
#[derive(Debug)]
pub struct ScrollState {
    /// First visible line
    pub offset: usize,
    /// Largest valid offset as of the last render
    pub max: usize,
    /// Keep the newest line in view
    pub follow: bool,
    /// Message count the follow effect last saw
    seen: usize,
    /// Scrollbar state for ratatui
    pub scrollbar: ScrollbarState,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            offset: 0,
            max: 0,
            follow: true,
            seen: 0,
            scrollbar: ScrollbarState::default(),
        }
    }
}

impl ScrollState {
    /// Scroll up one line.
    pub fn scroll_up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
        self.follow = self.offset >= self.max;
    }

    /// Scroll down one line.
    pub fn scroll_down(&mut self) {
        self.offset = (self.offset + 1).min(self.max);
        self.follow = self.offset >= self.max;
    }

    /// Scroll up by page size.
    pub fn scroll_page_up(&mut self, page_size: usize) {
        self.offset = self.offset.saturating_sub(page_size);
        self.follow = self.offset >= self.max;
    }

    /// Scroll down by page size.
    pub fn scroll_page_down(&mut self, page_size: usize) {
        self.offset = (self.offset + page_size).min(self.max);
        self.follow = self.offset >= self.max;
    }

    /// Scroll to top.
    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
        self.follow = self.max == 0;
    }

    /// Scroll to bottom and stay there.
    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max;
        self.follow = true;
    }

    /// Record the content height for this frame and clamp the offset.
    pub fn update(&mut self, total_lines: usize, viewport: usize) {
        self.max = total_lines.saturating_sub(viewport);
        if self.follow {
            self.offset = self.max;
        }
        self.offset = self.offset.min(self.max);
        self.scrollbar = self.scrollbar.content_length(self.max + 1);
        self.scrollbar = self.scrollbar.position(self.offset);
    }
}

/// In-flight request state.
#[derive(Debug, Default)]
pub struct RequestState {
    /// True between submission and resolution
    pub loading: bool,
    /// Receiver for the spawned request
    pub pending: Option<oneshot::Receiver<anyhow::Result<String>>>,
}

/// Application state for the chat page.
pub struct App {
    /// Chat state: messages, input, cursor
    pub chat: ChatState,
    /// Scroll state: offset and scrollbar
    pub scroll: ScrollState,
    /// Request state: loading flag and pending reply
    pub request: RequestState,
    /// Status of the last exchange
    pub status: ConnectionStatus,
    /// Cursor blink visibility state
    pub cursor_visible: bool,
    transport: Arc<dyn ChatTransport>,
}

impl App {
    /// Create an empty chat page that talks through `transport`.
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            chat: ChatState::default(),
            scroll: ScrollState::default(),
            request: RequestState::default(),
            status: ConnectionStatus::Ready,
            cursor_visible: true,
            transport,
        }
    }

    /// Messages in conversation order.
    pub fn messages(&self) -> &[Message] {
        &self.chat.messages
    }

    /// True while a request is in flight.
    pub fn is_loading(&self) -> bool {
        self.request.loading
    }

    /// Submit the current input and start the request.
    pub fn submit_message(&mut self) {
        let Some(transcript) = self.begin_submit() else {
            return;
        };

        let (tx, rx) = oneshot::channel();
        let transport = self.transport.clone();
        tokio::spawn(async move {
            let _ = tx.send(transport.send(&transcript).await);
        });
        self.request.pending = Some(rx);
    }

    /// Apply a submission to local state.
    ///
    /// Returns the transcript to post, or `None` when the input is blank or
    /// a request is already in flight. Nothing changes in either case.
    pub fn begin_submit(&mut self) -> Option<Vec<Message>> {
        if self.request.loading {
            return None;
        }

        let text = self.chat.input.trim();
        if text.is_empty() {
            return None;
        }

        let message = Message::user(text);
        self.chat.messages.push(message);
        self.chat.clear_input();
        self.request.loading = true;
        self.status = ConnectionStatus::Loading;

        debug!(messages = self.chat.messages.len(), "submitting transcript");
        Some(self.chat.messages.clone())
    }

    /// Fold the outcome of a request into local state.
    pub fn finish_submit(&mut self, result: anyhow::Result<String>) {
        match result {
            Ok(reply) => {
                self.chat.messages.push(Message::assistant(reply));
                self.status = ConnectionStatus::Ready;
            }
            Err(e) => {
                warn!("chat request failed: {e:#}");
                self.chat
                    .messages
                    .push(Message::assistant(APOLOGY).stamped(Utc::now()));
                self.status = ConnectionStatus::Error(e.to_string());
            }
        }
        self.request.loading = false;
    }

    /// Poll the in-flight request. Call this in the event loop.
    pub fn process_reply(&mut self) {
        let Some(rx) = self.request.pending.as_mut() else {
            return;
        };

        match rx.try_recv() {
            Ok(result) => {
                self.request.pending = None;
                self.finish_submit(result);
            }
            Err(oneshot::error::TryRecvError::Empty) => {}
            Err(oneshot::error::TryRecvError::Closed) => {
                self.request.pending = None;
                self.finish_submit(Err(anyhow!("request task ended without a reply")));
            }
        }
    }

    /// Jump to the newest message whenever the transcript changed.
    pub fn follow_new_messages(&mut self) {
        let count = self.chat.messages.len();
        if count != self.scroll.seen {
            self.scroll.seen = count;
            self.scroll.scroll_to_bottom();
        }
    }

    /// Toggle cursor visibility for blinking effect.
    pub fn toggle_cursor(&mut self) {
        self.cursor_visible = !self.cursor_visible;
    }

    pub fn handle_char(&mut self, c: char) {
        self.chat.handle_char(c);
    }

    pub fn handle_backspace(&mut self) {
        self.chat.handle_backspace();
    }

    pub fn move_cursor_left(&mut self) {
        self.chat.move_cursor_left();
    }

    pub fn move_cursor_right(&mut self) {
        self.chat.move_cursor_right();
    }
}

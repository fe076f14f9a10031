use chrono::{DateTime, Local, Utc};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Tabs in leading indentation render as this many spaces.
const TAB: &str = "    ";

/// Wrap text to fit within a given width, measured in terminal cells.
///
/// Words wider than `width` are split across lines.
///
/// # Arguments
/// * `text` - The text to wrap
/// * `width` - Maximum width per line
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();
        if current_width + word_width + 1 > width && !current_line.is_empty() {
            lines.push(std::mem::take(&mut current_line));
            current_width = 0;
        }

        if word_width > width {
            let mut pieces = split_to_width(word, width);
            let last = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
            current_width = last.width();
            current_line = last;
            continue;
        }

        if !current_line.is_empty() {
            current_line.push(' ');
            current_width += 1;
        }
        current_line.push_str(word);
        current_width += word_width;
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Cut a single word into pieces no wider than `width`.
///
/// A character wider than `width` still gets a piece of its own.
fn split_to_width(word: &str, width: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut piece_width = 0;

    for c in word.chars() {
        let char_width = c.width().unwrap_or(0);
        if piece_width + char_width > width && !piece.is_empty() {
            pieces.push(std::mem::take(&mut piece));
            piece_width = 0;
        }
        piece.push(c);
        piece_width += char_width;
    }

    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

/// Wrap message content, keeping the author's line breaks and each line's
/// indentation.
pub fn wrap_message(text: &str, width: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    for line in text.lines() {
        let body = line.trim_start();
        if body.is_empty() {
            lines.push(String::new());
            continue;
        }

        let indent = line[..line.len() - body.len()].replace('\t', TAB);
        let indent_width = indent.width();
        if indent_width == 0 || indent_width >= width {
            lines.extend(wrap_text(body, width));
            continue;
        }

        lines.extend(
            wrap_text(body, width - indent_width)
                .into_iter()
                .map(|wrapped| format!("{indent}{wrapped}")),
        );
    }
    lines
}

/// Format a message time as 24-hour `HH:MM` local time.
///
/// Unstamped messages show the current time.
pub fn format_time(created_at: Option<DateTime<Utc>>) -> String {
    created_at
        .unwrap_or_else(Utc::now)
        .with_timezone(&Local)
        .format("%H:%M")
        .to_string()
}

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, Wrap},
    Frame,
};

use unicode_width::UnicodeWidthStr;

use crate::app::{App, ConnectionStatus};
use crate::config::Config;
use crate::message::{Message, Role};

use super::gradient::{gradient_block_with_status, gradient_color};
use super::text::{format_time, wrap_message};

/// Page title.
pub const TITLE: &str = "JPChat";

/// Subtitle under the title.
pub const SUBTITLE: &str = "AI-powered conversations about movies";

/// Indicator shown while a reply is pending.
pub const THINKING: &str = "Thinking…";

const MUTED: Color = Color::Rgb(120, 120, 135);

/// Main UI rendering function.
pub fn ui(f: &mut Frame, app: &mut App, config: &Config) {
    let colors = &config.colors;
    let (chat_start, chat_end) = colors.chat_gradient();
    let (input_start, input_end) = colors.input_gradient();

    let border_color = Color::Black;
    let bg_color = Color::Rgb(20, 20, 25);

    // Fill entire background with border color to create thick border effect
    let background = Block::default().style(Style::default().bg(border_color));
    f.render_widget(background, f.size());

    let inner_area = f.size().inner(&Margin {
        horizontal: 2,
        vertical: 1,
    });

    let inner_bg = Block::default().style(Style::default().bg(bg_color));
    f.render_widget(inner_bg, inner_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(3),    // Chat messages
            Constraint::Length(3), // Input box
        ])
        .split(inner_area);

    render_header(f, chunks[0]);

    // Borders on both sides plus the scrollbar column
    let text_width = chunks[1].width.saturating_sub(4) as usize;
    let viewport = chunks[1].height.saturating_sub(2) as usize;

    let lines = if app.messages().is_empty() && !app.is_loading() {
        welcome_lines()
    } else {
        transcript_lines(app.messages(), app.is_loading(), text_width)
    };

    app.scroll.update(lines.len(), viewport);

    let (status_text, status_color) = match &app.status {
        ConnectionStatus::Ready => ("● Ready", Color::Rgb(100, 255, 100)),
        ConnectionStatus::Loading => ("● Waiting for reply", Color::Rgb(100, 200, 255)),
        ConnectionStatus::Error(_) => ("● Last request failed", Color::Rgb(255, 100, 100)),
    };

    let transcript = Paragraph::new(lines)
        .block(gradient_block_with_status(
            " Chat ",
            status_text,
            status_color,
            chat_start,
            chat_end,
        ))
        .scroll((app.scroll.offset.min(u16::MAX as usize) as u16, 0));

    f.render_widget(transcript, chunks[1]);

    if app.scroll.max > 0 {
        let position = app.scroll.offset as f32 / app.scroll.max as f32;
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("▲"))
            .end_symbol(Some("▼"))
            .track_symbol(Some("░"))
            .thumb_symbol("█")
            .style(Style::default().fg(gradient_color(chat_start, chat_end, position)));

        f.render_stateful_widget(
            scrollbar,
            chunks[1].inner(&Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut app.scroll.scrollbar,
        );
    }

    render_input(f, app, chunks[2], gradient_color(input_start, input_end, 0.5));
}

/// Title and subtitle.
fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            TITLE,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(SUBTITLE, Style::default().fg(MUTED))),
    ])
    .alignment(Alignment::Center);

    f.render_widget(header, area);
}

/// Empty-state text shown before the first message.
fn welcome_lines() -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(
            "Welcome to JPChat",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        Line::from(Span::styled(
            "Start a conversation by typing a message below",
            Style::default().fg(MUTED),
        ))
        .alignment(Alignment::Center),
    ]
}

/// Build the wrapped transcript, one block per message.
pub fn transcript_lines(messages: &[Message], loading: bool, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for message in messages {
        let style = match message.role {
            Role::User => Style::default().fg(Color::Cyan),
            Role::Assistant => Style::default().fg(Color::Green),
            Role::System => Style::default().fg(MUTED),
        };
        let prefix = message.role.prefix();
        let indent = " ".repeat(prefix.width());
        let wrapped = wrap_message(&message.content, width.saturating_sub(indent.len()));

        for (i, line) in wrapped.into_iter().enumerate() {
            if i == 0 {
                lines.push(Line::from(vec![
                    Span::styled(prefix, style.add_modifier(Modifier::BOLD)),
                    Span::styled(line, style),
                ]));
            } else {
                lines.push(Line::from(Span::styled(format!("{indent}{line}"), style)));
            }
        }

        lines.push(Line::from(Span::styled(
            format!("{indent}{}", format_time(message.created_at)),
            Style::default().fg(MUTED),
        )));
        lines.push(Line::from(""));
    }

    if loading {
        let style = Style::default().fg(Color::Green);
        lines.push(Line::from(vec![
            Span::styled(Role::Assistant.prefix(), style.add_modifier(Modifier::BOLD)),
            Span::styled(THINKING, style.add_modifier(Modifier::ITALIC)),
        ]));
    }

    lines
}

/// Input line with blinking cursor; dimmed while a reply is pending.
fn render_input(f: &mut Frame, app: &App, area: Rect, accent: Color) {
    let cursor_char = if app.cursor_visible { "▎" } else { " " };
    let cursor_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::SLOW_BLINK);
    let (before, after) = app.chat.split_input();

    let input_text = if app.chat.input.is_empty() && app.is_loading() {
        Line::from(Span::styled(
            "Waiting for JPChat to reply…",
            Style::default().fg(MUTED),
        ))
    } else {
        Line::from(vec![
            Span::raw(before.to_string()),
            Span::styled(cursor_char, cursor_style),
            Span::raw(after.to_string()),
        ])
    };

    let border_color = if app.is_loading() { MUTED } else { accent };
    let input_block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(Color::Rgb(30, 30, 35)));

    let input = Paragraph::new(input_text)
        .style(Style::default().fg(Color::White))
        .block(input_block)
        .wrap(Wrap { trim: false });

    f.render_widget(input, area);
}

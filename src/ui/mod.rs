//! UI module for the chat page.
//!
//! This module contains all UI rendering logic including:
//! - Main UI layout and rendering
//! - Gradient utilities
//! - Text wrapping and time formatting

pub mod gradient;
pub mod render;
pub mod text;

pub use render::ui;
pub use text::format_time;

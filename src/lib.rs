//! JPChat - a movie-themed chat endpoint and terminal chat page.
//!
//! This library exposes the core modules for testing and reuse.

pub mod app;
pub mod config;
pub mod endpoint;
pub mod input;
pub mod llm;
pub mod logging;
pub mod message;
pub mod persona;
pub mod server;
pub mod ui;

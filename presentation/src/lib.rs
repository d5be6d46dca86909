//! Presentation layer for mirai-bot
//!
//! This crate contains CLI definitions and console formatting of
//! inbound messages and session events.

pub mod cli;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{Cli, ListenArg};
pub use output::console::ConsoleFormatter;

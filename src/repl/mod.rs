//! Interactive pager on top of reedline
//!
//! This module provides the terminal front end of rowpager:
//! - Line editing with reedline and a file-backed command history
//! - A prompt showing the page on display
//! - Inline hints for command words
//! - Command parsing and execution against a shared paginator

pub mod command;
pub mod engine;
pub mod hinter;
pub mod prompt;
pub mod session;

#[cfg(test)]
mod tests;

pub use command::{PagerCommand, help_text, parse_command};
pub use engine::ReplEngine;
pub use hinter::PagerHinter;
pub use prompt::{PageStatus, PagerPrompt};
pub use session::{CommandOutcome, PagerSession, SourceSpec};

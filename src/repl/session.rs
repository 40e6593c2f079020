//! Executes pager commands against a shared paginator.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::Value;
use tracing::info;

use crate::config::SourceFormat;
use crate::engine::{ItemStream, Navigation, PagerHandle};
use crate::error::Result;
use crate::formatter::Formatter;
use crate::source;

use super::command::{PagerCommand, help_text};
use super::prompt::PageStatus;

/// Where the pager's data comes from, kept so it can be re-opened.
#[derive(Debug, Clone)]
pub struct SourceSpec {
    pub path: PathBuf,
    pub format: SourceFormat,
    pub latency: Duration,
}

impl SourceSpec {
    pub fn new(path: &Path, format: SourceFormat, latency: Duration) -> Self {
        Self {
            path: path.to_path_buf(),
            format,
            latency,
        }
    }

    /// Open a fresh stream over the input.
    pub async fn open(&self) -> Result<ItemStream<Value>> {
        source::open(&self.path, self.format, self.latency).await
    }
}

/// What the REPL should do after a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The page changed; show it.
    Render,

    /// Show a message instead of the page.
    Message(String),

    /// Leave the pager.
    Quit,
}

/// A paginator plus everything needed to act on user commands.
pub struct PagerSession {
    handle: PagerHandle<Value>,
    formatter: Formatter,
    source: Option<SourceSpec>,
}

impl PagerSession {
    /// Create a session
    ///
    /// # Arguments
    /// * `handle` - Shared paginator
    /// * `formatter` - Page renderer
    /// * `source` - Re-openable input, `None` for input that can only be read once
    pub fn new(handle: PagerHandle<Value>, formatter: Formatter, source: Option<SourceSpec>) -> Self {
        Self {
            handle,
            formatter,
            source,
        }
    }

    pub fn handle(&self) -> &PagerHandle<Value> {
        &self.handle
    }

    /// Display the first page.
    pub async fn start(&self) -> Result<()> {
        self.handle.jump_to_first_page().await?;
        Ok(())
    }

    /// Run one command.
    pub async fn execute(&self, command: PagerCommand) -> Result<CommandOutcome> {
        let navigation = match command {
            PagerCommand::Next => {
                return Ok(moved_or(self.handle.next_page().await?, "Already on the last page"));
            }
            PagerCommand::Previous => {
                return Ok(moved_or(
                    self.handle.previous_page().await?,
                    "Already on the first page",
                ));
            }
            PagerCommand::First => self.handle.jump_to_first_page().await?,
            PagerCommand::Last => {
                return Ok(moved_or(
                    self.handle.jump_to_last_page().await?,
                    "Already on the last page",
                ));
            }
            PagerCommand::Page(number) => self.handle.set_page(number.saturating_sub(1)).await?,
            PagerCommand::Refresh => self.handle.repaginate().await?,
            PagerCommand::Reload => {
                let Some(source) = &self.source else {
                    return Ok(CommandOutcome::Message(
                        "Nothing to reload: input was read from stdin".to_string(),
                    ));
                };
                info!("Reloading {}", source.path.display());
                self.handle.set_source(source.open().await?).await?
            }
            PagerCommand::Rows(rows) => self.handle.set_rows_per_page(rows).await?,
            PagerCommand::Help => return Ok(CommandOutcome::Message(help_text())),
            PagerCommand::Quit => return Ok(CommandOutcome::Quit),
        };
        Ok(moved_or(navigation, "Nothing changed"))
    }

    /// Render the page on display.
    pub async fn render(&self) -> String {
        self.handle
            .inspect(|paginator| self.formatter.format_page(paginator))
            .await
    }

    /// Page number and continuation flag for the prompt.
    pub async fn status(&self) -> PageStatus {
        self.handle
            .inspect(|paginator| match paginator.current() {
                Some(page) => PageStatus {
                    page: Some(page.current_page + 1),
                    more: page.has_next(),
                },
                None => PageStatus::default(),
            })
            .await
    }

    /// Render every page from the first to the last.
    pub async fn dump_pages(&self) -> Result<Vec<String>> {
        self.start().await?;
        let mut pages = vec![self.render().await];
        while self.handle.next_page().await? == Navigation::Moved {
            pages.push(self.render().await);
        }
        Ok(pages)
    }
}

fn moved_or(navigation: Navigation, unchanged: &str) -> CommandOutcome {
    match navigation {
        Navigation::Moved => CommandOutcome::Render,
        Navigation::Unchanged => CommandOutcome::Message(unchanged.to_string()),
        Navigation::Busy => {
            CommandOutcome::Message("Still paginating, command ignored".to_string())
        }
    }
}

use reedline::{FileBackedHistory, Reedline, Signal};
use tracing::{debug, warn};

use crate::config::HistoryConfig;
use crate::error::Result;

use super::hinter::PagerHinter;
use super::prompt::{PageStatus, PagerPrompt};

/// Line editor driving the interactive pager
pub struct ReplEngine {
    /// Line editor for command input
    editor: Reedline,

    /// Prompt showing the current page
    prompt: PagerPrompt,

    /// Whether to continue running
    running: bool,
}

impl ReplEngine {
    /// Create a new REPL engine
    ///
    /// # Arguments
    /// * `history_config` - History configuration
    ///
    /// # Returns
    /// * `Result<Self>` - New REPL engine or error
    pub fn new(history_config: &HistoryConfig) -> Result<Self> {
        let mut editor = Reedline::create().with_hinter(Box::new(PagerHinter::new()));

        if history_config.persist {
            match FileBackedHistory::with_file(
                history_config.max_size,
                history_config.file_path.clone(),
            ) {
                Ok(history) => {
                    debug!("History file: {}", history_config.file_path.display());
                    editor = editor.with_history(Box::new(history));
                }
                Err(e) => warn!("Command history disabled: {e}"),
            }
        }

        Ok(Self {
            editor,
            prompt: PagerPrompt::default(),
            running: true,
        })
    }

    /// Read a single line of input
    ///
    /// Ctrl-C yields an empty line; Ctrl-D ends input.
    ///
    /// # Returns
    /// * `Result<Option<String>>` - Input line or None on EOF
    pub fn read_line(&mut self) -> Result<Option<String>> {
        match self.editor.read_line(&self.prompt)? {
            Signal::Success(line) => Ok(Some(line)),
            Signal::CtrlC => Ok(Some(String::new())),
            _ => Ok(None),
        }
    }

    /// Update the page shown in the prompt
    pub fn set_status(&mut self, status: PageStatus) {
        self.prompt.set_status(status);
    }

    /// Stop the REPL
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Check if REPL is still running
    pub fn is_running(&self) -> bool {
        self.running
    }
}

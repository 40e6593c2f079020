//! Hinter for reedline - completes command words, then falls back to history

use nu_ansi_term::{Color, Style};
use reedline::{Hinter, History};

/// Command words offered as hints, most common first.
const HINT_WORDS: &[&str] = &[
    "next", "prev", "first", "last", "page ", "refresh", "reload", "rows ", "help", "quit",
    "exit",
];

/// Pager hinter for reedline
pub struct PagerHinter {
    /// Style for hints
    style: Style,
    /// Current hint text
    current_hint: String,
}

impl PagerHinter {
    /// Create a new hinter with default style
    pub fn new() -> Self {
        Self {
            style: Style::new().italic().fg(Color::DarkGray),
            current_hint: String::new(),
        }
    }

    /// Remainder of the first command word starting with `line`
    fn command_hint(line: &str) -> Option<&'static str> {
        if line.is_empty() || line.contains(char::is_whitespace) {
            return None;
        }
        HINT_WORDS
            .iter()
            .find(|word| word.len() > line.len() && word.starts_with(line))
            .map(|word| &word[line.len()..])
    }

    /// Remainder of the latest history entry starting with `line`
    fn history_hint(line: &str, history: &dyn History) -> Option<String> {
        let item = history
            .search(reedline::SearchQuery::last_with_prefix(line.to_string(), None))
            .ok()
            .and_then(|results| results.into_iter().next())?;

        let history_line = item.command_line.as_str();
        (history_line.len() > line.len() && history_line.starts_with(line))
            .then(|| history_line[line.len()..].to_string())
    }
}

impl Default for PagerHinter {
    fn default() -> Self {
        Self::new()
    }
}

impl Hinter for PagerHinter {
    /// Provide a hint for the current line
    ///
    /// # Arguments
    /// * `line` - The current input line
    /// * `pos` - Cursor position
    /// * `history` - Command history
    /// * `use_ansi_coloring` - Whether to use ANSI colors
    /// * `_cwd` - Current working directory (unused)
    ///
    /// # Returns
    /// * `String` - Hint text to display after the cursor
    fn handle(
        &mut self,
        line: &str,
        pos: usize,
        history: &dyn History,
        use_ansi_coloring: bool,
        _cwd: &str,
    ) -> String {
        self.current_hint.clear();

        if pos != line.len() || line.trim().is_empty() {
            return String::new();
        }

        let hint = match Self::command_hint(line) {
            Some(rest) => rest.to_string(),
            None => match Self::history_hint(line, history) {
                Some(rest) => rest,
                None => return String::new(),
            },
        };
        self.current_hint = hint.clone();

        if use_ansi_coloring {
            self.style.paint(hint).to_string()
        } else {
            hint
        }
    }

    fn next_hint_token(&self) -> String {
        self.current_hint
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string()
    }

    fn complete_hint(&self) -> String {
        self.current_hint.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reedline::FileBackedHistory;

    fn empty_history() -> Box<dyn History> {
        Box::new(FileBackedHistory::new(16).expect("in-memory history"))
    }

    #[test]
    fn test_empty_line_no_hint() {
        let mut hinter = PagerHinter::new();
        let history = empty_history();
        assert_eq!(hinter.handle("", 0, history.as_ref(), false, "/tmp"), "");
    }

    #[test]
    fn test_command_word_hint() {
        let mut hinter = PagerHinter::new();
        let history = empty_history();
        assert_eq!(hinter.handle("ne", 2, history.as_ref(), false, "/tmp"), "xt");
        assert_eq!(hinter.complete_hint(), "xt");
        assert_eq!(hinter.handle("re", 2, history.as_ref(), false, "/tmp"), "fresh");
    }

    #[test]
    fn test_cursor_not_at_end_no_hint() {
        let mut hinter = PagerHinter::new();
        let history = empty_history();
        assert_eq!(hinter.handle("next", 1, history.as_ref(), false, "/tmp"), "");
    }

    #[test]
    fn test_complete_word_has_no_hint() {
        let mut hinter = PagerHinter::new();
        let history = empty_history();
        assert_eq!(hinter.handle("quit", 4, history.as_ref(), false, "/tmp"), "");
        assert_eq!(hinter.next_hint_token(), "");
    }

    #[test]
    fn test_colored_hint() {
        let mut hinter = PagerHinter::default();
        let history = empty_history();
        let hint = hinter.handle("fi", 2, history.as_ref(), true, "/tmp");
        assert!(hint.contains("rst"));
        assert_ne!(hint, "rst");
    }
}

//! Custom prompt implementation for the pager

use std::borrow::Cow;

use reedline::{Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus};

/// Where the pager stands, as shown in the prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageStatus {
    /// 1-based number of the page on display, if any.
    pub page: Option<usize>,

    /// Whether more pages follow.
    pub more: bool,
}

/// Custom prompt for the pager REPL
#[derive(Debug, Clone, Default)]
pub struct PagerPrompt {
    status: PageStatus,
}

impl PagerPrompt {
    /// Create a new prompt
    ///
    /// # Arguments
    /// * `status` - Initial page status
    ///
    /// # Returns
    /// * `Self` - New prompt
    pub fn new(status: PageStatus) -> Self {
        Self { status }
    }

    pub fn set_status(&mut self, status: PageStatus) {
        self.status = status;
    }

    pub fn status(&self) -> PageStatus {
        self.status
    }
}

impl Prompt for PagerPrompt {
    /// Render the left prompt, e.g. `page 3+> `
    fn render_prompt_left(&self) -> Cow<'_, str> {
        match self.status.page {
            Some(page) if self.status.more => format!("page {page}+> ").into(),
            Some(page) => format!("page {page}> ").into(),
            None => "rowpager> ".into(),
        }
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        "".into()
    }

    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<'_, str> {
        "".into()
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        "... ".into()
    }

    /// Render the history search prompt
    ///
    /// # Arguments
    /// * `history_search` - History search state
    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };

        format!("({}reverse-search: {}) ", prefix, history_search.term).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_before_first_page() {
        let prompt = PagerPrompt::default();
        assert_eq!(prompt.render_prompt_left(), "rowpager> ");
    }

    #[test]
    fn test_prompt_with_more_pages() {
        let prompt = PagerPrompt::new(PageStatus {
            page: Some(2),
            more: true,
        });
        assert_eq!(prompt.render_prompt_left(), "page 2+> ");
    }

    #[test]
    fn test_prompt_on_last_page() {
        let mut prompt = PagerPrompt::default();
        prompt.set_status(PageStatus {
            page: Some(4),
            more: false,
        });
        assert_eq!(prompt.render_prompt_left(), "page 4> ");
        assert_eq!(prompt.render_prompt_right(), "");
    }

    #[test]
    fn test_indicators() {
        let prompt = PagerPrompt::default();
        assert_eq!(prompt.render_prompt_indicator(PromptEditMode::Default), "");
        assert_eq!(prompt.render_prompt_multiline_indicator(), "... ");
    }
}

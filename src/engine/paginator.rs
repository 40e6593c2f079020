//! Page navigation over a root [`PaginationNode`].
//!
//! Every page the user has visited is kept as a [`PageBoundary`] on a
//! [`PageStack`]. Moving forward resumes from the top boundary's stop point;
//! moving back pops it and re-runs the page beneath from its recorded start,
//! so consumed data is never walked again from the beginning.
//!
//! A pass that reports [`Done::Stale`] is never shown: the page that produced
//! the stale token is dropped and the page before it is recomputed instead.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::engine::component::{Paginatable, Template};
use crate::engine::cursor::ItemStream;
use crate::engine::node::PaginationNode;
use crate::engine::state::{Done, PageOutcome, ResumeToken, RowQuota};
use crate::error::{PaginationError, Result};

/// Recorded outcome of one visited page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBoundary {
    /// Token the page was produced from.
    pub started_after: Option<ResumeToken>,

    /// Where the page stopped.
    pub stopped_at: Option<ResumeToken>,

    pub done: Done,

    pub rows_displayed: usize,

    /// Zero-based page ordinal.
    pub current_page: usize,

    /// Row offset of the first row on this page.
    pub current_index: usize,
}

impl PageBoundary {
    fn first(outcome: PageOutcome) -> Self {
        Self {
            started_after: None,
            stopped_at: outcome.stopped_at,
            done: outcome.done,
            rows_displayed: outcome.rows_displayed,
            current_page: 0,
            current_index: 0,
        }
    }

    /// Boundary of the page that follows this one.
    fn next(&self, outcome: PageOutcome) -> Self {
        Self {
            started_after: self.stopped_at.clone(),
            stopped_at: outcome.stopped_at,
            done: outcome.done,
            rows_displayed: outcome.rows_displayed,
            current_page: self.current_page + 1,
            current_index: self.current_index + self.rows_displayed,
        }
    }

    fn update(&mut self, outcome: PageOutcome) {
        self.stopped_at = outcome.stopped_at;
        self.done = outcome.done;
        self.rows_displayed = outcome.rows_displayed;
    }

    /// Whether more pages may follow.
    pub fn has_next(&self) -> bool {
        self.done == Done::Interrupted
    }
}

/// Stack of visited page boundaries. The top is the page on display.
#[derive(Debug, Clone, Default)]
pub struct PageStack {
    pages: Vec<PageBoundary>,
}

impl PageStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn top(&self) -> Option<&PageBoundary> {
        self.pages.last()
    }

    pub fn get(&self, page: usize) -> Option<&PageBoundary> {
        self.pages.get(page)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageBoundary> {
        self.pages.iter()
    }

    fn push(&mut self, boundary: PageBoundary) {
        self.pages.push(boundary);
    }

    fn pop(&mut self) -> Option<PageBoundary> {
        self.pages.pop()
    }

    fn truncate(&mut self, len: usize) {
        self.pages.truncate(len);
    }

    fn clear(&mut self) {
        self.pages.clear();
    }

    fn update_top(&mut self, outcome: PageOutcome) {
        if let Some(top) = self.pages.last_mut() {
            top.update(outcome);
        }
    }
}

/// Navigates pages of a root node.
pub struct Paginator<T> {
    root: PaginationNode<T>,
    rows_per_page: RowQuota,
    pages: PageStack,
}

impl<T> Paginator<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a paginator. `rows_per_page == 0` disables pagination.
    ///
    /// No pass runs until the first navigation call.
    pub fn new(root: PaginationNode<T>, rows_per_page: usize) -> Self {
        Self {
            root,
            rows_per_page: RowQuota::from_rows_per_page(rows_per_page),
            pages: PageStack::new(),
        }
    }

    pub fn root(&self) -> &PaginationNode<T> {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut PaginationNode<T> {
        &mut self.root
    }

    pub fn rows_per_page(&self) -> RowQuota {
        self.rows_per_page
    }

    pub fn pages(&self) -> &PageStack {
        &self.pages
    }

    /// The page on display.
    pub fn current(&self) -> Option<&PageBoundary> {
        self.pages.top()
    }

    /// Replace the root's data source without running a pass.
    pub fn replace_source(&mut self, source: ItemStream<T>) {
        self.root.set_source(source);
    }

    /// Replace the root's template without running a pass.
    pub fn replace_template(&mut self, template: Option<Arc<dyn Template<T>>>) {
        self.root.set_template(template);
    }

    /// Change the page size and start over at the first page.
    pub async fn set_rows_per_page(&mut self, rows_per_page: usize) -> Result<()> {
        self.rows_per_page = RowQuota::from_rows_per_page(rows_per_page);
        info!("Rows per page set to {}", self.rows_per_page);
        self.jump_to_first_page().await
    }

    async fn run(
        &mut self,
        start_after: Option<ResumeToken>,
        updated: Option<&[usize]>,
    ) -> Result<PageOutcome> {
        self.root.set_pagination(start_after, self.rows_per_page);
        self.root.repaginate(updated).await
    }

    /// Discard every recorded page and display the first one.
    pub async fn jump_to_first_page(&mut self) -> Result<()> {
        self.pages.clear();
        let outcome = self.run(None, None).await?;
        debug!(
            "First page: {} rows, done={:?}",
            outcome.rows_displayed, outcome.done
        );
        self.pages.push(PageBoundary::first(outcome));
        Ok(())
    }

    /// Display the page after the current one.
    ///
    /// Returns `false` without doing anything when the current page already
    /// reached the end of the data, and also when the pass turned out stale
    /// and the paginator fell back to an earlier page.
    pub async fn next_page(&mut self) -> Result<bool> {
        let Some(top) = self.pages.top() else {
            self.jump_to_first_page().await?;
            return Ok(true);
        };
        if !top.has_next() {
            return Ok(false);
        }

        let start_after = top.stopped_at.clone();
        let outcome = self.run(start_after, None).await?;
        if outcome.done.is_stale() {
            warn!("Next page is stale; falling back to the previous page");
            self.fall_back().await?;
            return Ok(false);
        }

        let Some(top) = self.pages.top() else {
            return Ok(false);
        };
        let boundary = top.next(outcome);
        debug!(
            "Page {}: {} rows from row {}, done={:?}",
            boundary.current_page, boundary.rows_displayed, boundary.current_index, boundary.done
        );
        self.pages.push(boundary);
        Ok(true)
    }

    /// Display the page before the current one. No-op on the first page.
    pub async fn previous_page(&mut self) -> Result<bool> {
        if self.pages.len() <= 1 {
            return Ok(false);
        }
        self.pages.pop();
        self.refresh_top(None).await?;
        Ok(true)
    }

    /// Move forward until the end of the data.
    ///
    /// Does not return for a source that never ends.
    pub async fn jump_to_last_page(&mut self) -> Result<()> {
        if self.pages.is_empty() {
            self.jump_to_first_page().await?;
        }
        while self.pages.top().is_some_and(PageBoundary::has_next) {
            if !self.next_page().await? {
                break;
            }
        }
        Ok(())
    }

    /// Display the zero-based page `page`, or the last page if the data ends
    /// before it.
    pub async fn set_page(&mut self, page: i64) -> Result<()> {
        if page < 0 {
            return Err(PaginationError::NegativePageIndex(page).into());
        }
        let target = usize::try_from(page).unwrap_or(usize::MAX);

        if self.pages.is_empty() {
            self.jump_to_first_page().await?;
        }

        if target < self.pages.len() - 1 {
            self.pages.truncate(target + 1);
            self.refresh_top(None).await?;
            return Ok(());
        }

        while self.pages.len() <= target {
            if !self.next_page().await? {
                break;
            }
        }
        Ok(())
    }

    /// Re-run the current page in place, e.g. after the data changed.
    pub async fn repaginate(&mut self) -> Result<()> {
        self.refresh_top(None).await
    }

    /// Re-run the current page after the content of one descendant changed.
    ///
    /// `path` lists item indices from the root down to the changed component.
    pub async fn child_updated(&mut self, path: &[usize]) -> Result<()> {
        self.refresh_top(Some(path)).await
    }

    async fn refresh_top(&mut self, updated: Option<&[usize]>) -> Result<()> {
        let Some(top) = self.pages.top() else {
            return self.jump_to_first_page().await;
        };

        let start_after = top.started_after.clone();
        let outcome = self.run(start_after, updated).await?;
        if outcome.done.is_stale() {
            warn!("Current page is stale; falling back to the previous page");
            return self.fall_back().await;
        }

        self.pages.update_top(outcome);
        Ok(())
    }

    /// Drop the top page and recompute the one beneath it, until a pass is
    /// not stale.
    async fn fall_back(&mut self) -> Result<()> {
        loop {
            if self.pages.len() > 1 {
                self.pages.pop();
            }
            let Some(top) = self.pages.top() else {
                return self.jump_to_first_page().await;
            };

            let start_after = top.started_after.clone();
            let outcome = self.run(start_after, None).await?;
            if !outcome.done.is_stale() {
                self.pages.update_top(outcome);
                return Ok(());
            }

            if self.pages.len() == 1 {
                warn!("First page is stale; starting over");
                return self.jump_to_first_page().await;
            }
        }
    }
}

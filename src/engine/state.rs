//! Pagination bookkeeping shared by every container node.
//!
//! A pass over a node is described by a [`PaginationState`]: where to resume
//! (`start_after`), how many rows may be rendered (`row_quota`), and once the
//! pass has run, what it produced (`rows_displayed`, `stopped_at`, `done`).

use std::fmt;
use std::ops::BitAnd;

/// Maximum number of rows a node may render in one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowQuota {
    /// At most this many rows.
    Limited(usize),

    /// No limit; pagination is disabled and a single pass renders everything.
    #[default]
    Unbounded,
}

impl RowQuota {
    /// Build a quota from a configured `rows_per_page`, where 0 means unbounded.
    pub fn from_rows_per_page(rows: usize) -> Self {
        if rows == 0 {
            RowQuota::Unbounded
        } else {
            RowQuota::Limited(rows)
        }
    }

    /// Quota left after `used` rows have been spent.
    pub fn remaining_after(self, used: usize) -> RowQuota {
        match self {
            RowQuota::Limited(n) => RowQuota::Limited(n.saturating_sub(used)),
            RowQuota::Unbounded => RowQuota::Unbounded,
        }
    }

    /// Whether `used` rows already spend the whole quota.
    pub fn is_exhausted_by(self, used: usize) -> bool {
        match self {
            RowQuota::Limited(n) => used >= n,
            RowQuota::Unbounded => false,
        }
    }

    /// Whether `rows` more rows fit into this quota.
    pub fn allows(self, rows: usize) -> bool {
        match self {
            RowQuota::Limited(n) => rows <= n,
            RowQuota::Unbounded => true,
        }
    }

    pub fn is_unbounded(self) -> bool {
        matches!(self, RowQuota::Unbounded)
    }
}

impl fmt::Display for RowQuota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowQuota::Limited(n) => write!(f, "{n}"),
            RowQuota::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Completion status of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Done {
    /// The end of the data was reached.
    Complete,

    /// The quota ran out while more data remained.
    Interrupted,

    /// The data source was replaced since the resume token was recorded.
    /// The pass output must be discarded.
    Stale,
}

impl Done {
    pub fn is_complete(self) -> bool {
        self == Done::Complete
    }

    pub fn is_stale(self) -> bool {
        self == Done::Stale
    }
}

/// `Stale` dominates, then `Interrupted`.
impl BitAnd for Done {
    type Output = Done;

    fn bitand(self, rhs: Done) -> Done {
        match (self, rhs) {
            (Done::Stale, _) | (_, Done::Stale) => Done::Stale,
            (Done::Complete, Done::Complete) => Done::Complete,
            _ => Done::Interrupted,
        }
    }
}

/// Opaque descriptor of where a pass stopped.
///
/// Resuming from a token whose `child_done` is set starts at the child after
/// `child_index`; otherwise the pass re-enters `child_index` and hands it
/// `child_token`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeToken {
    /// Index of the last child visited.
    pub child_index: usize,

    /// Cursor epoch the token was recorded against.
    pub epoch: u64,

    /// Where that child itself stopped, if it paginates.
    pub child_token: Option<Box<ResumeToken>>,

    /// Whether that child reached the end of its own data.
    pub child_done: bool,
}

impl ResumeToken {
    pub fn new(
        child_index: usize,
        epoch: u64,
        child_token: Option<ResumeToken>,
        child_done: bool,
    ) -> Self {
        Self {
            child_index,
            epoch,
            child_token: child_token.map(Box::new),
            child_done,
        }
    }

    /// Token for a pass that only displayed the node's own row.
    pub(crate) fn own_row_only(epoch: u64) -> Self {
        Self::new(0, epoch, None, false)
    }

    /// First child index to visit and the token to hand it.
    pub(crate) fn resume_point(&self) -> (usize, Option<ResumeToken>) {
        if self.child_done {
            (self.child_index + 1, None)
        } else {
            (
                self.child_index,
                self.child_token.as_deref().cloned(),
            )
        }
    }
}

/// Outcome of one pass over a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOutcome {
    pub rows_displayed: usize,
    pub stopped_at: Option<ResumeToken>,
    pub done: Done,
}

impl PageOutcome {
    pub fn stale(start_after: Option<ResumeToken>) -> Self {
        Self {
            rows_displayed: 0,
            stopped_at: start_after,
            done: Done::Stale,
        }
    }
}

/// Per-node pagination state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    /// Where the next pass resumes; `None` is the start of the data.
    pub start_after: Option<ResumeToken>,

    /// Rows the next pass may render.
    pub row_quota: RowQuota,

    /// Rows rendered by the last pass.
    pub rows_displayed: usize,

    /// Where the last pass stopped.
    pub stopped_at: Option<ResumeToken>,

    /// Completion status of the last pass.
    pub done: Done,
}

impl PaginationState {
    pub fn new(start_after: Option<ResumeToken>, row_quota: RowQuota) -> Self {
        Self {
            start_after,
            row_quota,
            rows_displayed: 0,
            stopped_at: None,
            done: Done::Interrupted,
        }
    }

    pub(crate) fn record(&mut self, outcome: &PageOutcome) {
        self.rows_displayed = outcome.rows_displayed;
        self.stopped_at = outcome.stopped_at.clone();
        self.done = outcome.done;
    }

    pub fn outcome(&self) -> PageOutcome {
        PageOutcome {
            rows_displayed: self.rows_displayed,
            stopped_at: self.stopped_at.clone(),
            done: self.done,
        }
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(None, RowQuota::Unbounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_from_rows_per_page() {
        assert_eq!(RowQuota::from_rows_per_page(0), RowQuota::Unbounded);
        assert_eq!(RowQuota::from_rows_per_page(10), RowQuota::Limited(10));
    }

    #[test]
    fn test_quota_arithmetic() {
        let quota = RowQuota::Limited(10);
        assert_eq!(quota.remaining_after(4), RowQuota::Limited(6));
        assert_eq!(quota.remaining_after(12), RowQuota::Limited(0));
        assert!(quota.is_exhausted_by(10));
        assert!(!quota.is_exhausted_by(9));
        assert!(quota.allows(10));
        assert!(!quota.allows(11));
        assert!(!RowQuota::Unbounded.is_exhausted_by(usize::MAX));
    }

    #[test]
    fn test_done_combination() {
        assert_eq!(Done::Complete & Done::Complete, Done::Complete);
        assert_eq!(Done::Complete & Done::Interrupted, Done::Interrupted);
        assert_eq!(Done::Interrupted & Done::Stale, Done::Stale);
    }

    #[test]
    fn test_resume_point() {
        let finished = ResumeToken::new(4, 0, None, true);
        assert_eq!(finished.resume_point(), (5, None));

        let inner = ResumeToken::new(2, 0, None, true);
        let partial = ResumeToken::new(7, 0, Some(inner.clone()), false);
        assert_eq!(partial.resume_point(), (7, Some(inner)));
    }
}

//! The repagination pass.
//!
//! Given a node's resume token and row quota, the pass walks the cursor from
//! the resume point, hands each child the quota that is still left, and
//! recurses into children that paginate themselves. Children cached from the
//! previous pass are reused when they were built from the same item under the
//! same source and template, finished their own data, fit into the remaining
//! quota, and would be handed the same resume token again.
//!
//! A pass triggered by a change inside one descendant (`updated` path) starts
//! at that descendant's slot instead of the node's first row, counting the
//! rows of earlier siblings from the cache.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::engine::arena::ChildSlot;
use crate::engine::component::Template;
use crate::engine::node::PaginationNode;
use crate::engine::state::{Done, PageOutcome, ResumeToken, RowQuota};
use crate::error::Result;

/// Where a walk starts.
struct WalkFrom<'p> {
    /// Arena position of the first child visited.
    pos: usize,

    /// Item index of the first child visited.
    index: usize,

    /// Rows already spent before that child.
    rows: usize,

    /// Token handed to the first child visited.
    child_start: Option<ResumeToken>,

    /// Item index of the changed child and the path below it.
    updated: Option<(usize, &'p [usize])>,

    /// Last child visited before the walk starts: index, its stop point, its status.
    last: Option<(usize, Option<ResumeToken>, Done)>,
}

/// Outcome of a child that does not paginate.
fn single_row() -> PageOutcome {
    PageOutcome {
        rows_displayed: 1,
        stopped_at: None,
        done: Done::Complete,
    }
}

impl<T> PaginationNode<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Run one pass with the current [`PaginationState`](crate::engine::PaginationState)
    /// and record its outcome.
    pub(crate) async fn run_pass(&mut self, updated: Option<&[usize]>) -> Result<PageOutcome> {
        let request = (self.state.start_after.clone(), self.state.row_quota);
        let outcome = self.compute(updated).await?;

        self.state.record(&outcome);
        self.last_request = if outcome.done.is_stale() {
            None
        } else {
            Some(request)
        };

        debug!(
            "Pass finished: {} rows, done={:?}, quota={}",
            outcome.rows_displayed, outcome.done, self.state.row_quota
        );
        Ok(outcome)
    }

    async fn compute(&mut self, updated: Option<&[usize]>) -> Result<PageOutcome> {
        let epoch = self.cursor.epoch();

        let Some(template) = self.template.clone() else {
            return Ok(self.show_placeholder());
        };
        self.placeholder = false;

        let (start_index, child_start) = match &self.state.start_after {
            None => (0, None),
            Some(token) if token.epoch != epoch => {
                debug!(
                    "Resume token recorded at epoch {} but source is at epoch {}",
                    token.epoch, epoch
                );
                return Ok(PageOutcome::stale(self.state.start_after.clone()));
            }
            Some(token) => token.resume_point(),
        };

        let updated = updated
            .filter(|path| !path.is_empty())
            .map(|path| (path[0], &path[1..]));

        if let Some(changed) = updated {
            if let Some(outcome) = self.fast_path(changed, epoch, template.clone()).await? {
                return Ok(outcome);
            }
            trace!("Fast path unavailable for child {}; walking from the start", changed.0);
        }

        self.full_walk(start_index, child_start, updated, epoch, template)
            .await
    }

    /// Single placeholder row shown when no template is assigned.
    fn show_placeholder(&mut self) -> PageOutcome {
        let removed = self.children.clear();
        self.detach(removed);
        self.own_row_shown = false;
        self.visited = 0..0;

        if self.state.row_quota.is_exhausted_by(0) {
            self.hidden = true;
            self.placeholder = false;
            return PageOutcome {
                rows_displayed: 0,
                stopped_at: None,
                done: Done::Interrupted,
            };
        }

        debug!("No template assigned; showing placeholder row");
        self.hidden = false;
        self.placeholder = true;
        single_row()
    }

    async fn full_walk(
        &mut self,
        start_index: usize,
        child_start: Option<ResumeToken>,
        updated: Option<(usize, &[usize])>,
        epoch: u64,
        template: Arc<dyn Template<T>>,
    ) -> Result<PageOutcome> {
        let quota = self.state.row_quota;
        let mut rows = 0;
        self.hidden = false;
        self.own_row_shown = false;

        if self.own_row && self.state.start_after.is_none() {
            if quota.is_exhausted_by(0) {
                trace!("No quota left for own row; hiding node for this pass");
                let removed = self.children.clear();
                self.detach(removed);
                self.hidden = true;
                self.visited = start_index..start_index;
                return Ok(PageOutcome {
                    rows_displayed: 0,
                    stopped_at: None,
                    done: Done::Interrupted,
                });
            }
            self.own_row_shown = true;
            rows = 1;
        }

        let removed = self
            .children
            .drop_stale_heads(start_index, epoch, self.template_epoch);
        self.detach(removed);

        let from = WalkFrom {
            pos: 0,
            index: start_index,
            rows,
            child_start,
            updated,
            last: None,
        };
        self.walk(from, epoch, template).await
    }

    /// Resume at the changed child's slot, keeping every earlier sibling as is.
    async fn fast_path(
        &mut self,
        changed: (usize, &[usize]),
        epoch: u64,
        template: Arc<dyn Template<T>>,
    ) -> Result<Option<PageOutcome>> {
        let request = (self.state.start_after.clone(), self.state.row_quota);
        if self.hidden || self.last_request.as_ref() != Some(&request) {
            return Ok(None);
        }

        let (index, _) = changed;
        let Some(pos) = self.children.position_of(index) else {
            return Ok(None);
        };
        let Some(slot) = self.children.get(pos) else {
            return Ok(None);
        };
        if !slot.matches(index, epoch, self.template_epoch) {
            return Ok(None);
        }

        let child_start = slot.start_after.clone();
        let rows = usize::from(self.own_row_shown) + self.children.rows_before(pos);
        let last = pos
            .checked_sub(1)
            .and_then(|prev| self.children.get(prev))
            .map(|prev| (prev.index, prev.stopped_at.clone(), prev.done));

        debug!("Repaginating from changed child {index} (slot {pos}, {rows} rows before it)");
        let from = WalkFrom {
            pos,
            index,
            rows,
            child_start,
            updated: Some(changed),
            last,
        };
        self.walk(from, epoch, template).await.map(Some)
    }

    async fn walk(
        &mut self,
        from: WalkFrom<'_>,
        epoch: u64,
        template: Arc<dyn Template<T>>,
    ) -> Result<PageOutcome> {
        let quota = self.state.row_quota;
        let template_epoch = self.template_epoch;
        let WalkFrom {
            mut pos,
            mut index,
            mut rows,
            mut child_start,
            updated,
            mut last,
        } = from;
        let first = index;
        let mut done = Done::Complete;

        loop {
            let Some(item) = self.cursor.item_at(index).await? else {
                break;
            };
            if quota.is_exhausted_by(rows) {
                done = Done::Interrupted;
                break;
            }

            let remaining = quota.remaining_after(rows);
            let changed_below = updated
                .filter(|(changed, _)| *changed == index)
                .map(|(_, below)| below);

            let cached = self
                .children
                .get_mut(pos)
                .filter(|slot| slot.matches(index, epoch, template_epoch));

            let outcome = match cached {
                Some(slot)
                    if changed_below.is_none()
                        && slot.done.is_complete()
                        && slot.start_after == child_start
                        && remaining.allows(slot.rows) =>
                {
                    trace!("Reusing child {index} ({} rows)", slot.rows);
                    PageOutcome {
                        rows_displayed: slot.rows,
                        stopped_at: slot.stopped_at.clone(),
                        done: Done::Complete,
                    }
                }
                Some(slot) if slot.component.as_paginatable_ref().is_some() => {
                    trace!("Repaginating child {index} in place with quota {remaining}");
                    let outcome = match slot.component.as_paginatable() {
                        Some(child) => {
                            child.set_pagination(child_start.clone(), remaining);
                            child.repaginate(changed_below).await?
                        }
                        None => single_row(),
                    };
                    slot.start_after = child_start.clone();
                    slot.rows = outcome.rows_displayed;
                    slot.stopped_at = outcome.stopped_at.clone();
                    slot.done = outcome.done;
                    outcome
                }
                _ => {
                    self.build_child(pos, index, &item, epoch, &template, &child_start, remaining)
                        .await?
                }
            };

            if outcome.done.is_stale() {
                self.visited = first..index;
                debug!("Child {index} reported a stale source; abandoning pass");
                return Ok(PageOutcome::stale(self.state.start_after.clone()));
            }

            rows += outcome.rows_displayed;
            last = Some((index, outcome.stopped_at, outcome.done));
            pos += 1;
            index += 1;
            child_start = None;

            if outcome.done == Done::Interrupted {
                done = Done::Interrupted;
                break;
            }
        }

        let removed = self.children.truncate(pos);
        self.detach(removed);
        self.visited = first..index;
        trace!("Walked items {first}..{index}");

        let stopped_at = match last {
            Some((child_index, child_token, child_done)) => Some(ResumeToken::new(
                child_index,
                epoch,
                child_token,
                child_done.is_complete(),
            )),
            None if self.own_row_shown => Some(ResumeToken::own_row_only(epoch)),
            None => self.state.start_after.clone(),
        };

        Ok(PageOutcome {
            rows_displayed: rows,
            stopped_at,
            done,
        })
    }

    /// Instantiate a child for `item`, paginate it if it can, and store it at
    /// `pos`, replacing whatever slot was there.
    #[allow(clippy::too_many_arguments)]
    async fn build_child(
        &mut self,
        pos: usize,
        index: usize,
        item: &T,
        epoch: u64,
        template: &Arc<dyn Template<T>>,
        child_start: &Option<ResumeToken>,
        remaining: RowQuota,
    ) -> Result<PageOutcome> {
        trace!("Building child {index}");
        let mut component = template.instantiate(item).await?;

        let outcome = match component.as_paginatable() {
            Some(child) => {
                child.set_pagination(child_start.clone(), remaining);
                child.repaginate(None).await?
            }
            None => single_row(),
        };
        if outcome.done.is_stale() {
            return Ok(outcome);
        }

        let slot = ChildSlot {
            index,
            source_epoch: epoch,
            template_epoch: self.template_epoch,
            start_after: child_start.clone(),
            rows: outcome.rows_displayed,
            stopped_at: outcome.stopped_at.clone(),
            done: outcome.done,
            component,
        };
        if let Some(replaced) = self.children.put(pos, slot) {
            self.detach(vec![replaced]);
        }
        self.attach_at(pos);

        Ok(outcome)
    }
}

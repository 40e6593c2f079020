//! Per-container pagination node.
//!
//! A [`PaginationNode`] owns everything one container needs to paginate: its
//! [`Cursor`], the [`Template`] that turns items into children, the arena of
//! children rendered on the last pass, and its [`PaginationState`]. The pass
//! itself lives in `engine::repaginate`.

use std::any::Any;
use std::ops::Range;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::engine::arena::{ChildArena, ChildSlot};
use crate::engine::component::{AttachHooks, Component, NodeView, Paginatable, Template};
use crate::engine::cursor::{Cursor, ItemStream};
use crate::engine::state::{PageOutcome, PaginationState, ResumeToken, RowQuota};
use crate::error::Result;

/// Pagination bookkeeping for one container.
pub struct PaginationNode<T> {
    pub(crate) cursor: Cursor<T>,
    pub(crate) template: Option<Arc<dyn Template<T>>>,
    pub(crate) template_epoch: u64,
    hooks: Option<Arc<dyn AttachHooks>>,

    /// The node displays one row of its own before its children.
    pub(crate) own_row: bool,

    pub(crate) state: PaginationState,
    pub(crate) children: ChildArena,

    // What the last pass displayed.
    pub(crate) own_row_shown: bool,
    pub(crate) hidden: bool,
    pub(crate) placeholder: bool,

    /// Request of the last pass that was not stale. The updated-child fast
    /// path is only valid while the current request equals it.
    pub(crate) last_request: Option<(Option<ResumeToken>, RowQuota)>,

    /// Item indices the last pass walked over.
    pub(crate) visited: Range<usize>,
}

impl<T> PaginationNode<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a node over `source` with no template.
    pub fn new(source: ItemStream<T>) -> Self {
        Self::with_cursor(Cursor::new(source))
    }

    /// Create a node over an in-memory list of items.
    pub fn from_items(items: Vec<T>) -> Self {
        Self::with_cursor(Cursor::from_items(items))
    }

    fn with_cursor(cursor: Cursor<T>) -> Self {
        Self {
            cursor,
            template: None,
            template_epoch: 0,
            hooks: None,
            own_row: false,
            state: PaginationState::default(),
            children: ChildArena::new(),
            own_row_shown: false,
            hidden: false,
            placeholder: false,
            last_request: None,
            visited: 0..0,
        }
    }

    pub fn with_template(mut self, template: Arc<dyn Template<T>>) -> Self {
        self.set_template(Some(template));
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn AttachHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn with_own_row(mut self, own_row: bool) -> Self {
        self.own_row = own_row;
        self
    }

    /// Assign a new data source. Cached children become stale, and so does
    /// every resume token recorded against the old source.
    pub fn set_source(&mut self, source: ItemStream<T>) {
        self.cursor.reset(source);
        self.last_request = None;
    }

    /// Assign the per-item template. Assigning the template already in use
    /// keeps the cached children.
    pub fn set_template(&mut self, template: Option<Arc<dyn Template<T>>>) {
        let same = match (&self.template, &template) {
            (Some(current), Some(new)) => Arc::ptr_eq(current, new),
            (None, None) => true,
            _ => false,
        };
        if same {
            return;
        }

        self.template = template;
        self.template_epoch += 1;
        self.last_request = None;
        debug!("Template replaced, now at epoch {}", self.template_epoch);
    }

    pub fn has_template(&self) -> bool {
        self.template.is_some()
    }

    pub fn cursor(&self) -> &Cursor<T> {
        &self.cursor
    }

    pub fn source_epoch(&self) -> u64 {
        self.cursor.epoch()
    }

    pub fn template_epoch(&self) -> u64 {
        self.template_epoch
    }

    /// Item indices the last pass walked over. A pass triggered by a changed
    /// child starts at that child rather than at the page's first item.
    pub fn visited(&self) -> Range<usize> {
        self.visited.clone()
    }

    pub fn children(&self) -> &ChildArena {
        &self.children
    }

    /// The rendered child built from item `index`.
    pub fn child_mut(&mut self, index: usize) -> Option<&mut (dyn Component + 'static)> {
        let pos = self.children.position_of(index)?;
        self.children.get_mut(pos).map(|slot| slot.component.as_mut())
    }

    pub(crate) fn attach_at(&self, pos: usize) {
        if let (Some(hooks), Some(slot)) = (&self.hooks, self.children.get(pos)) {
            hooks.attached(slot.index, slot.component.as_ref());
        }
    }

    pub(crate) fn detach(&self, slots: Vec<ChildSlot>) {
        if slots.is_empty() {
            return;
        }
        trace!("Detaching {} children", slots.len());
        if let Some(hooks) = &self.hooks {
            for slot in &slots {
                hooks.detached(slot.index, slot.component.as_ref());
            }
        }
    }
}

#[async_trait]
impl<T> Paginatable for PaginationNode<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn pagination(&self) -> &PaginationState {
        &self.state
    }

    fn set_pagination(&mut self, start_after: Option<ResumeToken>, row_quota: RowQuota) {
        self.state.start_after = start_after;
        self.state.row_quota = row_quota;
    }

    async fn repaginate(&mut self, updated: Option<&[usize]>) -> Result<PageOutcome> {
        self.run_pass(updated).await
    }

    fn view(&self) -> NodeView<'_> {
        if self.hidden {
            return NodeView::hidden();
        }
        NodeView {
            own_row: self.own_row_shown,
            placeholder: self.placeholder,
            children: self
                .children
                .iter()
                .map(|slot| slot.component.as_ref())
                .collect(),
        }
    }
}

/// A labelled container component backed by its own [`PaginationNode`].
pub struct Panel<T> {
    label: String,
    node: PaginationNode<T>,
}

impl<T> Panel<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(label: impl Into<String>, node: PaginationNode<T>) -> Self {
        Self {
            label: label.into(),
            node,
        }
    }

    pub fn node(&self) -> &PaginationNode<T> {
        &self.node
    }

    pub fn node_mut(&mut self) -> &mut PaginationNode<T> {
        &mut self.node
    }
}

impl<T> Component for Panel<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn label(&self) -> String {
        self.label.clone()
    }

    fn as_paginatable(&mut self) -> Option<&mut dyn Paginatable> {
        Some(&mut self.node)
    }

    fn as_paginatable_ref(&self) -> Option<&dyn Paginatable> {
        Some(&self.node)
    }

    fn as_any_mut(&mut self) -> Option<&mut (dyn Any + 'static)> {
        Some(self)
    }
}

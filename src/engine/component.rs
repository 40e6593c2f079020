//! The contract the engine needs from the components it places on a page.
//!
//! A component is built from one data item by a [`Template`]. If it is itself
//! a container it exposes the [`Paginatable`] capability and receives a share
//! of its parent's row quota; otherwise it counts as exactly one row.

use std::any::Any;
use std::fmt::Display;

use async_trait::async_trait;

use crate::engine::state::{PageOutcome, PaginationState, ResumeToken, RowQuota};
use crate::error::Result;

/// A component placed on a page.
pub trait Component: Send {
    /// One line of text describing this component, used when a page is shown.
    fn label(&self) -> String;

    /// The pagination capability, for containers.
    fn as_paginatable(&mut self) -> Option<&mut dyn Paginatable> {
        None
    }

    /// Read-only access to the pagination capability.
    fn as_paginatable_ref(&self) -> Option<&dyn Paginatable> {
        None
    }

    /// Access to the concrete component, for callers that know its type.
    fn as_any_mut(&mut self) -> Option<&mut (dyn Any + 'static)> {
        None
    }
}

/// What a paginated container currently shows.
pub struct NodeView<'a> {
    /// Whether the container's own row is shown this pass.
    pub own_row: bool,

    /// Whether the container shows the "no template" placeholder row.
    pub placeholder: bool,

    /// Children on the current page, in order.
    pub children: Vec<&'a dyn Component>,
}

impl NodeView<'_> {
    /// A view of a container hidden for this pass.
    pub fn hidden() -> Self {
        Self {
            own_row: false,
            placeholder: false,
            children: Vec::new(),
        }
    }
}

/// Capability of a component to accept a row quota and report back what it
/// displayed.
#[async_trait]
pub trait Paginatable: Send {
    /// Current pagination state.
    fn pagination(&self) -> &PaginationState;

    /// Set where the next pass resumes and how many rows it may render.
    /// Written by the parent immediately before [`Paginatable::repaginate`].
    fn set_pagination(&mut self, start_after: Option<ResumeToken>, row_quota: RowQuota);

    /// Run a pass.
    ///
    /// `updated` is the path of item indices from this container down to a
    /// descendant whose own content changed. `None` or an empty path means a
    /// pass over the whole container.
    async fn repaginate(&mut self, updated: Option<&[usize]>) -> Result<PageOutcome>;

    /// What the last pass put on the page.
    fn view(&self) -> NodeView<'_>;
}

/// Builds a component from one data item.
///
/// Identity matters: assigning a different template `Arc` to a node
/// invalidates every cached child it built.
#[async_trait]
pub trait Template<T>: Send + Sync {
    async fn instantiate(&self, item: &T) -> Result<Box<dyn Component>>;
}

/// Callbacks fired when children enter or leave the rendered set.
pub trait AttachHooks: Send + Sync {
    fn attached(&self, index: usize, component: &dyn Component);

    fn detached(&self, index: usize, component: &dyn Component);
}

/// A one-row leaf showing a line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRow(pub String);

impl Component for TextRow {
    fn label(&self) -> String {
        self.0.clone()
    }
}

/// Template that renders every item as a [`TextRow`] through `Display`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextTemplate;

#[async_trait]
impl<T> Template<T> for TextTemplate
where
    T: Display + Send + Sync,
{
    async fn instantiate(&self, item: &T) -> Result<Box<dyn Component>> {
        Ok(Box::new(TextRow(item.to_string())))
    }
}

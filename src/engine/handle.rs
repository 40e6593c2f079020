//! Shared, task-safe access to a [`Paginator`].
//!
//! Navigation requests that arrive while a pass is running are dropped rather
//! than queued, and report [`Navigation::Busy`]. Source and template
//! replacements wait for the running pass, supersede one another while
//! waiting, and restart at the first page once applied.

use std::sync::Arc;

use tracing::debug;

use crate::engine::component::Template;
use crate::engine::cursor::ItemStream;
use crate::engine::guard::MutationGuard;
use crate::engine::paginator::Paginator;
use crate::error::Result;

/// A structural change to the root node.
pub enum Mutation<T> {
    Source(ItemStream<T>),
    Template(Option<Arc<dyn Template<T>>>),
}

/// Whether a pass is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
    Idle,
    Repaginating,
}

/// Result of a request made through a [`PagerHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The request ran and the displayed page changed or was recomputed.
    Moved,

    /// The request ran but there was nowhere to go.
    Unchanged,

    /// Another pass was running; the request was dropped.
    Busy,
}

impl From<bool> for Navigation {
    fn from(moved: bool) -> Self {
        if moved {
            Navigation::Moved
        } else {
            Navigation::Unchanged
        }
    }
}

/// Cloneable handle to a paginator shared between tasks.
pub struct PagerHandle<T> {
    guard: Arc<MutationGuard<Paginator<T>, Mutation<T>>>,
}

impl<T> Clone for PagerHandle<T> {
    fn clone(&self) -> Self {
        Self {
            guard: self.guard.clone(),
        }
    }
}

impl<T> PagerHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(paginator: Paginator<T>) -> Self {
        Self {
            guard: Arc::new(MutationGuard::new(paginator)),
        }
    }

    pub fn state(&self) -> PagerState {
        match self.guard.try_enter() {
            Some(_) => PagerState::Idle,
            None => PagerState::Repaginating,
        }
    }

    /// Whether a source or template assignment is waiting for the running pass.
    pub fn has_pending_mutation(&self) -> bool {
        self.guard.has_pending()
    }

    /// Number of assignments dropped because a newer one replaced them while
    /// they waited.
    pub fn superseded_mutations(&self) -> usize {
        self.guard.superseded()
    }

    /// Run `f` against the paginator once no pass is running.
    pub async fn inspect<R>(&self, f: impl FnOnce(&Paginator<T>) -> R) -> R {
        let paginator = self.guard.enter().await;
        f(&paginator)
    }

    pub async fn jump_to_first_page(&self) -> Result<Navigation> {
        let Some(mut paginator) = self.guard.try_enter() else {
            return Ok(busy("jump_to_first_page"));
        };
        paginator.jump_to_first_page().await?;
        Ok(Navigation::Moved)
    }

    pub async fn next_page(&self) -> Result<Navigation> {
        let Some(mut paginator) = self.guard.try_enter() else {
            return Ok(busy("next_page"));
        };
        Ok(paginator.next_page().await?.into())
    }

    pub async fn previous_page(&self) -> Result<Navigation> {
        let Some(mut paginator) = self.guard.try_enter() else {
            return Ok(busy("previous_page"));
        };
        Ok(paginator.previous_page().await?.into())
    }

    pub async fn jump_to_last_page(&self) -> Result<Navigation> {
        let Some(mut paginator) = self.guard.try_enter() else {
            return Ok(busy("jump_to_last_page"));
        };
        let before = paginator.current().map(|page| page.current_page);
        paginator.jump_to_last_page().await?;
        let after = paginator.current().map(|page| page.current_page);
        Ok((before != after).into())
    }

    pub async fn set_page(&self, page: i64) -> Result<Navigation> {
        let Some(mut paginator) = self.guard.try_enter() else {
            return Ok(busy("set_page"));
        };
        paginator.set_page(page).await?;
        Ok(Navigation::Moved)
    }

    pub async fn repaginate(&self) -> Result<Navigation> {
        let Some(mut paginator) = self.guard.try_enter() else {
            return Ok(busy("repaginate"));
        };
        paginator.repaginate().await?;
        Ok(Navigation::Moved)
    }

    pub async fn child_updated(&self, path: &[usize]) -> Result<Navigation> {
        let Some(mut paginator) = self.guard.try_enter() else {
            return Ok(busy("child_updated"));
        };
        paginator.child_updated(path).await?;
        Ok(Navigation::Moved)
    }

    pub async fn set_rows_per_page(&self, rows_per_page: usize) -> Result<Navigation> {
        let Some(mut paginator) = self.guard.try_enter() else {
            return Ok(busy("set_rows_per_page"));
        };
        paginator.set_rows_per_page(rows_per_page).await?;
        Ok(Navigation::Moved)
    }

    /// Assign a new data source and show its first page.
    ///
    /// A later mutation submitted while this one waits replaces it. Only one
    /// of the waiting calls applies the latest mutation and returns `Moved`;
    /// the others return `Unchanged`.
    pub async fn set_source(&self, source: ItemStream<T>) -> Result<Navigation> {
        self.apply(Mutation::Source(source)).await
    }

    /// Assign a new template and show the first page.
    pub async fn set_template(&self, template: Option<Arc<dyn Template<T>>>) -> Result<Navigation> {
        self.apply(Mutation::Template(template)).await
    }

    async fn apply(&self, mutation: Mutation<T>) -> Result<Navigation> {
        let Some((mut paginator, mutation)) = self.guard.submit(mutation).await else {
            debug!("Mutation was applied by another waiter");
            return Ok(Navigation::Unchanged);
        };

        match mutation {
            Mutation::Source(source) => paginator.replace_source(source),
            Mutation::Template(template) => paginator.replace_template(template),
        }
        paginator.jump_to_first_page().await?;
        Ok(Navigation::Moved)
    }
}

fn busy(request: &str) -> Navigation {
    debug!("Dropping {request}: a pass is already running");
    Navigation::Busy
}

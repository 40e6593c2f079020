//! Serialization of structural mutations against in-flight passes.
//!
//! The guarded state sits behind a `tokio::sync::Mutex`; holding the lock is
//! what "a pass is in flight" means. Mutations go through a single pending
//! slot: a mutation submitted while another is still waiting replaces it, so
//! at most one mutation is ever queued behind the running pass.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, MutexGuard};
use tracing::info;

/// Mutual exclusion plus a one-deep superseding mutation queue.
pub struct MutationGuard<S, M> {
    state: AsyncMutex<S>,
    pending: Mutex<Option<M>>,
    superseded: AtomicUsize,
}

impl<S, M> MutationGuard<S, M> {
    pub fn new(state: S) -> Self {
        Self {
            state: AsyncMutex::new(state),
            pending: Mutex::new(None),
            superseded: AtomicUsize::new(0),
        }
    }

    /// Lock the state if no pass is in flight.
    pub fn try_enter(&self) -> Option<MutexGuard<'_, S>> {
        self.state.try_lock().ok()
    }

    /// Wait for the in-flight pass, if any, and lock the state.
    pub async fn enter(&self) -> MutexGuard<'_, S> {
        self.state.lock().await
    }

    /// Queue `mutation` and wait for the lock.
    ///
    /// Returns the lock together with the mutation to apply, which is the
    /// latest one submitted. Returns `None` when another submitter already
    /// took the pending mutation while this one was waiting.
    pub async fn submit(&self, mutation: M) -> Option<(MutexGuard<'_, S>, M)> {
        if self.slot().replace(mutation).is_some() {
            let total = self.superseded.fetch_add(1, Ordering::Relaxed) + 1;
            info!("Pending mutation superseded before it was applied ({total} dropped so far)");
        }

        let guard = self.state.lock().await;
        let mutation = self.slot().take()?;
        Some((guard, mutation))
    }

    /// Number of mutations dropped because a newer one replaced them.
    pub fn superseded(&self) -> usize {
        self.superseded.load(Ordering::Relaxed)
    }

    /// Whether a mutation is waiting for the lock.
    pub fn has_pending(&self) -> bool {
        self.slot().is_some()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<M>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

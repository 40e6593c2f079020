//! Random access over a lazily pulled item stream.
//!
//! A [`Cursor`] keeps every item it has pulled, so revisiting an earlier index
//! (previous page, repaginate) never re-iterates the source. Assigning a new
//! source drops the cache and bumps the epoch.

use futures::StreamExt;
use futures::stream::BoxStream;
use tracing::{debug, trace, warn};

use crate::error::{PagerError, Result};

/// A possibly infinite, possibly suspending stream of items.
pub type ItemStream<T> = BoxStream<'static, Result<T>>;

/// Cached cursor over an [`ItemStream`].
pub struct Cursor<T> {
    stream: ItemStream<T>,
    cache: Vec<T>,
    exhausted: bool,

    /// Error that ended the current source, reported again for every index
    /// past the cache.
    failure: Option<String>,
    epoch: u64,
}

impl<T: Clone + Send> Cursor<T> {
    /// Create a cursor over a fresh source at epoch 0.
    pub fn new(stream: ItemStream<T>) -> Self {
        Self {
            stream,
            cache: Vec::new(),
            exhausted: false,
            failure: None,
            epoch: 0,
        }
    }

    /// Build a cursor over an in-memory list of items.
    pub fn from_items(items: Vec<T>) -> Self
    where
        T: 'static,
    {
        Self::new(futures::stream::iter(items.into_iter().map(Ok)).boxed())
    }

    /// Epoch of the current source. Changes whenever a new source is assigned.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Number of items pulled so far.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Whether the source has reported its end.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Item at `index`, pulling from the source as needed.
    ///
    /// Returns `Ok(None)` once the source is exhausted before `index`. An error
    /// from the source ends it: items cached before the error stay readable,
    /// and every later index fails until a new source is assigned.
    pub async fn item_at(&mut self, index: usize) -> Result<Option<T>> {
        if index >= self.cache.len() {
            if let Some(message) = &self.failure {
                return Err(PagerError::Source(message.clone()));
            }
        }

        while self.cache.len() <= index && !self.exhausted {
            match self.stream.next().await {
                Some(Ok(item)) => {
                    self.cache.push(item);
                    trace!("Cursor pulled item {}", self.cache.len() - 1);
                }
                Some(Err(err)) => {
                    warn!("Source failed after {} items: {err}", self.cache.len());
                    self.failure = Some(match &err {
                        PagerError::Source(message) => message.clone(),
                        other => other.to_string(),
                    });
                    return Err(err);
                }
                None => {
                    debug!(
                        "Cursor source exhausted after {} items (epoch {})",
                        self.cache.len(),
                        self.epoch
                    );
                    self.exhausted = true;
                }
            }
        }

        Ok(self.cache.get(index).cloned())
    }

    /// Replace the source. The cache is dropped and the epoch bumped even when
    /// the new source yields equal items.
    pub fn reset(&mut self, stream: ItemStream<T>) {
        self.stream = stream;
        self.cache.clear();
        self.exhausted = false;
        self.failure = None;
        self.epoch += 1;
        debug!("Cursor source replaced, now at epoch {}", self.epoch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_stream(len: usize, pulls: Arc<AtomicUsize>) -> ItemStream<usize> {
        futures::stream::iter(0..len)
            .map(move |i| {
                pulls.fetch_add(1, Ordering::SeqCst);
                Ok(i)
            })
            .boxed()
    }

    #[tokio::test]
    async fn test_item_at_pulls_lazily() {
        let pulls = Arc::new(AtomicUsize::new(0));
        let mut cursor = Cursor::new(counting_stream(100, pulls.clone()));

        assert_eq!(cursor.item_at(4).await.unwrap(), Some(4));
        assert_eq!(pulls.load(Ordering::SeqCst), 5);
        assert_eq!(cursor.cached_len(), 5);
    }

    #[tokio::test]
    async fn test_backward_access_uses_cache() {
        let pulls = Arc::new(AtomicUsize::new(0));
        let mut cursor = Cursor::new(counting_stream(10, pulls.clone()));

        cursor.item_at(7).await.unwrap();
        assert_eq!(cursor.item_at(2).await.unwrap(), Some(2));
        assert_eq!(cursor.item_at(7).await.unwrap(), Some(7));
        assert_eq!(pulls.load(Ordering::SeqCst), 8);
    }

    #[tokio::test]
    async fn test_end_of_data() {
        let mut cursor = Cursor::from_items(vec!["a", "b"]);
        assert_eq!(cursor.item_at(5).await.unwrap(), None);
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.item_at(1).await.unwrap(), Some("b"));
    }

    #[tokio::test]
    async fn test_reset_bumps_epoch_and_drops_cache() {
        let mut cursor = Cursor::from_items(vec![1, 2, 3]);
        cursor.item_at(2).await.unwrap();

        cursor.reset(futures::stream::iter(vec![Ok(1), Ok(2), Ok(3)]).boxed());
        assert_eq!(cursor.epoch(), 1);
        assert_eq!(cursor.cached_len(), 0);
        assert!(!cursor.is_exhausted());
        assert_eq!(cursor.item_at(0).await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_suspending_source() {
        let stream = futures::stream::iter(0..3)
            .then(|i| async move {
                tokio::task::yield_now().await;
                Ok(i)
            })
            .boxed();
        let mut cursor = Cursor::new(stream);
        assert_eq!(cursor.item_at(2).await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_source_error_propagates() {
        let stream = futures::stream::iter(vec![
            Ok(1),
            Err(PagerError::Source("boom".to_string())),
            Ok(3),
        ])
        .boxed();
        let mut cursor = Cursor::new(stream);

        assert!(matches!(
            cursor.item_at(1).await,
            Err(PagerError::Source(_))
        ));
        assert!(!cursor.is_exhausted());
        assert!(matches!(
            cursor.item_at(1).await,
            Err(PagerError::Source(message)) if message.contains("boom")
        ));
        assert!(cursor.item_at(2).await.is_err());
        assert_eq!(cursor.item_at(0).await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_new_source_clears_failure() {
        let stream = futures::stream::iter(vec![Err(PagerError::Source("boom".to_string()))]).boxed();
        let mut cursor: Cursor<i32> = Cursor::new(stream);
        assert!(cursor.item_at(0).await.is_err());

        cursor.reset(futures::stream::iter(vec![Ok(7)]).boxed());
        assert_eq!(cursor.item_at(0).await.unwrap(), Some(7));
        assert_eq!(cursor.item_at(1).await.unwrap(), None);
    }
}

//! Positional storage for the children a node rendered on its last pass.
//!
//! Slots are contiguous: slot `p` holds the child for item index
//! `head().index + p`. The node decides reuse against these slots; the arena
//! itself only inserts, removes and trims.

use crate::engine::component::Component;
use crate::engine::state::{Done, ResumeToken};

/// A child rendered by a previous pass.
pub struct ChildSlot {
    /// Item index the child was built from.
    pub index: usize,

    /// Parent cursor epoch when the child was built.
    pub source_epoch: u64,

    /// Parent template epoch when the child was built.
    pub template_epoch: u64,

    /// Token the child was last paginated with.
    pub start_after: Option<ResumeToken>,

    /// Rows the child rendered on its last pass.
    pub rows: usize,

    /// Where the child stopped.
    pub stopped_at: Option<ResumeToken>,

    /// The child's completion status.
    pub done: Done,

    pub component: Box<dyn Component>,
}

impl ChildSlot {
    pub(crate) fn matches(&self, index: usize, source_epoch: u64, template_epoch: u64) -> bool {
        self.index == index
            && self.source_epoch == source_epoch
            && self.template_epoch == template_epoch
    }
}

#[derive(Default)]
pub struct ChildArena {
    slots: Vec<ChildSlot>,
}

impl ChildArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, pos: usize) -> Option<&ChildSlot> {
        self.slots.get(pos)
    }

    pub fn get_mut(&mut self, pos: usize) -> Option<&mut ChildSlot> {
        self.slots.get_mut(pos)
    }

    pub fn head(&self) -> Option<&ChildSlot> {
        self.slots.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChildSlot> {
        self.slots.iter()
    }

    /// Position of the slot built from item `index`.
    pub fn position_of(&self, index: usize) -> Option<usize> {
        self.slots.iter().position(|slot| slot.index == index)
    }

    /// Sum of the rows rendered by the slots before `pos`.
    pub fn rows_before(&self, pos: usize) -> usize {
        self.slots.iter().take(pos).map(|slot| slot.rows).sum()
    }

    /// Remove head slots until the head was built from `start_index` under the
    /// given epochs. Returns the removed slots in order.
    pub fn drop_stale_heads(
        &mut self,
        start_index: usize,
        source_epoch: u64,
        template_epoch: u64,
    ) -> Vec<ChildSlot> {
        let keep_from = self
            .slots
            .iter()
            .position(|slot| slot.matches(start_index, source_epoch, template_epoch))
            .unwrap_or(self.slots.len());
        self.slots.drain(..keep_from).collect()
    }

    /// Store `slot` at `pos`, returning the slot it replaced. `pos` may be one
    /// past the end.
    pub fn put(&mut self, pos: usize, slot: ChildSlot) -> Option<ChildSlot> {
        if pos < self.slots.len() {
            Some(std::mem::replace(&mut self.slots[pos], slot))
        } else {
            debug_assert_eq!(pos, self.slots.len());
            self.slots.push(slot);
            None
        }
    }

    /// Remove every slot from `pos` onwards.
    pub fn truncate(&mut self, pos: usize) -> Vec<ChildSlot> {
        if pos >= self.slots.len() {
            return Vec::new();
        }
        self.slots.split_off(pos)
    }

    /// Remove every slot.
    pub fn clear(&mut self) -> Vec<ChildSlot> {
        std::mem::take(&mut self.slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(usize);

    impl Component for Row {
        fn label(&self) -> String {
            self.0.to_string()
        }
    }

    fn slot(index: usize, epoch: u64) -> ChildSlot {
        ChildSlot {
            index,
            source_epoch: epoch,
            template_epoch: 0,
            start_after: None,
            rows: 1,
            stopped_at: None,
            done: Done::Complete,
            component: Box::new(Row(index)),
        }
    }

    fn arena(indices: std::ops::Range<usize>, epoch: u64) -> ChildArena {
        let mut arena = ChildArena::new();
        for (pos, index) in indices.enumerate() {
            arena.put(pos, slot(index, epoch));
        }
        arena
    }

    #[test]
    fn test_drop_stale_heads_keeps_matching_head() {
        let mut arena = arena(0..10, 0);
        let removed = arena.drop_stale_heads(6, 0, 0);

        assert_eq!(removed.len(), 6);
        assert_eq!(arena.head().map(|s| s.index), Some(6));
        assert_eq!(arena.len(), 4);
    }

    #[test]
    fn test_drop_stale_heads_on_epoch_change() {
        let mut arena = arena(0..5, 0);
        let removed = arena.drop_stale_heads(0, 1, 0);

        assert_eq!(removed.len(), 5);
        assert!(arena.is_empty());
    }

    #[test]
    fn test_drop_stale_heads_when_start_precedes_head() {
        let mut arena = arena(10..15, 0);
        arena.drop_stale_heads(3, 0, 0);
        assert!(arena.is_empty());
    }

    #[test]
    fn test_put_replace_and_truncate() {
        let mut arena = arena(0..3, 0);
        let replaced = arena.put(1, slot(1, 0));
        assert_eq!(replaced.map(|s| s.index), Some(1));

        let removed = arena.truncate(2);
        assert_eq!(removed.len(), 1);
        assert_eq!(arena.len(), 2);
        assert!(arena.truncate(5).is_empty());
    }

    #[test]
    fn test_rows_before_and_position() {
        let mut arena = arena(4..8, 0);
        if let Some(slot) = arena.get_mut(1) {
            slot.rows = 3;
        }
        assert_eq!(arena.position_of(6), Some(2));
        assert_eq!(arena.rows_before(2), 4);
        assert_eq!(arena.position_of(9), None);
    }
}

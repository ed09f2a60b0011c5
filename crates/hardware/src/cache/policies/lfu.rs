//! Least Frequently Used (LFU) Replacement Policy.
//!
//! This policy keeps a hit counter for every occupied slot and evicts the slot
//! with the smallest count. A freshly inserted line starts at 1. Ties go to the
//! lowest slot index, which keeps eviction order reproducible.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `insert()`: O(1)
//!   - `update()`: O(W) where W is the number of ways
//!   - `evict()`: O(W)
//! - **Space Complexity:** O(W) per set
//! - **Worst Case:** Phase changes, where lines that were hot early keep
//!   their high counts long after they stop being used

use super::ReplacementPolicy;

/// Metadata for one occupied slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    tag: u64,
    count: u64,
}

/// LFU policy state.
#[derive(Debug, Clone)]
pub struct LfuPolicy {
    /// One entry per way; `None` for slots the policy considers free.
    slots: Vec<Option<Entry>>,
}

impl LfuPolicy {
    /// Creates a new LFU policy with every slot free.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Lines per set.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    /// Returns the access count of the line in `way`, if it is occupied.
    pub fn frequency(&self, way: usize) -> Option<u64> {
        self.slots.get(way).copied().flatten().map(|e| e.count)
    }
}

impl ReplacementPolicy for LfuPolicy {
    fn insert(&mut self, way: usize, tag: u64) {
        self.slots[way] = Some(Entry { tag, count: 1 });
    }

    /// Increments the counter of the occupied slot holding `tag`.
    fn update(&mut self, _way: usize, tag: u64) {
        if let Some(entry) = self.slots.iter_mut().flatten().find(|e| e.tag == tag) {
            entry.count = entry.count.saturating_add(1);
        }
    }

    /// Picks the occupied slot with the lowest count, lowest index first.
    fn evict(&mut self) -> Option<usize> {
        let (victim, _) = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(way, slot)| slot.map(|e| (way, e.count)))
            .min_by_key(|&(way, count)| (count, way))?;
        self.slots[victim] = None;
        Some(victim)
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }
}

//! Round-Robin Replacement Policy.
//!
//! This policy evicts slots in strict rotation: 0, 1, ..., C-1, 0, ... It
//! ignores hits and fills entirely, so it needs a single cursor per set. It is
//! the default for every associative cache that does not name a policy.
//!
//! # Performance
//!
//! - **Time Complexity:** O(1) for every operation
//! - **Space Complexity:** O(1) per set
//! - **Best Case:** Streaming accesses where all lines have equal importance
//! - **Worst Case:** Workloads with strong temporal locality

use super::ReplacementPolicy;

/// Round-robin policy state.
#[derive(Debug, Clone)]
pub struct RoundRobinPolicy {
    /// Next slot to evict.
    cursor: usize,
    /// Number of slots in the set.
    capacity: usize,
}

impl RoundRobinPolicy {
    /// Creates a new round-robin policy with the cursor at slot 0.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Lines per set.
    pub const fn new(capacity: usize) -> Self {
        Self {
            cursor: 0,
            capacity,
        }
    }

    /// Returns the slot the next eviction will choose.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }
}

impl ReplacementPolicy for RoundRobinPolicy {
    fn insert(&mut self, _way: usize, _tag: u64) {}

    fn update(&mut self, _way: usize, _tag: u64) {}

    /// Returns the cursor, then advances it modulo the capacity.
    fn evict(&mut self) -> Option<usize> {
        if self.capacity == 0 {
            return None;
        }
        let victim = self.cursor;
        self.cursor = (self.cursor + 1) % self.capacity;
        Some(victim)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

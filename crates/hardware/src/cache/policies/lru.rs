//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the line that has gone longest without being touched.
//! Recency is kept as a doubly-linked list threaded through an arena of
//! slot-indexed nodes: `prev`/`next` are way indices, not pointers, so a node
//! can never outlive or alias the slot it describes. A tag-to-slot map finds
//! the node for a hit without walking the list.
//!
//! The head of the list is the most recently used slot; the tail is the victim.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `insert()`: O(1)
//!   - `update()`: O(1)
//!   - `evict()`: O(1)
//! - **Space Complexity:** O(W) per set
//! - **Best Case:** Workloads with good temporal locality
//! - **Worst Case:** Cyclic scans larger than the set (thrashing)

use std::collections::HashMap;

use super::ReplacementPolicy;

/// One occupied slot in the recency list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node {
    tag: u64,
    prev: Option<usize>,
    next: Option<usize>,
}

/// LRU policy state.
#[derive(Debug, Clone)]
pub struct LruPolicy {
    /// Arena indexed by way; `None` for slots not in the list.
    nodes: Vec<Option<Node>>,
    /// Tag of each listed line to its way.
    slot_of: HashMap<u64, usize>,
    /// Most recently used way.
    head: Option<usize>,
    /// Least recently used way.
    tail: Option<usize>,
}

impl LruPolicy {
    /// Creates a new LRU policy with an empty recency list.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Lines per set.
    pub fn new(capacity: usize) -> Self {
        Self {
            nodes: vec![None; capacity],
            slot_of: HashMap::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    /// Returns the listed ways from most to least recently used.
    pub fn order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.slot_of.len());
        let mut cursor = self.head;
        while let Some(way) = cursor {
            order.push(way);
            cursor = self.nodes[way].and_then(|n| n.next);
        }
        order
    }

    /// Returns the way `evict` would choose, without changing any state.
    pub const fn peek_victim(&self) -> Option<usize> {
        self.tail
    }

    /// Detaches `way` from the list, leaving its node in the arena.
    fn unlink(&mut self, way: usize) {
        let Some(node) = self.nodes[way] else {
            return;
        };

        match node.prev {
            Some(prev) => {
                if let Some(p) = self.nodes[prev].as_mut() {
                    p.next = node.next;
                }
            }
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => {
                if let Some(n) = self.nodes[next].as_mut() {
                    n.prev = node.prev;
                }
            }
            None => self.tail = node.prev,
        }

        if let Some(n) = self.nodes[way].as_mut() {
            n.prev = None;
            n.next = None;
        }
    }

    /// Links an already-detached `way` in at the head.
    fn push_front(&mut self, way: usize) {
        let old_head = self.head;
        if let Some(n) = self.nodes[way].as_mut() {
            n.prev = None;
            n.next = old_head;
        }
        if let Some(h) = old_head {
            if let Some(n) = self.nodes[h].as_mut() {
                n.prev = Some(way);
            }
        }
        self.head = Some(way);
        if self.tail.is_none() {
            self.tail = Some(way);
        }
    }

    /// Moves the line holding `tag` to the head, if it is listed.
    fn promote(&mut self, tag: u64) -> bool {
        let Some(&way) = self.slot_of.get(&tag) else {
            return false;
        };
        self.unlink(way);
        self.push_front(way);
        true
    }
}

impl ReplacementPolicy for LruPolicy {
    /// Adds the line at the head, or promotes it if its tag is already listed.
    fn insert(&mut self, way: usize, tag: u64) {
        if self.promote(tag) {
            return;
        }

        // The set only offers free or just-evicted slots, but a stale node
        // here would corrupt the list, so drop it first.
        if let Some(stale) = self.nodes[way] {
            self.unlink(way);
            let _ = self.slot_of.remove(&stale.tag);
        }

        self.nodes[way] = Some(Node {
            tag,
            prev: None,
            next: None,
        });
        let _ = self.slot_of.insert(tag, way);
        self.push_front(way);
    }

    fn update(&mut self, _way: usize, tag: u64) {
        let _ = self.promote(tag);
    }

    /// Unlinks the tail and returns its way.
    fn evict(&mut self) -> Option<usize> {
        let victim = self.tail?;
        self.unlink(victim);
        if let Some(node) = self.nodes[victim].take() {
            let _ = self.slot_of.remove(&node.tag);
        }
        Some(victim)
    }

    fn capacity(&self) -> usize {
        self.nodes.len()
    }
}

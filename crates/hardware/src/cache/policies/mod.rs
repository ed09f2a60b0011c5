//! Cache Replacement Policies.
//!
//! Implements the algorithms for selecting victim lines within one cache set.
//! Each set owns exactly one policy instance; the policy tracks per-slot
//! metadata while the set remains the only writer of line validity.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used (slot arena with a tag lookup).
//! - `Lfu`: Least Frequently Used (per-slot hit counters).
//! - `RoundRobin`: rotating cursor, independent of access history.

/// Least Frequently Used replacement policy.
pub mod lfu;

/// Least Recently Used replacement policy.
pub mod lru;

/// Round-robin replacement policy.
pub mod round_robin;

use std::fmt;

pub use lfu::LfuPolicy;
pub use lru::LruPolicy;
pub use round_robin::RoundRobinPolicy;

use crate::config::ReplacementPolicy as PolicyType;

/// Trait for per-set cache replacement policies.
///
/// Slots are identified by their way index within the set. Every method is
/// deterministic so that a fixed trace always yields the same statistics.
pub trait ReplacementPolicy: Send + Sync + fmt::Debug {
    /// Records that `tag` now occupies the free slot `way`.
    ///
    /// # Arguments
    ///
    /// * `way` - The slot the set placed the line in.
    /// * `tag` - The tag of the new line.
    fn insert(&mut self, way: usize, tag: u64);

    /// Records a hit on the line holding `tag` in slot `way`.
    ///
    /// # Arguments
    ///
    /// * `way` - The slot that hit.
    /// * `tag` - The tag that hit.
    fn update(&mut self, way: usize, tag: u64);

    /// Selects a victim and forgets its metadata.
    ///
    /// # Returns
    ///
    /// The way index the caller must overwrite, or `None` when the policy
    /// tracks no occupied slot.
    fn evict(&mut self) -> Option<usize>;

    /// Number of slots this policy manages.
    fn capacity(&self) -> usize;
}

/// Builds the policy instance for one set.
///
/// # Arguments
///
/// * `policy` - The configured algorithm.
/// * `capacity` - Lines per set.
pub fn build_policy(policy: PolicyType, capacity: usize) -> Box<dyn ReplacementPolicy> {
    match policy {
        PolicyType::Lru => Box::new(LruPolicy::new(capacity)),
        PolicyType::Lfu => Box::new(LfuPolicy::new(capacity)),
        PolicyType::Rr => Box::new(RoundRobinPolicy::new(capacity)),
    }
}

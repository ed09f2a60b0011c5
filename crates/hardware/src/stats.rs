//! Simulation statistics.
//!
//! Plain snapshots of the hierarchy's counters, taken after a run completes.
//! They serialize to the shape consumed by reporting tools:
//!
//! ```json
//! {
//!   "caches": [ { "name": "L1", "hits": 10, "misses": 2 } ],
//!   "main_memory_accesses": 2
//! }
//! ```

use serde::Serialize;

/// Hit and miss totals for one cache level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Cache name from the configuration.
    pub name: String,
    /// Lookups that found the line at this level.
    pub hits: u64,
    /// Lookups that did not.
    pub misses: u64,
}

impl CacheStats {
    /// Total lookups that reached this level.
    pub const fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of lookups that hit, or 0 if the level was never reached.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        match self.accesses() {
            0 => 0.0,
            n => self.hits as f64 / n as f64,
        }
    }
}

/// Counters for the whole hierarchy, nearest level first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HierarchyStats {
    /// Per-level totals.
    pub caches: Vec<CacheStats>,
    /// Addresses that missed in every level.
    pub main_memory_accesses: u64,
}

impl HierarchyStats {
    /// Looks up a level by name.
    pub fn cache(&self, name: &str) -> Option<&CacheStats> {
        self.caches.iter().find(|c| c.name == name)
    }

    /// Renders the snapshot as indented JSON.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures, which cannot occur for this type in
    /// practice.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

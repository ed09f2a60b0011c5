//! Cache hierarchy.
//!
//! An ordered list of caches, nearest to the core first, backed by main memory.
//! Each address walks the levels in order until one hits:
//! 1. **Hit:** The level's hit counter and policy are updated and the walk stops.
//! 2. **Miss:** The level's miss counter is incremented, the line is installed,
//!    and the walk continues outward.
//! 3. **Memory:** If every level misses, the memory-access counter is
//!    incremented once.
//!
//! Because every missing level installs the line before the next level is
//! consulted, a hit at level `k` leaves the line resident in levels `0..=k`.
//! There is no separate back-fill step.

use tracing::debug;

use crate::cache::Cache;
use crate::cache::geometry::{CacheGeometry, LineAddrs};
use crate::common::addr::Addr;
use crate::common::data::MemoryAccess;
use crate::common::error::{ConfigError, SimError};
use crate::config::HierarchyConfig;
use crate::stats::HierarchyStats;

/// The simulated cache hierarchy and its memory-access counter.
#[derive(Debug)]
pub struct CacheHierarchy {
    /// Never empty.
    caches: Vec<Cache>,
    memory_accesses: u64,
}

impl CacheHierarchy {
    /// Builds every level described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyHierarchy`] for an empty cache list and a
    /// geometry error for the first level with an invalid shape.
    pub fn new(config: &HierarchyConfig) -> Result<Self, SimError> {
        let caches = config
            .caches
            .iter()
            .map(Cache::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_caches(caches)?)
    }

    /// Assembles a hierarchy from already-built caches, nearest first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyHierarchy`] if `caches` is empty.
    pub fn from_caches(caches: Vec<Cache>) -> Result<Self, ConfigError> {
        if caches.is_empty() {
            return Err(ConfigError::EmptyHierarchy);
        }
        debug!(levels = caches.len(), "built cache hierarchy");
        Ok(Self {
            caches,
            memory_accesses: 0,
        })
    }

    /// The levels, nearest first.
    pub fn caches(&self) -> &[Cache] {
        &self.caches
    }

    /// Addresses that missed in every level so far.
    pub const fn memory_accesses(&self) -> u64 {
        self.memory_accesses
    }

    /// Geometry of the nearest level, which governs access expansion.
    pub fn nearest_geometry(&self) -> CacheGeometry {
        *self.caches[0].geometry()
    }

    /// Expands a trace record into the line addresses it touches.
    pub fn expand(&self, access: &MemoryAccess) -> LineAddrs {
        self.caches[0].geometry().expand(access.addr, access.size)
    }

    /// Walks the hierarchy for a single address.
    ///
    /// # Returns
    ///
    /// The index of the level that hit, or `None` if the address went to
    /// main memory.
    ///
    /// # Errors
    ///
    /// Propagates [`SimError::NoVictim`] from a level's fill.
    pub fn access(&mut self, addr: Addr) -> Result<Option<usize>, SimError> {
        for (level, cache) in self.caches.iter_mut().enumerate() {
            if cache.access(addr)? {
                return Ok(Some(level));
            }
        }
        self.memory_accesses += 1;
        Ok(None)
    }

    /// Walks the hierarchy for each address in turn.
    ///
    /// # Errors
    ///
    /// Stops at the first failing address.
    pub fn access_all(&mut self, addrs: &[Addr]) -> Result<(), SimError> {
        for &addr in addrs {
            let _ = self.access(addr)?;
        }
        Ok(())
    }

    /// Snapshot of every counter.
    pub fn stats(&self) -> HierarchyStats {
        HierarchyStats {
            caches: self.caches.iter().map(Cache::stats).collect(),
            main_memory_accesses: self.memory_accesses,
        }
    }
}

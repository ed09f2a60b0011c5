//! Configuration system for the cache simulator.
//!
//! This module defines the structures used to describe a cache hierarchy and a
//! simulation run. It provides:
//! 1. **Defaults:** Baseline constants (pipeline queue depth).
//! 2. **Structures:** The hierarchy description and the per-run settings.
//! 3. **Enums:** Associativity kinds and replacement policies, with the
//!    lowercase spellings used in JSON configuration files.
//!
//! The loader performs no geometry validation; that happens when the
//! [`CacheHierarchy`](crate::hierarchy::CacheHierarchy) is built.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::error::{ConfigError, SimError};

/// Default configuration constants for the simulator.
mod defaults {
    /// Number of trace records the producer may run ahead of the consumer.
    pub const QUEUE_DEPTH: usize = 8000;
}

/// Associativity of a cache: how many lines each set holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum CacheKind {
    /// One line per set.
    #[serde(rename = "direct")]
    Direct,
    /// A single set holding every line.
    #[serde(rename = "full")]
    Full,
    /// Two lines per set.
    #[serde(rename = "2way")]
    TwoWay,
    /// Four lines per set.
    #[serde(rename = "4way")]
    FourWay,
    /// Eight lines per set.
    #[serde(rename = "8way")]
    EightWay,
}

impl CacheKind {
    /// Lines per set for k-way kinds, `None` for direct and full.
    pub const fn ways(self) -> Option<u64> {
        match self {
            Self::TwoWay => Some(2),
            Self::FourWay => Some(4),
            Self::EightWay => Some(8),
            Self::Direct | Self::Full => None,
        }
    }

    /// Returns the configuration-file spelling of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Full => "full",
            Self::TwoWay => "2way",
            Self::FourWay => "4way",
            Self::EightWay => "8way",
        }
    }
}

/// Cache replacement policy algorithms.
///
/// Specifies the algorithm used to select which line to evict when a new
/// line must be installed in a full set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplacementPolicy {
    /// Least Recently Used.
    ///
    /// Evicts the line that was touched least recently.
    Lru,
    /// Least Frequently Used.
    ///
    /// Evicts the line with the fewest hits, lowest slot first on ties.
    Lfu,
    /// Round Robin.
    ///
    /// Evicts slots in rotating order regardless of access history.
    #[default]
    #[serde(alias = "roundrobin")]
    Rr,
}

/// Description of one cache level.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::{CacheConfig, CacheKind, ReplacementPolicy};
///
/// let json = r#"{ "name": "L1", "size": 1024, "line_size": 64, "kind": "4way" }"#;
/// let cache: CacheConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(cache.kind, CacheKind::FourWay);
/// assert_eq!(cache.effective_policy(), ReplacementPolicy::Rr);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Display name, echoed back in statistics.
    pub name: String,
    /// Capacity in bytes.
    pub size: u64,
    /// Line size in bytes.
    pub line_size: u64,
    /// Associativity.
    pub kind: CacheKind,
    /// Replacement policy; round robin when absent.
    #[serde(default)]
    pub replacement_policy: Option<ReplacementPolicy>,
}

impl CacheConfig {
    /// Returns the policy that will actually be instantiated for this cache.
    ///
    /// Direct-mapped sets never consult a policy, so they always report
    /// round robin.
    pub fn effective_policy(&self) -> ReplacementPolicy {
        match self.kind {
            CacheKind::Direct => ReplacementPolicy::Rr,
            _ => self.replacement_policy.unwrap_or_default(),
        }
    }
}

/// Ordered description of the hierarchy, nearest level first.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::HierarchyConfig;
///
/// let json = r#"{
///     "caches": [
///         { "name": "L1", "size": 1024, "line_size": 64, "kind": "direct" },
///         { "name": "L2", "size": 8192, "line_size": 64, "kind": "8way",
///           "replacement_policy": "lru" }
///     ]
/// }"#;
///
/// let config = HierarchyConfig::from_json(json).unwrap();
/// assert_eq!(config.caches.len(), 2);
/// assert_eq!(config.caches[1].name, "L2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HierarchyConfig {
    /// Cache levels, nearest to the core first.
    pub caches: Vec<CacheConfig>,
}

impl HierarchyConfig {
    /// Parses a hierarchy description from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] on malformed input and
    /// [`ConfigError::EmptyHierarchy`] when no caches are listed.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.caches.is_empty() {
            return Err(ConfigError::EmptyHierarchy);
        }
        Ok(config)
    }

    /// Reads and parses a hierarchy description from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] if the file cannot be read, otherwise the
    /// errors of [`HierarchyConfig::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let text = fs::read_to_string(path)?;
        Ok(Self::from_json(&text)?)
    }
}

/// Settings for a simulation run that are not part of the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SimulatorConfig {
    /// Bounded queue depth between trace reader and simulator, in records.
    #[serde(default = "SimulatorConfig::default_queue_depth")]
    pub queue_depth: usize,
}

impl SimulatorConfig {
    /// Returns the default queue depth.
    const fn default_queue_depth() -> usize {
        defaults::QUEUE_DEPTH
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            queue_depth: defaults::QUEUE_DEPTH,
        }
    }
}

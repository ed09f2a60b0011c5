//! Trace-driven CPU cache hierarchy simulator library.
//!
//! This crate models a multi-level cache hierarchy and replays memory-access
//! traces through it:
//! 1. **Cache:** Geometry, sets, lines and LRU/LFU/round-robin replacement policies.
//! 2. **Hierarchy:** Ordered levels backed by main memory, walked nearest first.
//! 3. **Simulation:** Trace parsing, access expansion and a bounded reader/walker pipeline.
//! 4. **Configuration:** JSON hierarchy descriptions and run settings.
//! 5. **Statistics:** Per-level hit/miss counts and main-memory accesses.
//!
//! # Examples
//!
//! ```
//! use cachesim_core::config::{HierarchyConfig, SimulatorConfig};
//! use cachesim_core::Simulator;
//!
//! let config = HierarchyConfig::from_json(
//!     r#"{ "caches": [ { "name": "L1", "size": 128, "line_size": 16, "kind": "direct" } ] }"#,
//! )
//! .unwrap();
//! let mut sim = Simulator::from_config(&config, SimulatorConfig::default()).unwrap();
//!
//! let trace = "400000 1000 R 4\n400004 1000 R 4\n";
//! let stats = sim.run(trace.as_bytes()).unwrap();
//! assert_eq!(stats.caches[0].hits, 1);
//! assert_eq!(stats.caches[0].misses, 1);
//! assert_eq!(stats.main_memory_accesses, 1);
//! ```

/// Cache levels, sets, geometry and replacement policies.
pub mod cache;
/// Common types (addresses, access records, errors).
pub mod common;
/// Hierarchy and run configuration.
pub mod config;
/// Ordered cache levels backed by main memory.
pub mod hierarchy;
/// Trace parsing and simulation drivers.
pub mod sim;
/// Statistics snapshots.
pub mod stats;

/// Hierarchy description; deserialize with `HierarchyConfig::from_json`.
pub use crate::config::HierarchyConfig;
/// Error type returned by every fallible operation.
pub use crate::common::error::SimError;
/// The cache hierarchy model.
pub use crate::hierarchy::CacheHierarchy;
/// Trace-driven driver; construct with `Simulator::from_config`.
pub use crate::sim::Simulator;
/// Final counters of a run.
pub use crate::stats::HierarchyStats;

//! Trace-driven simulation.
//!
//! Provides the trace parser and the simulator that feeds parsed records
//! through a [`CacheHierarchy`](crate::hierarchy::CacheHierarchy), either on
//! the calling thread or across a two-stage reader/walker pipeline.

/// Sequential and pipelined simulation drivers.
pub mod simulator;

/// Trace record parsing.
pub mod trace;

pub use simulator::Simulator;
pub use trace::{MAX_ACCESS_SIZE, TraceReader, parse_record};

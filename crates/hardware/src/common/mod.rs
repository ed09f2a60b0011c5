//! Common types shared across the simulator.
//!
//! This module provides the fundamental building blocks used by every other
//! component. It includes:
//! 1. **Address Types:** A strong address type and tag/index/offset decoding.
//! 2. **Memory Access:** The record type produced by the trace parser.
//! 3. **Error Handling:** Configuration, geometry, trace and simulation errors.

/// Address type and decoder.
pub mod addr;

/// Memory access record definitions.
pub mod data;

/// Error types.
pub mod error;

pub use addr::{ADDRESS_BITS, Addr, DecodedAddr};
pub use data::{AccessKind, MemoryAccess};
pub use error::{ConfigError, GeometryError, SimError, TraceFormatError};

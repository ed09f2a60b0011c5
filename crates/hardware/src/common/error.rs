//! Error definitions.
//!
//! Every failure in the simulator is fatal for the run. This module provides:
//! 1. **Configuration errors:** Malformed or empty hierarchy descriptions.
//! 2. **Geometry errors:** Cache shapes that cannot be sliced into 64 address bits.
//! 3. **Trace errors:** Records that cannot be parsed, tagged with their line number.
//! 4. **Simulation errors:** The top-level [`SimError`] that wraps all of the above
//!    together with I/O failures and pipeline defects.

use thiserror::Error;

/// Problems with the hierarchy description, detected before any simulation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be deserialized.
    #[error("invalid cache configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The document deserialized but lists no caches.
    #[error("cache configuration must list at least one cache")]
    EmptyHierarchy,
}

/// A cache shape whose derived bit widths would be meaningless.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// A size parameter was zero.
    #[error("cache `{cache}`: {field} must be non-zero")]
    Zero {
        /// Name of the offending cache.
        cache: String,
        /// Which parameter was zero.
        field: &'static str,
    },

    /// A size parameter, or a count derived from one, is not a power of two.
    #[error("cache `{cache}`: {field} = {value} is not a power of two")]
    NotPowerOfTwo {
        /// Name of the offending cache.
        cache: String,
        /// Which parameter failed.
        field: &'static str,
        /// The rejected value.
        value: u64,
    },

    /// The line is larger than the whole cache.
    #[error("cache `{cache}`: line size {line_size} exceeds cache size {size}")]
    LineExceedsCache {
        /// Name of the offending cache.
        cache: String,
        /// Configured cache size in bytes.
        size: u64,
        /// Configured line size in bytes.
        line_size: u64,
    },

    /// A k-way cache holds fewer lines than its associativity degree.
    #[error("cache `{cache}`: {lines} line(s) cannot form a {ways}-way set")]
    TooFewLines {
        /// Name of the offending cache.
        cache: String,
        /// Total number of lines in the cache.
        lines: u64,
        /// Required lines per set.
        ways: u64,
    },

    /// Tag, index and offset widths do not cover exactly 64 bits.
    #[error("tag ({tag}) + index ({index}) + offset ({offset}) bits != 64")]
    BitWidth {
        /// Tag width in bits.
        tag: u32,
        /// Index width in bits.
        index: u32,
        /// Offset width in bits.
        offset: u32,
    },
}

/// A trace record that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceFormatError {
    /// The record has fewer than four whitespace-separated fields.
    #[error("line {line}: missing {field} field")]
    MissingField {
        /// 1-based line number in the trace.
        line: u64,
        /// Name of the first absent field.
        field: &'static str,
    },

    /// A hexadecimal field did not parse as a 64-bit value.
    #[error("line {line}: invalid hexadecimal {field} `{value}`")]
    BadHex {
        /// 1-based line number in the trace.
        line: u64,
        /// Which field failed (`pc` or `address`).
        field: &'static str,
        /// The raw token.
        value: String,
    },

    /// The size field did not parse as a decimal integer.
    #[error("line {line}: invalid access size `{value}`")]
    BadSize {
        /// 1-based line number in the trace.
        line: u64,
        /// The raw token.
        value: String,
    },
}

/// Top-level simulator error.
#[derive(Debug, Error)]
pub enum SimError {
    /// See [`ConfigError`].
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// See [`GeometryError`].
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// See [`TraceFormatError`].
    #[error(transparent)]
    Trace(#[from] TraceFormatError),

    /// Reading the configuration or trace failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A full set's replacement policy had nothing to evict.
    ///
    /// This means the policy and the set disagree about which slots are
    /// occupied; it is a simulator defect, not an input problem.
    #[error("cache `{cache}` set {set}: replacement policy yielded no victim for a full set")]
    NoVictim {
        /// Name of the cache.
        cache: String,
        /// Index of the set.
        set: usize,
    },

    /// A pipeline stage panicked before finishing.
    #[error("{0} thread panicked")]
    WorkerPanicked(&'static str),
}

//! Memory Access Types.
//!
//! This module defines the records the trace parser produces. Only the address
//! and size drive the cache model; the program counter and access kind are kept
//! for diagnostics.

use std::fmt;

use super::addr::Addr;

/// Type of memory access operation, as recorded in the trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessKind {
    /// Data read (`R`).
    Read,

    /// Data write (`W`).
    ///
    /// Writes are treated exactly like reads: there is no dirty state.
    Write,

    /// Any other single-character kind; carried through untouched.
    Other(char),
}

impl From<char> for AccessKind {
    fn from(c: char) -> Self {
        match c {
            'R' | 'r' => Self::Read,
            'W' | 'w' => Self::Write,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "R"),
            Self::Write => write!(f, "W"),
            Self::Other(c) => write!(f, "{c}"),
        }
    }
}

/// One parsed trace record: `<pc> <address> <kind> <size>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryAccess {
    /// Program counter of the instruction that issued the access.
    pub pc: u64,
    /// First byte touched.
    pub addr: Addr,
    /// Read, write or other.
    pub kind: AccessKind,
    /// Number of bytes touched, starting at `addr`.
    pub size: u64,
}

//! Trace parsing.
//!
//! A trace is a text file with one access per line:
//!
//! ```text
//! <pc-hex> <address-hex> <kind-char> <size-decimal>
//! ```
//!
//! Fields are separated by any whitespace and hexadecimal fields may carry a
//! `0x` prefix. Sizes are decimal and at most [`MAX_ACCESS_SIZE`]. Blank lines
//! are skipped; anything else that does not parse is a [`TraceFormatError`]
//! carrying the 1-based line number.

use std::io::BufRead;

use crate::common::addr::Addr;
use crate::common::data::{AccessKind, MemoryAccess};
use crate::common::error::{SimError, TraceFormatError};

/// Largest access size a trace may record, in bytes.
///
/// Sizes are signed 64-bit values in the trace format; anything above this
/// is rejected rather than expanded.
pub const MAX_ACCESS_SIZE: u64 = u64::MAX >> 1;

/// Parses a hexadecimal token with an optional `0x`/`0X` prefix.
///
/// Only hex digits may follow the prefix; a sign is not part of the format.
fn parse_hex(token: &str, line: u64, field: &'static str) -> Result<u64, TraceFormatError> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    let bad = || TraceFormatError::BadHex {
        line,
        field,
        value: token.to_owned(),
    };
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(bad());
    }
    u64::from_str_radix(digits, 16).map_err(|_| bad())
}

/// Parses a decimal access size no larger than [`MAX_ACCESS_SIZE`].
fn parse_size(token: &str, line: u64) -> Result<u64, TraceFormatError> {
    token
        .parse::<u64>()
        .ok()
        .filter(|&size| size <= MAX_ACCESS_SIZE)
        .ok_or_else(|| TraceFormatError::BadSize {
            line,
            value: token.to_owned(),
        })
}

/// Parses one trace line.
///
/// # Arguments
///
/// * `text` - The line, without its terminator.
/// * `line` - 1-based line number for error reporting.
///
/// # Returns
///
/// `Ok(None)` for a blank line, otherwise the parsed record.
///
/// # Examples
///
/// ```
/// use cachesim_core::common::{AccessKind, Addr};
/// use cachesim_core::sim::trace::parse_record;
///
/// let access = parse_record("4005d6 7ffd3c0b4e28 W 8", 1).unwrap().unwrap();
/// assert_eq!(access.addr, Addr(0x7ffd_3c0b_4e28));
/// assert_eq!(access.kind, AccessKind::Write);
/// assert_eq!(access.size, 8);
/// ```
pub fn parse_record(text: &str, line: u64) -> Result<Option<MemoryAccess>, TraceFormatError> {
    let mut fields = text.split_whitespace();
    let Some(pc) = fields.next() else {
        return Ok(None);
    };
    let mut next = |field: &'static str| {
        fields
            .next()
            .ok_or(TraceFormatError::MissingField { line, field })
    };
    let addr = next("address")?;
    let kind = next("kind")?;
    let size = next("size")?;

    Ok(Some(MemoryAccess {
        pc: parse_hex(pc, line, "pc")?,
        addr: Addr(parse_hex(addr, line, "address")?),
        kind: kind.chars().next().map_or(AccessKind::Other('?'), AccessKind::from),
        size: parse_size(size, line)?,
    }))
}

/// Iterator over the records of a trace.
///
/// Reuses one line buffer for the whole trace. Yields an error for the first
/// malformed line or I/O failure; callers are expected to stop there.
#[derive(Debug)]
pub struct TraceReader<R> {
    reader: R,
    buf: String,
    line: u64,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            line: 0,
        }
    }

    /// Number of lines consumed so far, including blank ones.
    pub const fn lines_read(&self) -> u64 {
        self.line
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<MemoryAccess, SimError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line += 1;
            match parse_record(&self.buf, self.line) {
                Ok(Some(access)) => return Some(Ok(access)),
                Ok(None) => {}
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

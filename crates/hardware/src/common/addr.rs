//! Address types and tag/index/offset decoding.
//!
//! This module slices 64-bit addresses into the three fields a cache uses to
//! locate a line. It provides the following:
//! 1. **Type Safety:** [`Addr`] wraps raw trace addresses so they are not confused with tags or indices.
//! 2. **Decoding:** [`decode`] splits an address most-significant-first as `tag | index | offset`.
//! 3. **Diagnostics:** [`Addr::to_binary`] renders the zero-padded 64-character binary form.

use std::fmt;

use super::error::GeometryError;

/// Width of every simulated address in bits.
pub const ADDRESS_BITS: u32 = 64;

/// A byte address in the simulated 64-bit address space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Addr(pub u64);

impl Addr {
    /// Creates a new address from a raw 64-bit value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(self) -> u64 {
        self.0
    }

    /// Renders the address as a 64-character, zero-padded binary string.
    ///
    /// Bit 63 is the first character, so slicing this string at
    /// `tag_bits` and `tag_bits + index_bits` yields the same fields as
    /// [`decode`].
    pub fn to_binary(self) -> String {
        format!("{:064b}", self.0)
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// The three fields of a decoded address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedAddr {
    /// Set index the line maps to (always 0 for fully associative caches).
    pub index: usize,
    /// Line identity within its set.
    pub tag: u64,
    /// Byte offset within the line.
    pub offset: u64,
}

/// Returns the low `bits` bits of `value`.
#[inline(always)]
pub(crate) const fn low_bits(value: u64, bits: u32) -> u64 {
    if bits >= ADDRESS_BITS {
        value
    } else {
        value & ((1u64 << bits) - 1)
    }
}

/// Shifts right without overflowing when the whole word is shifted out.
#[inline(always)]
const fn shr(value: u64, bits: u32) -> u64 {
    if bits >= ADDRESS_BITS { 0 } else { value >> bits }
}

/// Splits `addr` into `(index, tag, offset)` for the given field widths.
///
/// # Arguments
///
/// * `addr` - The address to decode.
/// * `tag_bits` - Width of the tag field.
/// * `index_bits` - Width of the index field (0 for fully associative caches).
/// * `offset_bits` - Width of the byte-offset field.
///
/// # Returns
///
/// The decoded fields, or [`GeometryError::BitWidth`] if the widths do not
/// cover exactly 64 bits.
pub fn decode(
    addr: Addr,
    tag_bits: u32,
    index_bits: u32,
    offset_bits: u32,
) -> Result<DecodedAddr, GeometryError> {
    if tag_bits + index_bits + offset_bits != ADDRESS_BITS {
        return Err(GeometryError::BitWidth {
            tag: tag_bits,
            index: index_bits,
            offset: offset_bits,
        });
    }
    Ok(decode_unchecked(addr, index_bits, offset_bits))
}

/// Decodes with widths already validated by the geometry builder.
#[inline(always)]
pub(crate) const fn decode_unchecked(addr: Addr, index_bits: u32, offset_bits: u32) -> DecodedAddr {
    let raw = addr.0;
    DecodedAddr {
        index: low_bits(shr(raw, offset_bits), index_bits) as usize,
        tag: shr(raw, offset_bits + index_bits),
        offset: low_bits(raw, offset_bits),
    }
}

//! Cache geometry.
//!
//! Derives the shape of a cache (set count, lines per set) and the widths of
//! the tag, index and offset fields from its size, line size and associativity.
//! Every width is checked at build time, so decoding on the hot path never
//! has to revalidate.

use crate::common::addr::{self, ADDRESS_BITS, Addr, DecodedAddr};
use crate::common::error::GeometryError;
use crate::config::CacheKind;

/// Derived shape of one cache.
///
/// Invariants, established by [`CacheGeometry::new`]:
/// `size == line_size * lines_per_set * set_count` and
/// `tag_bits + index_bits + offset_bits == 64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheGeometry {
    /// Capacity in bytes.
    pub size: u64,
    /// Line size in bytes.
    pub line_size: u64,
    /// Associativity.
    pub kind: CacheKind,
    /// Number of sets.
    pub set_count: usize,
    /// Lines in each set.
    pub lines_per_set: usize,
    /// Width of the byte-offset field.
    pub offset_bits: u32,
    /// Width of the set-index field (0 for fully associative caches).
    pub index_bits: u32,
    /// Width of the tag field.
    pub tag_bits: u32,
}

/// Fails unless `value` is a non-zero power of two.
fn require_pow2(cache: &str, field: &'static str, value: u64) -> Result<(), GeometryError> {
    if value == 0 {
        return Err(GeometryError::Zero {
            cache: cache.to_owned(),
            field,
        });
    }
    if !value.is_power_of_two() {
        return Err(GeometryError::NotPowerOfTwo {
            cache: cache.to_owned(),
            field,
            value,
        });
    }
    Ok(())
}

impl CacheGeometry {
    /// Builds and validates the geometry of a cache.
    ///
    /// # Arguments
    ///
    /// * `name` - Cache name, used only in error messages.
    /// * `size` - Capacity in bytes.
    /// * `line_size` - Line size in bytes.
    /// * `kind` - Associativity.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if any size or derived count is zero or not
    /// a power of two, if the line is larger than the cache, or if a k-way
    /// cache has fewer than k lines.
    pub fn new(
        name: &str,
        size: u64,
        line_size: u64,
        kind: CacheKind,
    ) -> Result<Self, GeometryError> {
        require_pow2(name, "size", size)?;
        require_pow2(name, "line size", line_size)?;
        if line_size > size {
            return Err(GeometryError::LineExceedsCache {
                cache: name.to_owned(),
                size,
                line_size,
            });
        }

        let lines = size / line_size;
        let (set_count, lines_per_set) = match kind {
            CacheKind::Direct => (lines, 1),
            CacheKind::Full => (1, lines),
            CacheKind::TwoWay | CacheKind::FourWay | CacheKind::EightWay => {
                let ways = kind.ways().unwrap_or(1);
                if lines < ways {
                    return Err(GeometryError::TooFewLines {
                        cache: name.to_owned(),
                        lines,
                        ways,
                    });
                }
                (lines / ways, ways)
            }
        };
        require_pow2(name, "set count", set_count)?;

        let offset_bits = line_size.trailing_zeros();
        let index_bits = match kind {
            CacheKind::Full => 0,
            _ => set_count.trailing_zeros(),
        };
        let tag_bits = ADDRESS_BITS - offset_bits - index_bits;
        if tag_bits + index_bits + offset_bits != ADDRESS_BITS {
            return Err(GeometryError::BitWidth {
                tag: tag_bits,
                index: index_bits,
                offset: offset_bits,
            });
        }

        Ok(Self {
            size,
            line_size,
            kind,
            set_count: set_count as usize,
            lines_per_set: lines_per_set as usize,
            offset_bits,
            index_bits,
            tag_bits,
        })
    }

    /// Splits `addr` into index, tag and offset for this cache.
    #[inline(always)]
    pub const fn decode(&self, addr: Addr) -> DecodedAddr {
        addr::decode_unchecked(addr, self.index_bits, self.offset_bits)
    }

    /// Byte offset of `addr` within its line.
    #[inline(always)]
    pub const fn offset_of(&self, addr: Addr) -> u64 {
        addr::low_bits(addr.0, self.offset_bits)
    }

    /// Expands an access of `size` bytes at `addr` into the addresses that
    /// must each be looked up.
    ///
    /// The first entry is always `addr` itself. If the access runs past the
    /// end of its line, `ceil((size - (line_size - offset)) / line_size)`
    /// further addresses follow at `addr + i * line_size`, wrapping at the top
    /// of the address space. The addresses are produced lazily, so the size
    /// of an access never determines an allocation.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachesim_core::cache::geometry::CacheGeometry;
    /// use cachesim_core::common::Addr;
    /// use cachesim_core::config::CacheKind;
    ///
    /// let g = CacheGeometry::new("L1", 64, 16, CacheKind::Direct).unwrap();
    /// let addrs: Vec<_> = g.expand(Addr(0x108), 20).collect();
    /// assert_eq!(addrs, vec![Addr(0x108), Addr(0x118)]);
    /// ```
    pub const fn expand(&self, addr: Addr, size: u64) -> LineAddrs {
        let initial_bytes = self.line_size - self.offset_of(addr);
        LineAddrs {
            base: addr.0,
            line_size: self.line_size,
            next: 0,
            last: size.saturating_sub(initial_bytes).div_ceil(self.line_size),
        }
    }

    /// Total number of lines in the cache.
    pub const fn lines(&self) -> usize {
        self.set_count * self.lines_per_set
    }
}

/// Addresses touched by one access, as produced by [`CacheGeometry::expand`].
#[derive(Debug, Clone)]
pub struct LineAddrs {
    base: u64,
    line_size: u64,
    /// Step of the next address to yield.
    next: u64,
    /// Step of the final address, inclusive.
    last: u64,
}

impl Iterator for LineAddrs {
    type Item = Addr;

    fn next(&mut self) -> Option<Addr> {
        if self.next > self.last {
            return None;
        }
        let addr = Addr(
            self.base
                .wrapping_add(self.next.wrapping_mul(self.line_size)),
        );
        self.next += 1;
        Some(addr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.last + 1).saturating_sub(self.next);
        let left = usize::try_from(left).unwrap_or(usize::MAX);
        (left, Some(left))
    }
}

impl ExactSizeIterator for LineAddrs {}

//! # Geometry Tests
//!
//! Verifies set counts, ways and bit widths for every associativity kind,
//! fail-fast validation of impossible shapes, and oversized-access expansion.

use cachesim_core::cache::geometry::CacheGeometry;
use cachesim_core::common::{Addr, GeometryError};
use cachesim_core::config::CacheKind;
use proptest::prelude::*;
use rstest::rstest;

const KINDS: [CacheKind; 5] = [
    CacheKind::Direct,
    CacheKind::Full,
    CacheKind::TwoWay,
    CacheKind::FourWay,
    CacheKind::EightWay,
];

// ══════════════════════════════════════════════════════════
// 1. Derived shape
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(1024, 64, CacheKind::Direct, 16, 1, (54, 4, 6))]
#[case(1024, 64, CacheKind::Full, 1, 16, (58, 0, 6))]
#[case(1024, 64, CacheKind::TwoWay, 8, 2, (55, 3, 6))]
#[case(1024, 64, CacheKind::FourWay, 4, 4, (56, 2, 6))]
#[case(1024, 64, CacheKind::EightWay, 2, 8, (57, 1, 6))]
#[case(32768, 32, CacheKind::EightWay, 128, 8, (52, 7, 5))]
#[case(8, 1, CacheKind::Full, 1, 8, (64, 0, 0))]
fn builds_expected_shape(
    #[case] size: u64,
    #[case] line_size: u64,
    #[case] kind: CacheKind,
    #[case] sets: usize,
    #[case] ways: usize,
    #[case] widths: (u32, u32, u32),
) {
    let g = CacheGeometry::new("c", size, line_size, kind).unwrap();
    assert_eq!(g.set_count, sets);
    assert_eq!(g.lines_per_set, ways);
    assert_eq!((g.tag_bits, g.index_bits, g.offset_bits), widths);
    assert_eq!(g.lines(), (size / line_size) as usize);
}

// ══════════════════════════════════════════════════════════
// 2. Fail-fast validation
// ══════════════════════════════════════════════════════════

#[test]
fn non_power_of_two_size_is_rejected() {
    assert_eq!(
        CacheGeometry::new("L1", 1000, 64, CacheKind::Direct).unwrap_err(),
        GeometryError::NotPowerOfTwo {
            cache: "L1".into(),
            field: "size",
            value: 1000
        }
    );
}

#[test]
fn non_power_of_two_line_is_rejected() {
    assert!(matches!(
        CacheGeometry::new("L1", 1024, 48, CacheKind::Full),
        Err(GeometryError::NotPowerOfTwo {
            field: "line size",
            value: 48,
            ..
        })
    ));
}

#[test]
fn zero_sizes_are_rejected() {
    assert!(matches!(
        CacheGeometry::new("L1", 0, 64, CacheKind::Direct),
        Err(GeometryError::Zero { field: "size", .. })
    ));
    assert!(matches!(
        CacheGeometry::new("L1", 1024, 0, CacheKind::Direct),
        Err(GeometryError::Zero {
            field: "line size",
            ..
        })
    ));
}

#[test]
fn line_larger_than_cache_is_rejected() {
    assert!(matches!(
        CacheGeometry::new("L1", 64, 128, CacheKind::Direct),
        Err(GeometryError::LineExceedsCache {
            size: 64,
            line_size: 128,
            ..
        })
    ));
}

#[test]
fn too_few_lines_for_associativity() {
    assert_eq!(
        CacheGeometry::new("L1", 128, 64, CacheKind::FourWay).unwrap_err(),
        GeometryError::TooFewLines {
            cache: "L1".into(),
            lines: 2,
            ways: 4
        }
    );
}

proptest! {
    #[test]
    fn widths_always_cover_64_bits(
        line_exp in 0u32..12,
        extra in 3u32..24,
        kind_idx in 0usize..5,
    ) {
        let line_size = 1u64 << line_exp;
        let size = line_size << extra;
        let g = CacheGeometry::new("p", size, line_size, KINDS[kind_idx]).unwrap();
        prop_assert_eq!(g.tag_bits + g.index_bits + g.offset_bits, 64);
        prop_assert_eq!(
            g.line_size * g.lines_per_set as u64 * g.set_count as u64,
            g.size
        );
        prop_assert!(g.set_count.is_power_of_two());
    }
}

// ══════════════════════════════════════════════════════════
// 3. Oversized-access expansion
// ══════════════════════════════════════════════════════════

fn line16() -> CacheGeometry {
    CacheGeometry::new("L1", 256, 16, CacheKind::Direct).unwrap()
}

/// size=20 at offset 8 of a 16-byte line: 8 initial bytes, then
/// ceil(12/16) = 1 more line.
#[test]
fn expansion_crossing_one_boundary() {
    let g = line16();
    assert_eq!(g.offset_of(Addr(0x108)), 8);
    let addrs: Vec<_> = g.expand(Addr(0x108), 20).collect();
    assert_eq!(addrs, vec![Addr(0x108), Addr(0x118)]);
}

#[rstest]
#[case(0x100, 16, 1)] // exactly one aligned line
#[case(0x108, 8, 1)] // ends on the boundary
#[case(0x108, 9, 2)] // one byte over
#[case(0x100, 17, 2)]
#[case(0x10F, 34, 4)] // 1 + ceil(33 / 16) = 1 + 3
#[case(0x100, 0, 1)] // zero-size access still touches its line
#[case(0x100, 64, 4)]
fn expansion_counts(#[case] addr: u64, #[case] size: u64, #[case] expected: usize) {
    assert_eq!(line16().expand(Addr(addr), size).len(), expected);
}

#[test]
fn expanded_addresses_step_by_line_size_from_base() {
    let addrs: Vec<_> = line16().expand(Addr(0x10F), 34).collect();
    assert_eq!(
        addrs,
        vec![Addr(0x10F), Addr(0x11F), Addr(0x12F), Addr(0x13F)]
    );
}

#[test]
fn expansion_wraps_at_top_of_address_space() {
    let addrs: Vec<_> = line16().expand(Addr(0xFFFF_FFFF_FFFF_FFF8), 16).collect();
    assert_eq!(addrs, vec![Addr(0xFFFF_FFFF_FFFF_FFF8), Addr(0x8)]);
}

/// The largest representable size is counted, not materialised.
#[test]
fn expansion_of_huge_access_is_lazy() {
    let mut lines = line16().expand(Addr(0), u64::MAX);
    assert_eq!(lines.len(), 1 << 60);

    let head: Vec<_> = lines.by_ref().take(3).collect();
    assert_eq!(head, vec![Addr(0x00), Addr(0x10), Addr(0x20)]);
    assert_eq!(lines.len(), (1 << 60) - 3);
}

#[test]
fn expansion_length_shrinks_as_consumed() {
    let mut lines = line16().expand(Addr(0x10F), 34);
    assert_eq!(lines.len(), 4);
    let _ = lines.next();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines.by_ref().count(), 3);
    assert_eq!(lines.next(), None);
}

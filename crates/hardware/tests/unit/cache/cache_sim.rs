//! Single-Level Cache Simulation Tests.
//!
//! Drives one `Cache` directly with line addresses and checks hit/miss
//! accounting, residency after fills, and policy-driven eviction for each
//! associativity.

use cachesim_core::cache::Cache;
use cachesim_core::common::Addr;
use cachesim_core::config::{CacheKind, ReplacementPolicy};

use crate::common::builder;
use crate::common::init_tracing;

fn build(size: u64, line: u64, kind: CacheKind, policy: Option<ReplacementPolicy>) -> Cache {
    init_tracing();
    Cache::new(&builder::cache("L1", size, line, kind, policy)).unwrap()
}

fn run(cache: &mut Cache, addrs: &[u64]) -> Vec<bool> {
    addrs
        .iter()
        .map(|&a| cache.access(Addr(a)).unwrap())
        .collect()
}

// ══════════════════════════════════════════════════════════
// 1. Direct-mapped
// ══════════════════════════════════════════════════════════

#[test]
fn direct_reaccess_hits() {
    let mut cache = build(128, 16, CacheKind::Direct, None);
    assert_eq!(run(&mut cache, &[0x100, 0x100]), vec![false, true]);
    assert_eq!((cache.hits(), cache.misses()), (1, 1));
}

/// A different offset within the same line is the same line.
#[test]
fn direct_same_line_other_offset_hits() {
    let mut cache = build(128, 16, CacheKind::Direct, None);
    assert_eq!(run(&mut cache, &[0x100, 0x10F]), vec![false, true]);
}

/// 0x100 and 0x180 share index 0 in an 8-set cache and evict each other.
#[test]
fn direct_aliasing_lines_conflict() {
    let mut cache = build(128, 16, CacheKind::Direct, None);
    assert_eq!(
        run(&mut cache, &[0x100, 0x180, 0x100]),
        vec![false, false, false]
    );
    assert!(cache.contains(Addr(0x100)));
    assert!(!cache.contains(Addr(0x180)));
}

/// A configured policy is ignored for direct-mapped caches.
#[test]
fn direct_ignores_configured_policy() {
    let mut cache = build(64, 16, CacheKind::Direct, Some(ReplacementPolicy::Lfu));
    assert_eq!(run(&mut cache, &[0x00, 0x40, 0x00]), vec![false, false, false]);
}

// ══════════════════════════════════════════════════════════
// 2. Set-associative
// ══════════════════════════════════════════════════════════

/// Two ways, round robin: the third conflicting line evicts slot 0, the
/// fourth evicts slot 1.
#[test]
fn two_way_round_robin_rotates_victims() {
    let mut cache = build(64, 16, CacheKind::TwoWay, Some(ReplacementPolicy::Rr));
    assert_eq!(cache.sets().len(), 2);

    let _ = run(&mut cache, &[0x00, 0x20, 0x40]);
    assert!(!cache.contains(Addr(0x00)));
    assert!(cache.contains(Addr(0x20)));

    let _ = run(&mut cache, &[0x00]);
    assert!(!cache.contains(Addr(0x20)));
    assert!(cache.contains(Addr(0x40)));
    assert!(cache.contains(Addr(0x00)));
    assert_eq!((cache.hits(), cache.misses()), (0, 4));
}

/// Lines in different sets never evict each other.
#[test]
fn two_way_sets_are_independent() {
    let mut cache = build(64, 16, CacheKind::TwoWay, None);
    let _ = run(&mut cache, &[0x00, 0x20, 0x10, 0x30, 0x50]);
    assert!(cache.contains(Addr(0x00)));
    assert!(cache.contains(Addr(0x20)));
}

// ══════════════════════════════════════════════════════════
// 3. Fully associative, per policy
// ══════════════════════════════════════════════════════════

const A: u64 = 0x00;
const B: u64 = 0x10;
const C: u64 = 0x20;
const D: u64 = 0x30;
const E: u64 = 0x40;
const F: u64 = 0x50;

#[test]
fn full_lru_evicts_least_recent() {
    let mut cache = build(64, 16, CacheKind::Full, Some(ReplacementPolicy::Lru));
    let hits = run(&mut cache, &[A, B, C, D, A, E]);
    assert_eq!(hits, vec![false, false, false, false, true, false]);
    assert!(cache.contains(Addr(A)));
    assert!(!cache.contains(Addr(B)));
}

#[test]
fn full_round_robin_ignores_recency() {
    let mut cache = build(64, 16, CacheKind::Full, Some(ReplacementPolicy::Rr));
    let _ = run(&mut cache, &[A, B, C, D, A, E]);
    assert!(!cache.contains(Addr(A)));
    assert!(cache.contains(Addr(B)));
}

#[test]
fn full_lfu_evicts_least_frequent() {
    let mut cache = build(64, 16, CacheKind::Full, Some(ReplacementPolicy::Lfu));
    let _ = run(&mut cache, &[A, B, C, D, A, A, C, E]);
    assert!(!cache.contains(Addr(B)));
    assert!(cache.contains(Addr(E)));

    // E now has the lowest count and the lowest index among the count-1 lines.
    let _ = run(&mut cache, &[F]);
    assert!(!cache.contains(Addr(E)));
    assert!(cache.contains(Addr(D)));
    assert_eq!(cache.hits(), 3);
}

/// A fully associative cache holds every line until it is full.
#[test]
fn full_no_eviction_before_capacity() {
    let mut cache = build(64, 16, CacheKind::Full, Some(ReplacementPolicy::Lru));
    let _ = run(&mut cache, &[A, B, C, D]);
    assert_eq!(run(&mut cache, &[A, B, C, D]), vec![true; 4]);
}

// ══════════════════════════════════════════════════════════
// 4. Lookup and counters
// ══════════════════════════════════════════════════════════

/// `check_hit_or_miss` neither counts nor fills.
#[test]
fn lookup_has_no_side_effects() {
    let mut cache = build(128, 16, CacheKind::Direct, None);
    let d = cache.geometry().decode(Addr(0x100));
    assert!(cache.check_hit_or_miss(d.tag, d.index).is_none());
    assert!(cache.check_hit_or_miss(d.tag, d.index).is_none());
    assert_eq!((cache.hits(), cache.misses()), (0, 0));

    let _ = cache.access(Addr(0x100)).unwrap();
    let line = cache.check_hit_or_miss(d.tag, d.index).unwrap();
    assert!(line.valid);
    assert_eq!(line.tag, d.tag);
    assert_eq!((cache.hits(), cache.misses()), (0, 1));
}

#[test]
fn lookup_out_of_range_index_misses() {
    let cache = build(128, 16, CacheKind::Direct, None);
    assert!(cache.check_hit_or_miss(0, 1000).is_none());
}

#[test]
fn stats_snapshot_matches_counters() {
    let mut cache = build(128, 16, CacheKind::FourWay, Some(ReplacementPolicy::Lru));
    let _ = run(&mut cache, &[0x00, 0x04, 0x80, 0x00]);
    let stats = cache.stats();
    assert_eq!(stats.name, "L1");
    assert_eq!((stats.hits, stats.misses), (2, 2));
    assert_eq!(stats.accesses(), 4);
}

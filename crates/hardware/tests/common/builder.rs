//! Builders for test fixtures.

use std::fmt::Write as _;
use std::io::Write as _;

use cachesim_core::CacheHierarchy;
use cachesim_core::config::{CacheConfig, CacheKind, HierarchyConfig, ReplacementPolicy};
use tempfile::NamedTempFile;

/// Describes one cache level.
pub fn cache(
    name: &str,
    size: u64,
    line_size: u64,
    kind: CacheKind,
    policy: Option<ReplacementPolicy>,
) -> CacheConfig {
    CacheConfig {
        name: name.to_owned(),
        size,
        line_size,
        kind,
        replacement_policy: policy,
    }
}

/// Wraps levels into a hierarchy description.
pub fn config(caches: Vec<CacheConfig>) -> HierarchyConfig {
    HierarchyConfig { caches }
}

/// Builds a hierarchy, panicking on invalid geometry.
pub fn hierarchy(caches: Vec<CacheConfig>) -> CacheHierarchy {
    CacheHierarchy::new(&config(caches)).expect("valid test hierarchy")
}

/// Renders `(address, size)` pairs as trace text, alternating reads and writes.
pub fn trace_text(accesses: &[(u64, u64)]) -> String {
    let mut text = String::new();
    for (i, &(addr, size)) in accesses.iter().enumerate() {
        let kind = if i % 2 == 0 { 'R' } else { 'W' };
        let _ = writeln!(text, "{:x} {addr:x} {kind} {size}", 0x40_0000 + 4 * i);
    }
    text
}

/// Writes trace text to a temporary file.
pub fn trace_file(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp trace");
    file.write_all(text.as_bytes()).expect("write temp trace");
    file.flush().expect("flush temp trace");
    file
}

/// Deterministic pseudo-random `(address, size)` pairs.
///
/// Addresses stay inside a 64 KiB window so that every level sees reuse.
pub fn synthetic_accesses(count: usize, seed: u64) -> Vec<(u64, u64)> {
    let mut state = seed;
    (0..count)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let addr = (state >> 16) & 0xFFFF;
            let size = ((state >> 40) % 80) + 1;
            (addr, size)
        })
        .collect()
}

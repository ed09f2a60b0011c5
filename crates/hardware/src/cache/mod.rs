//! Set-Associative Cache Model.
//!
//! This module implements one level of the simulated hierarchy. It provides:
//! 1. **Geometry:** Set count, ways and address field widths derived from the configuration.
//! 2. **Sets and lines:** Fixed-capacity slot arrays, each owning one replacement policy.
//! 3. **Lookup and fill:** Hit/miss resolution and policy-driven insertion.
//! 4. **Counters:** Per-level hit and miss totals, mutated only by [`Cache::access`].

/// Geometry builder and address expansion.
pub mod geometry;

/// Cache replacement policy implementations (LRU, LFU, round robin).
pub mod policies;

use tracing::{debug, trace};

use self::geometry::CacheGeometry;
use self::policies::{ReplacementPolicy, build_policy};
use crate::common::addr::Addr;
use crate::common::error::{GeometryError, SimError};
use crate::config::{CacheConfig, CacheKind};
use crate::stats::CacheStats;

/// One slot in a cache set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheLine {
    /// Whether the slot holds a line.
    pub valid: bool,
    /// Tag of the resident line; meaningless when `valid` is false.
    pub tag: u64,
    /// Position of this slot within its set.
    pub way: usize,
}

/// Where a fill landed and what it displaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fill {
    /// Slot the new line occupies.
    pub way: usize,
    /// Tag of the line that was overwritten, if the slot was occupied.
    pub evicted: Option<u64>,
}

/// A fixed-capacity group of lines sharing one index.
#[derive(Debug)]
pub struct CacheSet {
    lines: Vec<CacheLine>,
    policy: Box<dyn ReplacementPolicy>,
}

impl CacheSet {
    /// Creates an empty set.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Lines in the set.
    /// * `policy` - The replacement policy this set exclusively owns.
    pub fn new(capacity: usize, policy: Box<dyn ReplacementPolicy>) -> Self {
        let lines = (0..capacity)
            .map(|way| CacheLine {
                way,
                ..CacheLine::default()
            })
            .collect();
        Self { lines, policy }
    }

    /// Number of slots in the set.
    pub fn capacity(&self) -> usize {
        self.lines.len()
    }

    /// The slots, in way order.
    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }

    /// Returns the way holding a valid line tagged `tag`.
    pub fn lookup(&self, tag: u64) -> Option<usize> {
        self.lines.iter().position(|l| l.valid && l.tag == tag)
    }

    /// Reports a hit on `way` to the policy.
    pub fn touch(&mut self, way: usize) {
        let tag = self.lines[way].tag;
        self.policy.update(way, tag);
    }

    /// Installs a line tagged `tag`.
    ///
    /// The lowest free slot is used if there is one; otherwise the policy
    /// picks a victim which is overwritten in place.
    ///
    /// # Returns
    ///
    /// The fill result, or `None` if the set is full and the policy offered
    /// no victim.
    pub fn insert(&mut self, tag: u64) -> Option<Fill> {
        let (way, evicted) = match self.lines.iter().position(|l| !l.valid) {
            Some(way) => (way, None),
            None => {
                let way = self.policy.evict()?;
                (way, Some(self.lines.get(way)?.tag))
            }
        };
        self.lines[way] = CacheLine {
            valid: true,
            tag,
            way,
        };
        self.policy.insert(way, tag);
        Some(Fill { way, evicted })
    }

    /// Overwrites slot 0 unconditionally, bypassing the policy.
    ///
    /// Used for direct-mapped sets, which have exactly one slot.
    pub fn replace_direct(&mut self, tag: u64) -> Fill {
        let old = self.lines[0];
        self.lines[0] = CacheLine {
            valid: true,
            tag,
            way: 0,
        };
        Fill {
            way: 0,
            evicted: old.valid.then_some(old.tag),
        }
    }
}

/// One cache level.
#[derive(Debug)]
pub struct Cache {
    name: String,
    geometry: CacheGeometry,
    sets: Vec<CacheSet>,
    hits: u64,
    misses: u64,
}

impl Cache {
    /// Builds an empty cache from its configuration.
    ///
    /// Each set receives its own policy instance. Direct-mapped caches get a
    /// round-robin policy that is never consulted on fills.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if the size, line size and associativity do
    /// not form a valid geometry.
    pub fn new(config: &CacheConfig) -> Result<Self, GeometryError> {
        let geometry =
            CacheGeometry::new(&config.name, config.size, config.line_size, config.kind)?;
        let policy = config.effective_policy();
        let sets = (0..geometry.set_count)
            .map(|_| {
                CacheSet::new(
                    geometry.lines_per_set,
                    build_policy(policy, geometry.lines_per_set),
                )
            })
            .collect();

        debug!(
            cache = %config.name,
            kind = config.kind.as_str(),
            ?policy,
            sets = geometry.set_count,
            ways = geometry.lines_per_set,
            tag_bits = geometry.tag_bits,
            index_bits = geometry.index_bits,
            offset_bits = geometry.offset_bits,
            "built cache"
        );

        Ok(Self {
            name: config.name.clone(),
            geometry,
            sets,
            hits: 0,
            misses: 0,
        })
    }

    /// Cache name from the configuration.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Derived geometry.
    pub const fn geometry(&self) -> &CacheGeometry {
        &self.geometry
    }

    /// Hits recorded so far.
    pub const fn hits(&self) -> u64 {
        self.hits
    }

    /// Misses recorded so far.
    pub const fn misses(&self) -> u64 {
        self.misses
    }

    /// All sets, in index order.
    pub fn sets(&self) -> &[CacheSet] {
        &self.sets
    }

    /// Looks for a valid line with `tag` in set `index`.
    ///
    /// Has no side effects; a miss must be recorded and filled by the caller.
    pub fn check_hit_or_miss(&self, tag: u64, index: usize) -> Option<&CacheLine> {
        let set = self.sets.get(index)?;
        set.lookup(tag).map(|way| &set.lines[way])
    }

    /// Returns whether `addr` is resident, without touching counters or policy.
    pub fn contains(&self, addr: Addr) -> bool {
        let d = self.geometry.decode(addr);
        self.check_hit_or_miss(d.tag, d.index).is_some()
    }

    /// Performs one level of the hierarchy walk for `addr`.
    ///
    /// On a hit the hit counter is incremented and the policy updated. On a
    /// miss the miss counter is incremented and a fresh line is installed.
    ///
    /// # Returns
    ///
    /// `true` on a hit, `false` on a miss.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NoVictim`] if a full set's policy has nothing to
    /// evict.
    pub fn access(&mut self, addr: Addr) -> Result<bool, SimError> {
        let d = self.geometry.decode(addr);
        let set = &mut self.sets[d.index];

        if let Some(way) = set.lookup(d.tag) {
            self.hits += 1;
            set.touch(way);
            return Ok(true);
        }

        self.misses += 1;
        let fill = match self.geometry.kind {
            CacheKind::Direct => set.replace_direct(d.tag),
            _ => set.insert(d.tag).ok_or_else(|| SimError::NoVictim {
                cache: self.name.clone(),
                set: d.index,
            })?,
        };
        if let Some(old) = fill.evicted {
            trace!(
                cache = %self.name,
                set = d.index,
                way = fill.way,
                evicted = old,
                tag = d.tag,
                "evict"
            );
        }
        Ok(false)
    }

    /// Snapshot of this level's counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            name: self.name.clone(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

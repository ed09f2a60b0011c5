//! Simulator: drives a cache hierarchy from a memory-access trace.
//!
//! Two drivers produce identical statistics:
//! 1. **Sequential:** [`Simulator::run`] parses and simulates on the calling thread.
//! 2. **Pipelined:** [`Simulator::run_pipelined`] splits the work into a trace
//!    reader thread and a hierarchy walker thread joined by a bounded channel.
//!
//! In the pipelined driver the reader parses each record and expands it into
//! line addresses using the nearest level's geometry, then sends them in
//! batches of at most [`MAX_BATCH`] addresses.
//! The walker is the only thread that touches the hierarchy, so caches, sets
//! and policies need no locking; the channel is the only synchronisation point.
//! A full channel blocks the reader and an empty one blocks the walker. When
//! the trace is exhausted the reader drops its sender, the walker's receive
//! loop ends, and both threads are joined before statistics are read.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread;

use tracing::{debug, info};

use super::trace::TraceReader;
use crate::cache::geometry::CacheGeometry;
use crate::common::addr::Addr;
use crate::common::data::MemoryAccess;
use crate::common::error::SimError;
use crate::config::{HierarchyConfig, SimulatorConfig};
use crate::hierarchy::CacheHierarchy;
use crate::stats::HierarchyStats;

/// Most line addresses carried by one message on the pipeline channel.
///
/// A record spanning more lines is split over several messages.
pub const MAX_BATCH: usize = 64;

/// Trace-driven simulator owning one cache hierarchy.
#[derive(Debug)]
pub struct Simulator {
    hierarchy: CacheHierarchy,
    config: SimulatorConfig,
    records: u64,
}

impl Simulator {
    /// Creates a simulator around an already-built hierarchy.
    pub const fn new(hierarchy: CacheHierarchy, config: SimulatorConfig) -> Self {
        Self {
            hierarchy,
            config,
            records: 0,
        }
    }

    /// Builds the hierarchy from its description and wraps it.
    ///
    /// # Errors
    ///
    /// Returns configuration or geometry errors from building the hierarchy.
    pub fn from_config(
        hierarchy: &HierarchyConfig,
        config: SimulatorConfig,
    ) -> Result<Self, SimError> {
        Ok(Self::new(CacheHierarchy::new(hierarchy)?, config))
    }

    /// The simulated hierarchy.
    pub const fn hierarchy(&self) -> &CacheHierarchy {
        &self.hierarchy
    }

    /// Trace records simulated so far.
    pub const fn records(&self) -> u64 {
        self.records
    }

    /// Snapshot of every counter.
    pub fn stats(&self) -> HierarchyStats {
        self.hierarchy.stats()
    }

    /// Simulates a single trace record.
    ///
    /// # Errors
    ///
    /// Propagates hierarchy walk failures.
    pub fn step(&mut self, access: &MemoryAccess) -> Result<(), SimError> {
        for addr in self.hierarchy.expand(access) {
            let _ = self.hierarchy.access(addr)?;
        }
        self.records += 1;
        Ok(())
    }

    /// Simulates every record of `reader` on the calling thread.
    ///
    /// # Errors
    ///
    /// Stops at the first I/O, trace format or simulation error.
    pub fn run<R: BufRead>(&mut self, reader: R) -> Result<HierarchyStats, SimError> {
        for access in TraceReader::new(reader) {
            self.step(&access?)?;
        }
        info!(
            records = self.records,
            memory_accesses = self.hierarchy.memory_accesses(),
            "trace complete"
        );
        Ok(self.stats())
    }

    /// Simulates every record of `reader` using a reader thread and a walker
    /// thread connected by a channel of `queue_depth` batches.
    ///
    /// Statistics match [`Simulator::run`] exactly.
    ///
    /// # Errors
    ///
    /// A trace or I/O error from the reader takes precedence, then a walk
    /// error from the walker. A panicked thread is reported as
    /// [`SimError::WorkerPanicked`].
    pub fn run_pipelined<R: BufRead + Send>(
        &mut self,
        reader: R,
    ) -> Result<HierarchyStats, SimError> {
        let geometry = self.hierarchy.nearest_geometry();
        let depth = self.config.queue_depth.max(1);
        let (tx, rx) = mpsc::sync_channel::<Vec<Addr>>(depth);
        let hierarchy = &mut self.hierarchy;
        debug!(queue_depth = depth, "starting pipelined run");

        let (produced, consumed) = thread::scope(|s| {
            let producer = thread::Builder::new()
                .name("trace-reader".into())
                .spawn_scoped(s, move || produce(reader, geometry, &tx))?;
            let consumer = thread::Builder::new()
                .name("cache-walker".into())
                .spawn_scoped(s, move || consume(hierarchy, rx))?;

            let produced = producer
                .join()
                .map_err(|_| SimError::WorkerPanicked("trace-reader"))?;
            let consumed = consumer
                .join()
                .map_err(|_| SimError::WorkerPanicked("cache-walker"))?;
            Ok::<_, SimError>((produced, consumed))
        })?;

        let sent = produced?;
        consumed?;
        self.records += sent;

        info!(
            records = self.records,
            memory_accesses = self.hierarchy.memory_accesses(),
            "trace complete"
        );
        Ok(self.stats())
    }

    /// Opens `path` and simulates it with the selected driver.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] if the file cannot be opened, otherwise the
    /// errors of the chosen driver.
    pub fn run_file(
        &mut self,
        path: impl AsRef<Path>,
        pipelined: bool,
    ) -> Result<HierarchyStats, SimError> {
        let reader = BufReader::new(File::open(path)?);
        if pipelined {
            self.run_pipelined(reader)
        } else {
            self.run(reader)
        }
    }

    /// Consumes the simulator, returning the hierarchy.
    pub fn into_hierarchy(self) -> CacheHierarchy {
        self.hierarchy
    }
}

/// Reader stage: parses and expands records into batches of line addresses.
///
/// Returns the number of records sent. Stops quietly if the walker hangs up,
/// since the walker's own error is what gets reported.
fn produce<R: BufRead>(
    reader: R,
    geometry: CacheGeometry,
    tx: &SyncSender<Vec<Addr>>,
) -> Result<u64, SimError> {
    let mut sent = 0;
    for access in TraceReader::new(reader) {
        let access = access?;
        let mut lines = geometry.expand(access.addr, access.size);
        loop {
            let batch: Vec<Addr> = lines.by_ref().take(MAX_BATCH).collect();
            if batch.is_empty() {
                break;
            }
            if tx.send(batch).is_err() {
                return Ok(sent);
            }
        }
        sent += 1;
    }
    Ok(sent)
}

/// Walker stage: drains batches until the reader closes the channel.
///
/// Dropping `rx` on error unblocks the reader.
fn consume(hierarchy: &mut CacheHierarchy, rx: Receiver<Vec<Addr>>) -> Result<(), SimError> {
    for batch in rx {
        hierarchy.access_all(&batch)?;
    }
    Ok(())
}

//! Shard Module
//!
//! One partition of the pool's key space.
//!
//! ## Responsibilities
//! - Own a page table keyed by file offset, behind a structural lock
//! - Load pages on miss, evicting one resident page when full
//! - Track dirty pages and write them back on flush
//!
//! ## Locking
//! Two levels, always taken in this order:
//! 1. the shard's structural lock (`Mutex` over the table)
//! 2. the entry's reader/writer lock
//!
//! The structural lock is released before an entry is locked for a caller's
//! read or write. Entries are handed out as `Arc<Entry>`, so an entry evicted
//! in that window stays alive for its borrower; the borrower sees the
//! `evicted` mark and goes back through the table.
//!
//! ## Eviction
//! First entry in table order, which for the ordered table is the lowest
//! resident offset. Not LRU.

mod entry;
mod table;

pub use entry::Entry;
pub use table::Shard;

/// Outcome of flushing one shard (or the whole pool)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlushStats {
    /// Pages written back and marked clean
    pub written: usize,
    /// Pages whose write-back failed; they stay dirty for the next cycle
    pub failed: usize,
}

impl FlushStats {
    /// True when no write-back failed
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    pub fn merge(&mut self, other: FlushStats) {
        self.written += other.written;
        self.failed += other.failed;
    }
}

/// Counters kept by a shard since it was created
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ShardStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub eviction_failures: u64,
    /// Dirty pages persisted, by flush or by eviction
    pub writebacks: u64,
}

impl ShardStats {
    pub fn merge(&mut self, other: ShardStats) {
        self.hits += other.hits;
        self.misses += other.misses;
        self.evictions += other.evictions;
        self.eviction_failures += other.eviction_failures;
        self.writebacks += other.writebacks;
    }
}

//! Shard page table
//!
//! BTreeMap of `Arc<Entry>` behind the shard's structural Mutex.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{PoolError, Result};
use crate::page::Page;
use crate::storage::{read_page, BackingStore};

use super::entry::{Entry, WriteBack};
use super::{FlushStats, ShardStats};

/// One partition of the page cache
///
/// ## Concurrency:
/// - `table`: structural lock; held for every lookup, load and eviction
/// - each `Entry`: its own RwLock over page bytes and dirty flag
/// - counters: relaxed atomics, informational only
pub struct Shard {
    /// Shared backing store (the pool's file)
    store: Arc<dyn BackingStore>,

    /// Max resident entries before eviction
    capacity: usize,

    /// Resident pages by file offset
    table: Mutex<BTreeMap<u64, Arc<Entry>>>,

    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    eviction_failures: AtomicU64,
    writebacks: AtomicU64,
}

impl Shard {
    /// Create an empty shard holding at most `capacity` pages
    ///
    /// A zero capacity is rejected: such a shard could never admit a page.
    pub fn new(store: Arc<dyn BackingStore>, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(PoolError::Config("shard capacity must be at least 1".to_string()));
        }

        Ok(Self {
            store,
            capacity,
            table: Mutex::new(BTreeMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            eviction_failures: AtomicU64::new(0),
            writebacks: AtomicU64::new(0),
        })
    }

    /// Return the entry for `key`, loading it from the store on a miss.
    ///
    /// A full shard evicts one entry first. If that entry is dirty and its
    /// write-back fails, nothing is loaded and the table is left as it was.
    pub fn get_or_load(&self, key: u64) -> Result<Arc<Entry>> {
        let mut table = self.table.lock();

        if let Some(entry) = table.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(offset = key, "page hit");
            return Ok(Arc::clone(entry));
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        if table.len() >= self.capacity {
            self.evict_one(&mut table)?;
        }

        let data = read_page(self.store.as_ref(), key)
            .map_err(|source| PoolError::Load { offset: key, source })?;

        tracing::debug!(offset = key, resident = table.len() + 1, "page loaded");

        let entry = Arc::new(Entry::new(key, data));
        table.insert(key, Arc::clone(&entry));
        Ok(entry)
    }

    /// Overwrite the page at `key` and mark it dirty
    pub fn put(&self, key: u64, page: &Page) -> Result<()> {
        loop {
            let entry = self.get_or_load(key)?;
            if entry.overwrite(page) {
                return Ok(());
            }
            // Evicted between lookup and lock; the next lookup reloads it.
            tracing::trace!(offset = key, "entry evicted before write, retrying");
        }
    }

    /// Copy the page at `key` into `out`
    pub fn get(&self, key: u64, out: &mut Page) -> Result<()> {
        loop {
            let entry = self.get_or_load(key)?;
            if entry.read_into(out) {
                return Ok(());
            }
            tracing::trace!(offset = key, "entry evicted before read, retrying");
        }
    }

    /// Write every dirty page back to the store.
    ///
    /// Failed writes leave the page dirty for the next flush; they are
    /// counted, never returned.
    pub fn flush(&self) -> FlushStats {
        // Phase 1: snapshot dirty entries under the structural lock
        let dirty: Vec<Arc<Entry>> = {
            let table = self.table.lock();
            table
                .values()
                .filter(|entry| entry.dirty_exclusive())
                .cloned()
                .collect()
        };

        // Phase 2: write back without blocking table operations
        let mut stats = FlushStats::default();
        for entry in dirty {
            match entry.write_back(self.store.as_ref()) {
                WriteBack::Clean => {}
                WriteBack::Written => {
                    stats.written += 1;
                    self.writebacks.fetch_add(1, Ordering::Relaxed);
                }
                WriteBack::Failed(e) => {
                    stats.failed += 1;
                    tracing::debug!(offset = entry.key(), error = %e, "write-back failed, page stays dirty");
                }
            }
        }
        stats
    }

    /// Number of resident pages
    pub fn len(&self) -> usize {
        self.table.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether `key` is resident (does not load it)
    pub fn contains(&self, key: u64) -> bool {
        self.table.lock().contains_key(&key)
    }

    /// Resident offsets in table order
    pub fn keys(&self) -> Vec<u64> {
        self.table.lock().keys().copied().collect()
    }

    /// Number of resident pages currently dirty
    pub fn dirty_count(&self) -> usize {
        let table = self.table.lock();
        table.values().filter(|entry| entry.is_dirty()).count()
    }

    pub fn stats(&self) -> ShardStats {
        ShardStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            eviction_failures: self.eviction_failures.load(Ordering::Relaxed),
            writebacks: self.writebacks.load(Ordering::Relaxed),
        }
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Remove the first entry in table order (caller holds the table lock)
    fn evict_one(&self, table: &mut BTreeMap<u64, Arc<Entry>>) -> Result<()> {
        let (key, victim) = match table.first_key_value() {
            Some((&key, entry)) => (key, Arc::clone(entry)),
            None => return Ok(()),
        };

        match victim.evict(self.store.as_ref()) {
            Ok(wrote) => {
                if wrote {
                    self.writebacks.fetch_add(1, Ordering::Relaxed);
                }
                table.remove(&key);
                self.evictions.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(offset = key, wrote_back = wrote, "page evicted");
                Ok(())
            }
            Err(e) => {
                self.eviction_failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(offset = key, error = %e, "eviction aborted");
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for Shard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shard")
            .field("capacity", &self.capacity)
            .field("resident", &self.len())
            .finish()
    }
}

//! Pool Module
//!
//! The sharded buffer pool that callers talk to.
//!
//! ## Responsibilities
//! - Route each offset to one shard by a stable hash
//! - Own the backing store and the background flusher
//! - Tear both down together on close

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::config::PoolConfig;
use crate::error::{PoolError, Result};
use crate::flusher::{flush_shards, Flusher};
use crate::page::Page;
use crate::shard::{FlushStats, Shard, ShardStats};
use crate::storage::{BackingStore, FileStore};

/// Knuth's multiplicative hashing constant
const HASH_MULTIPLIER: u32 = 2_654_435_761;

/// Hash an offset for shard selection: `(offset as u32) * 2654435761 mod 2^32`
pub fn shard_hash(offset: u64) -> u32 {
    (offset as u32).wrapping_mul(HASH_MULTIPLIER)
}

/// Point-in-time view of the pool's counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Pages currently cached
    pub resident: usize,
    /// Cached pages not yet persisted
    pub dirty: usize,
    /// Counters summed over all shards
    pub shards: ShardStats,
}

/// Sharded, file-backed page cache
///
/// ## Concurrency Model
///
/// - Each shard has a structural lock over its page table; different shards
///   proceed fully in parallel.
/// - Each cached page has its own RwLock: concurrent readers, exclusive
///   writers (put, flush write-back, eviction write-back).
/// - One background thread flushes all shards every `flush_interval`.
///
/// All methods take `&self`, so a pool is typically shared as `Arc<Pool>`.
pub struct Pool {
    config: PoolConfig,

    /// Shards, indexed by `shard_hash(offset) % shard_count`
    shards: Arc<[Shard]>,

    /// The file behind every shard
    store: Arc<dyn BackingStore>,

    flusher: Mutex<Flusher>,

    /// Held shared by every put/get and exclusively by close, so the final
    /// flush starts only after in-flight operations have finished
    gate: RwLock<()>,

    closed: AtomicBool,
}

impl Pool {
    /// Open or create the file at `path` and build a pool over it
    ///
    /// Fails without leaving anything behind if the config is invalid or the
    /// file cannot be opened.
    pub fn open(path: impl AsRef<Path>, config: PoolConfig) -> Result<Self> {
        let path = path.as_ref();
        config.validate()?;

        let store = FileStore::open(path).map_err(|source| PoolError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(path = %path.display(), "opened backing file");
        Self::with_store(Arc::new(store), config)
    }

    /// Open with a path (convenience method)
    ///
    /// Uses the default config
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(path, PoolConfig::default())
    }

    /// Build a pool over an already-open store and start the flusher
    pub fn with_store(store: Arc<dyn BackingStore>, config: PoolConfig) -> Result<Self> {
        config.validate()?;

        let shards: Arc<[Shard]> = (0..config.shard_count)
            .map(|_| Shard::new(Arc::clone(&store), config.max_entries_per_shard))
            .collect::<Result<Vec<_>>>()?
            .into();

        let flusher = Flusher::spawn(Arc::clone(&shards), config.flush_interval)?;

        tracing::info!(
            shard_count = config.shard_count,
            max_entries_per_shard = config.max_entries_per_shard,
            flush_interval_ms = config.flush_interval.as_millis() as u64,
            "buffer pool ready"
        );

        Ok(Self {
            config,
            shards,
            store,
            flusher: Mutex::new(flusher),
            gate: RwLock::new(()),
            closed: AtomicBool::new(false),
        })
    }

    /// Write `page` at `offset`
    ///
    /// A page not yet cached is loaded first, possibly evicting another.
    pub fn put(&self, offset: u64, page: &Page) -> Result<()> {
        let _open = self.gate.read();
        self.ensure_open()?;
        self.shard(offset).put(offset, page)
    }

    /// Read the page at `offset` into `out`
    pub fn get(&self, offset: u64, out: &mut Page) -> Result<()> {
        let _open = self.gate.read();
        self.ensure_open()?;
        self.shard(offset).get(offset, out)
    }

    /// Read the page at `offset` into a new buffer
    pub fn read(&self, offset: u64) -> Result<Page> {
        let mut page = Page::zeroed();
        self.get(offset, &mut page)?;
        Ok(page)
    }

    /// Flush every shard now, without waiting for the background cycle
    pub fn flush(&self) -> FlushStats {
        flush_shards(&self.shards)
    }

    /// Stop the flusher, persist dirty pages and sync the store
    ///
    /// Only the first call does anything. It waits for in-flight `put`/`get`
    /// calls, so every write that returned `Ok` is in the final flush.
    /// Afterwards `put`/`get` fail with [`PoolError::Closed`].
    ///
    /// The store handle is shared with the shards and the flusher, so the
    /// file itself is released when the pool is dropped, not here.
    pub fn close(&self) -> Result<()> {
        let _closing = self.gate.write();
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        self.flusher.lock().stop();

        let stats = self.flush();
        self.store.sync()?;

        tracing::info!(written = stats.written, failed = stats.failed, "buffer pool closed");
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Index of the shard that owns `offset`
    pub fn shard_for(&self, offset: u64) -> usize {
        shard_hash(offset) as usize % self.shards.len()
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Number of pages cached by shard `index`
    pub fn shard_len(&self, index: usize) -> Option<usize> {
        self.shards.get(index).map(Shard::len)
    }

    /// Direct access to shard `index`
    pub fn shard_at(&self, index: usize) -> Option<&Shard> {
        self.shards.get(index)
    }

    /// Number of pages cached across all shards
    pub fn resident_pages(&self) -> usize {
        self.shards.iter().map(Shard::len).sum()
    }

    /// Number of cached pages not yet persisted
    pub fn dirty_pages(&self) -> usize {
        self.shards.iter().map(Shard::dirty_count).sum()
    }

    pub fn stats(&self) -> PoolStats {
        let mut stats = PoolStats::default();
        for shard in self.shards.iter() {
            stats.resident += shard.len();
            stats.dirty += shard.dirty_count();
            stats.shards.merge(shard.stats());
        }
        stats
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Whether the background flusher thread is still running
    pub fn is_flusher_running(&self) -> bool {
        self.flusher.lock().is_running()
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn shard(&self, offset: u64) -> &Shard {
        &self.shards[self.shard_for(offset)]
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(PoolError::Closed);
        }
        Ok(())
    }
}

impl Drop for Pool {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::error!(error = %e, "failed to close buffer pool");
        }
    }
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("config", &self.config)
            .field("closed", &self.is_closed())
            .finish()
    }
}

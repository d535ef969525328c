//! # PagePool
//!
//! A sharded, file-backed page cache ("buffer pool") with:
//! - Fixed 4 KiB pages addressed by byte offset in a single backing file
//! - Per-shard structural locks and per-page reader/writer locks
//! - Dirty tracking with synchronous write-back on eviction
//! - A background thread that flushes dirty pages periodically
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Pool::put / Pool::get                      │
//! │                    (caller threads)                          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ shard_hash(offset) % shard_count
//!          ┌────────────┼────────────┐
//!          ▼            ▼            ▼
//!   ┌─────────────┐ ┌─────────┐ ┌─────────────┐      ┌───────────┐
//!   │   Shard 0   │ │   ...   │ │  Shard N-1  │◄─────│  Flusher  │
//!   │  (Mutex)    │ │         │ │  (Mutex)    │      │  thread   │
//!   └──────┬──────┘ └─────────┘ └──────┬──────┘      └───────────┘
//!          │ Arc<Entry> (RwLock)        │
//!          └────────────┬──────────────┘
//!                       ▼
//!               ┌───────────────┐
//!               │ BackingStore  │
//!               │ (pread/pwrite)│
//!               └───────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use pagepool::{Page, Pool, PoolConfig};
//!
//! let pool = Pool::open("pages.db", PoolConfig::default())?;
//! pool.put(0, &Page::filled(0xAB))?;
//! assert_eq!(pool.read(0)?, Page::filled(0xAB));
//! pool.close()?;
//! # Ok::<(), pagepool::PoolError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod page;
pub mod storage;
pub mod shard;
pub mod pool;

mod flusher;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{PoolError, Result};
pub use config::PoolConfig;
pub use page::{Page, PAGE_SIZE};
pub use pool::{Pool, PoolStats};
pub use storage::{BackingStore, FileStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of PagePool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Configuration for PagePool
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::error::{PoolError, Result};

/// Default number of shards
pub const DEFAULT_SHARD_COUNT: usize = 16;

/// Total number of pages cached by default, split evenly across shards
pub const DEFAULT_TOTAL_ENTRIES: usize = 2048;

/// Default interval between background flushes
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(5);

/// Main configuration for a Pool instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    // -------------------------------------------------------------------------
    // Sharding Configuration
    // -------------------------------------------------------------------------
    /// Number of independent partitions of the key space
    pub shard_count: usize,

    /// Pages each shard holds before eviction kicks in
    pub max_entries_per_shard: usize,

    // -------------------------------------------------------------------------
    // Flusher Configuration
    // -------------------------------------------------------------------------
    /// How long the background flusher waits between flush cycles
    pub flush_interval: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            shard_count: DEFAULT_SHARD_COUNT,
            max_entries_per_shard: DEFAULT_TOTAL_ENTRIES / DEFAULT_SHARD_COUNT, // 128
            flush_interval: DEFAULT_FLUSH_INTERVAL,
        }
    }
}

impl PoolConfig {
    /// Create a new config builder
    pub fn builder() -> PoolConfigBuilder {
        PoolConfigBuilder::default()
    }

    /// Total number of pages the pool can hold resident
    pub fn total_capacity(&self) -> usize {
        self.shard_count * self.max_entries_per_shard
    }

    /// Reject configurations the pool cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.shard_count == 0 {
            return Err(PoolError::Config("shard_count must be at least 1".to_string()));
        }
        if self.max_entries_per_shard == 0 {
            return Err(PoolError::Config(format!(
                "max_entries_per_shard must be at least 1 (shard_count = {})",
                self.shard_count
            )));
        }
        if self.flush_interval.is_zero() {
            return Err(PoolError::Config("flush_interval must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Builder for PoolConfig
///
/// When only `shard_count` is set, the per-shard capacity follows it so the
/// total stays at [`DEFAULT_TOTAL_ENTRIES`].
#[derive(Debug, Default)]
pub struct PoolConfigBuilder {
    shard_count: Option<usize>,
    max_entries_per_shard: Option<usize>,
    flush_interval: Option<Duration>,
}

impl PoolConfigBuilder {
    /// Set the number of shards
    pub fn shard_count(mut self, count: usize) -> Self {
        self.shard_count = Some(count);
        self
    }

    /// Set the per-shard capacity (in pages)
    pub fn max_entries_per_shard(mut self, count: usize) -> Self {
        self.max_entries_per_shard = Some(count);
        self
    }

    /// Set the background flush interval
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = Some(interval);
        self
    }

    pub fn build(self) -> PoolConfig {
        let shard_count = self.shard_count.unwrap_or(DEFAULT_SHARD_COUNT);
        let max_entries_per_shard = self
            .max_entries_per_shard
            .unwrap_or_else(|| DEFAULT_TOTAL_ENTRIES.checked_div(shard_count).unwrap_or(0));

        PoolConfig {
            shard_count,
            max_entries_per_shard,
            flush_interval: self.flush_interval.unwrap_or(DEFAULT_FLUSH_INTERVAL),
        }
    }
}

//! Tests for PoolConfig
//!
//! These tests verify:
//! - Defaults (16 shards, 2048 pages total, 5s flush interval)
//! - Builder derivation of per-shard capacity
//! - Validation of unusable configurations

use std::time::Duration;

use pagepool::config::{DEFAULT_FLUSH_INTERVAL, DEFAULT_SHARD_COUNT, DEFAULT_TOTAL_ENTRIES};
use pagepool::{PoolConfig, PoolError};

// =============================================================================
// Default Tests
// =============================================================================

#[test]
fn test_default_config() {
    let config = PoolConfig::default();

    assert_eq!(config.shard_count, 16);
    assert_eq!(config.max_entries_per_shard, 128);
    assert_eq!(config.flush_interval, Duration::from_secs(5));
    assert_eq!(config.total_capacity(), 2048);
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_builder_matches_default() {
    assert_eq!(PoolConfig::builder().build(), PoolConfig::default());
}

// =============================================================================
// Builder Tests
// =============================================================================

#[test]
fn test_capacity_follows_shard_count() {
    let config = PoolConfig::builder().shard_count(8).build();

    assert_eq!(config.max_entries_per_shard, DEFAULT_TOTAL_ENTRIES / 8);
    assert_eq!(config.total_capacity(), DEFAULT_TOTAL_ENTRIES);
}

#[test]
fn test_explicit_capacity_wins() {
    let config = PoolConfig::builder()
        .shard_count(1)
        .max_entries_per_shard(2)
        .flush_interval(Duration::from_millis(250))
        .build();

    assert_eq!(config.shard_count, 1);
    assert_eq!(config.max_entries_per_shard, 2);
    assert_eq!(config.flush_interval, Duration::from_millis(250));
}

#[test]
fn test_capacity_alone_keeps_default_shards() {
    let config = PoolConfig::builder().max_entries_per_shard(10).build();

    assert_eq!(config.shard_count, DEFAULT_SHARD_COUNT);
    assert_eq!(config.max_entries_per_shard, 10);
    assert_eq!(config.flush_interval, DEFAULT_FLUSH_INTERVAL);
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_zero_shards_rejected() {
    let config = PoolConfig::builder().shard_count(0).build();

    assert!(matches!(config.validate(), Err(PoolError::Config(_))));
}

#[test]
fn test_too_many_shards_for_default_capacity_rejected() {
    // 2048 / 4096 rounds down to zero pages per shard
    let config = PoolConfig::builder().shard_count(4096).build();

    assert_eq!(config.max_entries_per_shard, 0);
    assert!(matches!(config.validate(), Err(PoolError::Config(_))));
}

#[test]
fn test_zero_flush_interval_rejected() {
    let config = PoolConfig::builder().flush_interval(Duration::ZERO).build();

    assert!(matches!(config.validate(), Err(PoolError::Config(_))));
}

//! Error types for PagePool
//!
//! Provides a unified error type for all pool operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using PoolError
pub type Result<T> = std::result::Result<T, PoolError>;

/// Unified error type for PagePool operations
#[derive(Debug, Error)]
pub enum PoolError {
    // -------------------------------------------------------------------------
    // Open Errors
    // -------------------------------------------------------------------------
    #[error("failed to open backing file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start background flusher: {0}")]
    FlusherSpawn(#[source] std::io::Error),

    // -------------------------------------------------------------------------
    // Page Errors
    // -------------------------------------------------------------------------
    #[error("failed to load page at offset {offset}: {source}")]
    Load {
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write page at offset {offset}: {source}")]
    Write {
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("short write at offset {offset}: wrote {written} of {expected} bytes")]
    ShortWrite {
        offset: u64,
        written: usize,
        expected: usize,
    },

    #[error("cannot evict dirty page at offset {offset}: {source}")]
    Eviction {
        offset: u64,
        #[source]
        source: Box<PoolError>,
    },

    #[error("pool is closed")]
    Closed,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PoolError {
    /// True for the errors that mean the shard could not admit a new page
    /// because its eviction victim could not be written back.
    pub fn is_eviction_failure(&self) -> bool {
        matches!(self, PoolError::Eviction { .. })
    }
}

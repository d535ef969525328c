//! Background Flusher
//!
//! A dedicated thread that periodically writes every shard's dirty pages
//! back to the store.
//!
//! ## Lifecycle
//! - Spawned when the pool opens
//! - Waits `flush_interval` on a stop channel between cycles
//! - Exits when the stop signal arrives or the sender is dropped
//! - Joined by `Flusher::stop`

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, RecvTimeoutError, Sender};

use crate::error::{PoolError, Result};
use crate::shard::{FlushStats, Shard};

const THREAD_NAME: &str = "pagepool-flusher";

/// Handle to the running flusher thread
pub(crate) struct Flusher {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Flusher {
    /// Start the flush loop over `shards`
    pub(crate) fn spawn(shards: Arc<[Shard]>, interval: Duration) -> Result<Self> {
        let (stop_tx, stop_rx) = channel::bounded::<()>(1);

        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                tracing::debug!(interval_ms = interval.as_millis() as u64, "flusher started");
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            let stats = flush_shards(&shards);
                            if stats.written > 0 {
                                tracing::debug!(written = stats.written, failed = stats.failed, "flush cycle done");
                            }
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                tracing::debug!("flusher stopped");
            })
            .map_err(PoolError::FlusherSpawn)?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Signal the loop to exit and wait for it. Safe to call more than once.
    pub(crate) fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            // A full channel or a gone receiver both mean the loop is exiting.
            let _ = tx.try_send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("flusher thread panicked");
            }
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

/// Flush every shard in index order, logging the ones that failed
pub(crate) fn flush_shards(shards: &[Shard]) -> FlushStats {
    let mut total = FlushStats::default();
    for (index, shard) in shards.iter().enumerate() {
        let stats = shard.flush();
        if !stats.is_clean() {
            tracing::warn!(shard = index, failed = stats.failed, "flush failed for shard");
        }
        total.merge(stats);
    }
    total
}

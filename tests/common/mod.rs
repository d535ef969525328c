//! Shared helpers for integration tests
//!
//! - `MemStore`: in-memory `BackingStore` with I/O counters and fault injection
//! - `init_tracing`: installs a test subscriber once (RUST_LOG controlled)

#![allow(dead_code)]

use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use pagepool::{BackingStore, Page, PAGE_SIZE};
use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Read the page at `offset` straight from a file on disk, zero-padded
pub fn file_page(path: &Path, offset: u64) -> Page {
    let bytes = std::fs::read(path).unwrap();
    let start = (offset as usize).min(bytes.len());
    let end = (start + PAGE_SIZE).min(bytes.len());
    Page::from_bytes(&bytes[start..end])
}

#[derive(Default)]
pub struct MemStore {
    data: Mutex<Vec<u8>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    short_writes: AtomicBool,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place raw bytes at `offset`, growing the store as needed
    pub fn preload(&self, offset: u64, bytes: &[u8]) {
        let mut data = self.data.lock();
        let start = offset as usize;
        if data.len() < start + bytes.len() {
            data.resize(start + bytes.len(), 0);
        }
        data[start..start + bytes.len()].copy_from_slice(bytes);
    }

    /// Persisted page at `offset`, zero-padded past the end
    pub fn page_at(&self, offset: u64) -> Page {
        let data = self.data.lock();
        let start = (offset as usize).min(data.len());
        let end = (start + PAGE_SIZE).min(data.len());
        Page::from_bytes(&data[start..end])
    }

    pub fn len(&self) -> usize {
        self.data.lock().len()
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Writes that reached the store (full or short)
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make writes persist only the first half of the buffer
    pub fn set_short_writes(&self, short: bool) {
        self.short_writes.store(short, Ordering::SeqCst);
    }
}

impl BackingStore for MemStore {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::Other, "injected read failure"));
        }
        self.reads.fetch_add(1, Ordering::SeqCst);

        let data = self.data.lock();
        let start = offset as usize;
        if start >= data.len() {
            return Ok(0);
        }
        let n = buf.len().min(data.len() - start);
        buf[..n].copy_from_slice(&data[start..start + n]);
        Ok(n)
    }

    fn write_at(&self, offset: u64, buf: &[u8]) -> io::Result<usize> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::Other, "injected write failure"));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);

        let n = if self.short_writes.load(Ordering::SeqCst) {
            buf.len() / 2
        } else {
            buf.len()
        };
        self.preload(offset, &buf[..n]);
        Ok(n)
    }
}

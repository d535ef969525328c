//! Storage Module
//!
//! The positional-I/O collaborator underneath the pool.
//!
//! ## Responsibilities
//! - Read whole pages at a byte offset, zero-padding past end-of-file
//! - Write whole pages at a byte offset, reporting how much was written
//! - Sync on shutdown
//!
//! ## File Format
//! There is none: the file *is* the page array, addressed by byte offset.
//! ```text
//! offset 0        4096       8192       12288
//! ┌──────────┬──────────┬──────────┬──────────┐
//! │  page 0  │  page 1  │  page 2  │   ...    │
//! └──────────┴──────────┴──────────┴──────────┘
//! ```

mod file;

use std::io;

use crate::page::Page;

pub use file::FileStore;

/// Positional read/write access to the bytes behind the cache
///
/// Implementations must be safe to call from many threads at once; the pool
/// only guarantees that no two calls touch the same page concurrently.
pub trait BackingStore: Send + Sync {
    /// Read up to `buf.len()` bytes starting at `offset`.
    ///
    /// Returns the number of bytes read, which is short only at end-of-file.
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize>;

    /// Write `buf` at `offset`, returning the number of bytes written.
    fn write_at(&self, offset: u64, buf: &[u8]) -> io::Result<usize>;

    /// Flush written data to durable storage
    fn sync(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Read the page at `offset`; bytes beyond the end of the store read as zero
pub fn read_page(store: &dyn BackingStore, offset: u64) -> io::Result<Page> {
    let mut page = Page::zeroed();
    // Anything past the returned length stays zero.
    store.read_at(offset, page.as_bytes_mut())?;
    Ok(page)
}

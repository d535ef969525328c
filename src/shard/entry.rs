//! Cached page entry
//!
//! A page plus its dirty flag, behind the entry's own RwLock.

use parking_lot::RwLock;

use crate::error::{PoolError, Result};
use crate::page::{Page, PAGE_SIZE};
use crate::storage::BackingStore;

/// One cached page
///
/// Readers take the lock shared; writers, flush and eviction take it
/// exclusively.
pub struct Entry {
    /// File offset of the page; also its table key
    key: u64,

    state: RwLock<EntryState>,
}

struct EntryState {
    data: Page,

    /// Set iff `data` differs from what is persisted at `key`
    dirty: bool,

    /// Set once the entry has been unlinked from its shard's table
    evicted: bool,
}

/// What a flush write-back did with an entry
pub(crate) enum WriteBack {
    /// Nothing to write
    Clean,
    /// Page persisted and marked clean
    Written,
    /// Page left dirty
    Failed(PoolError),
}

impl Entry {
    /// Create a clean entry from freshly loaded page data
    pub(crate) fn new(key: u64, data: Page) -> Self {
        Self {
            key,
            state: RwLock::new(EntryState {
                data,
                dirty: false,
                evicted: false,
            }),
        }
    }

    pub fn key(&self) -> u64 {
        self.key
    }

    pub fn is_dirty(&self) -> bool {
        self.state.read().dirty
    }

    pub fn is_evicted(&self) -> bool {
        self.state.read().evicted
    }

    /// Copy the page into `out`. Returns false if the entry was evicted.
    pub(crate) fn read_into(&self, out: &mut Page) -> bool {
        let state = self.state.read();
        if state.evicted {
            return false;
        }
        out.copy_from(&state.data);
        true
    }

    /// Replace the page and mark it dirty. Returns false if the entry was
    /// evicted, in which case nothing is written.
    pub(crate) fn overwrite(&self, page: &Page) -> bool {
        let mut state = self.state.write();
        if state.evicted {
            return false;
        }
        state.data.copy_from(page);
        state.dirty = true;
        true
    }

    /// Dirty check for the flush snapshot, under the exclusive lock so it
    /// cannot interleave with a writer setting the flag.
    pub(crate) fn dirty_exclusive(&self) -> bool {
        self.state.write().dirty
    }

    /// Persist the page if it is (still) dirty
    pub(crate) fn write_back(&self, store: &dyn BackingStore) -> WriteBack {
        let mut state = self.state.write();
        if !state.dirty {
            return WriteBack::Clean;
        }

        match write_page(store, self.key, &state.data) {
            Ok(()) => {
                state.dirty = false;
                WriteBack::Written
            }
            Err(e) => WriteBack::Failed(e),
        }
    }

    /// Prepare the entry for removal from its table.
    ///
    /// A dirty page is written back first; if that fails the entry is left
    /// untouched and the error returned. Returns whether a write happened.
    pub(crate) fn evict(&self, store: &dyn BackingStore) -> Result<bool> {
        let mut state = self.state.write();
        let wrote = state.dirty;
        if state.dirty {
            write_page(store, self.key, &state.data).map_err(|e| PoolError::Eviction {
                offset: self.key,
                source: Box::new(e),
            })?;
            state.dirty = false;
        }
        state.evicted = true;
        Ok(wrote)
    }
}

/// Write a whole page at `offset`; anything short of `PAGE_SIZE` is a failure
fn write_page(store: &dyn BackingStore, offset: u64, data: &Page) -> Result<()> {
    let written = store
        .write_at(offset, data.as_bytes())
        .map_err(|source| PoolError::Write { offset, source })?;

    if written != PAGE_SIZE {
        return Err(PoolError::ShortWrite {
            offset,
            written,
            expected: PAGE_SIZE,
        });
    }
    Ok(())
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("dirty", &state.dirty)
            .field("evicted", &state.evicted)
            .finish()
    }
}

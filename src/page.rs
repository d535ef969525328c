//! Page buffer
//!
//! A page is the unit of caching and of I/O: always read and written whole.

use std::fmt;
use std::ops::{Deref, DerefMut};

/// Page size in bytes
pub const PAGE_SIZE: usize = 4096;

/// Fixed-size, heap-allocated page buffer
#[derive(Clone, PartialEq, Eq)]
pub struct Page(Box<[u8; PAGE_SIZE]>);

impl Page {
    /// Create a zero-filled page
    pub fn zeroed() -> Self {
        Self(Box::new([0u8; PAGE_SIZE]))
    }

    /// Create a page with every byte set to `byte`
    pub fn filled(byte: u8) -> Self {
        Self(Box::new([byte; PAGE_SIZE]))
    }

    /// Create a page from the start of `bytes`, zero-padding the rest.
    /// Bytes past `PAGE_SIZE` are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut page = Self::zeroed();
        let len = bytes.len().min(PAGE_SIZE);
        page.0[..len].copy_from_slice(&bytes[..len]);
        page
    }

    /// Overwrite this page with the contents of `other`
    pub fn copy_from(&mut self, other: &Page) {
        self.0.copy_from_slice(&other.0[..]);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.0[..]
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl Deref for Page {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl DerefMut for Page {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.as_bytes_mut()
    }
}

impl AsRef<[u8]> for Page {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for Page {
    // 4 KiB of bytes is useless in a debug dump
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("head", &&self.0[..8])
            .field("len", &PAGE_SIZE)
            .finish()
    }
}

//! Tests for the storage layer
//!
//! These tests verify:
//! - FileStore creates missing files
//! - Whole-page positional reads and writes
//! - Zero padding past end-of-file
//! - Page buffer helpers

use pagepool::storage::read_page;
use pagepool::{BackingStore, FileStore, Page, PAGE_SIZE};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_store() -> (TempDir, FileStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::open(&temp_dir.path().join("store.db")).unwrap();
    (temp_dir, store)
}

// =============================================================================
// FileStore Tests
// =============================================================================

#[test]
fn test_open_creates_empty_file() {
    let (temp, store) = setup_temp_store();

    assert!(temp.path().join("store.db").exists());
    assert_eq!(store.path(), temp.path().join("store.db").as_path());
    assert!(store.is_empty().unwrap());
}

#[test]
fn test_open_keeps_existing_contents() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.db");
    std::fs::write(&path, [1u8; PAGE_SIZE]).unwrap();

    let store = FileStore::open(&path).unwrap();

    assert_eq!(store.len().unwrap(), PAGE_SIZE as u64);
    assert_eq!(read_page(&store, 0).unwrap(), Page::filled(1));
}

#[test]
fn test_write_then_read_page() {
    let (_temp, store) = setup_temp_store();
    let page = Page::filled(0x3C);

    let written = store.write_at(PAGE_SIZE as u64 * 3, &page).unwrap();

    assert_eq!(written, PAGE_SIZE);
    assert_eq!(store.len().unwrap(), 4 * PAGE_SIZE as u64);
    assert_eq!(read_page(&store, PAGE_SIZE as u64 * 3).unwrap(), page);
    // The hole before it reads as zeros
    assert_eq!(read_page(&store, 0).unwrap(), Page::zeroed());
}

#[test]
fn test_read_past_eof_is_zero() {
    let (_temp, store) = setup_temp_store();

    let mut buf = [0xFFu8; PAGE_SIZE];
    let n = store.read_at(1 << 20, &mut buf).unwrap();

    assert_eq!(n, 0);
    assert_eq!(read_page(&store, 1 << 20).unwrap(), Page::zeroed());
}

#[test]
fn test_partial_tail_is_zero_padded() {
    let (_temp, store) = setup_temp_store();
    store.write_at(0, &[7u8; 10]).unwrap();

    let mut buf = [0u8; PAGE_SIZE];
    assert_eq!(store.read_at(0, &mut buf).unwrap(), 10);

    let page = read_page(&store, 0).unwrap();
    assert!(page[..10].iter().all(|&b| b == 7));
    assert!(page[10..].iter().all(|&b| b == 0));
}

#[test]
fn test_unaligned_offsets() {
    let (_temp, store) = setup_temp_store();
    store.write_at(0, &Page::filled(1)).unwrap();
    store.write_at(PAGE_SIZE as u64, &Page::filled(2)).unwrap();

    let page = read_page(&store, PAGE_SIZE as u64 / 2).unwrap();

    assert!(page[..PAGE_SIZE / 2].iter().all(|&b| b == 1));
    assert!(page[PAGE_SIZE / 2..].iter().all(|&b| b == 2));
}

#[test]
fn test_sync() {
    let (_temp, store) = setup_temp_store();
    store.write_at(0, &Page::filled(9)).unwrap();

    store.sync().unwrap();
}

// =============================================================================
// Page Tests
// =============================================================================

#[test]
fn test_page_from_bytes_pads_and_truncates() {
    let short = Page::from_bytes(b"abc");
    assert_eq!(&short[..3], b"abc");
    assert!(short[3..].iter().all(|&b| b == 0));

    let long = Page::from_bytes(&vec![4u8; PAGE_SIZE + 10]);
    assert_eq!(long, Page::filled(4));
}

#[test]
fn test_page_default_is_zeroed() {
    assert_eq!(Page::default(), Page::zeroed());
    assert_eq!(Page::default().len(), PAGE_SIZE);
}

#[test]
fn test_page_copy_from() {
    let mut page = Page::zeroed();
    page.copy_from(&Page::filled(8));

    assert_eq!(page, Page::filled(8));
}

#[test]
fn test_page_debug_is_short() {
    let rendered = format!("{:?}", Page::filled(1));

    assert!(rendered.starts_with("Page"));
    assert!(rendered.len() < 100);
}

//! Tests for KeyIndex
//!
//! These tests verify:
//! - Offsets computed from a full scan
//! - Last-occurrence-wins for duplicate keys
//! - Malformed and blank lines
//! - Basic map operations

use std::io::Cursor;

use isamstore::index::{IndexStats, KeyIndex};

// =============================================================================
// Build Tests
// =============================================================================

#[test]
fn test_build_empty() {
    let (index, stats) = KeyIndex::build(Cursor::new(Vec::<u8>::new())).unwrap();
    assert!(index.is_empty());
    assert_eq!(stats, IndexStats::default());
}

#[test]
fn test_build_offsets() {
    let data = "a,x,1,e,1.0\nbb,y,2,e,2.0\nccc,z,3,e,3.0\n";
    let (index, stats) = KeyIndex::build(Cursor::new(data)).unwrap();

    assert_eq!(index.len(), 3);
    assert_eq!(index.get("a"), Some(0));
    assert_eq!(index.get("bb"), Some(12));
    assert_eq!(index.get("ccc"), Some(25));
    assert_eq!(stats.lines_scanned, 3);
    assert_eq!(stats.keys_indexed, 3);
    assert_eq!(stats.bytes_scanned, data.len() as u64);
}

#[test]
fn test_build_offsets_count_bytes_not_chars() {
    // "é" is two bytes in UTF-8
    let data = "k1,Zoé,1,e,1.0\nk2,Al,2,e,2.0\n";
    let (index, _) = KeyIndex::build(Cursor::new(data)).unwrap();

    let second = data.find("k2").unwrap() as u64;
    assert_eq!(index.get("k2"), Some(second));
}

#[test]
fn test_build_duplicate_last_wins() {
    let data = "k,old,1,e,1.0\nk,new,1,e,2.0\n";
    let (index, stats) = KeyIndex::build(Cursor::new(data)).unwrap();

    assert_eq!(index.len(), 1);
    assert_eq!(index.get("k"), Some(14));
    assert_eq!(stats.duplicates_shadowed, 1);
}

#[test]
fn test_build_line_without_delimiter() {
    let data = "garbage\nk,n,1,e,1.0\n";
    let (index, _) = KeyIndex::build(Cursor::new(data)).unwrap();

    assert_eq!(index.get("garbage"), Some(0));
    assert_eq!(index.get("k"), Some(8));
}

#[test]
fn test_build_skips_blank_lines_but_counts_bytes() {
    let data = "a,n,1,e,1.0\n\nb,n,1,e,1.0\n";
    let (index, stats) = KeyIndex::build(Cursor::new(data)).unwrap();

    assert_eq!(index.len(), 2);
    assert_eq!(index.get("b"), Some(13));
    assert_eq!(stats.lines_scanned, 3);
}

#[test]
fn test_build_last_line_without_newline() {
    let data = "a,n,1,e,1.0\nb,n,1,e,1.0";
    let (index, stats) = KeyIndex::build(Cursor::new(data)).unwrap();

    assert_eq!(index.get("b"), Some(12));
    assert_eq!(stats.bytes_scanned, data.len() as u64);
}

// =============================================================================
// Map Operation Tests
// =============================================================================

#[test]
fn test_insert_get_remove() {
    let mut index = KeyIndex::new();
    assert_eq!(index.insert("x", 10), None);
    assert_eq!(index.insert("x", 20), Some(10));
    assert!(index.contains("x"));
    assert_eq!(index.get("x"), Some(20));

    assert_eq!(index.remove("x"), Some(20));
    assert!(!index.contains("x"));
    assert!(index.is_empty());
}

#[test]
fn test_to_map_and_iter_agree() {
    let mut index = KeyIndex::new();
    index.insert("a", 0);
    index.insert("b", 12);

    let map = index.to_map();
    assert_eq!(map.len(), 2);
    for (key, offset) in index.iter() {
        assert_eq!(map.get(key), Some(&offset));
    }
}

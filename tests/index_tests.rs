//! Tests for the in-memory index
//!
//! These tests verify:
//! - The Indexer contract (put/get/delete semantics)
//! - The factory fails fast on the unimplemented variant
//! - Concurrent readers and writers

use std::sync::Arc;
use std::thread;

use bitkv::data::LogRecordPos;
use bitkv::index::{new_indexer, BTreeIndex, Indexer};
use bitkv::{BitkvError, IndexType};

// =============================================================================
// Helper Functions
// =============================================================================

fn pos(file_id: u32, offset: u64) -> LogRecordPos {
    LogRecordPos { file_id, offset }
}

// =============================================================================
// Contract Tests
// =============================================================================

#[test]
fn test_put_and_get() {
    let index = BTreeIndex::new();

    assert!(index.put(b"a".to_vec(), pos(0, 0)));
    assert!(index.put(b"b".to_vec(), pos(0, 17)));

    assert_eq!(index.get(b"a").unwrap(), pos(0, 0));
    assert_eq!(index.get(b"b").unwrap(), pos(0, 17));
    assert!(index.get(b"c").is_none());
    assert_eq!(index.len(), 2);
}

#[test]
fn test_put_replaces_existing() {
    let index = BTreeIndex::new();

    index.put(b"k".to_vec(), pos(0, 0));
    index.put(b"k".to_vec(), pos(2, 512));

    assert_eq!(index.get(b"k").unwrap(), pos(2, 512));
    assert_eq!(index.len(), 1);
}

#[test]
fn test_delete() {
    let index = BTreeIndex::new();

    index.put(b"k".to_vec(), pos(0, 0));
    assert!(index.delete(b"k"));
    assert!(index.get(b"k").is_none());

    // Deleting an absent key reports that nothing was removed
    assert!(!index.delete(b"k"));
    assert!(!index.delete(b"never-inserted"));
    assert!(index.is_empty());
}

// =============================================================================
// Factory Tests
// =============================================================================

#[test]
fn test_new_indexer_btree() {
    let index = new_indexer(IndexType::BTree).unwrap();
    index.put(b"k".to_vec(), pos(0, 0));
    assert!(index.get(b"k").is_some());
}

#[test]
fn test_new_indexer_art_fails_fast() {
    match new_indexer(IndexType::AdaptiveRadixTree) {
        Err(BitkvError::Config(_)) => {}
        other => panic!("expected configuration error, got {:?}", other.map(|_| ())),
    }
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_readers_and_writers() {
    let index = Arc::new(BTreeIndex::new());
    let mut handles = Vec::new();

    for t in 0u32..4 {
        let index = Arc::clone(&index);
        handles.push(thread::spawn(move || {
            for i in 0u64..250 {
                let key = format!("key-{t}-{i}").into_bytes();
                index.put(key.clone(), pos(t, i));
                assert_eq!(index.get(&key).unwrap(), pos(t, i));
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(index.len(), 1000);
}

//! In-memory index
//!
//! Ordered, thread-safe mapping from key to log position. The engine is
//! polymorphic over the `Indexer` capability set so alternative structures
//! can slot in behind the same contract.

mod btree;

pub use btree::BTreeIndex;

use crate::config::IndexType;
use crate::data::LogRecordPos;
use crate::error::{BitkvError, Result};

/// Capability set the engine requires from an index.
///
/// All operations are safe for concurrent callers; implementations carry
/// their own internal synchronization.
pub trait Indexer: Send + Sync {
    /// Insert or replace the position for `key`. Returns whether the
    /// structure's invariants were satisfied (the tree variant always
    /// succeeds, but the contract allows a variant to reject).
    fn put(&self, key: Vec<u8>, pos: LogRecordPos) -> bool;

    /// Exact-match lookup.
    fn get(&self, key: &[u8]) -> Option<LogRecordPos>;

    /// Remove the mapping if present. Returns whether an entry existed and
    /// was removed.
    fn delete(&self, key: &[u8]) -> bool;
}

/// Construct the index selected by `index_type`.
///
/// Selecting an unimplemented variant fails here, at construction time —
/// never a silent fallback.
pub fn new_indexer(index_type: IndexType) -> Result<Box<dyn Indexer>> {
    match index_type {
        IndexType::BTree => Ok(Box::new(BTreeIndex::new())),
        IndexType::AdaptiveRadixTree => Err(BitkvError::Config(
            "adaptive radix tree index is not implemented".to_string(),
        )),
    }
}

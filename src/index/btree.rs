//! Ordered-tree index implementation
//!
//! `BTreeMap` keyed by raw bytes (byte-wise lexicographic order) behind an
//! RwLock: many concurrent readers, exclusive writer per operation.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::data::LogRecordPos;

use super::Indexer;

/// Balanced-tree index over byte keys
pub struct BTreeIndex {
    tree: RwLock<BTreeMap<Vec<u8>, LogRecordPos>>,
}

impl BTreeIndex {
    pub fn new() -> Self {
        Self {
            tree: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of live entries (for tests and diagnostics)
    pub fn len(&self) -> usize {
        self.tree.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.read().is_empty()
    }
}

impl Default for BTreeIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl Indexer for BTreeIndex {
    fn put(&self, key: Vec<u8>, pos: LogRecordPos) -> bool {
        self.tree.write().insert(key, pos);
        true
    }

    fn get(&self, key: &[u8]) -> Option<LogRecordPos> {
        self.tree.read().get(key).copied()
    }

    fn delete(&self, key: &[u8]) -> bool {
        self.tree.write().remove(key).is_some()
    }
}

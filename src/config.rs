//! Configuration for bitkv
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{BitkvError, Result};

/// Main configuration for a bitkv database instance
#[derive(Debug, Clone)]
pub struct Options {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding all data files. One directory per database.
    /// Internal structure:
    ///   {dir_path}/
    ///     ├── 000000000.data
    ///     ├── 000000001.data
    ///     └── ...
    pub dir_path: PathBuf,

    /// Max size of a data file before rotation (in bytes)
    pub max_file_size: u64,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// If true, every put/delete fsyncs the active file before returning
    pub sync_writes: bool,

    // -------------------------------------------------------------------------
    // Index Configuration
    // -------------------------------------------------------------------------
    /// Which in-memory index implementation to use
    pub index_type: IndexType,
}

/// Selects the in-memory index implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    /// Ordered balanced tree (byte-wise lexicographic key order)
    BTree,

    /// Adaptive radix tree. Not implemented: selecting it is a fatal
    /// configuration error, never a silent fallback.
    AdaptiveRadixTree,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            dir_path: PathBuf::from("./bitkv_data"),
            max_file_size: 256 * 1024 * 1024, // 256 MB
            sync_writes: false,
            index_type: IndexType::BTree,
        }
    }
}

impl Options {
    /// Create a new options builder
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    /// Validate the options. Called by `Engine::open` before any state is
    /// created on disk.
    pub fn validate(&self) -> Result<()> {
        if self.dir_path.as_os_str().is_empty() {
            return Err(BitkvError::Config(
                "database dir path is empty".to_string(),
            ));
        }

        if self.max_file_size == 0 {
            return Err(BitkvError::Config(
                "data file size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for Options
#[derive(Default)]
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    /// Set the database directory
    pub fn dir_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.dir_path = path.into();
        self
    }

    /// Set the max data file size before rotation (in bytes)
    pub fn max_file_size(mut self, size: u64) -> Self {
        self.options.max_file_size = size;
        self
    }

    /// Set whether every write fsyncs before returning
    pub fn sync_writes(mut self, sync: bool) -> Self {
        self.options.sync_writes = sync;
        self
    }

    /// Set the index implementation
    pub fn index_type(mut self, index_type: IndexType) -> Self {
        self.options.index_type = index_type;
        self
    }

    pub fn build(self) -> Options {
        self.options
    }
}

//! Error types for bitkv
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using BitkvError
pub type Result<T> = std::result::Result<T, BitkvError>;

/// Unified error type for bitkv operations
#[derive(Debug, Error)]
pub enum BitkvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // User-Facing Operation Errors
    // -------------------------------------------------------------------------
    #[error("Key is empty")]
    EmptyKey,

    #[error("Key not found")]
    KeyNotFound,

    // -------------------------------------------------------------------------
    // Data File Errors
    // -------------------------------------------------------------------------
    /// A position in the index referred to a file the engine does not hold.
    /// Internal-consistency fault: the index and the file set diverged.
    #[error("Data file not found")]
    DataFileNotFound,

    /// A file in the database directory matched the data-file suffix but its
    /// name could not be parsed as a file id. Fatal at open: the directory is
    /// assumed exclusively owned by the engine.
    #[error("Data file corrupted: {0}")]
    DataFileCorrupted(String),

    /// Checksum mismatch on a single record. Scoped to the record being read;
    /// the rest of the file and database stay usable.
    #[error("Record corruption detected: {0}")]
    Corruption(String),

    // -------------------------------------------------------------------------
    // Index Errors
    // -------------------------------------------------------------------------
    /// The index reported a failed mutation. Surfaced rather than ignored so
    /// the log and index never diverge silently.
    #[error("Index update failed")]
    IndexUpdateFailed,
}

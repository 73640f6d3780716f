//! # bitkv
//!
//! An embedded, log-structured ("bitcask") key-value storage engine with:
//! - Append-only data files with CRC32-checksummed records
//! - Crash recovery by replaying every data file at startup
//! - Single-writer/multi-reader concurrency model
//! - Pluggable ordered in-memory index
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Engine                                │
//! │              (put / get / delete / close)                    │
//! └────────────┬─────────────────────────────────┬──────────────┘
//!              │                                 │
//!              ▼                                 ▼
//!       ┌─────────────┐                   ┌─────────────┐
//!       │    Index    │                   │  DataFiles  │
//!       │ (key → pos) │                   │ (1 active + │
//!       └─────────────┘                   │  N older)   │
//!                                         └──────┬──────┘
//!                                                │
//!                                                ▼
//!                                         ┌─────────────┐
//!                                         │  IoManager  │
//!                                         │ (raw file)  │
//!                                         └─────────────┘
//! ```
//!
//! Writes append an encoded record to the active file, then point the index
//! at its position. Reads resolve the position through the index and read the
//! record bytes back without taking the engine lock — safe because bytes at a
//! published position are never overwritten.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod fio;
pub mod data;
pub mod index;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BitkvError, Result};
pub use config::{IndexType, Options};
pub use engine::Engine;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of bitkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

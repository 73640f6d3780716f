//! Data file layer
//!
//! Defines the on-disk record format and the append-only data file that
//! stores encoded records.
//!
//! ## Responsibilities
//! - Encode/decode log records with CRC32 checksums
//! - Append records to the active data file
//! - Random-offset record reads for gets and startup replay
//!
//! ## Record Format
//! ```text
//! ┌─────────┬──────────┬─────────────┬───────────────┬─────┬───────┐
//! │ CRC (4) │ type (1) │ key_len     │ value_len     │ key │ value │
//! │   LE    │  0|1     │ (varint ≤5) │ (varint ≤5)   │     │       │
//! └─────────┴──────────┴─────────────┴───────────────┴─────┴───────┘
//! ```
//! The CRC covers every byte after itself (type, lengths, key, value).

mod file;
mod record;

pub use file::{data_file_path, parse_file_id, DataFile, DATA_FILE_SUFFIX};
pub use record::{
    decode_log_record_header, encode_log_record, LogRecord, LogRecordHeader, LogRecordPos,
    RecordType, MAX_LOG_RECORD_HEADER_SIZE,
};

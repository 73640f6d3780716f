//! Append-only data file
//!
//! One `DataFile` owns one on-disk log file. Exactly one data file is active
//! (receives appends) at any time; all others are older, immutable files that
//! only serve reads.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::warn;

use crate::error::{BitkvError, Result};
use crate::fio::{new_io_manager, IoManager};

use super::record::{
    decode_log_record_header, log_record_crc, LogRecord, CRC_SIZE, MAX_LOG_RECORD_HEADER_SIZE,
};

/// Suffix every data file name carries
pub const DATA_FILE_SUFFIX: &str = ".data";

/// One physical log file
///
/// ## Concurrency:
/// - `write_off`: atomic append cursor, advanced only by the engine's single
///   writer
/// - `read_log_record` takes `&self` and is safe for concurrent readers: it
///   only touches bytes below offsets that were fully written before the
///   position became visible
pub struct DataFile {
    /// Numeric identity; also encodes creation order
    file_id: u32,

    /// Logical end of the file: where the next append lands
    write_off: AtomicU64,

    /// Owned raw file handle
    io: Box<dyn IoManager>,
}

impl DataFile {
    /// Open (or create) the data file with the given id inside `dir`.
    ///
    /// The write offset starts at the current physical size; startup replay
    /// lowers it past any unreadable trailing bytes on the active file.
    pub fn open(dir: &Path, file_id: u32) -> Result<Self> {
        let path = data_file_path(dir, file_id);
        let io = new_io_manager(&path)?;
        let size = io.size()?;

        Ok(Self {
            file_id,
            write_off: AtomicU64::new(size),
            io,
        })
    }

    pub fn file_id(&self) -> u32 {
        self.file_id
    }

    /// Current append cursor
    pub fn write_off(&self) -> u64 {
        self.write_off.load(Ordering::Acquire)
    }

    /// Reposition the append cursor. Used by recovery to resume after the
    /// last valid record, discarding a partially-written tail.
    pub fn set_write_off(&self, offset: u64) {
        self.write_off.store(offset, Ordering::Release);
    }

    /// Append `buf` at the current write offset and advance it.
    ///
    /// Bytes below the pre-append offset are never touched — the append-only
    /// invariant concurrent readers rely on.
    pub fn append(&self, buf: &[u8]) -> Result<usize> {
        let offset = self.write_off.load(Ordering::Acquire);
        let n = self.io.write_at(buf, offset)?;
        self.write_off.store(offset + n as u64, Ordering::Release);
        Ok(n)
    }

    /// Read the record starting at `offset`.
    ///
    /// Returns the record and the total bytes it occupies (header + key +
    /// value) so callers can advance to the next record. `Ok(None)` signals
    /// end-of-data: the offset is at or past the end of the file, or the
    /// remaining bytes do not form a complete record (a crash mid-write
    /// leaves such a tail — recovery stops there and reclaims it).
    pub fn read_log_record(&self, offset: u64) -> Result<Option<(LogRecord, u64)>> {
        let file_size = self.io.size()?;
        if offset >= file_size {
            return Ok(None);
        }

        // Clamp the header read so it never passes the end of the file
        let mut header_size = MAX_LOG_RECORD_HEADER_SIZE as u64;
        if offset + header_size > file_size {
            header_size = file_size - offset;
        }

        let mut header_buf = vec![0u8; header_size as usize];
        self.read_exact_at(&mut header_buf, offset)?;

        let (header, header_len) = match decode_log_record_header(&header_buf) {
            Some(decoded) => decoded,
            None => return Ok(None),
        };

        // A zeroed region reads as an all-zero header; live records always
        // carry a non-empty key.
        if header.key_len == 0 {
            return Ok(None);
        }

        let key_len = header.key_len as u64;
        let value_len = header.value_len as u64;
        let record_size = header_len as u64 + key_len + value_len;

        // Declared body extends past the end of the file: truncated tail
        if offset + record_size > file_size {
            return Ok(None);
        }

        let mut kv_buf = vec![0u8; (key_len + value_len) as usize];
        self.read_exact_at(&mut kv_buf, offset + header_len as u64)?;

        let value = kv_buf.split_off(key_len as usize);
        let record = LogRecord {
            key: kv_buf,
            value,
            record_type: header.record_type,
        };

        let crc = log_record_crc(&record, &header_buf[CRC_SIZE..header_len]);
        if crc != header.crc {
            warn!(
                file_id = self.file_id,
                offset, "record checksum mismatch"
            );
            return Err(BitkvError::Corruption(format!(
                "crc mismatch at file {} offset {}",
                self.file_id, offset
            )));
        }

        Ok(Some((record, record_size)))
    }

    /// Flush to durable storage.
    pub fn sync(&self) -> Result<()> {
        self.io.sync()
    }

    /// Read exactly `buf.len()` bytes at `offset`, failing on a short read.
    fn read_exact_at(&self, buf: &mut [u8], offset: u64) -> Result<()> {
        let n = self.io.read_at(buf, offset)?;
        if n != buf.len() {
            return Err(BitkvError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "short read at offset {offset}: wanted {} bytes, got {n}",
                    buf.len()
                ),
            )));
        }
        Ok(())
    }
}

/// Path of the data file with the given id inside `dir`,
/// e.g. `dir/000000003.data`.
pub fn data_file_path(dir: &Path, file_id: u32) -> PathBuf {
    dir.join(format!("{file_id:09}{DATA_FILE_SUFFIX}"))
}

/// Parse a data-file id from a file name.
/// `"000000042.data"` → `Some(Ok(42))`; names without the suffix → `None`.
///
/// A name that carries the suffix but whose stem is not a valid id yields a
/// `DataFileCorrupted` error: the directory is assumed exclusively owned by
/// the engine, so such a file means something tampered with it.
pub fn parse_file_id(file_name: &str) -> Option<Result<u32>> {
    let stem = file_name.strip_suffix(DATA_FILE_SUFFIX)?;
    Some(stem.parse::<u32>().map_err(|_| {
        BitkvError::DataFileCorrupted(format!("unparsable data file name: {file_name}"))
    }))
}

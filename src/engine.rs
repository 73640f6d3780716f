//! Engine Module
//!
//! The storage engine that coordinates data files and the in-memory index.
//!
//! ## Responsibilities
//! - Put/Get/Delete over one open database directory
//! - Rotate the active data file at the configured size threshold
//! - Rebuild the index at startup by replaying every data file
//! - Sync and release every file on close
//!
//! ## Concurrency Model: Single-Writer / Multiple-Reader
//!
//! - **Writes** (put/delete): serialized by the write half of `files`
//!   - One writer at a time holds the lock across the whole
//!     rotate-then-append sequence
//!   - The index is updated only after the append succeeded, outside the
//!     file lock
//!
//! - **Reads** (get): take the read half of `files` only long enough to
//!   resolve the key's position to a file handle; the physical record read
//!   happens with no engine lock held. Safe because files are append-only:
//!   bytes at a published position are never overwritten or truncated while
//!   the database is open.

use std::collections::HashMap;
use std::fs;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::config::Options;
use crate::data::{encode_log_record, parse_file_id, DataFile, LogRecord, LogRecordPos, RecordType};
use crate::error::{BitkvError, Result};
use crate::index::{new_indexer, Indexer};

/// The set of open data files: one active (append target) plus the older,
/// immutable files keyed by id.
struct FileSet {
    active: Option<Arc<DataFile>>,
    older: HashMap<u32, Arc<DataFile>>,
}

/// An open bitcask database handle
pub struct Engine {
    options: Options,

    /// Active + older data files. Writers hold the write half across the
    /// whole rotation/append sequence; readers only to resolve a handle.
    files: RwLock<FileSet>,

    /// Key → latest log position. Internally synchronized.
    index: Box<dyn Indexer>,
}

impl Engine {
    /// Open (or create) a database in the configured directory.
    ///
    /// On startup:
    /// 1. Validate options
    /// 2. Create the directory if it doesn't exist
    /// 3. Discover data files and sort them by id
    /// 4. Open every file; the highest id becomes the active file
    /// 5. Replay every file in ascending id order to rebuild the index
    pub fn open(options: Options) -> Result<Self> {
        options.validate()?;

        fs::create_dir_all(&options.dir_path)?;

        let index = new_indexer(options.index_type)?;

        let file_ids = discover_file_ids(&options)?;

        let mut file_set = FileSet {
            active: None,
            older: HashMap::new(),
        };
        for (i, &file_id) in file_ids.iter().enumerate() {
            let file = Arc::new(DataFile::open(&options.dir_path, file_id)?);
            if i == file_ids.len() - 1 {
                file_set.active = Some(file);
            } else {
                file_set.older.insert(file_id, file);
            }
        }

        let engine = Self {
            options,
            files: RwLock::new(file_set),
            index,
        };

        engine.load_index_from_data_files(&file_ids)?;

        info!(
            dir = %engine.options.dir_path.display(),
            data_files = file_ids.len(),
            "opened database"
        );

        Ok(engine)
    }

    /// Store `value` under `key`.
    ///
    /// Appends a record to the active file (rotating first if the projected
    /// size would exceed the limit), then points the index at it. The index
    /// is only updated after the append succeeded, so it never references
    /// bytes that are not on the log.
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        if key.is_empty() {
            return Err(BitkvError::EmptyKey);
        }

        let record = LogRecord {
            key: key.to_vec(),
            value: value.to_vec(),
            record_type: RecordType::Normal,
        };
        let pos = self.append_log_record(&record)?;

        if !self.index.put(key.to_vec(), pos) {
            return Err(BitkvError::IndexUpdateFailed);
        }

        Ok(())
    }

    /// Fetch the latest value for `key`.
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        if key.is_empty() {
            return Err(BitkvError::EmptyKey);
        }

        let pos = self.index.get(key).ok_or(BitkvError::KeyNotFound)?;

        // Resolve the position to a file handle under the lock, then read
        // the record bytes with the lock released.
        let file = {
            let files = self.files.read();
            match &files.active {
                Some(active) if active.file_id() == pos.file_id => Arc::clone(active),
                _ => files
                    .older
                    .get(&pos.file_id)
                    .cloned()
                    .ok_or(BitkvError::DataFileNotFound)?,
            }
        };

        let (record, _) = file.read_log_record(pos.offset)?.ok_or_else(|| {
            BitkvError::Corruption(format!(
                "no record at indexed position (file {} offset {})",
                pos.file_id, pos.offset
            ))
        })?;

        // A tombstone is addressable on disk but never a valid read result
        if record.record_type == RecordType::Deleted {
            return Err(BitkvError::KeyNotFound);
        }

        Ok(record.value)
    }

    /// Delete `key`.
    ///
    /// Deletion is itself logged: a tombstone record is appended, then the
    /// key is removed from the index. Deleting an absent key is a no-op and
    /// appends nothing.
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        if key.is_empty() {
            return Err(BitkvError::EmptyKey);
        }

        if self.index.get(key).is_none() {
            return Ok(());
        }

        let record = LogRecord {
            key: key.to_vec(),
            value: Vec::new(),
            record_type: RecordType::Deleted,
        };
        self.append_log_record(&record)?;

        if !self.index.delete(key) {
            return Err(BitkvError::IndexUpdateFailed);
        }

        Ok(())
    }

    /// Flush the active data file to durable storage.
    pub fn sync(&self) -> Result<()> {
        let files = self.files.read();
        if let Some(active) = &files.active {
            active.sync()?;
        }
        Ok(())
    }

    /// Sync and release every data file. The handle must not be used
    /// afterwards.
    pub fn close(&self) -> Result<()> {
        let mut files = self.files.write();
        if let Some(active) = files.active.take() {
            active.sync()?;
        }
        files.older.clear();
        Ok(())
    }

    // =========================================================================
    // Write Path
    // =========================================================================

    /// Append an encoded record to the active file, rotating first if the
    /// projected post-append size would exceed the configured limit.
    ///
    /// Holds the file-set write lock for the entire sequence: rotation
    /// decisions and appends are mutually exclusive with each other and with
    /// readers resolving file handles.
    fn append_log_record(&self, record: &LogRecord) -> Result<LogRecordPos> {
        let mut files = self.files.write();

        let encoded = encode_log_record(record);
        let size = encoded.len() as u64;

        let mut active = match &files.active {
            Some(active) => Arc::clone(active),
            None => {
                // First write ever: create file 0 lazily
                let file = Arc::new(DataFile::open(&self.options.dir_path, 0)?);
                files.active = Some(Arc::clone(&file));
                file
            }
        };

        if active.write_off() + size > self.options.max_file_size {
            // Seal the current file and start the next id. Sealed files are
            // never appended to again.
            active.sync()?;

            let next_id = active.file_id() + 1;
            files.older.insert(active.file_id(), active);

            let new_file = Arc::new(DataFile::open(&self.options.dir_path, next_id)?);
            files.active = Some(Arc::clone(&new_file));
            active = new_file;

            debug!(file_id = next_id, "rotated active data file");
        }

        let offset = active.write_off();
        active.append(&encoded)?;

        if self.options.sync_writes {
            active.sync()?;
        }

        Ok(LogRecordPos {
            file_id: active.file_id(),
            offset,
        })
    }

    // =========================================================================
    // Startup Recovery
    // =========================================================================

    /// Rebuild the index by replaying every data file in ascending id order.
    ///
    /// Normal records insert their position; tombstones delete the key. The
    /// active file's write offset is left at the end of its last valid
    /// record, so appending resumes there and any unreadable tail from a
    /// crash mid-write is discarded.
    fn load_index_from_data_files(&self, file_ids: &[u32]) -> Result<()> {
        let files = self.files.read();

        for (i, &file_id) in file_ids.iter().enumerate() {
            let file = match &files.active {
                Some(active) if active.file_id() == file_id => active,
                _ => files
                    .older
                    .get(&file_id)
                    .ok_or(BitkvError::DataFileNotFound)?,
            };

            let mut offset: u64 = 0;
            let mut records: u64 = 0;
            while let Some((record, size)) = file.read_log_record(offset)? {
                let pos = LogRecordPos { file_id, offset };
                match record.record_type {
                    RecordType::Deleted => {
                        self.index.delete(&record.key);
                    }
                    RecordType::Normal => {
                        self.index.put(record.key, pos);
                    }
                }

                offset += size;
                records += 1;
            }

            debug!(file_id, records, end_offset = offset, "replayed data file");

            if i == file_ids.len() - 1 {
                file.set_write_off(offset);
            }
        }

        Ok(())
    }
}

/// Scan the database directory for data files and return their ids sorted
/// ascending. A name that matches the data-file suffix but has an
/// unparsable id is fatal corruption.
fn discover_file_ids(options: &Options) -> Result<Vec<u32>> {
    let mut file_ids = Vec::new();

    for entry in fs::read_dir(&options.dir_path)? {
        let entry = entry?;
        let file_name = entry.file_name();

        if let Some(parsed) = parse_file_id(&file_name.to_string_lossy()) {
            file_ids.push(parsed?);
        }
    }

    file_ids.sort_unstable();
    Ok(file_ids)
}

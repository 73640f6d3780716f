//! Tests for DataFile
//!
//! These tests verify:
//! - Opening/creating data files by id (zero-padded naming)
//! - Appending with write-offset tracking
//! - Reading records back at arbitrary offsets
//! - End-of-data signaling (file end, truncated tails, garbage bytes)
//! - Checksum mismatch surfaces as corruption

use std::fs;
use std::path::PathBuf;

use bitkv::data::{data_file_path, encode_log_record, parse_file_id, DataFile, LogRecord, RecordType};
use bitkv::BitkvError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().to_path_buf();
    (temp_dir, path)
}

fn encoded(key: &[u8], value: &[u8], record_type: RecordType) -> Vec<u8> {
    encode_log_record(&LogRecord {
        key: key.to_vec(),
        value: value.to_vec(),
        record_type,
    })
}

// =============================================================================
// Naming Tests
// =============================================================================

#[test]
fn test_open_creates_zero_padded_file() {
    let (_temp, dir) = setup();

    let file = DataFile::open(&dir, 3).unwrap();
    assert_eq!(file.file_id(), 3);
    assert_eq!(file.write_off(), 0);

    assert!(dir.join("000000003.data").exists());
}

#[test]
fn test_parse_file_id() {
    assert_eq!(parse_file_id("000000042.data").unwrap().unwrap(), 42);
    assert_eq!(parse_file_id("000000000.data").unwrap().unwrap(), 0);

    // No suffix: not a data file at all
    assert!(parse_file_id("notes.txt").is_none());
    assert!(parse_file_id("000000001.data.bak").is_none());

    // Suffix but unparsable id: corruption
    assert!(parse_file_id("abcdefghi.data").unwrap().is_err());
}

// =============================================================================
// Append / Read Tests
// =============================================================================

#[test]
fn test_append_advances_write_off() {
    let (_temp, dir) = setup();
    let file = DataFile::open(&dir, 0).unwrap();

    let bytes = encoded(b"a", b"1", RecordType::Normal);
    file.append(&bytes).unwrap();
    assert_eq!(file.write_off(), bytes.len() as u64);

    file.append(&bytes).unwrap();
    assert_eq!(file.write_off(), 2 * bytes.len() as u64);
}

#[test]
fn test_read_records_sequentially() {
    let (_temp, dir) = setup();
    let file = DataFile::open(&dir, 0).unwrap();

    let first = encoded(b"alpha", b"one", RecordType::Normal);
    let second = encoded(b"beta", b"two", RecordType::Normal);
    file.append(&first).unwrap();
    file.append(&second).unwrap();

    let (record, size) = file.read_log_record(0).unwrap().unwrap();
    assert_eq!(record.key, b"alpha");
    assert_eq!(record.value, b"one");
    assert_eq!(record.record_type, RecordType::Normal);
    assert_eq!(size, first.len() as u64);

    let (record, size) = file.read_log_record(first.len() as u64).unwrap().unwrap();
    assert_eq!(record.key, b"beta");
    assert_eq!(record.value, b"two");
    assert_eq!(size, second.len() as u64);

    // Past the last record: end of data
    assert!(file
        .read_log_record((first.len() + second.len()) as u64)
        .unwrap()
        .is_none());
}

#[test]
fn test_read_tombstone_record() {
    let (_temp, dir) = setup();
    let file = DataFile::open(&dir, 0).unwrap();

    file.append(&encoded(b"doomed", b"", RecordType::Deleted))
        .unwrap();

    let (record, _) = file.read_log_record(0).unwrap().unwrap();
    assert_eq!(record.record_type, RecordType::Deleted);
    assert_eq!(record.key, b"doomed");
    assert!(record.value.is_empty());
}

#[test]
fn test_read_empty_value_record() {
    let (_temp, dir) = setup();
    let file = DataFile::open(&dir, 0).unwrap();

    file.append(&encoded(b"empty", b"", RecordType::Normal))
        .unwrap();

    let (record, _) = file.read_log_record(0).unwrap().unwrap();
    assert_eq!(record.key, b"empty");
    assert!(record.value.is_empty());
}

#[test]
fn test_read_empty_file_is_end_of_data() {
    let (_temp, dir) = setup();
    let file = DataFile::open(&dir, 0).unwrap();
    assert!(file.read_log_record(0).unwrap().is_none());
}

// =============================================================================
// Crash-Tail Tests
// =============================================================================

#[test]
fn test_truncated_record_reads_as_end_of_data() {
    let (_temp, dir) = setup();
    let file = DataFile::open(&dir, 0).unwrap();

    let whole = encoded(b"complete", b"record", RecordType::Normal);
    file.append(&whole).unwrap();

    // Simulate a crash mid-write: only half of the next record made it
    let partial = encoded(b"partial", b"never-finished", RecordType::Normal);
    file.append(&partial[..partial.len() / 2]).unwrap();

    let (record, size) = file.read_log_record(0).unwrap().unwrap();
    assert_eq!(record.key, b"complete");
    assert!(file.read_log_record(size).unwrap().is_none());
}

#[test]
fn test_reopened_file_resumes_at_physical_end() {
    let (_temp, dir) = setup();
    let bytes = encoded(b"k", b"v", RecordType::Normal);

    {
        let file = DataFile::open(&dir, 0).unwrap();
        file.append(&bytes).unwrap();
        file.sync().unwrap();
    }

    let file = DataFile::open(&dir, 0).unwrap();
    assert_eq!(file.write_off(), bytes.len() as u64);

    let (record, _) = file.read_log_record(0).unwrap().unwrap();
    assert_eq!(record.key, b"k");
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_flipped_byte_fails_checksum() {
    let (_temp, dir) = setup();

    {
        let file = DataFile::open(&dir, 7).unwrap();
        file.append(&encoded(b"key", b"value", RecordType::Normal))
            .unwrap();
        file.sync().unwrap();
    }

    // Flip one byte inside the value region
    let path = data_file_path(&dir, 7);
    let mut bytes = fs::read(&path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    fs::write(&path, &bytes).unwrap();

    let file = DataFile::open(&dir, 7).unwrap();
    match file.read_log_record(0) {
        Err(BitkvError::Corruption(_)) => {}
        other => panic!("expected corruption error, got {other:?}"),
    }
}

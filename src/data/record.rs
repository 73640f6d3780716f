//! Log record definitions and codec
//!
//! A record exists as a struct only while being encoded or decoded; only its
//! encoded bytes are ever persisted.

use bytes::BufMut;

/// Size of the CRC32 field at the start of every record
pub(crate) const CRC_SIZE: usize = 4;

/// Max encoded length of a 32-bit varint
const MAX_VARINT32_LEN: usize = 5;

/// Largest possible header: CRC + type byte + two maximally-encoded varints
pub const MAX_LOG_RECORD_HEADER_SIZE: usize = CRC_SIZE + 1 + MAX_VARINT32_LEN * 2;

/// Kind of a log record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordType {
    /// A live key-value write
    Normal = 0,

    /// A tombstone marking the key as deleted
    Deleted = 1,
}

impl RecordType {
    /// Decode a type byte. `None` for anything but the known discriminants,
    /// so garbage bytes at a file tail never masquerade as a record.
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(RecordType::Normal),
            1 => Some(RecordType::Deleted),
            _ => None,
        }
    }
}

/// A single logical write (or delete) destined for the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
    pub record_type: RecordType,
}

/// Decoded metadata preceding a record's key/value bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRecordHeader {
    /// CRC32 over every record byte after the checksum itself
    pub crc: u32,
    pub record_type: RecordType,
    pub key_len: u32,
    pub value_len: u32,
}

/// Position of one record: which file, and the byte offset it starts at.
///
/// Immutable once produced — the append-only invariant guarantees the bytes
/// at a published position are never overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRecordPos {
    pub file_id: u32,
    pub offset: u64,
}

/// Encode a record into its on-disk byte layout.
///
/// The returned buffer is the complete record: header (with the CRC filled
/// in) followed by key and value bytes.
pub fn encode_log_record(record: &LogRecord) -> Vec<u8> {
    let mut buf =
        Vec::with_capacity(MAX_LOG_RECORD_HEADER_SIZE + record.key.len() + record.value.len());

    // CRC placeholder, patched once the rest of the record is in place
    buf.put_u32_le(0);
    buf.put_u8(record.record_type as u8);
    put_uvarint(&mut buf, record.key.len() as u64);
    put_uvarint(&mut buf, record.value.len() as u64);
    buf.extend_from_slice(&record.key);
    buf.extend_from_slice(&record.value);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&buf[CRC_SIZE..]);
    let crc = hasher.finalize();
    buf[..CRC_SIZE].copy_from_slice(&crc.to_le_bytes());

    buf
}

/// Decode a record header from the front of `buf`.
///
/// Returns the header and the number of bytes it occupied, or `None` when
/// `buf` is too short to hold a complete header or the type byte is not a
/// known discriminant — both mean "no record starts here" (truncated or
/// garbage tail), which callers treat as end-of-data.
pub fn decode_log_record_header(buf: &[u8]) -> Option<(LogRecordHeader, usize)> {
    if buf.len() <= CRC_SIZE + 1 {
        return None;
    }

    let crc = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let record_type = RecordType::from_u8(buf[CRC_SIZE])?;

    let mut pos = CRC_SIZE + 1;
    let (key_len, n) = uvarint(&buf[pos..])?;
    pos += n;
    let (value_len, n) = uvarint(&buf[pos..])?;
    pos += n;

    if key_len > u32::MAX as u64 || value_len > u32::MAX as u64 {
        return None;
    }

    Some((
        LogRecordHeader {
            crc,
            record_type,
            key_len: key_len as u32,
            value_len: value_len as u32,
        },
        pos,
    ))
}

/// Compute the CRC a stored record should carry, from its decoded parts.
///
/// `header_rest` is the header bytes after the CRC field (type + lengths),
/// exactly as read from disk.
pub fn log_record_crc(record: &LogRecord, header_rest: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(header_rest);
    hasher.update(&record.key);
    hasher.update(&record.value);
    hasher.finalize()
}

// =============================================================================
// Varint helpers (LEB128, unsigned)
// =============================================================================

/// Append `value` as an unsigned LEB128 varint.
fn put_uvarint(buf: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        buf.put_u8((value as u8) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

/// Decode an unsigned LEB128 varint from the front of `buf`.
///
/// Returns the value and the number of bytes consumed, or `None` if the
/// buffer ends mid-varint.
fn uvarint(buf: &[u8]) -> Option<(u64, usize)> {
    let mut value: u64 = 0;
    let mut shift: u32 = 0;

    for (i, &byte) in buf.iter().enumerate() {
        if shift >= 64 {
            return None;
        }

        value |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
        shift += 7;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uvarint_round_trip() {
        for value in [0u64, 1, 127, 128, 300, 16_383, 16_384, u32::MAX as u64] {
            let mut buf = Vec::new();
            put_uvarint(&mut buf, value);
            assert!(buf.len() <= MAX_VARINT32_LEN);

            let (decoded, n) = uvarint(&buf).unwrap();
            assert_eq!(decoded, value);
            assert_eq!(n, buf.len());
        }
    }

    #[test]
    fn test_uvarint_truncated() {
        let mut buf = Vec::new();
        put_uvarint(&mut buf, 300);
        assert!(uvarint(&buf[..1]).is_none());
    }
}

//! Standard-file `IoManager` implementation

use std::fs::{File, OpenOptions};
use std::os::unix::fs::FileExt;
use std::path::Path;

use crate::error::Result;

use super::IoManager;

/// `IoManager` backed by a `std::fs::File`.
///
/// Reads and writes use the positional `FileExt` calls, so they never touch
/// a seek cursor and a single handle can serve concurrent readers alongside
/// the writer.
pub struct FileIo {
    file: File,
}

impl FileIo {
    /// Open (or create) the file at `path` for random read + write.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(path)?;

        Ok(Self { file })
    }
}

impl IoManager for FileIo {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        let n = self.file.read_at(buf, offset)?;
        Ok(n)
    }

    fn write_at(&self, buf: &[u8], offset: u64) -> Result<usize> {
        self.file.write_all_at(buf, offset)?;
        Ok(buf.len())
    }

    fn sync(&self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    fn size(&self) -> Result<u64> {
        let meta = self.file.metadata()?;
        Ok(meta.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read_at() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("fio_test.data");

        let io = FileIo::open(&path).unwrap();
        assert_eq!(io.write_at(b"hello", 0).unwrap(), 5);
        assert_eq!(io.write_at(b"world", 5).unwrap(), 5);
        assert_eq!(io.size().unwrap(), 10);

        let mut buf = [0u8; 5];
        io.read_at(&mut buf, 5).unwrap();
        assert_eq!(&buf, b"world");
    }

    #[test]
    fn test_read_past_end_is_short() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("fio_short.data");

        let io = FileIo::open(&path).unwrap();
        io.write_at(b"abc", 0).unwrap();

        let mut buf = [0u8; 8];
        let n = io.read_at(&mut buf, 0).unwrap();
        assert_eq!(n, 3);
    }
}

//! Raw file I/O capability
//!
//! The storage engine only requires a small capability set over an OS file:
//! positional reads and writes, fsync, and size. `IoManager` captures that
//! seam so data files stay independent of how the bytes are actually stored.

mod file_io;

pub use file_io::FileIo;

use std::path::Path;

use crate::error::Result;

/// Capability set a data file requires from its backing file.
///
/// All methods take `&self`: a single handle is shared by the engine's one
/// writer and many concurrent readers, so neither reads nor writes may move
/// a shared cursor (the engine's own lock serializes writers).
pub trait IoManager: Send + Sync {
    /// Read up to `buf.len()` bytes starting at `offset`.
    fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize>;

    /// Write all of `buf` starting at `offset`, returning bytes written.
    fn write_at(&self, buf: &[u8], offset: u64) -> Result<usize>;

    /// Flush to durable storage.
    fn sync(&self) -> Result<()>;

    /// Current size of the file in bytes.
    fn size(&self) -> Result<u64>;
}

/// Open the default `IoManager` implementation for `path`, creating the
/// file if absent.
pub fn new_io_manager(path: &Path) -> Result<Box<dyn IoManager>> {
    Ok(Box::new(FileIo::open(path)?))
}

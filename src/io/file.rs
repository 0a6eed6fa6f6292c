//! File-backed reader.

use std::fs::File;
use std::path::Path;

use crate::error::Result;
use crate::io::buffered::{BackingStore, BufferedReader};

/// Backing store over an open file, using positioned reads.
pub struct FileStore {
    file: File,
}

impl FileStore {
    pub fn new(file: File) -> Self {
        Self { file }
    }
}

#[cfg(unix)]
fn read_at_once(file: &File, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
    use std::os::unix::fs::FileExt; // pread
    file.read_at(buf, offset)
}

#[cfg(windows)]
fn read_at_once(file: &File, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
    use std::os::windows::fs::FileExt;
    file.seek_read(buf, offset)
}

#[cfg(all(not(unix), not(windows)))]
fn read_at_once(file: &File, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
    // Fallback for platforms without positioned reads.
    use std::io::{Read, Seek, SeekFrom};
    let mut file = file;
    file.seek(SeekFrom::Start(offset))?;
    file.read(buf)
}

impl BackingStore for FileStore {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        // Positioned reads may return short; loop until the buffer is full
        // or the file reports end-of-stream.
        let mut filled = 0;
        while filled < buf.len() {
            let read = read_at_once(&self.file, offset + filled as u64, &mut buf[filled..])?;
            if read == 0 {
                break;
            }
            filled += read;
        }
        Ok(filled)
    }

    fn seek(&mut self, _offset: u64) -> Result<()> {
        // Reads carry their own offset; there is no file cursor to move.
        Ok(())
    }
}

/// A buffered [`BinaryReader`](crate::BinaryReader) over a file.
///
/// Dropping the reader closes the file handle.
pub type FileReader = BufferedReader<FileStore>;

impl FileReader {
    /// Opens `path` read-only, sized from file metadata.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        Ok(BufferedReader::new(FileStore::new(file), size))
    }
}

//! Random-access readers over in-memory, file-backed, chunk-compressed and
//! composed byte streams.
//!
//! Callers only ever talk to [`BinaryReader`]; which concrete stack sits
//! underneath is invisible. A [`ChunkedReader`] may wrap a [`FileReader`],
//! a [`SequenceReader`] may compose a mix of [`MemoryReader`]s and
//! [`FileReader`]s, and may itself be wrapped by a [`ChunkedReader`].

mod buffered;
mod chunked;
mod file;
mod memory;
mod sequence;

pub use buffered::{BackingStore, BufferedReader};
pub use chunked::{Chunk, ChunkedReader};
pub use file::{FileReader, FileStore};
pub use memory::MemoryReader;
pub use sequence::{SequenceReader, SequenceStore};

use crate::endian::{self, ByteOrder};
use crate::error::{Error, Result};

/// A seekable, byte-order-aware cursor over binary data.
///
/// Reads are exact: a bulk read either fully fills the destination or fails
/// with [`Error::EndOfData`] — short reads are never surfaced. Reading past
/// the end and seeking out of bounds are distinct errors, so callers can
/// treat "ran out of input" differently from a caller bug.
///
/// Readers are single-owner state machines; resource release happens on drop
/// and cascades through composed readers to every constituent.
pub trait BinaryReader {
    /// Reads exactly `dst.len()` bytes, advancing the cursor by that amount.
    ///
    /// On failure the cursor is left at its pre-call position.
    fn read_bytes(&mut self, dst: &mut [u8]) -> Result<()>;

    /// Total size of the logical address space in bytes.
    fn size(&self) -> u64;

    /// Current cursor position, `0 <= position <= size`.
    fn position(&self) -> u64;

    /// Moves the cursor to an absolute position in `[0, size]`.
    fn seek(&mut self, position: u64) -> Result<()>;

    /// Byte order applied to primitive reads.
    fn order(&self) -> ByteOrder;

    /// Changes the byte order for future primitive reads.
    fn set_order(&mut self, order: ByteOrder);

    /// Bytes left between the cursor and the end.
    fn remaining(&self) -> u64 {
        self.size() - self.position()
    }

    /// Whether the cursor has reached the end.
    fn is_drained(&self) -> bool {
        self.remaining() == 0
    }

    fn read_u8(&mut self) -> Result<u8> {
        let mut scratch = [0u8; 1];
        self.read_bytes(&mut scratch)?;
        Ok(scratch[0])
    }

    fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    fn read_u16(&mut self) -> Result<u16> {
        let mut scratch = [0u8; 2];
        self.read_bytes(&mut scratch)?;
        Ok(endian::get_u16(&scratch, 0, self.order()))
    }

    fn read_i16(&mut self) -> Result<i16> {
        let mut scratch = [0u8; 2];
        self.read_bytes(&mut scratch)?;
        Ok(endian::get_i16(&scratch, 0, self.order()))
    }

    fn read_u32(&mut self) -> Result<u32> {
        let mut scratch = [0u8; 4];
        self.read_bytes(&mut scratch)?;
        Ok(endian::get_u32(&scratch, 0, self.order()))
    }

    fn read_i32(&mut self) -> Result<i32> {
        let mut scratch = [0u8; 4];
        self.read_bytes(&mut scratch)?;
        Ok(endian::get_i32(&scratch, 0, self.order()))
    }

    fn read_u64(&mut self) -> Result<u64> {
        let mut scratch = [0u8; 8];
        self.read_bytes(&mut scratch)?;
        Ok(endian::get_u64(&scratch, 0, self.order()))
    }

    fn read_i64(&mut self) -> Result<i64> {
        let mut scratch = [0u8; 8];
        self.read_bytes(&mut scratch)?;
        Ok(endian::get_i64(&scratch, 0, self.order()))
    }

    fn read_f32(&mut self) -> Result<f32> {
        let mut scratch = [0u8; 4];
        self.read_bytes(&mut scratch)?;
        Ok(endian::get_f32(&scratch, 0, self.order()))
    }

    fn read_f64(&mut self) -> Result<f64> {
        let mut scratch = [0u8; 8];
        self.read_bytes(&mut scratch)?;
        Ok(endian::get_f64(&scratch, 0, self.order()))
    }

    /// Reads `len` bytes into a freshly allocated vector.
    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut dst = vec![0u8; len];
        self.read_bytes(&mut dst)?;
        Ok(dst)
    }

    /// Reads `len` bytes and decodes them as UTF-8, replacing invalid
    /// sequences.
    fn read_string(&mut self, len: usize) -> Result<String> {
        Ok(String::from_utf8_lossy(&self.read_vec(len)?).into_owned())
    }

    /// Reads a single byte that must be 0 or 1.
    fn read_bool_u8(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(Error::InvalidValue(format!(
                "invalid boolean value: {value}"
            ))),
        }
    }

    /// Reads a 32-bit integer that must be 0 or 1.
    fn read_bool_u32(&mut self) -> Result<bool> {
        match self.read_u32()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(Error::InvalidValue(format!(
                "invalid boolean value: {value}"
            ))),
        }
    }

    /// Reads `count` records through a mapper closure.
    ///
    /// The usual way to decode tables: `reader.read_objects(n, |r| Entry::read(r))`.
    fn read_objects<T, F>(&mut self, count: usize, mut read: F) -> Result<Vec<T>>
    where
        Self: Sized,
        F: FnMut(&mut Self) -> Result<T>,
    {
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(read(self)?);
        }
        Ok(items)
    }
}

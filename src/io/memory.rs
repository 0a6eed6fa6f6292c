//! In-memory reader over an owned byte buffer.

use crate::endian::{self, ByteOrder};
use crate::error::{Error, Result, end_of_data};
use crate::io::BinaryReader;

/// A [`BinaryReader`] over bytes already held in memory.
///
/// No buffering layer, O(1) seeks; primitives decode straight from the
/// backing slice.
pub struct MemoryReader {
    data: Vec<u8>,
    position: usize,
    order: ByteOrder,
}

impl MemoryReader {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            position: 0,
            order: ByteOrder::Native,
        }
    }

    /// Ensures `count` bytes are available at the cursor, returning the
    /// decode offset.
    fn advance(&mut self, count: usize) -> Result<usize> {
        let offset = self.position;
        if count > self.data.len() - offset {
            return Err(end_of_data(
                count as u64,
                (self.data.len() - offset) as u64,
            ));
        }
        self.position += count;
        Ok(offset)
    }
}

impl BinaryReader for MemoryReader {
    fn read_bytes(&mut self, dst: &mut [u8]) -> Result<()> {
        let offset = self.advance(dst.len())?;
        dst.copy_from_slice(&self.data[offset..offset + dst.len()]);
        Ok(())
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn position(&self) -> u64 {
        self.position as u64
    }

    fn seek(&mut self, position: u64) -> Result<()> {
        if position > self.data.len() as u64 {
            return Err(Error::PositionOutOfBounds {
                position,
                size: self.data.len() as u64,
            });
        }
        self.position = position as usize;
        Ok(())
    }

    fn order(&self) -> ByteOrder {
        self.order
    }

    fn set_order(&mut self, order: ByteOrder) {
        self.order = order;
    }

    fn read_u8(&mut self) -> Result<u8> {
        let offset = self.advance(1)?;
        Ok(self.data[offset])
    }

    fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    fn read_u16(&mut self) -> Result<u16> {
        let offset = self.advance(2)?;
        Ok(endian::get_u16(&self.data, offset, self.order))
    }

    fn read_i16(&mut self) -> Result<i16> {
        let offset = self.advance(2)?;
        Ok(endian::get_i16(&self.data, offset, self.order))
    }

    fn read_u32(&mut self) -> Result<u32> {
        let offset = self.advance(4)?;
        Ok(endian::get_u32(&self.data, offset, self.order))
    }

    fn read_i32(&mut self) -> Result<i32> {
        let offset = self.advance(4)?;
        Ok(endian::get_i32(&self.data, offset, self.order))
    }

    fn read_u64(&mut self) -> Result<u64> {
        let offset = self.advance(8)?;
        Ok(endian::get_u64(&self.data, offset, self.order))
    }

    fn read_i64(&mut self) -> Result<i64> {
        let offset = self.advance(8)?;
        Ok(endian::get_i64(&self.data, offset, self.order))
    }

    fn read_f32(&mut self) -> Result<f32> {
        let offset = self.advance(4)?;
        Ok(endian::get_f32(&self.data, offset, self.order))
    }

    fn read_f64(&mut self) -> Result<f64> {
        let offset = self.advance(8)?;
        Ok(endian::get_f64(&self.data, offset, self.order))
    }
}

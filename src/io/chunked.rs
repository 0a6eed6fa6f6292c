//! Reader over compressed data split into independently-addressable chunks.

use crate::compress::Decompressor;
use crate::endian::ByteOrder;
use crate::error::{Error, Result, end_of_data};
use crate::io::BinaryReader;

/// Describes one compressed chunk of the logical stream.
///
/// `offset` addresses the uncompressed logical space, `compressed_offset`
/// the underlying reader. Tables must cover the logical space contiguously,
/// sorted or not; the reader sorts by `offset` at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// Start of the chunk in the logical (uncompressed) address space.
    pub offset: u64,
    /// Start of the compressed bytes in the underlying reader.
    pub compressed_offset: u64,
    /// Uncompressed size in bytes.
    pub size: u32,
    /// Compressed size in bytes.
    pub compressed_size: u32,
}

/// A [`BinaryReader`] presenting an uncompressed view over chunked,
/// compressed data in an underlying reader.
///
/// At most one chunk is materialized at a time; a chunk is decompressed
/// atomically on first touch and stays cached until a read moves to a
/// different chunk. Seeks never decompress anything by themselves.
pub struct ChunkedReader<R> {
    reader: R,
    chunks: Vec<Chunk>,
    decompressor: Box<dyn Decompressor>,
    /// Index of the currently materialized chunk, if any.
    current: Option<usize>,
    compressed: Vec<u8>,
    decompressed: Vec<u8>,
    size: u64,
    position: u64,
    order: ByteOrder,
}

impl<R: BinaryReader> ChunkedReader<R> {
    pub fn new(reader: R, mut chunks: Vec<Chunk>, decompressor: Box<dyn Decompressor>) -> Self {
        chunks.sort_by_key(|chunk| chunk.offset);

        let max_compressed = chunks.iter().map(|c| c.compressed_size).max().unwrap_or(0);
        let max_size = chunks.iter().map(|c| c.size).max().unwrap_or(0);
        let size = chunks
            .last()
            .map(|c| c.offset + c.size as u64)
            .unwrap_or(0);

        Self {
            reader,
            chunks,
            decompressor,
            current: None,
            compressed: vec![0u8; max_compressed as usize],
            decompressed: vec![0u8; max_size as usize],
            size,
            position: 0,
            order: ByteOrder::Native,
        }
    }

    /// Greatest chunk whose logical offset is at or before `position`.
    fn floor(&self, position: u64) -> Option<usize> {
        let upper = self.chunks.partition_point(|c| c.offset <= position);
        upper.checked_sub(1)
    }

    /// Decompresses `chunk` into the scratch buffer and marks it current.
    fn materialize(&mut self, index: usize) -> Result<()> {
        // Drop the cache first: a failure below must not leave a chunk
        // marked current with stale scratch contents.
        self.current = None;

        let chunk = self.chunks[index];
        let compressed_len = chunk.compressed_size as usize;
        let len = chunk.size as usize;

        self.reader.seek(chunk.compressed_offset)?;
        self.reader.read_bytes(&mut self.compressed[..compressed_len])?;
        self.decompressor
            .decompress(&self.compressed[..compressed_len], &mut self.decompressed[..len])?;

        self.current = Some(index);
        Ok(())
    }

    fn read_loop(&mut self, dst: &mut [u8]) -> Result<()> {
        let mut off = 0;
        while off < dst.len() {
            let wanted = (dst.len() - off) as u64;
            let index = self
                .floor(self.position)
                .ok_or_else(|| end_of_data(wanted, 0))?;
            let chunk = self.chunks[index];

            let offset_in_chunk = (self.position - chunk.offset) as usize;
            let available = (chunk.size as usize).saturating_sub(offset_in_chunk);
            if available == 0 {
                // Table exhausted or a gap at this position.
                return Err(end_of_data(wanted, 0));
            }

            if self.current != Some(index) {
                self.materialize(index)?;
            }

            let count = available.min(dst.len() - off);
            dst[off..off + count]
                .copy_from_slice(&self.decompressed[offset_in_chunk..offset_in_chunk + count]);
            self.position += count as u64;
            off += count;
        }
        Ok(())
    }
}

impl<R: BinaryReader> BinaryReader for ChunkedReader<R> {
    fn read_bytes(&mut self, dst: &mut [u8]) -> Result<()> {
        if dst.len() as u64 > self.remaining() {
            return Err(end_of_data(dst.len() as u64, self.remaining()));
        }

        let start = self.position;
        let result = self.read_loop(dst);
        if result.is_err() {
            self.position = start;
        }
        result
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn seek(&mut self, position: u64) -> Result<()> {
        if position > self.size {
            return Err(Error::PositionOutOfBounds {
                position,
                size: self.size,
            });
        }
        // The materialized chunk stays valid; landing back inside it is free.
        self.position = position;
        Ok(())
    }

    fn order(&self) -> ByteOrder {
        self.order
    }

    fn set_order(&mut self, order: ByteOrder) {
        self.order = order;
    }
}

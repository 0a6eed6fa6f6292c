//! Generic buffering layer over a slow backing store.
//!
//! The refill and compaction algorithm is defined once here; concrete
//! backing stores only supply positioned reads and a reposition hint. This
//! replaces the classic abstract-base-class arrangement with a small
//! capability trait.

use crate::endian::{self, ByteOrder};
use crate::error::{Error, Result, end_of_data};
use crate::io::BinaryReader;

/// Default cache window capacity, 16 KiB.
pub const DEFAULT_CAPACITY: usize = 0x4000;

/// The widest primitive must always fit the window.
const MIN_CAPACITY: usize = 8;

/// The two primitives a [`BufferedReader`] needs from its backing store.
pub trait BackingStore {
    /// Reads from the store starting at physical `offset` into `buf`,
    /// returning how many bytes were actually read. May be short only at
    /// end-of-store.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize>;

    /// Repositions the store's cursor for future reads.
    ///
    /// Called only when the cache window is discarded. Stores addressed
    /// purely by offset have nothing to do here.
    fn seek(&mut self, offset: u64) -> Result<()>;
}

/// Reference store over an in-memory buffer, short at the end.
///
/// Serves as the unbuffered baseline in the transparency tests.
impl BackingStore for Vec<u8> {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        if offset >= self.len() as u64 {
            return Ok(0);
        }
        let offset = offset as usize;
        let count = buf.len().min(self.len() - offset);
        buf[..count].copy_from_slice(&self[offset..offset + count]);
        Ok(count)
    }

    fn seek(&mut self, _offset: u64) -> Result<()> {
        Ok(())
    }
}

/// A [`BinaryReader`] that fronts a [`BackingStore`] with a fixed-capacity
/// cache window.
///
/// Small reads are amortized into one store read per window; reads at least
/// as large as the window bypass the cache entirely. Seeks that land inside
/// the window cost no I/O.
pub struct BufferedReader<S> {
    store: S,
    buffer: Box<[u8]>,
    /// Physical offset of `buffer[0]`.
    source_position: u64,
    /// Next unread byte within the window.
    buffer_position: usize,
    /// Number of valid bytes in the window.
    buffer_length: usize,
    size: u64,
    order: ByteOrder,
}

impl<S: BackingStore> BufferedReader<S> {
    pub fn new(store: S, size: u64) -> Self {
        Self::with_capacity(store, size, DEFAULT_CAPACITY)
    }

    /// Creates a reader with an explicit window capacity, clamped so every
    /// primitive width fits.
    pub fn with_capacity(store: S, size: u64, capacity: usize) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);
        Self {
            store,
            buffer: vec![0u8; capacity].into_boxed_slice(),
            source_position: 0,
            buffer_position: 0,
            buffer_length: 0,
            size,
            order: ByteOrder::Native,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    fn window_remaining(&self) -> usize {
        self.buffer_length - self.buffer_position
    }

    /// Discards the window and pins the physical cursor at `position`.
    fn invalidate(&mut self, position: u64) {
        self.source_position = position;
        self.buffer_position = 0;
        self.buffer_length = 0;
    }

    /// Ensures at least `need` unread bytes are in the window, compacting
    /// and issuing one store read for the remaining capacity.
    fn refill(&mut self, need: usize) -> Result<()> {
        debug_assert!(need <= self.buffer.len());
        let unread = self.window_remaining();
        if unread >= need {
            return Ok(());
        }

        // Move the unread tail to the front of the window.
        self.buffer.copy_within(self.buffer_position..self.buffer_length, 0);
        self.source_position += self.buffer_position as u64;
        self.buffer_position = 0;
        self.buffer_length = unread;

        // Fill the rest of the capacity in one read, clamped to size.
        let start = self.source_position + unread as u64;
        let fill = (self.buffer.len() - unread).min((self.size - start).min(usize::MAX as u64) as usize);
        let read = self.store.read_at(start, &mut self.buffer[unread..unread + fill])?;
        self.buffer_length += read;

        if self.window_remaining() < need {
            return Err(end_of_data(need as u64, self.window_remaining() as u64));
        }
        Ok(())
    }

    /// Slow path for bulk reads that outgrow the current window.
    fn read_bulk(&mut self, dst: &mut [u8]) -> Result<()> {
        // Drain the unread tail of the window first.
        let unread = self.window_remaining();
        if unread > 0 {
            dst[..unread].copy_from_slice(&self.buffer[self.buffer_position..self.buffer_length]);
        }
        self.invalidate(self.source_position + self.buffer_length as u64);

        let rest = &mut dst[unread..];
        if rest.len() < self.buffer.len() {
            // One compact-and-refill covers the remainder.
            self.refill(rest.len())?;
            let len = rest.len();
            rest.copy_from_slice(&self.buffer[..len]);
            self.buffer_position = len;
        } else {
            // Read straight into the destination, bypassing the cache.
            let read = self.store.read_at(self.source_position, rest)?;
            if read != rest.len() {
                return Err(end_of_data(rest.len() as u64, read as u64));
            }
            self.source_position += read as u64;
        }
        Ok(())
    }
}

impl<S: BackingStore> BinaryReader for BufferedReader<S> {
    fn read_bytes(&mut self, dst: &mut [u8]) -> Result<()> {
        if dst.len() as u64 > self.remaining() {
            return Err(end_of_data(dst.len() as u64, self.remaining()));
        }

        // Serve directly from the window when it already holds enough.
        if self.window_remaining() >= dst.len() {
            let at = self.buffer_position;
            dst.copy_from_slice(&self.buffer[at..at + dst.len()]);
            self.buffer_position += dst.len();
            return Ok(());
        }

        let start = self.position();
        let result = self.read_bulk(dst);
        if result.is_err() {
            // Put the cursor back where the call began.
            self.invalidate(start);
        }
        result
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn position(&self) -> u64 {
        self.source_position + self.buffer_position as u64
    }

    fn seek(&mut self, position: u64) -> Result<()> {
        if position > self.size {
            return Err(Error::PositionOutOfBounds {
                position,
                size: self.size,
            });
        }
        let window_end = self.source_position + self.buffer_length as u64;
        if position >= self.source_position && position < window_end {
            // Target is inside the window, no I/O needed.
            self.buffer_position = (position - self.source_position) as usize;
        } else {
            self.invalidate(position);
            self.store.seek(position)?;
        }
        Ok(())
    }

    fn order(&self) -> ByteOrder {
        self.order
    }

    fn set_order(&mut self, order: ByteOrder) {
        self.order = order;
    }

    fn read_u8(&mut self) -> Result<u8> {
        self.refill(1)?;
        let value = self.buffer[self.buffer_position];
        self.buffer_position += 1;
        Ok(value)
    }

    fn read_u16(&mut self) -> Result<u16> {
        self.refill(2)?;
        let value = endian::get_u16(&self.buffer, self.buffer_position, self.order);
        self.buffer_position += 2;
        Ok(value)
    }

    fn read_i16(&mut self) -> Result<i16> {
        self.refill(2)?;
        let value = endian::get_i16(&self.buffer, self.buffer_position, self.order);
        self.buffer_position += 2;
        Ok(value)
    }

    fn read_u32(&mut self) -> Result<u32> {
        self.refill(4)?;
        let value = endian::get_u32(&self.buffer, self.buffer_position, self.order);
        self.buffer_position += 4;
        Ok(value)
    }

    fn read_i32(&mut self) -> Result<i32> {
        self.refill(4)?;
        let value = endian::get_i32(&self.buffer, self.buffer_position, self.order);
        self.buffer_position += 4;
        Ok(value)
    }

    fn read_u64(&mut self) -> Result<u64> {
        self.refill(8)?;
        let value = endian::get_u64(&self.buffer, self.buffer_position, self.order);
        self.buffer_position += 8;
        Ok(value)
    }

    fn read_i64(&mut self) -> Result<i64> {
        self.refill(8)?;
        let value = endian::get_i64(&self.buffer, self.buffer_position, self.order);
        self.buffer_position += 8;
        Ok(value)
    }

    fn read_f32(&mut self) -> Result<f32> {
        self.refill(4)?;
        let value = endian::get_f32(&self.buffer, self.buffer_position, self.order);
        self.buffer_position += 4;
        Ok(value)
    }

    fn read_f64(&mut self) -> Result<f64> {
        self.refill(8)?;
        let value = endian::get_f64(&self.buffer, self.buffer_position, self.order);
        self.buffer_position += 8;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Store wrapper that counts physical reads, for asserting the
    /// buffering discipline.
    struct CountingStore {
        data: Vec<u8>,
        reads: usize,
    }

    impl CountingStore {
        fn new(data: Vec<u8>) -> Self {
            Self { data, reads: 0 }
        }
    }

    impl BackingStore for CountingStore {
        fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
            self.reads += 1;
            self.data.read_at(offset, buf)
        }

        fn seek(&mut self, offset: u64) -> Result<()> {
            self.data.seek(offset)
        }
    }

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 31 % 251) as u8).collect()
    }

    #[test]
    fn test_small_reads_share_one_fill() {
        let data = pattern(64);
        let size = data.len() as u64;
        let mut reader = BufferedReader::with_capacity(CountingStore::new(data.clone()), size, 64);

        for i in 0..64 {
            assert_eq!(reader.read_u8().unwrap(), data[i]);
        }
        assert_eq!(reader.store.reads, 1);
        assert!(reader.is_drained());
    }

    #[test]
    fn test_reads_across_window_boundary() {
        let data = pattern(100);
        let size = data.len() as u64;
        let mut reader = BufferedReader::with_capacity(Vec::from(&data[..]), size, 16);

        // 7-byte reads straddle the 16-byte window repeatedly.
        let mut out = Vec::new();
        let mut buf = [0u8; 7];
        for _ in 0..14 {
            reader.read_bytes(&mut buf).unwrap();
            out.extend_from_slice(&buf);
        }
        let mut tail = [0u8; 2];
        reader.read_bytes(&mut tail).unwrap();
        out.extend_from_slice(&tail);
        assert_eq!(out, data);
    }

    #[test]
    fn test_large_read_bypasses_cache() {
        let data = pattern(4096);
        let size = data.len() as u64;
        let mut reader = BufferedReader::with_capacity(CountingStore::new(data.clone()), size, 32);

        // Prime the window with a small read.
        assert_eq!(reader.read_u8().unwrap(), data[0]);
        assert_eq!(reader.store.reads, 1);

        // A read larger than the capacity drains the window then goes
        // straight to the store.
        let mut big = vec![0u8; 4000];
        reader.read_bytes(&mut big).unwrap();
        assert_eq!(big, data[1..4001]);
        assert_eq!(reader.store.reads, 2);
        assert_eq!(reader.position(), 4001);

        // The window was invalidated, not left stale.
        let mut rest = vec![0u8; 95];
        reader.read_bytes(&mut rest).unwrap();
        assert_eq!(rest, data[4001..]);
    }

    #[test]
    fn test_seek_within_window_costs_no_io() {
        let data = pattern(64);
        let size = data.len() as u64;
        let mut reader = BufferedReader::with_capacity(CountingStore::new(data.clone()), size, 64);

        assert_eq!(reader.read_u8().unwrap(), data[0]);
        assert_eq!(reader.store.reads, 1);

        reader.seek(40).unwrap();
        assert_eq!(reader.read_u8().unwrap(), data[40]);
        reader.seek(3).unwrap();
        assert_eq!(reader.read_u8().unwrap(), data[3]);
        assert_eq!(reader.store.reads, 1);
    }

    #[test]
    fn test_seek_outside_window_discards_it() {
        let data = pattern(256);
        let size = data.len() as u64;
        let mut reader = BufferedReader::with_capacity(CountingStore::new(data.clone()), size, 16);

        assert_eq!(reader.read_u8().unwrap(), data[0]);
        reader.seek(200).unwrap();
        assert_eq!(reader.position(), 200);
        assert_eq!(reader.read_u8().unwrap(), data[200]);
        assert_eq!(reader.store.reads, 2);
    }

    #[test]
    fn test_end_of_data_before_any_copy() {
        let data = pattern(10);
        let mut reader = BufferedReader::with_capacity(data, 10, 16);
        reader.seek(5).unwrap();

        let mut dst = [0xAAu8; 6];
        let err = reader.read_bytes(&mut dst).unwrap_err();
        assert!(err.is_end_of_data());
        assert_eq!(reader.position(), 5);
        // Destination untouched: the bounds check runs before any copy.
        assert_eq!(dst, [0xAAu8; 6]);
    }

    #[test]
    fn test_primitive_end_of_data_keeps_position() {
        let data = pattern(10);
        let mut reader = BufferedReader::with_capacity(data, 10, 16);
        reader.seek(7).unwrap();
        assert!(reader.read_u64().unwrap_err().is_end_of_data());
        assert_eq!(reader.position(), 7);
        // What is left can still be read.
        let mut tail = [0u8; 3];
        reader.read_bytes(&mut tail).unwrap();
        assert_eq!(reader.position(), 10);
        assert!(reader.read_u16().unwrap_err().is_end_of_data());
        assert_eq!(reader.position(), 10);
    }

    #[test]
    fn test_capacity_clamped_to_widest_primitive() {
        let data = pattern(32);
        let reader = BufferedReader::with_capacity(data, 32, 1);
        assert_eq!(reader.capacity(), 8);
    }

    #[test]
    fn test_primitives_decode_like_memory_reader() {
        let mut data = vec![0u8; 26];
        crate::endian::put_u16(&mut data, 0, 0xBEEF, ByteOrder::Little);
        crate::endian::put_i32(&mut data, 2, -7, ByteOrder::Little);
        crate::endian::put_u64(&mut data, 6, u64::MAX - 1, ByteOrder::Little);
        crate::endian::put_f32(&mut data, 14, 1.5, ByteOrder::Little);
        crate::endian::put_f64(&mut data, 18, -2.25, ByteOrder::Little);

        let size = data.len() as u64;
        let mut reader = BufferedReader::with_capacity(data, size, 8);
        reader.set_order(ByteOrder::Little);
        assert_eq!(reader.read_u16().unwrap(), 0xBEEF);
        assert_eq!(reader.read_i32().unwrap(), -7);
        assert_eq!(reader.read_u64().unwrap(), u64::MAX - 1);
        assert_eq!(reader.read_f32().unwrap(), 1.5);
        assert_eq!(reader.read_f64().unwrap(), -2.25);
        assert!(reader.is_drained());
    }
}

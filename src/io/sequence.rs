//! Composition of several readers into one continuous stream.

use crate::error::Result;
use crate::io::BinaryReader;
use crate::io::buffered::{BackingStore, BufferedReader};

struct Segment {
    /// Cumulative start offset in the composed stream.
    start: u64,
    reader: Box<dyn BinaryReader>,
}

/// Backing store that stitches disjoint readers into one address space.
///
/// The segment map is built once at construction by summing constituent
/// sizes; ranges are contiguous and non-overlapping by construction.
pub struct SequenceStore {
    segments: Vec<Segment>,
    /// Last segment served, checked first to skip the floor lookup.
    active: Option<usize>,
}

impl SequenceStore {
    pub fn new(readers: Vec<Box<dyn BinaryReader>>) -> Self {
        let mut segments = Vec::with_capacity(readers.len());
        let mut offset = 0u64;
        for reader in readers {
            let start = offset;
            offset += reader.size();
            segments.push(Segment { start, reader });
        }
        Self {
            segments,
            active: None,
        }
    }

    /// Sum of all constituent sizes.
    pub fn total_size(&self) -> u64 {
        self.segments
            .last()
            .map(|s| s.start + s.reader.size())
            .unwrap_or(0)
    }

    /// Segment covering `offset`: the active one when it still does,
    /// otherwise a floor lookup over the segment map.
    fn locate(&self, offset: u64) -> Option<usize> {
        if let Some(index) = self.active {
            let segment = &self.segments[index];
            if offset >= segment.start && offset < segment.start + segment.reader.size() {
                return Some(index);
            }
        }
        let upper = self.segments.partition_point(|s| s.start <= offset);
        upper.checked_sub(1)
    }
}

impl BackingStore for SequenceStore {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        let mut offset = offset;
        while filled < buf.len() {
            let Some(index) = self.locate(offset) else {
                break;
            };
            let segment = &mut self.segments[index];
            let local = offset - segment.start;
            if local >= segment.reader.size() {
                // Segment map exhausted; report the short read.
                self.active = None;
                break;
            }

            segment.reader.seek(local)?;
            let count = (segment.reader.remaining()).min((buf.len() - filled) as u64) as usize;
            segment.reader.read_bytes(&mut buf[filled..filled + count])?;
            self.active = Some(index);

            filled += count;
            offset += count as u64;
        }
        Ok(filled)
    }

    fn seek(&mut self, _offset: u64) -> Result<()> {
        // Force a fresh lookup on the next read instead of eagerly
        // repositioning every constituent.
        self.active = None;
        Ok(())
    }
}

/// A buffered [`BinaryReader`] over an ordered list of constituent readers.
///
/// Dropping the sequence drops every constituent, activated or not.
pub type SequenceReader = BufferedReader<SequenceStore>;

impl SequenceReader {
    /// Composes `readers` into one continuous stream, in list order.
    pub fn of(readers: Vec<Box<dyn BinaryReader>>) -> Self {
        let store = SequenceStore::new(readers);
        let size = store.total_size();
        BufferedReader::new(store, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryReader;

    fn noise(len: usize, seed: u64) -> Vec<u8> {
        // Small xorshift so tests are deterministic without a rand dep.
        let mut state = seed | 1;
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                (state >> 24) as u8
            })
            .collect()
    }

    fn split(data: &[u8], cuts: &[usize]) -> Vec<Box<dyn BinaryReader>> {
        let mut readers: Vec<Box<dyn BinaryReader>> = Vec::new();
        let mut at = 0;
        for &len in cuts {
            readers.push(Box::new(MemoryReader::new(data[at..at + len].to_vec())));
            at += len;
        }
        assert_eq!(at, data.len());
        readers
    }

    #[test]
    fn test_byte_at_a_time_over_many_refills() {
        // Larger than the default window so the buffer refills repeatedly.
        let data = noise(0x40000, 42);
        let readers = split(&data, &[16383, 16385, 32768, 131072, 65536]);

        let mut reader = SequenceReader::of(readers);
        assert_eq!(reader.size(), data.len() as u64);

        let mut output = Vec::with_capacity(data.len());
        for _ in 0..data.len() {
            output.push(reader.read_u8().unwrap());
        }
        assert_eq!(output, data);
        assert!(reader.is_drained());
    }

    #[test]
    fn test_bulk_reads_across_segment_boundaries() {
        let data = noise(1000, 7);
        let readers = split(&data, &[1, 499, 300, 200]);
        let mut reader = SequenceReader::of(readers);

        let mut buf = vec![0u8; 750];
        reader.read_bytes(&mut buf).unwrap();
        assert_eq!(buf, data[..750]);

        let rest = reader.read_vec(250).unwrap();
        assert_eq!(rest, data[750..]);
    }

    #[test]
    fn test_seek_then_read() {
        let data = noise(4096, 3);
        let readers = split(&data, &[1024, 1024, 2048]);
        let mut reader = SequenceReader::of(readers);

        reader.seek(3000).unwrap();
        let tail = reader.read_vec(1096).unwrap();
        assert_eq!(tail, data[3000..]);

        reader.seek(1000).unwrap();
        let straddle = reader.read_vec(48).unwrap();
        assert_eq!(straddle, data[1000..1048]);
    }

    #[test]
    fn test_empty_constituent_is_skipped() {
        let mut readers: Vec<Box<dyn BinaryReader>> = Vec::new();
        readers.push(Box::new(MemoryReader::new(vec![1, 2])));
        readers.push(Box::new(MemoryReader::new(Vec::new())));
        readers.push(Box::new(MemoryReader::new(vec![3, 4])));

        let mut reader = SequenceReader::of(readers);
        assert_eq!(reader.size(), 4);
        assert_eq!(reader.read_vec(4).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_no_readers() {
        let reader = SequenceReader::of(Vec::new());
        assert_eq!(reader.size(), 0);
        assert!(reader.is_drained());
    }

    #[test]
    fn test_end_of_data() {
        let readers = split(&[1, 2, 3, 4], &[2, 2]);
        let mut reader = SequenceReader::of(readers);
        reader.seek(3).unwrap();
        let mut buf = [0u8; 2];
        assert!(reader.read_bytes(&mut buf).unwrap_err().is_end_of_data());
        assert_eq!(reader.position(), 3);
    }
}

//! Decompression contract consumed by the chunked reader.
//!
//! A decompressor is deterministic and all-or-nothing: it produces exactly
//! `dst.len()` bytes or fails, never a partial result. Exotic codecs (LZMA,
//! Oodle and friends) live outside this crate and plug in through the same
//! trait.

use flate2::{Decompress, FlushDecompress, Status};

use crate::error::{Error, Result};

/// Expands one compressed blob into a caller-sized destination.
pub trait Decompressor {
    /// Decompresses `src` into `dst`, filling it exactly.
    ///
    /// Malformed input, truncated input, and output of the wrong size all
    /// fail with [`Error::Decompress`]; `dst` contents are unspecified
    /// after a failure.
    fn decompress(&self, src: &[u8], dst: &mut [u8]) -> Result<()>;

    /// Convenience: decompresses into a freshly allocated vector of `size`
    /// bytes.
    fn decompress_to_vec(&self, src: &[u8], size: usize) -> Result<Vec<u8>> {
        let mut dst = vec![0u8; size];
        self.decompress(src, &mut dst)?;
        Ok(dst)
    }
}

/// Pass-through for chunks stored uncompressed.
pub struct NoneDecompressor;

impl Decompressor for NoneDecompressor {
    fn decompress(&self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        if src.len() != dst.len() {
            return Err(Error::Decompress(format!(
                "stored chunk length mismatch: {} in, {} expected",
                src.len(),
                dst.len()
            )));
        }
        dst.copy_from_slice(src);
        Ok(())
    }
}

/// Deflate decompression, zlib-wrapped or raw.
pub struct DeflateDecompressor {
    raw: bool,
}

impl DeflateDecompressor {
    /// `raw` selects headerless deflate streams; otherwise the zlib
    /// wrapper is expected.
    pub fn new(raw: bool) -> Self {
        Self { raw }
    }
}

impl Decompressor for DeflateDecompressor {
    fn decompress(&self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        let mut inflater = Decompress::new(!self.raw);
        let status = inflater
            .decompress(src, dst, FlushDecompress::Finish)
            .map_err(|e| Error::Decompress(e.to_string()))?;

        if status != Status::StreamEnd {
            return Err(Error::Decompress(
                "deflate stream did not end within the expected output".into(),
            ));
        }
        if inflater.total_out() != dst.len() as u64 {
            return Err(Error::Decompress(format!(
                "deflate output size mismatch: {} produced, {} expected",
                inflater.total_out(),
                dst.len()
            )));
        }
        Ok(())
    }
}

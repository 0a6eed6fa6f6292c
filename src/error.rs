//! Error types for binseek operations.

use thiserror::Error;

/// Errors that can occur while reading binary data.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected end of data: needed {needed} bytes, {available} available")]
    EndOfData { needed: u64, available: u64 },

    #[error("position {position} is out of bounds for size {size}")]
    PositionOutOfBounds { position: u64, size: u64 },

    #[error("decompression failed: {0}")]
    Decompress(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),
}

impl Error {
    /// True for errors meaning the input ran out, as opposed to a caller bug.
    pub fn is_end_of_data(&self) -> bool {
        matches!(self, Error::EndOfData { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn end_of_data(needed: u64, available: u64) -> Error {
    Error::EndOfData { needed, available }
}

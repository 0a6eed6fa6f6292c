//! # binseek
//!
//! A random-access binary data access layer for parsing externally defined
//! binary file formats, such as game asset containers.
//!
//! Everything is addressed through one [`BinaryReader`] contract: positioned
//! primitive reads in a selectable [`ByteOrder`], exact bulk reads, absolute
//! seeks. Underneath that contract the crate stacks:
//!
//! - [`MemoryReader`] over bytes already in memory
//! - [`FileReader`], a [`BufferedReader`] over a file too large to load
//! - [`ChunkedReader`], an uncompressed view over independently compressed
//!   chunks, decompressed on demand through a [`Decompressor`]
//! - [`SequenceReader`], several readers composed into one stream
//!
//! Stacks compose: a chunked reader over a file, a sequence of files wrapped
//! by a chunked reader, and so on — callers never see the difference.
//!
//! ## Quick start
//!
//! ```no_run
//! use binseek::{BinaryReader, ByteOrder, FileReader};
//!
//! let mut reader = FileReader::open("assets.pak")?;
//! reader.set_order(ByteOrder::Little);
//!
//! let magic = reader.read_u32()?;
//! let count = reader.read_u32()? as usize;
//! let names = reader.read_objects(count, |r| {
//!     let len = r.read_u16()? as usize;
//!     r.read_string(len)
//! })?;
//! # Ok::<(), binseek::Error>(())
//! ```
//!
//! ## Chunked containers
//!
//! ```no_run
//! use binseek::{BinaryReader, Chunk, ChunkedReader, FileReader};
//! use binseek::compress::DeflateDecompressor;
//!
//! let inner = FileReader::open("assets.pak")?;
//! let chunks = vec![
//!     Chunk { offset: 0, compressed_offset: 0, size: 0x10000, compressed_size: 0x82f1 },
//!     Chunk { offset: 0x10000, compressed_offset: 0x82f1, size: 0x9c40, compressed_size: 0x5d02 },
//! ];
//! let mut reader = ChunkedReader::new(inner, chunks, Box::new(DeflateDecompressor::new(false)));
//! reader.seek(0x0fffe)?; // a read here crosses the chunk boundary transparently
//! let value = reader.read_u32()?;
//! # Ok::<(), binseek::Error>(())
//! ```
//!
//! Readers are single-owner, synchronous state machines; release is `Drop`
//! and cascades through composed readers.

pub mod compress;
pub mod endian;
pub mod error;
pub mod io;

pub use endian::ByteOrder;
pub use error::{Error, Result};
pub use io::{
    BackingStore, BinaryReader, BufferedReader, Chunk, ChunkedReader, FileReader, FileStore,
    MemoryReader, SequenceReader, SequenceStore,
};
pub use compress::Decompressor;

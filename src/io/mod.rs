//! I/O primitives shared by the raster reader
//!
//! Raster files are read through a buffered, seekable handle that is opened
//! per operation and dropped as soon as the operation returns.

pub mod byte_order;

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// Readers that can both read and seek
pub trait SeekableReader: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> SeekableReader for T {}

/// Buffer size used for raster file handles (1MB)
pub const READ_BUFFER_SIZE: usize = 1024 * 1024;

/// Opens a raster file behind a 1MB read buffer
pub fn open_buffered(path: &Path) -> std::io::Result<BufReader<File>> {
    let file = File::open(path)?;
    Ok(BufReader::with_capacity(READ_BUFFER_SIZE, file))
}

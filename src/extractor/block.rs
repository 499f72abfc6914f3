//! Decoding of a single strip or tile

use std::io::SeekFrom;

use log::debug;

use crate::compression::{CompressionFactory, CompressionHandler};
use crate::io::SeekableReader;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::validation;

use super::sample::SampleLayout;

/// Reads, decompresses and un-predicts strips or tiles of one image
pub struct BlockDecoder {
    compression: Box<dyn CompressionHandler>,
    layout: SampleLayout,
    file_size: u64,
}

impl BlockDecoder {
    pub fn new(reader: &mut dyn SeekableReader, ifd: &IFD, layout: SampleLayout) -> TiffResult<Self> {
        let compression = CompressionFactory::create_handler(ifd.get_compression())?;
        debug!("Using compression: {}", compression.name());

        Ok(BlockDecoder {
            compression,
            layout,
            file_size: validation::get_file_size(reader)?,
        })
    }

    pub fn layout(&self) -> &SampleLayout {
        &self.layout
    }

    /// Decoded bytes of one block
    ///
    /// `block_width` is the number of samples per stored row and
    /// `block_rows` the number of rows the block must hold. Returns `None`
    /// for a sparse block (byte count 0), which the caller fills.
    pub fn read_block(
        &self,
        reader: &mut dyn SeekableReader,
        offset: u64,
        byte_count: u64,
        block_width: usize,
        block_rows: usize,
    ) -> TiffResult<Option<Vec<u8>>> {
        if byte_count == 0 {
            return Ok(None);
        }

        validation::validate_block(offset, byte_count, self.file_size)?;

        reader.seek(SeekFrom::Start(offset))?;
        let mut compressed = vec![0u8; byte_count as usize];
        reader.read_exact(&mut compressed)?;

        let mut data = self.compression.decompress(&compressed)?;

        let expected = block_width * block_rows * self.layout.sample_size();
        if data.len() < expected {
            return Err(TiffError::DecompressionError(format!(
                "Block at offset {} decoded to {} bytes, expected {}",
                offset, data.len(), expected
            )));
        }
        data.truncate(expected);

        self.layout.undo_predictor(&mut data, block_width);
        Ok(Some(data))
    }
}

//! Handler for LZW compressed data

use log::debug;
use weezl::{decode, encode, BitOrder};

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;

/// TIFF flavoured LZW handler (compression code 5)
///
/// TIFF LZW is MSB-first with 8-bit symbols and switches code size one
/// code early.
pub struct LzwHandler;

impl CompressionHandler for LzwHandler {
    fn decompress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }

        let mut decoder = decode::Decoder::with_tiff_size_switch(BitOrder::Msb, 8);
        let decompressed = decoder
            .decode(data)
            .map_err(|e| TiffError::DecompressionError(format!("LZW: {}", e)))?;
        debug!("LZW decompressed {} bytes to {}", data.len(), decompressed.len());
        Ok(decompressed)
    }

    fn compress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        let mut encoder = encode::Encoder::with_tiff_size_switch(BitOrder::Msb, 8);
        encoder
            .encode(data)
            .map_err(|e| TiffError::DecompressionError(format!("LZW encoding: {}", e)))
    }

    fn name(&self) -> &'static str {
        "LZW"
    }

    fn code(&self) -> u64 {
        compression::LZW
    }
}

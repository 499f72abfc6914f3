//! Handler for Deflate compressed data

use std::io::{Read, Write};
use flate2::read::{DeflateDecoder, ZlibDecoder};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::debug;

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;

/// Deflate (zlib) compression handler
///
/// Serves both code 8 and the legacy Adobe code 32946; the payload is the
/// same zlib stream.
pub struct AdobeDeflateHandler {
    code: u64,
}

impl AdobeDeflateHandler {
    /// Handler reporting compression code 8
    pub fn new() -> Self {
        AdobeDeflateHandler { code: compression::DEFLATE }
    }

    /// Handler reporting the given deflate code (8 or 32946)
    pub fn with_code(code: u64) -> Self {
        AdobeDeflateHandler { code }
    }
}

impl Default for AdobeDeflateHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressionHandler for AdobeDeflateHandler {
    fn decompress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        let mut decompressed_data = Vec::new();
        if ZlibDecoder::new(data).read_to_end(&mut decompressed_data).is_ok() {
            return Ok(decompressed_data);
        }

        // Some writers omit the zlib header
        debug!("Zlib header missing, retrying as raw deflate");
        decompressed_data.clear();
        DeflateDecoder::new(data)
            .read_to_end(&mut decompressed_data)
            .map_err(|e| TiffError::DecompressionError(format!("Deflate: {}", e)))?;
        Ok(decompressed_data)
    }

    fn compress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data)?;
        Ok(encoder.finish()?)
    }

    fn name(&self) -> &'static str {
        if self.code == compression::ADOBE_DEFLATE { "Adobe Deflate" } else { "Deflate" }
    }

    fn code(&self) -> u64 {
        self.code
    }
}

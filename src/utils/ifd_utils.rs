//! IFD utilities
//!
//! Offset handling shared by the header and the IFD chain.

use crate::io::SeekableReader;
use crate::io::byte_order::ByteOrderHandler;
use crate::tiff::errors::TiffResult;

/// Reads an IFD offset (first IFD in the header, or next IFD after the entries)
///
/// Offsets are 4 bytes in classic TIFF and 8 bytes in BigTIFF. A value of
/// 0 terminates the chain.
pub fn read_ifd_offset(
    reader: &mut dyn SeekableReader,
    is_big_tiff: bool,
    byte_order_handler: &dyn ByteOrderHandler,
) -> TiffResult<u64> {
    let offset = if is_big_tiff {
        byte_order_handler.read_u64(reader)?
    } else {
        byte_order_handler.read_u32(reader)? as u64
    };
    Ok(offset)
}


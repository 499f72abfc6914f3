//! TIFF file format parsing module
//!
//! Structures and functions for reading the structure and GeoTIFF
//! metadata of TIFF and BigTIFF files.

pub mod errors;
pub mod ifd;
pub(crate) mod types;
pub mod reader;
#[cfg(test)]
mod tests;
pub(crate) mod constants;
pub mod geo_key_parser;
pub(crate) mod validation;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use errors::{TiffError, TiffResult};
pub use geo_key_parser::{GeoInfo, GeoKeyEntry, GeoKeyParser};
pub use ifd::{IFD, IFDEntry};
pub use reader::TiffReader;
pub use types::TIFF;

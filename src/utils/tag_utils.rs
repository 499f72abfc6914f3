//! TIFF tag utilities
//!
//! Decoding of tag value arrays and human-readable names for logging.

use byteorder::ReadBytesExt;

use crate::io::SeekableReader;
use crate::io::byte_order::ByteOrderHandler;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFDEntry;
use crate::tiff::constants::{compression, field_types, tags};

/// Size in bytes of one value of a field type
///
/// Unknown types count as one byte, which keeps inline detection sane.
pub fn field_type_size(field_type: u16) -> usize {
    match field_type {
        field_types::BYTE | field_types::SBYTE | field_types::UNDEFINED | field_types::ASCII => 1,
        field_types::SHORT | field_types::SSHORT => 2,
        field_types::LONG | field_types::SLONG | field_types::FLOAT => 4,
        field_types::RATIONAL | field_types::SRATIONAL | field_types::DOUBLE |
        field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => 8,
        _ => 1,
    }
}

/// Reads one integer value of the given field type
pub fn read_single_value(
    reader: &mut dyn SeekableReader,
    field_type: u16,
    handler: &dyn ByteOrderHandler,
) -> TiffResult<u64> {
    let value = match field_type {
        field_types::BYTE | field_types::SBYTE | field_types::UNDEFINED | field_types::ASCII => reader.read_u8()? as u64,
        field_types::SHORT | field_types::SSHORT => handler.read_u16(reader)? as u64,
        field_types::LONG | field_types::SLONG | field_types::FLOAT => handler.read_u32(reader)? as u64,
        field_types::RATIONAL | field_types::SRATIONAL => {
            let (num, den) = handler.read_rational(reader)?;
            ((num as u64) << 32) | (den as u64)
        },
        field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 | field_types::DOUBLE => handler.read_u64(reader)?,
        _ => return Err(TiffError::UnsupportedFieldType(field_type)),
    };
    Ok(value)
}

/// Reads all values of an entry as u64
pub fn read_tag_value_array(
    reader: &mut dyn SeekableReader,
    entry: &IFDEntry,
    handler: &dyn ByteOrderHandler,
    values: &mut Vec<u64>,
) -> TiffResult<()> {
    for _ in 0..entry.count {
        values.push(read_single_value(reader, entry.field_type, handler)?);
    }

    Ok(())
}

/// Reads all values of a numeric entry as f64
pub fn read_tag_double_array(
    reader: &mut dyn SeekableReader,
    entry: &IFDEntry,
    handler: &dyn ByteOrderHandler,
    values: &mut Vec<f64>,
) -> TiffResult<()> {
    for _ in 0..entry.count {
        let value = match entry.field_type {
            field_types::DOUBLE => handler.read_f64(reader)?,
            field_types::FLOAT => f32::from_bits(handler.read_u32(reader)?) as f64,
            field_types::RATIONAL => {
                let (num, den) = handler.read_rational(reader)?;
                if den == 0 { f64::NAN } else { num as f64 / den as f64 }
            },
            field_types::SSHORT => handler.read_u16(reader)? as i16 as f64,
            field_types::SLONG => handler.read_u32(reader)? as i32 as f64,
            _ => read_single_value(reader, entry.field_type, handler)? as f64,
        };
        values.push(value);
    }

    Ok(())
}

/// Human-readable name of a TIFF tag
pub fn get_tag_name(tag: u16) -> &'static str {
    match tag {
        tags::NEW_SUBFILE_TYPE => "NewSubfileType",
        tags::IMAGE_WIDTH => "ImageWidth",
        tags::IMAGE_LENGTH => "ImageLength",
        tags::BITS_PER_SAMPLE => "BitsPerSample",
        tags::COMPRESSION => "Compression",
        tags::PHOTOMETRIC_INTERPRETATION => "PhotometricInterpretation",
        tags::STRIP_OFFSETS => "StripOffsets",
        tags::SAMPLES_PER_PIXEL => "SamplesPerPixel",
        tags::ROWS_PER_STRIP => "RowsPerStrip",
        tags::STRIP_BYTE_COUNTS => "StripByteCounts",
        tags::PLANAR_CONFIGURATION => "PlanarConfiguration",
        tags::PREDICTOR => "Predictor",
        tags::TILE_WIDTH => "TileWidth",
        tags::TILE_LENGTH => "TileLength",
        tags::TILE_OFFSETS => "TileOffsets",
        tags::TILE_BYTE_COUNTS => "TileByteCounts",
        tags::SAMPLE_FORMAT => "SampleFormat",

        tags::MODEL_PIXEL_SCALE_TAG => "ModelPixelScale",
        tags::MODEL_TIEPOINT_TAG => "ModelTiepoint",
        tags::MODEL_TRANSFORMATION_TAG => "ModelTransformation",
        tags::GEO_KEY_DIRECTORY_TAG => "GeoKeyDirectory",
        tags::GEO_DOUBLE_PARAMS_TAG => "GeoDoubleParams",
        tags::GEO_ASCII_PARAMS_TAG => "GeoAsciiParams",

        tags::GDAL_NODATA => "GDALNoData",

        _ => "Unknown",
    }
}

/// Human-readable name of a field type
pub fn get_field_type_name(field_type: u16) -> &'static str {
    match field_type {
        field_types::BYTE => "BYTE",
        field_types::ASCII => "ASCII",
        field_types::SHORT => "SHORT",
        field_types::LONG => "LONG",
        field_types::RATIONAL => "RATIONAL",
        field_types::SBYTE => "SBYTE",
        field_types::UNDEFINED => "UNDEFINED",
        field_types::SSHORT => "SSHORT",
        field_types::SLONG => "SLONG",
        field_types::SRATIONAL => "SRATIONAL",
        field_types::FLOAT => "FLOAT",
        field_types::DOUBLE => "DOUBLE",
        field_types::LONG8 => "LONG8",
        field_types::SLONG8 => "SLONG8",
        field_types::IFD8 => "IFD8",
        _ => "Unknown",
    }
}

/// Human-readable name of a compression code
pub fn get_compression_name(compression_code: u64) -> &'static str {
    match compression_code {
        compression::NONE => "None",
        compression::LZW => "LZW",
        compression::DEFLATE => "Deflate",
        compression::ADOBE_DEFLATE => "Adobe Deflate",
        compression::ZSTD => "Zstandard",
        _ => "Unknown",
    }
}

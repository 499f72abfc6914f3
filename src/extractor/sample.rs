//! Sample decoding
//!
//! Converts decompressed strip/tile bytes into `f64` cell values and undoes
//! horizontal differencing. Every numeric type the raster may hold is
//! widened to `f64`, which represents all of them exactly except 64-bit
//! integers (not supported).

use byteorder::{BigEndian, ByteOrder as ByteOrderExt, LittleEndian};

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::{predictor, sample_format};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;

/// Numeric type of one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    F32,
    F64,
}

impl SampleType {
    /// Maps BitsPerSample / SampleFormat to a sample type
    pub fn from_tags(bits: u16, format: u16) -> TiffResult<Self> {
        match (bits, format) {
            (8, sample_format::UNSIGNED) => Ok(SampleType::U8),
            (8, sample_format::SIGNED) => Ok(SampleType::I8),
            (16, sample_format::UNSIGNED) => Ok(SampleType::U16),
            (16, sample_format::SIGNED) => Ok(SampleType::I16),
            (32, sample_format::UNSIGNED) => Ok(SampleType::U32),
            (32, sample_format::SIGNED) => Ok(SampleType::I32),
            (32, sample_format::IEEEFP) => Ok(SampleType::F32),
            (64, sample_format::IEEEFP) => Ok(SampleType::F64),
            _ => Err(TiffError::UnsupportedSampleType { bits, format }),
        }
    }

    pub fn size(&self) -> usize {
        match self {
            SampleType::U8 | SampleType::I8 => 1,
            SampleType::U16 | SampleType::I16 => 2,
            SampleType::U32 | SampleType::I32 | SampleType::F32 => 4,
            SampleType::F64 => 8,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, SampleType::F32 | SampleType::F64)
    }

    /// `value` as a cell of this type would hold it
    ///
    /// Decoded float32 cells carry float32 precision, so a nodata marker
    /// parsed as f64 has to be narrowed the same way before comparing.
    pub fn quantize(&self, value: f64) -> f64 {
        match self {
            SampleType::F32 => value as f32 as f64,
            _ => value,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SampleType::U8 => "uint8",
            SampleType::I8 => "int8",
            SampleType::U16 => "uint16",
            SampleType::I16 => "int16",
            SampleType::U32 => "uint32",
            SampleType::I32 => "int32",
            SampleType::F32 => "float32",
            SampleType::F64 => "float64",
        }
    }
}

/// How samples are stored in a block: type, byte order and predictor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleLayout {
    pub sample_type: SampleType,
    pub byte_order: ByteOrder,
    pub predictor: u64,
}

impl SampleLayout {
    /// Reads the layout from the image's tags
    pub fn from_ifd(ifd: &IFD, byte_order: ByteOrder) -> TiffResult<Self> {
        let sample_type = SampleType::from_tags(ifd.get_bits_per_sample(), ifd.get_sample_format())?;
        let predictor = ifd.get_predictor();

        match predictor {
            predictor::NONE => {}
            predictor::HORIZONTAL_DIFFERENCING if !sample_type.is_float() => {}
            other => return Err(TiffError::UnsupportedPredictor(other)),
        }

        Ok(SampleLayout { sample_type, byte_order, predictor })
    }

    /// Bytes per sample
    pub fn sample_size(&self) -> usize {
        self.sample_type.size()
    }

    /// Decodes `dst.len()` consecutive samples from `src` into `dst`
    pub fn decode_into(&self, src: &[u8], dst: &mut [f64]) {
        match self.byte_order {
            ByteOrder::LittleEndian => decode_samples::<LittleEndian>(self.sample_type, src, dst),
            ByteOrder::BigEndian => decode_samples::<BigEndian>(self.sample_type, src, dst),
        }
    }

    /// Undoes horizontal differencing in place
    ///
    /// `data` holds whole rows of `row_width` samples each. A no-op when
    /// the block was written without a predictor.
    pub fn undo_predictor(&self, data: &mut [u8], row_width: usize) {
        if self.predictor != predictor::HORIZONTAL_DIFFERENCING || row_width == 0 {
            return;
        }

        let row_bytes = row_width * self.sample_size();
        for row in data.chunks_mut(row_bytes) {
            match self.byte_order {
                ByteOrder::LittleEndian => accumulate_row::<LittleEndian>(self.sample_type, row),
                ByteOrder::BigEndian => accumulate_row::<BigEndian>(self.sample_type, row),
            }
        }
    }
}

fn decode_samples<B: ByteOrderExt>(sample_type: SampleType, src: &[u8], dst: &mut [f64]) {
    let size = sample_type.size();
    for (value, bytes) in dst.iter_mut().zip(src.chunks_exact(size)) {
        *value = match sample_type {
            SampleType::U8 => bytes[0] as f64,
            SampleType::I8 => bytes[0] as i8 as f64,
            SampleType::U16 => B::read_u16(bytes) as f64,
            SampleType::I16 => B::read_i16(bytes) as f64,
            SampleType::U32 => B::read_u32(bytes) as f64,
            SampleType::I32 => B::read_i32(bytes) as f64,
            SampleType::F32 => B::read_f32(bytes) as f64,
            SampleType::F64 => B::read_f64(bytes),
        };
    }
}

/// Running sum along one row, wrapping at the sample width
fn accumulate_row<B: ByteOrderExt>(sample_type: SampleType, row: &mut [u8]) {
    match sample_type.size() {
        1 => {
            for i in 1..row.len() {
                row[i] = row[i].wrapping_add(row[i - 1]);
            }
        }
        2 => {
            let mut previous = 0u16;
            for chunk in row.chunks_exact_mut(2) {
                previous = previous.wrapping_add(B::read_u16(chunk));
                B::write_u16(chunk, previous);
            }
        }
        4 => {
            let mut previous = 0u32;
            for chunk in row.chunks_exact_mut(4) {
                previous = previous.wrapping_add(B::read_u32(chunk));
                B::write_u32(chunk, previous);
            }
        }
        // Floating point types never reach here
        _ => {}
    }
}

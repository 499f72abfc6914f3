//! Helpers for writing small single-band GeoTIFFs to disk

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, WriteBytesExt};
use riverkit::compression::CompressionFactory;

pub const NO_COMPRESSION: u64 = 1;
pub const LZW: u64 = 5;
pub const DEFLATE: u64 = 8;
pub const ZSTD: u64 = 14;

/// One IFD entry of the file being built
enum TagData {
    Short(Vec<u16>),
    Long(Vec<u32>),
    Double(Vec<f64>),
    Ascii(String),
}

impl TagData {
    fn field_type(&self) -> u16 {
        match self {
            TagData::Short(_) => 3,
            TagData::Long(_) => 4,
            TagData::Double(_) => 12,
            TagData::Ascii(_) => 2,
        }
    }

    fn count(&self) -> u32 {
        match self {
            TagData::Short(v) => v.len() as u32,
            TagData::Long(v) => v.len() as u32,
            TagData::Double(v) => v.len() as u32,
            TagData::Ascii(s) => s.len() as u32 + 1,
        }
    }

    fn to_le_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        match self {
            TagData::Short(v) => v.iter().for_each(|x| bytes.write_u16::<LittleEndian>(*x).unwrap()),
            TagData::Long(v) => v.iter().for_each(|x| bytes.write_u32::<LittleEndian>(*x).unwrap()),
            TagData::Double(v) => v.iter().for_each(|x| bytes.write_f64::<LittleEndian>(*x).unwrap()),
            TagData::Ascii(s) => {
                bytes.extend_from_slice(s.as_bytes());
                bytes.push(0);
            }
        }
        bytes
    }
}

pub const PIXEL_IS_AREA: u16 = 1;
pub const PIXEL_IS_POINT: u16 = 2;

/// Builds a little-endian, 8-bit, single-band GeoTIFF in EPSG:4326
pub struct GeoTiffBuilder {
    width: u32,
    height: u32,
    values: Vec<u8>,
    origin: (f64, f64),
    pixel_size: f64,
    compression: u64,
    rows_per_strip: Option<u32>,
    tile_size: Option<u32>,
    nodata: Option<String>,
    samples_per_pixel: u16,
    georeferenced: bool,
    raster_type: u16,
}

impl GeoTiffBuilder {
    /// `values` are row-major, `width * height` long
    pub fn new(width: u32, height: u32, values: Vec<u8>) -> Self {
        assert_eq!(values.len(), (width * height) as usize);
        GeoTiffBuilder {
            width,
            height,
            values,
            origin: (0.0, height as f64),
            pixel_size: 1.0,
            compression: NO_COMPRESSION,
            rows_per_strip: None,
            tile_size: None,
            nodata: None,
            samples_per_pixel: 1,
            georeferenced: true,
            raster_type: PIXEL_IS_AREA,
        }
    }

    /// Upper-left corner of the raster
    pub fn origin(mut self, x: f64, y: f64) -> Self {
        self.origin = (x, y);
        self
    }

    pub fn pixel_size(mut self, size: f64) -> Self {
        self.pixel_size = size;
        self
    }

    pub fn compression(mut self, code: u64) -> Self {
        self.compression = code;
        self
    }

    pub fn rows_per_strip(mut self, rows: u32) -> Self {
        self.rows_per_strip = Some(rows);
        self
    }

    /// Square tiles instead of strips
    pub fn tiled(mut self, size: u32) -> Self {
        self.tile_size = Some(size);
        self
    }

    pub fn nodata(mut self, value: &str) -> Self {
        self.nodata = Some(value.to_string());
        self
    }

    /// Declares more bands; the pixel data stays single-band
    pub fn samples_per_pixel(mut self, samples: u16) -> Self {
        self.samples_per_pixel = samples;
        self
    }

    /// Leaves out the model tags and the GeoKey directory
    pub fn without_georeferencing(mut self) -> Self {
        self.georeferenced = false;
        self
    }

    /// Tiepoint addresses the centre of the first cell
    pub fn pixel_is_point(mut self) -> Self {
        self.raster_type = PIXEL_IS_POINT;
        self
    }

    /// Uncompressed payload of each strip or tile, in file order
    fn blocks(&self) -> Vec<Vec<u8>> {
        let width = self.width as usize;
        let height = self.height as usize;

        match self.tile_size {
            Some(size) => {
                let size = size as usize;
                let mut blocks = Vec::new();
                for tile_row in 0..height.div_ceil(size) {
                    for tile_col in 0..width.div_ceil(size) {
                        // Edge tiles are padded to full size
                        let mut block = vec![0u8; size * size];
                        for r in 0..size {
                            for c in 0..size {
                                let (row, col) = (tile_row * size + r, tile_col * size + c);
                                if row < height && col < width {
                                    block[r * size + c] = self.values[row * width + col];
                                }
                            }
                        }
                        blocks.push(block);
                    }
                }
                blocks
            }
            None => {
                let rows = self.rows_per_strip.unwrap_or(self.height) as usize;
                self.values.chunks(rows * width).map(|chunk| chunk.to_vec()).collect()
            }
        }
    }

    fn entries(&self, offsets: Vec<u32>, byte_counts: Vec<u32>) -> Vec<(u16, TagData)> {
        let mut entries = vec![
            (256, TagData::Long(vec![self.width])),
            (257, TagData::Long(vec![self.height])),
            (258, TagData::Short(vec![8; self.samples_per_pixel as usize])),
            (259, TagData::Short(vec![self.compression as u16])),
            (262, TagData::Short(vec![1])),
        ];

        match self.tile_size {
            Some(size) => {
                entries.push((277, TagData::Short(vec![self.samples_per_pixel])));
                entries.push((284, TagData::Short(vec![1])));
                entries.push((322, TagData::Long(vec![size])));
                entries.push((323, TagData::Long(vec![size])));
                entries.push((324, TagData::Long(offsets)));
                entries.push((325, TagData::Long(byte_counts)));
            }
            None => {
                entries.push((273, TagData::Long(offsets)));
                entries.push((277, TagData::Short(vec![self.samples_per_pixel])));
                entries.push((278, TagData::Long(vec![self.rows_per_strip.unwrap_or(self.height)])));
                entries.push((279, TagData::Long(byte_counts)));
                entries.push((284, TagData::Short(vec![1])));
            }
        }

        entries.push((339, TagData::Short(vec![1])));
        if self.georeferenced {
            entries.push((33550, TagData::Double(vec![self.pixel_size, self.pixel_size, 0.0])));
            entries.push((33922, TagData::Double(vec![0.0, 0.0, 0.0, self.origin.0, self.origin.1, 0.0])));
            // Geographic model, WGS 84
            entries.push((34735, TagData::Short(vec![
                1, 1, 0, 3,
                1024, 0, 1, 2,
                1025, 0, 1, self.raster_type,
                2048, 0, 1, 4326,
            ])));
        }
        if let Some(nodata) = &self.nodata {
            entries.push((42113, TagData::Ascii(nodata.clone())));
        }
        entries
    }

    /// Encodes the file: header, block data, then the IFD and its data area
    pub fn to_bytes(&self) -> Vec<u8> {
        let handler = CompressionFactory::create_handler(self.compression).unwrap();

        let mut block_area = Vec::new();
        let mut offsets = Vec::new();
        let mut byte_counts = Vec::new();
        for block in self.blocks() {
            let packed = handler.compress(&block).unwrap();
            offsets.push(8 + block_area.len() as u32);
            byte_counts.push(packed.len() as u32);
            block_area.extend_from_slice(&packed);
        }
        if block_area.len() % 2 == 1 {
            block_area.push(0);
        }

        let entries = self.entries(offsets, byte_counts);
        let ifd_offset = 8 + block_area.len();
        let data_start = ifd_offset + 2 + 12 * entries.len() + 4;

        let mut buffer = Vec::new();
        buffer.write_u16::<LittleEndian>(0x4949).unwrap();
        buffer.write_u16::<LittleEndian>(42).unwrap();
        buffer.write_u32::<LittleEndian>(ifd_offset as u32).unwrap();
        buffer.extend_from_slice(&block_area);

        let mut data_area: Vec<u8> = Vec::new();
        buffer.write_u16::<LittleEndian>(entries.len() as u16).unwrap();
        for (tag, data) in &entries {
            buffer.write_u16::<LittleEndian>(*tag).unwrap();
            buffer.write_u16::<LittleEndian>(data.field_type()).unwrap();
            buffer.write_u32::<LittleEndian>(data.count()).unwrap();

            let mut bytes = data.to_le_bytes();
            if bytes.len() <= 4 {
                bytes.resize(4, 0);
                buffer.extend_from_slice(&bytes);
            } else {
                let offset = data_start + data_area.len();
                buffer.write_u32::<LittleEndian>(offset as u32).unwrap();
                data_area.extend_from_slice(&bytes);
                if data_area.len() % 2 == 1 {
                    data_area.push(0);
                }
            }
        }
        buffer.write_u32::<LittleEndian>(0).unwrap();
        buffer.extend_from_slice(&data_area);
        buffer
    }

    pub fn write(&self, path: &Path) -> PathBuf {
        fs::write(path, self.to_bytes()).unwrap();
        path.to_path_buf()
    }
}

/// Row-major grid from a picture where `#` is `water` and `.` is 0
pub fn grid_from_picture(picture: &[&str], water: u8) -> (u32, u32, Vec<u8>) {
    let height = picture.len() as u32;
    let width = picture[0].len() as u32;
    let values = picture
        .iter()
        .flat_map(|line| line.bytes().map(move |b| if b == b'#' { water } else { 0 }))
        .collect();
    (width, height, values)
}

//! Image File Directory (IFD) structures
//!
//! An IFD is the list of tag entries describing one image in a TIFF file.
//! The raster reader only ever needs the first (full resolution) IFD, but
//! the whole chain is parsed so overviews can be reported.

use std::collections::HashMap;
use std::fmt;
use log::trace;

use crate::tiff::constants::{compression, predictor, sample_format, tags};
use crate::utils::tag_utils;

/// One Image File Directory
#[derive(Debug, Clone)]
pub struct IFD {
    /// Entries in file order
    pub entries: Vec<IFDEntry>,
    /// IFD number (0-based)
    pub number: usize,
    /// Offset of this IFD in the file
    pub offset: u64,
    /// Lookup by tag id
    tag_map: HashMap<u16, IFDEntry>,
}

/// One tag entry of an IFD
///
/// `value_offset` holds the first value when the data fits inline, or the
/// file offset of the data otherwise. `inline` keeps the raw bytes of the
/// value field so inline arrays can be decoded in the file's byte order.
#[derive(Debug, Clone)]
pub struct IFDEntry {
    /// TIFF tag identifier
    pub tag: u16,
    /// Field type
    pub field_type: u16,
    /// Number of values
    pub count: u64,
    /// First value (inline) or offset to values
    pub value_offset: u64,
    /// Raw bytes of the value field (4 bytes for TIFF, 8 for BigTIFF)
    pub inline: [u8; 8],
}

impl IFDEntry {
    /// Creates an entry whose value field is a plain number
    pub fn new(tag: u16, field_type: u16, count: u64, value_offset: u64) -> Self {
        IFDEntry {
            tag,
            field_type,
            count,
            value_offset,
            inline: value_offset.to_le_bytes(),
        }
    }

    /// Creates an entry keeping the raw bytes of its value field
    pub fn with_inline(tag: u16, field_type: u16, count: u64, value_offset: u64, inline: [u8; 8]) -> Self {
        IFDEntry {
            tag,
            field_type,
            count,
            value_offset,
            inline,
        }
    }

    /// Size in bytes of one value of this entry's field type
    pub fn get_field_type_size(&self) -> usize {
        tag_utils::field_type_size(self.field_type)
    }

    /// Whether the values are stored in the entry itself
    pub fn is_value_inline(&self, is_big_tiff: bool) -> bool {
        let total_size = self.get_field_type_size() as u64 * self.count;
        let inline_size = if is_big_tiff { 8 } else { 4 };
        total_size <= inline_size
    }

    /// Human-readable description for logging
    pub fn description(&self) -> String {
        format!("Tag: {} ({}), Type: {} ({}), Count: {}, Value/Offset: {}",
                self.tag, tag_utils::get_tag_name(self.tag),
                self.field_type, tag_utils::get_field_type_name(self.field_type),
                self.count, self.value_offset)
    }
}

impl IFD {
    /// Creates an empty IFD
    pub fn new(number: usize, offset: u64) -> Self {
        IFD {
            entries: Vec::new(),
            number,
            offset,
            tag_map: HashMap::new(),
        }
    }

    /// Adds an entry, replacing any earlier entry with the same tag in the lookup
    pub fn add_entry(&mut self, entry: IFDEntry) {
        trace!("IFD #{}: {}", self.number, entry.description());
        self.tag_map.insert(entry.tag, entry.clone());
        self.entries.push(entry);
    }

    /// Gets the value/offset field of a tag
    pub fn get_tag_value(&self, tag: u16) -> Option<u64> {
        self.tag_map.get(&tag).map(|entry| entry.value_offset)
    }

    /// Checks if this IFD has a tag
    pub fn has_tag(&self, tag: u16) -> bool {
        self.tag_map.contains_key(&tag)
    }

    /// Gets an entry by tag
    pub fn get_entry(&self, tag: u16) -> Option<&IFDEntry> {
        self.tag_map.get(&tag)
    }

    /// Image width and height in pixels
    pub fn get_dimensions(&self) -> Option<(u64, u64)> {
        let width = self.get_tag_value(tags::IMAGE_WIDTH)?;
        let height = self.get_tag_value(tags::IMAGE_LENGTH)?;
        Some((width, height))
    }

    /// Number of bands (1 when the tag is absent)
    pub fn get_samples_per_pixel(&self) -> u64 {
        self.get_tag_value(tags::SAMPLES_PER_PIXEL).unwrap_or(1)
    }

    /// Bits per sample of the first band (1 when the tag is absent)
    pub fn get_bits_per_sample(&self) -> u16 {
        self.get_tag_value(tags::BITS_PER_SAMPLE).unwrap_or(1) as u16
    }

    /// Sample format (unsigned integer when the tag is absent)
    pub fn get_sample_format(&self) -> u16 {
        self.get_tag_value(tags::SAMPLE_FORMAT)
            .map(|v| v as u16)
            .unwrap_or(sample_format::UNSIGNED)
    }

    /// Compression code (uncompressed when the tag is absent)
    pub fn get_compression(&self) -> u64 {
        self.get_tag_value(tags::COMPRESSION).unwrap_or(compression::NONE)
    }

    /// Predictor code (none when the tag is absent)
    pub fn get_predictor(&self) -> u64 {
        self.get_tag_value(tags::PREDICTOR).unwrap_or(predictor::NONE)
    }

    /// Whether the image data is organised in tiles rather than strips
    pub fn is_tiled(&self) -> bool {
        self.has_tag(tags::TILE_WIDTH) && self.has_tag(tags::TILE_LENGTH)
    }

    /// Whether this IFD is a reduced-resolution overview
    pub fn is_overview(&self) -> bool {
        self.get_tag_value(tags::NEW_SUBFILE_TYPE)
            .map(|subfile_type| subfile_type & 1 == 1)
            .unwrap_or(false)
    }

    /// Number of entries
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for IFD {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "IFD #{} (offset: {})", self.number, self.offset)?;
        writeln!(f, "  Number of entries: {}", self.entries.len())?;

        if let Some((width, height)) = self.get_dimensions() {
            writeln!(f, "  Dimensions: {}x{}", width, height)?;
        }

        writeln!(f, "  Samples per pixel: {}", self.get_samples_per_pixel())?;
        writeln!(f, "  Bits per sample: {}", self.get_bits_per_sample())?;
        writeln!(f, "  Compression: {} ({})",
                 self.get_compression(), tag_utils::get_compression_name(self.get_compression()))?;
        writeln!(f, "  Layout: {}", if self.is_tiled() { "tiled" } else { "stripped" })?;

        writeln!(f, "  Tags:")?;
        for entry in &self.entries {
            writeln!(f, "    {} ({}): {} [{}]",
                     entry.tag,
                     tag_utils::get_tag_name(entry.tag),
                     entry.value_offset,
                     tag_utils::get_field_type_name(entry.field_type))?;
        }

        Ok(())
    }
}

//! TIFF file reader implementation
//!
//! Reads the header and IFD chain of TIFF and BigTIFF files. Multi-byte
//! values go through the `ByteOrderHandler` detected from the header, so
//! the rest of the crate never has to care about endianness.

use log::{debug, warn};
use std::io::{Cursor, SeekFrom};

use crate::io::SeekableReader;
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::tiff::constants::field_types;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::{IFD, IFDEntry};
use crate::tiff::types::TIFF;
use crate::tiff::validation;
use crate::utils::format_utils;
use crate::utils::ifd_utils;
use crate::utils::string_utils;
use crate::utils::tag_utils;

/// Guard against cyclic IFD chains
const MAX_IFDS: usize = 100;

/// Reader for TIFF and BigTIFF files
pub struct TiffReader {
    /// Current byte order handler
    byte_order_handler: Option<Box<dyn ByteOrderHandler>>,
    /// Whether currently reading BigTIFF format
    is_big_tiff: bool,
}

impl Default for TiffReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TiffReader {
    /// Creates a new TIFF reader
    pub fn new() -> Self {
        TiffReader {
            byte_order_handler: None,
            is_big_tiff: false,
        }
    }

    fn handler(&self) -> TiffResult<&dyn ByteOrderHandler> {
        self.byte_order_handler
            .as_deref()
            .ok_or_else(|| TiffError::GenericError("Byte order not yet determined".to_string()))
    }

    /// Reads header and IFD chain from the given reader
    pub fn read(&mut self, reader: &mut dyn SeekableReader) -> TiffResult<TIFF> {
        reader.seek(SeekFrom::Start(0))?;

        let handler = format_utils::detect_byte_order(reader)?;
        let byte_order = handler.byte_order();
        let (is_big_tiff, _) = format_utils::detect_tiff_format(reader, handler.as_ref())?;
        self.byte_order_handler = Some(handler);
        self.is_big_tiff = is_big_tiff;

        let first_ifd_offset = ifd_utils::read_ifd_offset(reader, is_big_tiff, self.handler()?)?;
        debug!("First IFD offset: {}", first_ifd_offset);

        let file_size = validation::get_file_size(reader)?;
        validation::validate_ifd_offset(first_ifd_offset, file_size)?;

        let mut tiff = TIFF::new(is_big_tiff, byte_order);
        tiff.ifds = self.read_ifd_chain(reader, first_ifd_offset, file_size)?;

        if tiff.ifds.is_empty() {
            return Err(TiffError::GenericError("File contains no readable IFD".to_string()));
        }

        debug!("Read {} IFDs ({})", tiff.ifds.len(), byte_order.name());
        Ok(tiff)
    }

    fn read_ifd_chain(
        &self,
        reader: &mut dyn SeekableReader,
        first_ifd_offset: u64,
        file_size: u64,
    ) -> TiffResult<Vec<IFD>> {
        let mut ifds = Vec::new();
        let mut ifd_offset = first_ifd_offset;

        while ifd_offset != 0 && ifds.len() < MAX_IFDS {
            if ifd_offset >= file_size {
                warn!("IFD offset {} exceeds file size {}, stopping IFD chain", ifd_offset, file_size);
                break;
            }

            let ifd = match self.read_ifd(reader, ifd_offset, ifds.len()) {
                Ok(ifd) => ifd,
                // Only the first IFD is essential; a broken overview is skipped
                Err(e) if !ifds.is_empty() => {
                    warn!("Error reading IFD {}: {}", ifds.len(), e);
                    break;
                }
                Err(e) => return Err(e),
            };

            // The reader sits right after the last entry, where the next offset lives
            let next_ifd_offset = match ifd_utils::read_ifd_offset(reader, self.is_big_tiff, self.handler()?) {
                Ok(offset) => offset,
                Err(e) => {
                    warn!("Error reading next IFD offset: {}", e);
                    ifds.push(ifd);
                    break;
                }
            };

            ifds.push(ifd);

            if next_ifd_offset != 0 && validation::validate_ifd_offset(next_ifd_offset, file_size).is_err() {
                warn!("Invalid next IFD offset: {}, stopping IFD chain", next_ifd_offset);
                break;
            }
            ifd_offset = next_ifd_offset;
        }

        Ok(ifds)
    }

    /// Reads one IFD starting at `offset`
    pub fn read_ifd(&self, reader: &mut dyn SeekableReader, offset: u64, number: usize) -> TiffResult<IFD> {
        reader.seek(SeekFrom::Start(offset))?;
        let handler = self.handler()?;

        let entry_count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u16(reader)? as u64
        };
        debug!("IFD #{} at {} has {} entries", number, offset, entry_count);

        let mut ifd = IFD::new(number, offset);
        for _ in 0..entry_count {
            let entry = self.read_ifd_entry(reader, handler)?;
            ifd.add_entry(entry);
        }

        Ok(ifd)
    }

    fn read_ifd_entry(&self, reader: &mut dyn SeekableReader, handler: &dyn ByteOrderHandler) -> TiffResult<IFDEntry> {
        let tag = handler.read_u16(reader)?;
        let field_type = handler.read_u16(reader)?;
        let count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u32(reader)? as u64
        };

        let field_len = if self.is_big_tiff { 8 } else { 4 };
        let mut inline = [0u8; 8];
        reader.read_exact(&mut inline[..field_len])?;

        let mut entry = IFDEntry::with_inline(tag, field_type, count, 0, inline);
        let mut cursor = Cursor::new(&inline[..field_len]);

        entry.value_offset = if entry.is_value_inline(self.is_big_tiff) && count > 0 {
            // First value decoded with its real width, so SHORT values in
            // big-endian files don't end up shifted into the high bytes
            match tag_utils::read_single_value(&mut cursor, field_type, handler) {
                Ok(value) => value,
                Err(TiffError::UnsupportedFieldType(_)) => 0,
                Err(e) => return Err(e),
            }
        } else if self.is_big_tiff {
            handler.read_u64(&mut cursor)?
        } else {
            handler.read_u32(&mut cursor)? as u64
        };

        Ok(entry)
    }

    /// Raw bytes of a tag's values, taken inline or from the file
    fn read_entry_bytes(&self, reader: &mut dyn SeekableReader, entry: &IFDEntry) -> TiffResult<Vec<u8>> {
        let size = entry.get_field_type_size() as u64 * entry.count;

        if entry.is_value_inline(self.is_big_tiff) {
            return Ok(entry.inline[..size as usize].to_vec());
        }

        let file_size = validation::get_file_size(reader)?;
        validation::validate_block(entry.value_offset, size, file_size)?;

        reader.seek(SeekFrom::Start(entry.value_offset))?;
        let mut buffer = vec![0u8; size as usize];
        reader.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Reads an integer tag's values as u64
    pub fn read_tag_values(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<u64>> {
        let entry = ifd.get_entry(tag).ok_or(TiffError::TagNotFound(tag))?;
        let bytes = self.read_entry_bytes(reader, entry)?;

        let mut values = Vec::with_capacity(entry.count as usize);
        tag_utils::read_tag_value_array(&mut Cursor::new(bytes), entry, self.handler()?, &mut values)?;
        Ok(values)
    }

    /// Reads a numeric tag's values as f64
    ///
    /// Used for the GeoTIFF model tags, which are stored as DOUBLE.
    pub fn read_tag_doubles(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<f64>> {
        let entry = ifd.get_entry(tag).ok_or(TiffError::TagNotFound(tag))?;
        let bytes = self.read_entry_bytes(reader, entry)?;

        let mut values = Vec::with_capacity(entry.count as usize);
        tag_utils::read_tag_double_array(&mut Cursor::new(bytes), entry, self.handler()?, &mut values)?;
        Ok(values)
    }

    /// Reads an ASCII tag, trailing NULs removed
    pub fn read_tag_ascii(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<String> {
        let entry = ifd.get_entry(tag).ok_or(TiffError::TagNotFound(tag))?;
        if entry.field_type != field_types::ASCII {
            return Err(TiffError::UnsupportedFieldType(entry.field_type));
        }

        let mut bytes = self.read_entry_bytes(reader, entry)?;
        string_utils::trim_trailing_nulls(&mut bytes);

        String::from_utf8(bytes)
            .map_err(|e| TiffError::GenericError(format!("Invalid UTF-8 string: {}", e)))
    }

    /// Returns whether the current file is a BigTIFF
    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }

    /// Byte order of the current file, once detected
    pub fn byte_order(&self) -> Option<ByteOrder> {
        self.byte_order_handler.as_ref().map(|handler| handler.byte_order())
    }
}

//! Strip-based raster window extraction
//!
//! Stripped TIFFs store the image in horizontal bands spanning the whole
//! width. Only the strips overlapping the requested window are read.

use log::{debug, info};

use crate::io::SeekableReader;
use crate::tiff::constants::tags;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::TiffReader;
use crate::utils::progress::ProgressTracker;

use super::block::BlockDecoder;
use super::region::Region;

/// Reads a window of cells from a stripped TIFF
pub struct StripReader<'a> {
    reader: &'a mut dyn SeekableReader,
    ifd: &'a IFD,
    tiff_reader: &'a TiffReader,
}

impl<'a> StripReader<'a> {
    pub fn new(reader: &'a mut dyn SeekableReader, ifd: &'a IFD, tiff_reader: &'a TiffReader) -> Self {
        StripReader { reader, ifd, tiff_reader }
    }

    /// Rows per strip and image dimensions
    ///
    /// A missing RowsPerStrip means the whole image is one strip.
    fn strip_layout(&self) -> TiffResult<(usize, usize, usize)> {
        let (width, height) = self.ifd.get_dimensions().ok_or(TiffError::MissingDimensions)?;
        let rows_per_strip = self.ifd.get_tag_value(tags::ROWS_PER_STRIP)
            .unwrap_or(height)
            .clamp(1, height.max(1));

        Ok((rows_per_strip as usize, width as usize, height as usize))
    }

    /// Number of strips `read_window` will visit
    pub fn strip_count(&self, window: Region) -> TiffResult<u64> {
        let (rows_per_strip, _, _) = self.strip_layout()?;
        let first = window.y as usize / rows_per_strip;
        let last = (window.end_y() as usize).saturating_sub(1) / rows_per_strip;
        Ok((last - first + 1) as u64)
    }

    /// Decodes the cells of `window` into `out` (row-major, window-sized)
    pub fn read_window(
        &mut self,
        decoder: &BlockDecoder,
        window: Region,
        fill: f64,
        out: &mut [f64],
        progress: &ProgressTracker,
    ) -> TiffResult<()> {
        let (rows_per_strip, width, height) = self.strip_layout()?;
        info!("Strip layout: {} rows per strip, image {}x{}", rows_per_strip, width, height);

        let offsets = self.tiff_reader.read_tag_values(self.reader, self.ifd, tags::STRIP_OFFSETS)?;
        let byte_counts = self.tiff_reader.read_tag_values(self.reader, self.ifd, tags::STRIP_BYTE_COUNTS)?;

        let window_width = window.width as usize;
        let col_start = window.x as usize;
        let sample_size = decoder.layout().sample_size();

        let first_strip = window.y as usize / rows_per_strip;
        let last_strip = (window.end_y() as usize - 1) / rows_per_strip;
        debug!("Reading strips {} to {}", first_strip, last_strip);

        for strip in first_strip..=last_strip {
            let strip_row = strip * rows_per_strip;
            let rows_in_strip = rows_per_strip.min(height - strip_row);

            let (offset, byte_count) = match (offsets.get(strip), byte_counts.get(strip)) {
                (Some(&offset), Some(&count)) => (offset, count),
                _ => {
                    return Err(TiffError::GenericError(format!(
                        "Strip {} missing from StripOffsets/StripByteCounts ({} entries)",
                        strip, offsets.len()
                    )))
                }
            };

            let data = decoder.read_block(self.reader, offset, byte_count, width, rows_in_strip)?;

            let row_from = strip_row.max(window.y as usize);
            let row_to = (strip_row + rows_in_strip).min(window.end_y() as usize);

            for row in row_from..row_to {
                let out_start = (row - window.y as usize) * window_width;
                let target = &mut out[out_start..out_start + window_width];

                match &data {
                    Some(bytes) => {
                        let start = ((row - strip_row) * width + col_start) * sample_size;
                        decoder.layout().decode_into(&bytes[start..start + window_width * sample_size], target);
                    }
                    None => target.fill(fill),
                }
            }

            progress.increment(1);
        }

        Ok(())
    }
}

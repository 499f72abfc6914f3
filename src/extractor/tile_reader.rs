//! Tile-based raster window extraction
//!
//! Tiled TIFFs store the image in equally sized rectangles; edge tiles are
//! padded to the full tile size. Only tiles intersecting the window are
//! decoded.

use log::{debug, info};

use crate::io::SeekableReader;
use crate::tiff::constants::tags;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::TiffReader;
use crate::utils::progress::ProgressTracker;

use super::block::BlockDecoder;
use super::region::Region;

/// Reads a window of cells from a tiled TIFF
pub struct TileReader<'a> {
    reader: &'a mut dyn SeekableReader,
    ifd: &'a IFD,
    tiff_reader: &'a TiffReader,
}

impl<'a> TileReader<'a> {
    pub fn new(reader: &'a mut dyn SeekableReader, ifd: &'a IFD, tiff_reader: &'a TiffReader) -> Self {
        TileReader { reader, ifd, tiff_reader }
    }

    fn tile_dimensions(&self) -> TiffResult<(u32, u32)> {
        let tile_width = self.ifd.get_tag_value(tags::TILE_WIDTH).unwrap_or(0) as u32;
        let tile_height = self.ifd.get_tag_value(tags::TILE_LENGTH).unwrap_or(0) as u32;

        if tile_width == 0 || tile_height == 0 {
            return Err(TiffError::GenericError(format!(
                "Invalid tile size {}x{}", tile_width, tile_height
            )));
        }
        Ok((tile_width, tile_height))
    }

    /// Tiles overlapping `window`, as (tile_x, tile_y) ranges
    pub fn tiles_for_window(
        window: Region,
        tile_width: u32,
        tile_height: u32,
    ) -> (std::ops::Range<u32>, std::ops::Range<u32>) {
        let start_x = window.x / tile_width;
        let start_y = window.y / tile_height;
        let end_x = (window.end_x() + tile_width - 1) / tile_width;
        let end_y = (window.end_y() + tile_height - 1) / tile_height;
        (start_x..end_x, start_y..end_y)
    }

    /// Number of tiles `read_window` will visit
    pub fn tile_count(&self, window: Region) -> TiffResult<u64> {
        let (tile_width, tile_height) = self.tile_dimensions()?;
        let (xs, ys) = Self::tiles_for_window(window, tile_width, tile_height);
        Ok(xs.len() as u64 * ys.len() as u64)
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
        let (tile_width, tile_height) = self.tile_dimensions()?;
        let (image_width, _) = self.ifd.get_dimensions().ok_or(TiffError::MissingDimensions)?;
        info!("Tile dimensions: {}x{}", tile_width, tile_height);

        let offsets = self.tiff_reader.read_tag_values(self.reader, self.ifd, tags::TILE_OFFSETS)?;
        let byte_counts = self.tiff_reader.read_tag_values(self.reader, self.ifd, tags::TILE_BYTE_COUNTS)?;

        let tiles_across = (image_width as u32 + tile_width - 1) / tile_width;
        let (xs, ys) = Self::tiles_for_window(window, tile_width, tile_height);
        debug!("Processing tiles x {:?}, y {:?}", xs, ys);

        let sample_size = decoder.layout().sample_size();
        let window_width = window.width as usize;

        for tile_y in ys {
            for tile_x in xs.clone() {
                let index = (tile_y * tiles_across + tile_x) as usize;
                let (offset, byte_count) = match (offsets.get(index), byte_counts.get(index)) {
                    (Some(&offset), Some(&count)) => (offset, count),
                    _ => {
                        return Err(TiffError::GenericError(format!(
                            "Tile {} missing from TileOffsets/TileByteCounts ({} entries)",
                            index, offsets.len()
                        )))
                    }
                };

                let data = decoder.read_block(
                    self.reader, offset, byte_count, tile_width as usize, tile_height as usize,
                )?;

                let tile_region = Region::new(tile_x * tile_width, tile_y * tile_height, tile_width, tile_height);
                let overlap = match tile_region.intersection(&window) {
                    Some(overlap) => overlap,
                    None => continue,
                };

                let run = overlap.width as usize;
                for row in overlap.y..overlap.end_y() {
                    let out_start = (row - window.y) as usize * window_width + (overlap.x - window.x) as usize;
                    let target = &mut out[out_start..out_start + run];

                    match &data {
                        Some(bytes) => {
                            let in_row = (row - tile_region.y) as usize;
                            let in_col = (overlap.x - tile_region.x) as usize;
                            let start = (in_row * tile_width as usize + in_col) * sample_size;
                            decoder.layout().decode_into(&bytes[start..start + run * sample_size], target);
                        }
                        None => target.fill(fill),
                    }
                }

                progress.increment(1);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_overlapping_tiles() {
        let window = Region::new(10, 20, 30, 5);
        let (xs, ys) = TileReader::tiles_for_window(window, 16, 16);
        assert_eq!(xs, 0..3);
        assert_eq!(ys, 1..2);
    }
}

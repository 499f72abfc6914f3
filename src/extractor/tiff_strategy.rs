//! TIFF format extractor strategy implementation
//!
//! Handles single-band GeoTIFF and BigTIFF files, stripped or tiled, with
//! any of the supported compressions.

use std::path::Path;

use geo::{Intersects, Point, Polygon};
use log::{debug, info, warn};

use crate::compression::CompressionFactory;
use crate::coordinate::{BoundingBox, CoordinateSystemFactory, GeoTransform};
use crate::io::{self, SeekableReader};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::{GeoKeyParser, TiffReader, TIFF};
use crate::utils::progress::ProgressTracker;
use crate::utils::tag_utils;

use super::block::BlockDecoder;
use super::extractor_strategy::{ClipOptions, ExtractorStrategy};
use super::grid::RasterGrid;
use super::info::RasterInfo;
use super::region::Region;
use super::sample::{SampleLayout, SampleType};
use super::strip_reader::StripReader;
use super::tile_reader::TileReader;

/// TIFF format extractor
pub struct TiffExtractorStrategy {
    reader: TiffReader,
}

impl TiffExtractorStrategy {
    pub fn new() -> Self {
        TiffExtractorStrategy {
            reader: TiffReader::new(),
        }
    }

    fn open(&mut self, path: &Path) -> TiffResult<(Box<dyn SeekableReader>, TIFF)> {
        let mut file: Box<dyn SeekableReader> = Box::new(io::open_buffered(path)?);
        let tiff = self.reader.read(file.as_mut())?;
        Ok((file, tiff))
    }

    /// Decodes `window` of the main image into `data`
    fn read_window(
        &self,
        file: &mut dyn SeekableReader,
        ifd: &IFD,
        layout: SampleLayout,
        window: Region,
        fill: f64,
        data: &mut [f64],
        show_progress: bool,
    ) -> TiffResult<()> {
        let decoder = BlockDecoder::new(file, ifd, layout)?;

        if ifd.is_tiled() {
            let mut tiles = TileReader::new(file, ifd, &self.reader);
            let progress = ProgressTracker::optional(show_progress, tiles.tile_count(window)?, "Reading tiles");
            tiles.read_window(&decoder, window, fill, data, &progress)?;
            progress.finish();
        } else {
            let mut strips = StripReader::new(file, ifd, &self.reader);
            let progress = ProgressTracker::optional(show_progress, strips.strip_count(window)?, "Reading strips");
            strips.read_window(&decoder, window, fill, data, &progress)?;
            progress.finish();
        }

        Ok(())
    }
}

impl Default for TiffExtractorStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorStrategy for TiffExtractorStrategy {
    fn clip(&mut self, source_path: &Path, bbox: &BoundingBox, options: &ClipOptions) -> TiffResult<RasterGrid> {
        let (mut file, tiff) = self.open(source_path)?;
        let ifd = tiff.main_ifd()
            .ok_or_else(|| TiffError::GenericError("No IFDs found in TIFF file".to_string()))?;

        let samples = ifd.get_samples_per_pixel();
        if samples != 1 {
            return Err(TiffError::GenericError(format!(
                "Expected a single-band raster, found {} samples per pixel", samples
            )));
        }

        let (width, height) = ifd.get_dimensions().ok_or(TiffError::MissingDimensions)?;
        let layout = SampleLayout::from_ifd(ifd, tiff.byte_order)?;

        let geo_info = GeoKeyParser::extract_geo_info(&self.reader, file.as_mut(), ifd)?;
        if !geo_info.is_georeferenced() {
            return Err(TiffError::NotGeoreferenced);
        }
        let transform = GeoTransform::from_geo_info(&geo_info)?;
        let crs = CoordinateSystemFactory::from_geo_info(&geo_info);
        debug!("Raster transform {}, CRS {:?}", transform, crs);

        if let (Some(box_epsg), Some(raster_crs)) = (bbox.epsg, crs) {
            if box_epsg != raster_crs.epsg_code() {
                warn!("Bounding box is in EPSG:{} but the raster is {}; coordinates are used as-is",
                      box_epsg, raster_crs.description());
            }
        }

        let extent = transform.extent(width as usize, height as usize);
        if !bbox.intersects(&extent) {
            return Err(TiffError::GenericError(format!(
                "Bounding box {} does not intersect the raster extent {}", bbox, extent
            )));
        }

        let window = bbox.to_pixel_region(&transform, width as u32, height as u32)
            .ok_or_else(|| TiffError::GenericError(format!(
                "Bounding box {} covers no cell of the raster", bbox
            )))?;
        info!("Pixel window: {} ({} cells)", window, window.pixel_count());

        let nodata = geo_info.nodata.map(|value| layout.sample_type.quantize(value));
        let fill = nodata.unwrap_or(0.0);
        let window_transform = transform.shifted(window.x as f64, window.y as f64);
        let mut grid = RasterGrid::filled(window.height as usize, window.width as usize, fill, window_transform)
            .with_nodata(nodata)
            .with_crs(crs);

        self.read_window(file.as_mut(), ifd, layout, window, fill, &mut grid.data, options.show_progress)?;

        mask_outside(&mut grid, &bbox.to_polygon(), fill);
        if options.mask_nodata {
            mask_nodata(&mut grid);
        }

        Ok(grid)
    }

    fn describe(&mut self, source_path: &Path) -> TiffResult<RasterInfo> {
        let (mut file, tiff) = self.open(source_path)?;
        let ifd = tiff.main_ifd()
            .ok_or_else(|| TiffError::GenericError("No IFDs found in TIFF file".to_string()))?;
        debug!("{}", tiff);

        let (width, height) = ifd.get_dimensions().ok_or(TiffError::MissingDimensions)?;
        let geo_info = GeoKeyParser::extract_geo_info(&self.reader, file.as_mut(), ifd)?;

        let sample_type = match SampleType::from_tags(ifd.get_bits_per_sample(), ifd.get_sample_format()) {
            Ok(sample_type) => sample_type.name().to_string(),
            Err(_) => format!("unsupported ({} bits, format {})", ifd.get_bits_per_sample(), ifd.get_sample_format()),
        };

        Ok(RasterInfo {
            width,
            height,
            sample_type,
            compression: tag_utils::get_compression_name(ifd.get_compression()).to_string(),
            compression_supported: CompressionFactory::is_supported(ifd.get_compression()),
            tiled: ifd.is_tiled(),
            big_tiff: tiff.is_big_tiff,
            byte_order: tiff.byte_order.name().to_string(),
            overview_count: tiff.overviews().len(),
            transform: GeoTransform::from_geo_info(&geo_info).ok(),
            crs: CoordinateSystemFactory::from_geo_info(&geo_info),
            nodata: geo_info.nodata,
        })
    }
}

/// Fills cells whose centre lies outside the clip polygon
///
/// The pixel window is rounded outward, so edge cells may reach past the
/// box. They take the fill value, which is nodata when the raster has one.
/// Centres on the boundary count as inside.
pub(crate) fn mask_outside(grid: &mut RasterGrid, clip: &Polygon<f64>, fill: f64) {
    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let (x, y) = grid.cell_center(row, col);
            if !clip.intersects(&Point::new(x, y)) {
                grid.data[row * grid.cols + col] = fill;
            }
        }
    }
}

/// Replaces nodata cells with NaN
pub(crate) fn mask_nodata(grid: &mut RasterGrid) {
    if let Some(nodata) = grid.nodata {
        for value in grid.data.iter_mut().filter(|value| **value == nodata) {
            *value = f64::NAN;
        }
    }
}

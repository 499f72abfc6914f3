//! Raster clipping strategy definitions
//!
//! A strategy knows how to read one raster file format. The factory picks
//! a strategy from the file extension and `RasterClipper` is the facade the
//! pipeline talks to.

use std::path::Path;

use log::{debug, error, info};

use crate::coordinate::BoundingBox;
use crate::errors::{RiverError, RiverResult};
use crate::tiff::errors::{TiffError, TiffResult};

use super::grid::RasterGrid;
use super::info::RasterInfo;
use super::tiff_strategy::TiffExtractorStrategy;

/// Options controlling a clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClipOptions {
    /// Replace nodata cells with NaN in the clipped grid
    pub mask_nodata: bool,
    /// Draw a progress bar while reading blocks
    pub show_progress: bool,
}

/// Strategy for reading rasters of one file format
pub trait ExtractorStrategy {
    /// Reads the cells of `source_path` that intersect `bbox`
    ///
    /// Cells of the returned window whose centre lies outside the box are
    /// replaced by the nodata value (0 when the raster declares none).
    fn clip(&mut self, source_path: &Path, bbox: &BoundingBox, options: &ClipOptions) -> TiffResult<RasterGrid>;

    /// Reads the raster's metadata without decoding cells
    fn describe(&mut self, source_path: &Path) -> TiffResult<RasterInfo>;

    /// Check if this strategy supports the given file format
    fn supports_format(&self, file_path: &Path) -> bool {
        matches!(extension_of(file_path).as_str(), "tif" | "tiff")
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("")
        .to_lowercase()
}

/// Factory for creating extractor strategies by file extension
pub struct ExtractorStrategyFactory;

impl ExtractorStrategyFactory {
    pub fn create_strategy(file_path: &Path) -> TiffResult<Box<dyn ExtractorStrategy>> {
        let extension = extension_of(file_path);
        debug!("Determining strategy for file extension: {}", extension);

        let strategy: Box<dyn ExtractorStrategy> = Box::new(TiffExtractorStrategy::new());
        if strategy.supports_format(file_path) {
            info!("Using TIFF extractor strategy for {}", file_path.display());
            Ok(strategy)
        } else {
            error!("Unsupported file format: {}", extension);
            Err(TiffError::GenericError(format!("Unsupported file format: '{}'", extension)))
        }
    }
}

/// Clips rasters to a bounding box
///
/// Every failure to produce a grid (missing file, unreadable or malformed
/// raster, box outside the raster) surfaces as `RiverError::DataError`
/// naming the file.
#[derive(Debug, Clone, Default)]
pub struct RasterClipper {
    options: ClipOptions,
}

impl RasterClipper {
    pub fn new(options: ClipOptions) -> Self {
        RasterClipper { options }
    }

    /// Reads the window of `raster_path` covered by `bbox`
    pub fn clip(&self, raster_path: &Path, bbox: &BoundingBox) -> RiverResult<RasterGrid> {
        info!("Clipping {} to {}", raster_path.display(), bbox);
        ensure_exists(raster_path)?;

        bbox.validate()
            .map_err(|msg| RiverError::DataError(format!("Invalid bounding box: {}", msg)))?;

        let mut strategy = ExtractorStrategyFactory::create_strategy(raster_path)
            .map_err(|e| data_error(raster_path, e))?;

        let grid = strategy.clip(raster_path, bbox, &self.options)
            .map_err(|e| data_error(raster_path, e))?;

        info!("Clipped grid: {} rows x {} cols", grid.rows, grid.cols);
        Ok(grid)
    }

    /// Reads the metadata of `raster_path`
    pub fn describe(&self, raster_path: &Path) -> RiverResult<RasterInfo> {
        ensure_exists(raster_path)?;

        let mut strategy = ExtractorStrategyFactory::create_strategy(raster_path)
            .map_err(|e| data_error(raster_path, e))?;

        strategy.describe(raster_path).map_err(|e| data_error(raster_path, e))
    }
}

fn ensure_exists(path: &Path) -> RiverResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(RiverError::DataError(format!("Raster not found: {}", path.display())))
    }
}

fn data_error(path: &Path, error: TiffError) -> RiverError {
    RiverError::DataError(format!("{}: {}", path.display(), error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_dispatches_on_extension() {
        assert!(ExtractorStrategyFactory::create_strategy(Path::new("scene.TIF")).is_ok());
        assert!(ExtractorStrategyFactory::create_strategy(Path::new("scene.tiff")).is_ok());
        assert!(ExtractorStrategyFactory::create_strategy(Path::new("scene.png")).is_err());
    }

    #[test]
    fn missing_raster_is_a_data_error() {
        let clipper = RasterClipper::default();
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);

        match clipper.clip(Path::new("/definitely/not/here.tif"), &bbox) {
            Err(RiverError::DataError(msg)) => assert!(msg.contains("not/here.tif")),
            other => panic!("expected DataError, got {:?}", other),
        }
    }
}

//! Raster clipping
//!
//! Reads the window of a raster covered by a bounding box, using a
//! strategy per file format.

mod region;
mod sample;
mod block;
mod grid;
mod info;
mod extractor_strategy;
mod tiff_strategy;
mod tile_reader;
mod strip_reader;

pub use region::Region;
pub use sample::{SampleLayout, SampleType};
pub use grid::RasterGrid;
pub use info::RasterInfo;
pub use extractor_strategy::{ClipOptions, ExtractorStrategy, ExtractorStrategyFactory};
pub use tiff_strategy::TiffExtractorStrategy;

// Facade used by the pipeline
pub use extractor_strategy::RasterClipper;

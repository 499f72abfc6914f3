pub mod io;
pub mod tiff;
pub mod utils;
pub mod compression;
pub mod extractor;
pub mod coordinate;
pub mod errors;
pub mod config;
pub mod mask;
pub mod vector;
pub mod commands;
pub mod api;

pub use crate::api::{RiverArea, RiverKit};
pub use crate::config::{Dataset, ExtractionConfig};
pub use crate::errors::{RiverError, RiverResult};

pub use tiff::TiffReader;
pub use extractor::{ClipOptions, RasterClipper, RasterGrid};
pub use coordinate::{BoundingBox, CoordinateSystem, GeoTransform};
pub use mask::{binarize, ClassifiedGrid};
pub use vector::{assemble, export, polygonize, select_largest, Component, WaterGeometry};

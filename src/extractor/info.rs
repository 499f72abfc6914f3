//! Raster metadata summary used by the analyze command

use std::fmt;

use crate::coordinate::{BoundingBox, CoordinateSystem, GeoTransform};

/// What is known about a raster without reading its cells
#[derive(Debug, Clone, PartialEq)]
pub struct RasterInfo {
    pub width: u64,
    pub height: u64,
    pub sample_type: String,
    pub compression: String,
    /// Whether the compression can be decoded for clipping
    pub compression_supported: bool,
    pub tiled: bool,
    pub big_tiff: bool,
    pub byte_order: String,
    pub overview_count: usize,
    pub transform: Option<GeoTransform>,
    pub crs: Option<CoordinateSystem>,
    pub nodata: Option<f64>,
}

impl RasterInfo {
    /// World extent, when the raster is georeferenced
    pub fn extent(&self) -> Option<BoundingBox> {
        self.transform
            .map(|transform| transform.extent(self.width as usize, self.height as usize))
    }
}

impl fmt::Display for RasterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dimensions: {}x{}", self.width, self.height)?;
        writeln!(f, "Sample type: {}", self.sample_type)?;
        writeln!(f, "Compression: {}{}", self.compression,
                 if self.compression_supported { "" } else { " (not supported for clipping)" })?;
        writeln!(f, "Layout: {}", if self.tiled { "tiled" } else { "stripped" })?;
        writeln!(f, "Format: {} ({})", if self.big_tiff { "BigTIFF" } else { "TIFF" }, self.byte_order)?;
        writeln!(f, "Overviews: {}", self.overview_count)?;

        match &self.crs {
            Some(crs) => writeln!(f, "CRS: {}", crs.description())?,
            None => writeln!(f, "CRS: unknown")?,
        }
        match self.nodata {
            Some(nodata) => writeln!(f, "NoData: {}", nodata)?,
            None => writeln!(f, "NoData: none")?,
        }
        match (&self.transform, self.extent()) {
            (Some(transform), Some(extent)) => {
                writeln!(f, "Transform: {}", transform)?;
                write!(f, "Extent: {}", extent)
            }
            _ => write!(f, "Not georeferenced"),
        }
    }
}

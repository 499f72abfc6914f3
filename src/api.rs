use std::path::{Path, PathBuf};

use geo::{GeodesicArea, Polygon};
use log::{info, warn};
use serde_json::json;

use crate::config::ExtractionConfig;
use crate::coordinate::CoordinateSystem;
use crate::errors::RiverResult;
use crate::extractor::{ClipOptions, RasterClipper, RasterInfo};
use crate::mask;
use crate::vector::{self, Component, Shapes};

/// The extracted river channel
#[derive(Debug, Clone, PartialEq)]
pub struct RiverArea {
    /// Largest water component of the clipped raster
    pub component: Component,
    /// File the polygon was written to
    pub output_path: PathBuf,
    /// Coordinate system of the polygon, when the raster declared one
    pub crs: Option<CoordinateSystem>,
}

impl RiverArea {
    pub fn polygon(&self) -> &Polygon<f64> {
        &self.component.polygon
    }

    /// Planar area in squared CRS units
    pub fn area(&self) -> f64 {
        self.component.area
    }
}

/// Main interface to the riverkit library
///
/// Holds no state between calls, so one instance may serve any number of
/// independent extractions.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiverKit;

impl RiverKit {
    pub fn new() -> Self {
        RiverKit
    }

    /// Reports a raster's structure and georeferencing
    pub fn analyze(&self, raster_path: &Path) -> RiverResult<RasterInfo> {
        RasterClipper::default().describe(raster_path)
    }

    /// Runs the whole pipeline for one raster
    ///
    /// Clip, binarize, polygonize, assemble, select the largest component
    /// and export it. The output file is only touched once a component has
    /// been selected, so a failing run leaves no partial output behind.
    pub fn extract_river(&self, config: &ExtractionConfig) -> RiverResult<RiverArea> {
        config.validate()?;

        let raster_path = config.raster_path();
        let bbox = config.bounding_box();
        let threshold = config.threshold();
        info!("Extracting river from {} ({} dataset, threshold {})",
              raster_path.display(), config.dataset, threshold);

        let clipper = RasterClipper::new(ClipOptions {
            mask_nodata: config.mask_nodata,
            show_progress: config.show_progress,
        });
        let grid = clipper.clip(&raster_path, &bbox)?;
        info!("Clipped to {}x{} cells of area {} covering {}",
              grid.rows, grid.cols, grid.transform.pixel_area(), grid.extent());
        let crs = grid.crs;

        let classified = mask::binarize(&grid, threshold)?;
        drop(grid);

        let regions = Shapes::new(&classified, config.show_progress);
        let components = vector::assemble(regions, config.target_class)?;
        let component = vector::select_largest(components)?;

        match crs {
            Some(crs) if crs.is_geographic() => {
                warn!("Planar area {} is in square degrees ({})", component.area, crs.description());
                info!("Geodesic area of the selected component: {:.1} m²",
                      component.polygon.geodesic_area_unsigned());
            }
            Some(crs) => info!("Selected component area: {} in {} units", component.area, crs.description()),
            None => info!("Selected component area: {} (unknown CRS)", component.area),
        }

        let output_path = config.output_path();
        let mut attributes = serde_json::Map::new();
        attributes.insert("id".to_string(), json!(config.feature_id));
        vector::export_with_crs(&component.polygon, &output_path, Some(attributes), crs.map(|c| c.epsg_code()))?;

        Ok(RiverArea { component, output_path, crs })
    }
}

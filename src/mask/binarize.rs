//! Threshold classification of a raster grid

use log::debug;

use crate::coordinate::GeoTransform;
use crate::errors::{RiverError, RiverResult};
use crate::extractor::RasterGrid;

/// Value of water cells in a classified grid
pub const WATER: u8 = 1;
/// Value of all other cells
pub const LAND: u8 = 0;

/// Binary grid with the shape and transform of its source
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedGrid {
    pub rows: usize,
    pub cols: usize,
    /// Row-major cells, each `LAND` or `WATER`
    pub data: Vec<u8>,
    pub transform: GeoTransform,
}

impl ClassifiedGrid {
    /// Wraps row-major cells; `None` if the length does not match
    pub fn new(rows: usize, cols: usize, data: Vec<u8>, transform: GeoTransform) -> Option<Self> {
        if data.len() != rows * cols {
            return None;
        }
        Some(ClassifiedGrid { rows, cols, data, transform })
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    /// Number of cells equal to `value`
    pub fn count(&self, value: u8) -> usize {
        self.data.iter().filter(|cell| **cell == value).count()
    }
}

/// Marks cells strictly greater than `threshold` as water
///
/// A cell equal to the threshold is land, and so is NaN (every comparison
/// with NaN is false). The threshold must be finite and non-negative.
pub fn binarize(grid: &RasterGrid, threshold: f64) -> RiverResult<ClassifiedGrid> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(RiverError::DataError(format!(
            "Threshold must be a finite, non-negative number, got {}", threshold
        )));
    }
    if grid.is_empty() {
        return Err(RiverError::DataError("Cannot binarize an empty grid".to_string()));
    }

    let data: Vec<u8> = grid.data
        .iter()
        .map(|value| if *value > threshold { WATER } else { LAND })
        .collect();

    let classified = ClassifiedGrid {
        rows: grid.rows,
        cols: grid.cols,
        data,
        transform: grid.transform,
    };
    debug!("Binarized {}x{} grid at threshold {}: {} water cells, {} nodata cells",
           classified.rows, classified.cols, threshold, classified.count(WATER),
           grid.data.iter().filter(|value| grid.is_nodata(**value)).count());

    Ok(classified)
}

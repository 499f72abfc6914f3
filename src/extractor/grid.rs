//! In-memory raster window

use crate::coordinate::{BoundingBox, CoordinateSystem, GeoTransform};

/// A clipped single-band raster
///
/// Cells are stored row-major. `transform` maps (col, row) of this grid,
/// not of the source file, to world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterGrid {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<f64>,
    pub transform: GeoTransform,
    pub nodata: Option<f64>,
    pub crs: Option<CoordinateSystem>,
}

impl RasterGrid {
    /// Creates a grid filled with `fill`
    pub fn filled(rows: usize, cols: usize, fill: f64, transform: GeoTransform) -> Self {
        RasterGrid {
            rows,
            cols,
            data: vec![fill; rows * cols],
            transform,
            nodata: None,
            crs: None,
        }
    }

    /// Wraps existing row-major data; `None` if the length does not match
    pub fn from_data(rows: usize, cols: usize, data: Vec<f64>, transform: GeoTransform) -> Option<Self> {
        if data.len() != rows * cols {
            return None;
        }
        Some(RasterGrid { rows, cols, data, transform, nodata: None, crs: None })
    }

    pub fn with_nodata(mut self, nodata: Option<f64>) -> Self {
        self.nodata = nodata;
        self
    }

    pub fn with_crs(mut self, crs: Option<CoordinateSystem>) -> Self {
        self.crs = crs;
        self
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether `value` is this grid's nodata marker (or NaN)
    pub fn is_nodata(&self, value: f64) -> bool {
        value.is_nan() || self.nodata == Some(value)
    }

    /// World coordinates of a cell centre
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        self.transform.apply(col as f64 + 0.5, row as f64 + 0.5)
    }

    /// World extent covered by the grid
    pub fn extent(&self) -> BoundingBox {
        self.transform.extent(self.cols, self.rows)
    }
}

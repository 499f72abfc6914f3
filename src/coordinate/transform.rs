//! Affine pixel-to-world transform

use std::fmt;

use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::GeoInfo;
use super::bbox::BoundingBox;

/// Affine transform in GDAL coefficient order
///
/// `x = c0 + col * c1 + row * c2` and `y = c3 + col * c4 + row * c5`,
/// where (col, row) addresses cell corners: (0, 0) is the outer corner of
/// the first cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    coefficients: [f64; 6],
}

impl GeoTransform {
    pub fn new(coefficients: [f64; 6]) -> Self {
        GeoTransform { coefficients }
    }

    /// North-up transform from the top-left corner and positive pixel sizes
    pub fn from_origin(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        GeoTransform::new([origin_x, pixel_width, 0.0, origin_y, 0.0, -pixel_height])
    }

    /// Builds the transform from GeoTIFF tags
    ///
    /// A ModelTransformation matrix wins over tiepoint + pixel scale. With
    /// a tiepoint, raster point (i, j) maps to world (x, y) and y decreases
    /// with the row. PixelIsPoint rasters anchor the tags at cell centres,
    /// so the origin moves back half a cell to the outer corner.
    pub fn from_geo_info(info: &GeoInfo) -> TiffResult<Self> {
        let transform = match (info.transformation, info.tie_point, info.pixel_scale) {
            (Some(m), _, _) => GeoTransform::new([m[3], m[0], m[1], m[7], m[4], m[5]]),
            (None, Some([i, j, _, x, y, _]), Some([scale_x, scale_y, _])) => {
                if scale_x == 0.0 || scale_y == 0.0 {
                    return Err(TiffError::GenericError("Pixel scale must be non-zero".to_string()));
                }
                GeoTransform::new([
                    x - i * scale_x, scale_x, 0.0,
                    y + j * scale_y, 0.0, -scale_y,
                ])
            }
            _ => return Err(TiffError::NotGeoreferenced),
        };

        if info.is_pixel_is_point() {
            return Ok(transform.shifted(-0.5, -0.5));
        }
        Ok(transform)
    }

    pub fn coefficients(&self) -> [f64; 6] {
        self.coefficients
    }

    /// Maps a (col, row) position to world coordinates
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        let c = &self.coefficients;
        (c[0] + col * c[1] + row * c[2], c[3] + col * c[4] + row * c[5])
    }

    /// The inverse mapping (world to pixel), if the transform is not degenerate
    pub fn inverse(&self) -> Option<GeoTransform> {
        let c = &self.coefficients;
        let det = c[1] * c[5] - c[2] * c[4];
        if det == 0.0 || !det.is_finite() {
            return None;
        }

        Some(GeoTransform::new([
            (c[2] * c[3] - c[5] * c[0]) / det,
            c[5] / det,
            -c[2] / det,
            (c[4] * c[0] - c[1] * c[3]) / det,
            -c[4] / det,
            c[1] / det,
        ]))
    }

    /// Same transform with its origin moved to cell (col_offset, row_offset)
    pub fn shifted(&self, col_offset: f64, row_offset: f64) -> GeoTransform {
        let (origin_x, origin_y) = self.apply(col_offset, row_offset);
        let c = &self.coefficients;
        GeoTransform::new([origin_x, c[1], c[2], origin_y, c[4], c[5]])
    }

    /// World extent of a `cols` x `rows` raster
    pub fn extent(&self, cols: usize, rows: usize) -> BoundingBox {
        let corners = [
            self.apply(0.0, 0.0),
            self.apply(cols as f64, 0.0),
            self.apply(0.0, rows as f64),
            self.apply(cols as f64, rows as f64),
        ];

        let mut bbox = BoundingBox::new(f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for (x, y) in corners {
            bbox.min_x = bbox.min_x.min(x);
            bbox.min_y = bbox.min_y.min(y);
            bbox.max_x = bbox.max_x.max(x);
            bbox.max_y = bbox.max_y.max(y);
        }
        bbox
    }

    /// Area covered by one cell, in CRS units squared
    pub fn pixel_area(&self) -> f64 {
        let c = &self.coefficients;
        (c[1] * c[5] - c[2] * c[4]).abs()
    }
}

impl fmt::Display for GeoTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.coefficients;
        write!(f, "({}, {}, {}, {}, {}, {})", c[0], c[1], c[2], c[3], c[4], c[5])
    }
}

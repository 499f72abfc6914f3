//! Bounding box structure for defining the area of interest

use std::fmt;

use geo::{coord, Polygon, Rect};

use crate::extractor::Region;
use super::transform::GeoTransform;

/// Slack, in pixels, before a window edge is rounded outward
const PIXEL_EPSILON: f64 = 1e-6;

/// A bounding box in a coordinate system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum X coordinate
    pub min_x: f64,
    /// Minimum Y coordinate
    pub min_y: f64,
    /// Maximum X coordinate
    pub max_x: f64,
    /// Maximum Y coordinate
    pub max_y: f64,
    /// EPSG code of the coordinate system
    pub epsg: Option<u32>,
}

impl BoundingBox {
    /// Create a new bounding box
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
            epsg: None,
        }
    }

    /// Create a new bounding box with coordinate system
    pub fn new_with_crs(min_x: f64, min_y: f64, max_x: f64, max_y: f64, epsg: u32) -> Self {
        BoundingBox {
            epsg: Some(epsg),
            ..BoundingBox::new(min_x, min_y, max_x, max_y)
        }
    }

    /// Parse a bounding box from a string (format: "minx,miny,maxx,maxy")
    pub fn from_string(bbox_str: &str) -> Result<Self, String> {
        let parts: Vec<&str> = bbox_str.split(',').collect();
        if parts.len() != 4 {
            return Err("Bounding box must have 4 comma-separated values".to_string());
        }

        let mut values = [0.0; 4];
        for (value, (part, name)) in values.iter_mut().zip(parts.iter().zip(["min_x", "min_y", "max_x", "max_y"])) {
            *value = part.trim().parse::<f64>()
                .map_err(|_| format!("Invalid {} value: '{}'", name, part.trim()))?;
        }

        let bbox = BoundingBox::new(values[0], values[1], values[2], values[3]);
        bbox.validate()?;
        Ok(bbox)
    }

    /// Checks that all coordinates are finite and the box has positive area
    pub fn validate(&self) -> Result<(), String> {
        let coords = [self.min_x, self.min_y, self.max_x, self.max_y];
        if coords.iter().any(|v| !v.is_finite()) {
            return Err(format!("Bounding box has non-finite coordinates: {:?}", coords));
        }
        if self.min_x >= self.max_x || self.min_y >= self.max_y {
            return Err(format!(
                "Bounding box minimum must be below maximum: ({}, {}) - ({}, {})",
                self.min_x, self.min_y, self.max_x, self.max_y
            ));
        }
        Ok(())
    }

    /// Get the width of the bounding box
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Get the height of the bounding box
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Whether the two boxes share an area
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x < other.max_x && other.min_x < self.max_x &&
            self.min_y < other.max_y && other.min_y < self.max_y
    }

    /// The box as a closed, counter-clockwise rectangle polygon
    pub fn to_polygon(&self) -> Polygon<f64> {
        Rect::new(
            coord! { x: self.min_x, y: self.min_y },
            coord! { x: self.max_x, y: self.max_y },
        )
        .to_polygon()
    }

    /// Pixel window of all cells the box touches
    ///
    /// The box corners are mapped to pixel space through the inverse
    /// transform and rounded outward, then clamped to the raster. Returns
    /// `None` when the window is empty, which means the box misses the
    /// raster entirely.
    pub fn to_pixel_region(&self, transform: &GeoTransform, width: u32, height: u32) -> Option<Region> {
        let inverse = transform.inverse()?;

        let corners = [
            (self.min_x, self.min_y),
            (self.min_x, self.max_y),
            (self.max_x, self.min_y),
            (self.max_x, self.max_y),
        ];

        let (mut col_min, mut col_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut row_min, mut row_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for (x, y) in corners {
            let (col, row) = inverse.apply(x, y);
            col_min = col_min.min(col);
            col_max = col_max.max(col);
            row_min = row_min.min(row);
            row_max = row_max.max(row);
        }

        let start_x = (col_min + PIXEL_EPSILON).floor().max(0.0);
        let start_y = (row_min + PIXEL_EPSILON).floor().max(0.0);
        let end_x = (col_max - PIXEL_EPSILON).ceil().min(width as f64);
        let end_y = (row_max - PIXEL_EPSILON).ceil().min(height as f64);

        if end_x <= start_x || end_y <= start_y {
            return None;
        }

        Some(Region::new(
            start_x as u32,
            start_y as u32,
            (end_x - start_x) as u32,
            (end_y - start_y) as u32,
        ))
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.min_x, self.min_y, self.max_x, self.max_y)?;
        if let Some(epsg) = self.epsg {
            write!(f, " (EPSG:{})", epsg)?;
        }
        Ok(())
    }
}

//! Coordinate handling for geospatial data
//!
//! Bounding boxes, the affine pixel-to-world transform and coordinate
//! system identification.

mod bbox;
mod transform;
mod crs;

pub use self::bbox::BoundingBox;
pub use self::transform::GeoTransform;
pub use self::crs::{CoordinateSystem, CoordinateSystemFactory};

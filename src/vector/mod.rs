//! Vector stages of the pipeline
//!
//! Region extraction from a classified grid, assembly into single-part
//! components, largest-component selection and GeoJSON output.

mod polygonize;
mod assemble;
mod select;
mod export;

pub use polygonize::{polygonize, Region, Shapes};
pub use assemble::{assemble, Component, WaterGeometry};
pub use select::select_largest;
pub use export::{default_attributes, export, export_with_crs, load};

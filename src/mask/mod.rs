//! Water masks derived from raster grids

mod binarize;

pub use binarize::{binarize, ClassifiedGrid, LAND, WATER};

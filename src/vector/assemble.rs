//! Grouping of water regions into single-part components

use geo::{Area, MultiPolygon, Polygon};
use log::{debug, info};

use crate::errors::{RiverError, RiverResult};

use super::polygonize::Region;

/// Water geometry before decomposition
#[derive(Debug, Clone, PartialEq)]
pub enum WaterGeometry {
    SinglePart(Polygon<f64>),
    MultiPart(MultiPolygon<f64>),
}

impl WaterGeometry {
    /// Builds the geometry from polygons; `None` for an empty list
    pub fn from_polygons(mut polygons: Vec<Polygon<f64>>) -> Option<Self> {
        match polygons.len() {
            0 => None,
            1 => polygons.pop().map(WaterGeometry::SinglePart),
            _ => Some(WaterGeometry::MultiPart(MultiPolygon::new(polygons))),
        }
    }

    /// Number of parts
    pub fn part_count(&self) -> usize {
        match self {
            WaterGeometry::SinglePart(_) => 1,
            WaterGeometry::MultiPart(multi) => multi.0.len(),
        }
    }

    /// Splits into single-part polygons, in part order
    pub fn decompose(self) -> Vec<Polygon<f64>> {
        match self {
            WaterGeometry::SinglePart(polygon) => vec![polygon],
            WaterGeometry::MultiPart(multi) => multi.0,
        }
    }
}

/// A single-part water polygon and its planar area
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Position in decomposition order
    pub index: usize,
    pub polygon: Polygon<f64>,
    /// Unsigned planar area in squared CRS units
    pub area: f64,
}

/// Collects the regions of `target_class` into area-annotated components
///
/// Fails with `NoWaterFound` when no region carries the class.
pub fn assemble<I>(regions: I, target_class: u8) -> RiverResult<Vec<Component>>
where
    I: IntoIterator<Item = Region>,
{
    let polygons: Vec<Polygon<f64>> = regions
        .into_iter()
        .filter(|region| region.value == target_class)
        .map(|region| region.geometry)
        .collect();

    let geometry = WaterGeometry::from_polygons(polygons)
        .ok_or(RiverError::NoWaterFound { target_class })?;
    debug!("Water geometry has {} part(s)", geometry.part_count());

    let components: Vec<Component> = geometry
        .decompose()
        .into_iter()
        .enumerate()
        .map(|(index, polygon)| Component {
            index,
            area: polygon.unsigned_area(),
            polygon,
        })
        .collect();

    info!("Assembled {} water component(s) of class {}", components.len(), target_class);
    Ok(components)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{coord, Rect};

    fn square(x: f64, y: f64, size: f64) -> Polygon<f64> {
        Rect::new(coord! { x: x, y: y }, coord! { x: x + size, y: y + size }).to_polygon()
    }

    fn region(polygon: Polygon<f64>, value: u8) -> Region {
        Region { geometry: polygon, value, cell_count: 0 }
    }

    #[test]
    fn single_polygon_is_single_part() {
        let geometry = WaterGeometry::from_polygons(vec![square(0.0, 0.0, 1.0)]).unwrap();
        assert!(matches!(geometry, WaterGeometry::SinglePart(_)));
        assert_eq!(geometry.decompose().len(), 1);
        assert!(WaterGeometry::from_polygons(Vec::new()).is_none());
    }

    #[test]
    fn keeps_only_the_target_class() {
        let regions = vec![
            region(square(0.0, 0.0, 4.0), 0),
            region(square(10.0, 0.0, 2.0), 1),
            region(square(20.0, 0.0, 3.0), 1),
        ];

        let components = assemble(regions, 1).unwrap();
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].index, 0);
        assert_eq!(components[0].area, 4.0);
        assert_eq!(components[1].index, 1);
        assert_eq!(components[1].area, 9.0);
    }

    #[test]
    fn no_target_class_is_no_water() {
        let regions = vec![region(square(0.0, 0.0, 4.0), 0)];
        assert!(matches!(assemble(regions, 1), Err(RiverError::NoWaterFound { target_class: 1 })));
    }
}

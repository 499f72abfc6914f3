//! GeoJSON persistence of the selected polygon

use std::convert::TryFrom;
use std::fs;
use std::io::Write;
use std::path::Path;

use geo::Polygon;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value as GeoValue};
use log::info;
use serde_json::{json, Map as JsonMap, Value as JsonValue};
use tempfile::NamedTempFile;

use crate::errors::{RiverError, RiverResult};

/// Attributes written when the caller supplies none
pub fn default_attributes() -> JsonMap<String, JsonValue> {
    let mut properties = JsonMap::new();
    properties.insert("id".to_string(), json!(1));
    properties
}

/// Writes `polygon` as a single-feature GeoJSON FeatureCollection
///
/// The document is written to a scratch file next to `path` and renamed
/// over it, so an existing file is only replaced by a complete one.
pub fn export(polygon: &Polygon<f64>, path: &Path, attributes: Option<JsonMap<String, JsonValue>>) -> RiverResult<()> {
    export_with_crs(polygon, path, attributes, None)
}

/// Like [`export`], also naming the coordinate system in a `crs` member
pub fn export_with_crs(
    polygon: &Polygon<f64>,
    path: &Path,
    attributes: Option<JsonMap<String, JsonValue>>,
    epsg: Option<u32>,
) -> RiverResult<()> {
    let feature = Feature {
        bbox: None,
        geometry: Some(Geometry::new(GeoValue::from(polygon))),
        id: None,
        properties: Some(attributes.unwrap_or_else(default_attributes)),
        foreign_members: None,
    };

    let foreign_members = epsg.map(|code| {
        let mut members = JsonMap::new();
        members.insert("crs".to_string(), json!({
            "type": "name",
            "properties": { "name": format!("urn:ogc:def:crs:EPSG::{}", code) }
        }));
        members
    });

    let feature_collection = FeatureCollection {
        bbox: None,
        features: vec![feature],
        foreign_members,
    };

    let geojson = GeoJson::FeatureCollection(feature_collection).to_string();
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(directory).map_err(|e| RiverError::io(path, e))?;
    file.write_all(geojson.as_bytes()).map_err(|e| RiverError::io(path, e))?;
    file.as_file().sync_all().map_err(|e| RiverError::io(path, e))?;
    file.persist(path).map_err(|e| RiverError::io(path, e.error))?;

    info!("Wrote river polygon to {}", path.display());
    Ok(())
}

/// Reads back the first polygon feature of a GeoJSON file
pub fn load(path: &Path) -> RiverResult<Polygon<f64>> {
    let contents = fs::read_to_string(path).map_err(|e| RiverError::io(path, e))?;
    let geojson = contents.parse::<GeoJson>()
        .map_err(|e| RiverError::DataError(format!("{}: invalid GeoJSON: {}", path.display(), e)))?;

    let geometries: Vec<Geometry> = match geojson {
        GeoJson::FeatureCollection(collection) => {
            collection.features.into_iter().filter_map(|feature| feature.geometry).collect()
        }
        GeoJson::Feature(feature) => feature.geometry.into_iter().collect(),
        GeoJson::Geometry(geometry) => vec![geometry],
    };

    geometries
        .into_iter()
        .find_map(|geometry| Polygon::<f64>::try_from(geometry.value).ok())
        .ok_or_else(|| RiverError::DataError(format!("{}: no polygon feature", path.display())))
}

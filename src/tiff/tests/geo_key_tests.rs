//! Tests for GeoTIFF metadata extraction

extern crate std;

use crate::tiff::geo_key_parser::GeoKeyParser;
use crate::tiff::reader::TiffReader;
use super::test_utils::{create_geotiff_buffer, create_test_tiff_buffer};

#[test]
fn test_parse_geo_key_directory() {
    let mut cursor = create_geotiff_buffer();
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();

    let keys = GeoKeyParser::parse_geo_key_directory(&reader, &mut cursor, &tiff.ifds[0]).unwrap();

    std::assert_eq!(keys.len(), 3);
    std::assert_eq!(keys[0].key_id, 1024);
    std::assert_eq!(keys[2].key_id, 2048);
    std::assert_eq!(keys[2].value_offset, 4326);
}

#[test]
fn test_extract_geo_info() {
    let mut cursor = create_geotiff_buffer();
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();

    let info = GeoKeyParser::extract_geo_info(&reader, &mut cursor, &tiff.ifds[0]).unwrap();

    std::assert!(info.is_georeferenced());
    std::assert!(info.is_geographic());
    std::assert_eq!(info.epsg(), Some(4326));
    std::assert_eq!(info.pixel_scale, Some([0.00025, 0.00025, 0.0]));
    std::assert_eq!(info.tie_point, Some([0.0, 0.0, 0.0, 138.0, -2.5, 0.0]));
    std::assert_eq!(info.nodata, Some(255.0));
    std::assert!(info.transformation.is_none());
}

#[test]
fn test_plain_tiff_is_not_georeferenced() {
    let mut cursor = create_test_tiff_buffer();
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();

    let info = GeoKeyParser::extract_geo_info(&reader, &mut cursor, &tiff.ifds[0]).unwrap();

    std::assert!(!info.is_georeferenced());
    std::assert_eq!(info.epsg(), None);
    std::assert_eq!(info.nodata, None);
}

//! End-to-end tests: GeoTIFF on disk to GeoJSON on disk

mod common;

use std::fs;
use std::path::{Path, PathBuf};

use geo::Area;
use serde_json::Value as JsonValue;
use tempfile::TempDir;

use common::{grid_from_picture, GeoTiffBuilder, DEFLATE, LZW, ZSTD};
use riverkit::config::BoundingBoxConfig;
use riverkit::vector;
use riverkit::{CoordinateSystem, Dataset, ExtractionConfig, RiverError, RiverKit};

const PIXEL: f64 = 0.01;
const WEST: f64 = 138.0;
const NORTH: f64 = -3.0;

/// A 2x2 and a 3x3 water block
const TWO_BLOCKS: [&str; 10] = [
    "..........",
    ".##.......",
    ".##.......",
    "..........",
    "......###.",
    "......###.",
    "......###.",
    "..........",
    "..........",
    "..........",
];

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write_raster(
    dir: &Path,
    name: &str,
    picture: &[&str],
    configure: impl FnOnce(GeoTiffBuilder) -> GeoTiffBuilder,
) -> PathBuf {
    let (width, height, values) = grid_from_picture(picture, 1);
    let builder = GeoTiffBuilder::new(width, height, values)
        .origin(WEST, NORTH)
        .pixel_size(PIXEL);
    configure(builder).write(&dir.join(name))
}

/// Covers the whole test raster with margin
fn whole_raster() -> BoundingBoxConfig {
    BoundingBoxConfig {
        west: WEST - 0.05,
        south: NORTH - 0.15,
        east: WEST + 0.15,
        north: NORTH + 0.05,
    }
}

fn config_for(raster: &Path, output: &Path) -> ExtractionConfig {
    let mut config = ExtractionConfig::new(raster, 0.0);
    config.bbox = whole_raster();
    config.output = Some(output.to_path_buf());
    config.show_progress = false;
    config
}

fn cells(count: f64) -> f64 {
    count * PIXEL * PIXEL
}

#[test]
fn extracts_the_largest_water_body() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let raster = write_raster(dir.path(), "seasonality.tif", &TWO_BLOCKS, |b| b);
    let output = dir.path().join("riverArea.geojson");

    let river = RiverKit::new().extract_river(&config_for(&raster, &output)).unwrap();

    assert!((river.area() - cells(9.0)).abs() < 1e-12);
    assert_eq!(river.crs, Some(CoordinateSystem::WGS84));
    assert_eq!(river.output_path, output);

    // Columns 6..9, rows 4..7
    let rect = geo::BoundingRect::bounding_rect(river.polygon()).unwrap();
    assert!((rect.min().x - (WEST + 6.0 * PIXEL)).abs() < 1e-9);
    assert!((rect.max().x - (WEST + 9.0 * PIXEL)).abs() < 1e-9);
    assert!((rect.max().y - (NORTH - 4.0 * PIXEL)).abs() < 1e-9);
    assert!((rect.min().y - (NORTH - 7.0 * PIXEL)).abs() < 1e-9);
}

#[test]
fn writes_a_single_feature_with_crs_and_id() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let raster = write_raster(dir.path(), "seasonality.tif", &TWO_BLOCKS, |b| b);
    let output = dir.path().join("river.geojson");

    let mut config = config_for(&raster, &output);
    config.feature_id = 7;
    RiverKit::new().extract_river(&config).unwrap();

    let value: JsonValue = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(value["type"], "FeatureCollection");
    assert_eq!(value["features"].as_array().unwrap().len(), 1);
    assert_eq!(value["features"][0]["properties"]["id"], 7);
    assert_eq!(value["features"][0]["geometry"]["type"], "Polygon");
    assert_eq!(value["crs"]["properties"]["name"], "urn:ogc:def:crs:EPSG::4326");
}

#[test]
fn exported_polygon_reads_back_with_the_same_area() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let raster = write_raster(dir.path(), "seasonality.tif", &TWO_BLOCKS, |b| b);
    let output = dir.path().join("riverArea.geojson");

    let river = RiverKit::new().extract_river(&config_for(&raster, &output)).unwrap();
    let loaded = vector::load(&output).unwrap();

    assert!((loaded.unsigned_area() - river.area()).abs() < 1e-12);
}

#[test]
fn repeated_runs_produce_identical_output() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let raster = write_raster(dir.path(), "seasonality.tif", &TWO_BLOCKS, |b| b);
    let output = dir.path().join("riverArea.geojson");
    let config = config_for(&raster, &output);

    RiverKit::new().extract_river(&config).unwrap();
    let first = fs::read(&output).unwrap();
    RiverKit::new().extract_river(&config).unwrap();
    let second = fs::read(&output).unwrap();

    assert_eq!(first, second);
}

#[test]
fn existing_output_is_replaced() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let raster = write_raster(dir.path(), "seasonality.tif", &TWO_BLOCKS, |b| b);
    let output = dir.path().join("riverArea.geojson");
    fs::write(&output, "stale contents that are not GeoJSON").unwrap();

    RiverKit::new().extract_river(&config_for(&raster, &output)).unwrap();

    assert!(vector::load(&output).is_ok());
}

#[test]
fn bounding_box_limits_the_search() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let raster = write_raster(dir.path(), "seasonality.tif", &TWO_BLOCKS, |b| b);
    let output = dir.path().join("riverArea.geojson");

    // Centres of columns 0..4 only, so the 3x3 block is cut away
    let mut config = config_for(&raster, &output);
    config.bbox.east = WEST + 0.05;

    let river = RiverKit::new().extract_river(&config).unwrap();
    assert!((river.area() - cells(4.0)).abs() < 1e-12);
}

#[test]
fn block_cut_by_the_box_keeps_only_the_inside_cells() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let raster = write_raster(dir.path(), "seasonality.tif", &TWO_BLOCKS, |b| b);
    let output = dir.path().join("riverArea.geojson");

    // Centres of columns 0..7: two columns of the 3x3 block survive
    let mut config = config_for(&raster, &output);
    config.bbox.east = WEST + 0.08;

    let river = RiverKit::new().extract_river(&config).unwrap();
    assert!((river.area() - cells(6.0)).abs() < 1e-12);
}

#[test]
fn disjoint_bounding_box_is_a_data_error() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let raster = write_raster(dir.path(), "seasonality.tif", &TWO_BLOCKS, |b| b);
    let output = dir.path().join("riverArea.geojson");

    let mut config = config_for(&raster, &output);
    config.bbox = BoundingBoxConfig { west: 10.0, south: 10.0, east: 11.0, north: 11.0 };

    let result = RiverKit::new().extract_river(&config);
    assert!(matches!(result, Err(RiverError::DataError(_))));
    assert!(!output.exists());
}

#[test]
fn dry_raster_reports_no_water_and_writes_nothing() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let dry = [".........."; 10];
    let raster = write_raster(dir.path(), "dry.tif", &dry, |b| b);
    let output = dir.path().join("riverArea.geojson");

    let result = RiverKit::new().extract_river(&config_for(&raster, &output));
    assert!(matches!(result, Err(RiverError::NoWaterFound { target_class: 1 })));
    assert!(!output.exists());
}

#[test]
fn missing_raster_is_an_error() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("riverArea.geojson");

    let result = RiverKit::new().extract_river(&config_for(&dir.path().join("absent.tif"), &output));
    assert!(result.is_err());
    assert!(!output.exists());
}

fn assert_data_error_without_output(raster: &Path, output: &Path) {
    match RiverKit::new().extract_river(&config_for(raster, output)) {
        Err(RiverError::DataError(_)) => {}
        other => panic!("expected DataError, got {:?}", other.map(|river| river.output_path)),
    }
    assert!(!output.exists());
}

#[test]
fn unreadable_files_are_data_errors() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("riverArea.geojson");

    let garbage = dir.path().join("garbage.tif");
    fs::write(&garbage, b"this is not a tiff, just some text padding it out").unwrap();
    assert_data_error_without_output(&garbage, &output);

    let empty = dir.path().join("empty.tif");
    fs::write(&empty, b"").unwrap();
    assert_data_error_without_output(&empty, &output);

    // Valid header pointing past the end of the file
    let dangling = dir.path().join("dangling.tif");
    fs::write(&dangling, [0x49, 0x49, 42, 0, 0x00, 0x10, 0, 0]).unwrap();
    assert_data_error_without_output(&dangling, &output);
}

#[test]
fn multi_band_raster_is_a_data_error() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let raster = write_raster(dir.path(), "rgb.tif", &TWO_BLOCKS, |b| b.samples_per_pixel(3));
    assert_data_error_without_output(&raster, &dir.path().join("riverArea.geojson"));
}

#[test]
fn raster_without_georeferencing_is_a_data_error() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let raster = write_raster(dir.path(), "plain.tif", &TWO_BLOCKS, |b| b.without_georeferencing());
    assert_data_error_without_output(&raster, &dir.path().join("riverArea.geojson"));
}

#[test]
fn pixel_is_point_rasters_are_placed_on_cell_centres() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let raster = write_raster(dir.path(), "point.tif", &TWO_BLOCKS, |b| b.pixel_is_point());
    let output = dir.path().join("riverArea.geojson");

    let info = RiverKit::new().analyze(&raster).unwrap();
    let extent = info.extent().unwrap();
    assert!((extent.min_x - (WEST - PIXEL / 2.0)).abs() < 1e-9);
    assert!((extent.max_y - (NORTH + PIXEL / 2.0)).abs() < 1e-9);

    // Same 3x3 block, half a cell up and to the left
    let river = RiverKit::new().extract_river(&config_for(&raster, &output)).unwrap();
    assert!((river.area() - cells(9.0)).abs() < 1e-12);
    let rect = geo::BoundingRect::bounding_rect(river.polygon()).unwrap();
    assert!((rect.min().x - (WEST + 5.5 * PIXEL)).abs() < 1e-9);
    assert!((rect.max().y - (NORTH - 3.5 * PIXEL)).abs() < 1e-9);
}

#[test]
fn threshold_is_strict() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let (width, height, values) = grid_from_picture(&TWO_BLOCKS, 50);
    let raster = GeoTiffBuilder::new(width, height, values)
        .origin(WEST, NORTH)
        .pixel_size(PIXEL)
        .write(&dir.path().join("occurrence.tif"));
    let output = dir.path().join("riverArea.geojson");

    // Occurrence defaults to 50, and 50 is not above 50
    let mut config = config_for(&raster, &output);
    config.threshold = None;
    config.dataset = Dataset::Occurrence;
    assert!(matches!(RiverKit::new().extract_river(&config), Err(RiverError::NoWaterFound { .. })));

    config.threshold = Some(49.0);
    let river = RiverKit::new().extract_river(&config).unwrap();
    assert!((river.area() - cells(9.0)).abs() < 1e-12);
}

#[test]
fn nodata_counts_as_water_unless_masked() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let (width, height, mut values) = grid_from_picture(&TWO_BLOCKS, 1);
    // Turn the 3x3 block into nodata
    for value in values.iter_mut().skip(40) {
        if *value == 1 {
            *value = 255;
        }
    }
    let raster = GeoTiffBuilder::new(width, height, values)
        .origin(WEST, NORTH)
        .pixel_size(PIXEL)
        .nodata("255")
        .write(&dir.path().join("seasonality.tif"));
    let output = dir.path().join("riverArea.geojson");

    let mut config = config_for(&raster, &output);
    let river = RiverKit::new().extract_river(&config).unwrap();
    assert!((river.area() - cells(9.0)).abs() < 1e-12);

    config.mask_nodata = true;
    let river = RiverKit::new().extract_river(&config).unwrap();
    assert!((river.area() - cells(4.0)).abs() < 1e-12);
}

#[test]
fn compressed_and_multi_strip_rasters_give_the_same_result() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("riverArea.geojson");

    for (name, code) in [("lzw.tif", LZW), ("deflate.tif", DEFLATE), ("zstd.tif", ZSTD)] {
        let raster = write_raster(dir.path(), name, &TWO_BLOCKS, |b| b.compression(code).rows_per_strip(3));
        let river = RiverKit::new().extract_river(&config_for(&raster, &output)).unwrap();
        assert!((river.area() - cells(9.0)).abs() < 1e-12, "{}", name);
    }
}

#[test]
fn tiled_rasters_are_read() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("riverArea.geojson");

    let raster = write_raster(dir.path(), "tiled.tif", &TWO_BLOCKS, |b| b.tiled(16).compression(DEFLATE));
    let river = RiverKit::new().extract_river(&config_for(&raster, &output)).unwrap();
    assert!((river.area() - cells(9.0)).abs() < 1e-12);
}

#[test]
fn relative_raster_resolves_against_the_data_dir() {
    init_logging();
    let dir = TempDir::new().unwrap();
    write_raster(dir.path(), "seasonality.tif", &TWO_BLOCKS, |b| b);

    let mut config = ExtractionConfig::new("seasonality.tif", 0.0);
    config.data_dir = dir.path().to_path_buf();
    config.bbox = whole_raster();
    config.show_progress = false;

    let river = RiverKit::new().extract_river(&config).unwrap();
    assert_eq!(river.output_path, dir.path().join("riverArea.geojson"));
    assert!(river.output_path.exists());
}

#[test]
fn toml_configuration_drives_a_run() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let raster = write_raster(dir.path(), "seasonality.tif", &TWO_BLOCKS, |b| b);
    let output = dir.path().join("from_toml.geojson");

    let toml = format!(
        r#"
raster = {raster:?}
output = {output:?}
dataset = "seasonality"
show_progress = false

[bbox]
west = {west}
south = {south}
east = {east}
north = {north}
"#,
        raster = raster.to_string_lossy(),
        output = output.to_string_lossy(),
        west = WEST - 0.05,
        south = NORTH - 0.15,
        east = WEST + 0.15,
        north = NORTH + 0.05,
    );
    let config = ExtractionConfig::from_toml_str(&toml).unwrap();

    let river = RiverKit::new().extract_river(&config).unwrap();
    assert!((river.area() - cells(9.0)).abs() < 1e-12);
    assert!(output.exists());
}

#[test]
fn analyze_reports_structure_and_georeferencing() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let raster = write_raster(dir.path(), "tiled.tif", &TWO_BLOCKS, |b| b.tiled(16).compression(LZW).nodata("255"));

    let info = RiverKit::new().analyze(&raster).unwrap();

    assert_eq!((info.width, info.height), (10, 10));
    assert!(info.tiled);
    assert!(!info.big_tiff);
    assert!(info.compression_supported);
    assert_eq!(info.crs, Some(CoordinateSystem::WGS84));
    assert_eq!(info.nodata, Some(255.0));

    let extent = info.extent().unwrap();
    assert!((extent.min_x - WEST).abs() < 1e-9);
    assert!((extent.max_y - NORTH).abs() < 1e-9);
    assert!((extent.max_x - (WEST + 0.1)).abs() < 1e-9);
}

#[test]
fn in_memory_stages_compose() {
    use riverkit::{assemble, binarize, polygonize, select_largest, GeoTransform, RasterGrid};

    let data = vec![
        0.0, 0.0, 0.0, 0.0,
        0.0, 3.0, 3.0, 0.0,
        0.0, 3.0, 3.0, 0.0,
        0.0, 0.0, 0.0, 0.0,
    ];
    let grid = RasterGrid::from_data(4, 4, data, GeoTransform::from_origin(0.0, 4.0, 1.0, 1.0)).unwrap();

    let classified = binarize(&grid, 0.0).unwrap();
    assert_eq!(polygonize(&classified).count(), 2);

    let components = assemble(polygonize(&classified), 1).unwrap();
    assert_eq!(components.len(), 1);
    assert_eq!(select_largest(components).unwrap().area, 4.0);
}

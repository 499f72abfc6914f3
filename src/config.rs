//! Extraction configuration
//!
//! Everything one pipeline run needs, passed explicitly to
//! [`RiverKit::extract_river`](crate::api::RiverKit::extract_river). Values
//! come from a TOML file, from CLI arguments, or both (arguments win).

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::coordinate::BoundingBox;
use crate::errors::{RiverError, RiverResult};

/// File name of the exported polygon inside the data directory
pub const DEFAULT_OUTPUT_NAME: &str = "riverArea.geojson";

/// Surface-water product the raster comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    /// Months per year with water (0-12)
    #[default]
    Seasonality,
    /// Percentage of observations with water (0-100)
    Occurrence,
}

impl Dataset {
    /// Threshold used when none is configured
    pub fn default_threshold(&self) -> f64 {
        match self {
            Dataset::Seasonality => 0.0,
            Dataset::Occurrence => 50.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dataset::Seasonality => "seasonality",
            Dataset::Occurrence => "occurrence",
        }
    }
}

impl FromStr for Dataset {
    type Err = RiverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "seasonality" => Ok(Dataset::Seasonality),
            "occurrence" => Ok(Dataset::Occurrence),
            other => Err(RiverError::ConfigError(format!("Unknown dataset '{}'", other))),
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Area of interest in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BoundingBoxConfig {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Default for BoundingBoxConfig {
    /// The West Papua study area
    fn default() -> Self {
        Self {
            west: 138.2858054484003674,
            south: -3.5682801082388473,
            east: 139.2891321754671594,
            north: -2.5547098609382686,
        }
    }
}

impl From<BoundingBox> for BoundingBoxConfig {
    fn from(bbox: BoundingBox) -> Self {
        Self {
            west: bbox.min_x,
            south: bbox.min_y,
            east: bbox.max_x,
            north: bbox.max_y,
        }
    }
}

/// Settings for one extraction run
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExtractionConfig {
    /// Source raster, relative to `data_dir` unless absolute or existing
    #[serde(default)]
    pub raster: PathBuf,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Cells strictly above this value are water
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub dataset: Dataset,
    #[serde(default)]
    pub bbox: BoundingBoxConfig,
    /// Output file; `data_dir/riverArea.geojson` when unset
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default = "default_target_class")]
    pub target_class: u8,
    #[serde(default)]
    pub mask_nodata: bool,
    #[serde(default = "default_feature_id")]
    pub feature_id: i64,
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_target_class() -> u8 {
    1
}

fn default_feature_id() -> i64 {
    1
}

fn default_show_progress() -> bool {
    true
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        ExtractionConfig {
            raster: PathBuf::new(),
            data_dir: default_data_dir(),
            threshold: None,
            dataset: Dataset::default(),
            bbox: BoundingBoxConfig::default(),
            output: None,
            target_class: default_target_class(),
            mask_nodata: false,
            feature_id: default_feature_id(),
            show_progress: default_show_progress(),
        }
    }
}

impl ExtractionConfig {
    /// Configuration for `raster` with an explicit threshold, defaults elsewhere
    pub fn new(raster: impl Into<PathBuf>, threshold: f64) -> Self {
        ExtractionConfig {
            raster: raster.into(),
            threshold: Some(threshold),
            ..ExtractionConfig::default()
        }
    }

    /// Parses a TOML document
    pub fn from_toml_str(content: &str) -> RiverResult<Self> {
        toml::from_str(content)
            .map_err(|e| RiverError::ConfigError(format!("Invalid configuration: {}", e)))
    }

    /// Reads and parses a TOML configuration file
    pub fn from_toml_file(path: &Path) -> RiverResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| RiverError::ConfigError(format!("Cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Effective threshold: configured, or the dataset's default
    pub fn threshold(&self) -> f64 {
        self.threshold.unwrap_or_else(|| self.dataset.default_threshold())
    }

    /// Area of interest as a WGS 84 bounding box
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new_with_crs(self.bbox.west, self.bbox.south, self.bbox.east, self.bbox.north, 4326)
    }

    /// Raster path, joined to `data_dir` when relative and not found as given
    pub fn raster_path(&self) -> PathBuf {
        if self.raster.is_absolute() || self.raster.exists() {
            self.raster.clone()
        } else {
            self.data_dir.join(&self.raster)
        }
    }

    /// Where the selected polygon is written
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DEFAULT_OUTPUT_NAME))
    }

    /// Checks the settings that can be checked without touching the raster
    pub fn validate(&self) -> RiverResult<()> {
        if self.raster.as_os_str().is_empty() {
            return Err(RiverError::ConfigError("No raster configured".to_string()));
        }
        self.bounding_box()
            .validate()
            .map_err(|msg| RiverError::ConfigError(format!("Invalid bounding box: {}", msg)))
    }
}

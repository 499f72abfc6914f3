//! River extraction command
//!
//! Builds an `ExtractionConfig` from an optional TOML file plus the command
//! line, then runs the pipeline.

use std::path::PathBuf;

use clap::ArgMatches;
use log::{debug, info};

use crate::api::RiverKit;
use crate::commands::command_traits::Command;
use crate::config::{Dataset, ExtractionConfig};
use crate::coordinate::BoundingBox;
use crate::errors::{RiverError, RiverResult};

/// Command for extracting the river polygon from a raster
pub struct ExtractCommand {
    config: ExtractionConfig,
}

impl ExtractCommand {
    /// Create a new extract command
    ///
    /// Values given on the command line override the configuration file.
    pub fn new(args: &ArgMatches) -> RiverResult<Self> {
        let mut config = match args.get_one::<String>("config") {
            Some(path) => {
                info!("Loading configuration from {}", path);
                ExtractionConfig::from_toml_file(&PathBuf::from(path))?
            }
            None => ExtractionConfig::default(),
        };

        if let Some(raster) = args.get_one::<String>("raster") {
            config.raster = PathBuf::from(raster);
        }

        if let Some(threshold) = args.get_one::<String>("threshold") {
            let value = threshold.trim().parse::<f64>()
                .map_err(|_| RiverError::ConfigError(format!("Invalid threshold: {}", threshold)))?;
            config.threshold = Some(value);
        }

        if let Some(dataset) = args.get_one::<String>("dataset") {
            config.dataset = dataset.parse::<Dataset>()?;
        }

        if let Some(bbox) = args.get_one::<String>("bbox") {
            let bbox = BoundingBox::from_string(bbox)
                .map_err(|msg| RiverError::ConfigError(format!("Invalid bounding box: {}", msg)))?;
            config.bbox = bbox.into();
        }

        if let Some(data_dir) = args.get_one::<String>("data-dir") {
            config.data_dir = PathBuf::from(data_dir);
        }

        if let Some(output) = args.get_one::<String>("output") {
            config.output = Some(PathBuf::from(output));
        }

        if args.get_flag("mask-nodata") {
            config.mask_nodata = true;
        }

        if args.get_flag("no-progress") {
            config.show_progress = false;
        }

        config.validate()?;
        debug!("Extraction configuration: {:?}", config);

        Ok(ExtractCommand { config })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }
}

impl Command for ExtractCommand {
    fn execute(&self) -> RiverResult<()> {
        let river = RiverKit::new().extract_river(&self.config)?;

        println!("River area: {} (component {})", river.area(), river.component.index);
        println!("Written to: {}", river.output_path.display());
        Ok(())
    }
}

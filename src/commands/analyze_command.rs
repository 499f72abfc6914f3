//! Raster analysis command
//!
//! Prints the structure and georeferencing of a raster without running the
//! pipeline.

use std::path::PathBuf;

use clap::ArgMatches;
use log::info;

use crate::api::RiverKit;
use crate::commands::command_traits::Command;
use crate::errors::{RiverError, RiverResult};

/// Command for analyzing a raster
pub struct AnalyzeCommand {
    /// Path to the input file
    input_file: PathBuf,
    /// Whether to enable verbose output
    verbose: bool,
}

impl AnalyzeCommand {
    pub fn new(args: &ArgMatches) -> RiverResult<Self> {
        let input_file = args.get_one::<String>("raster")
            .map(PathBuf::from)
            .ok_or_else(|| RiverError::ConfigError("Missing input raster".to_string()))?;

        Ok(AnalyzeCommand {
            input_file,
            verbose: args.get_flag("verbose"),
        })
    }
}

impl Command for AnalyzeCommand {
    fn execute(&self) -> RiverResult<()> {
        info!("Analyzing {}", self.input_file.display());
        let raster_info = RiverKit::new().analyze(&self.input_file)?;

        println!("{}", raster_info);

        if self.verbose {
            match raster_info.extent() {
                Some(extent) => println!("Extent size: {} x {}", extent.width(), extent.height()),
                None => println!("Extent size: unknown"),
            }
        }
        Ok(())
    }
}


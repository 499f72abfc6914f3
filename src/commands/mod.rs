//! CLI command implementations
//!
//! This module contains implementations of the commands supported by the
//! CLI application using the Command pattern.

pub mod command_traits;
pub mod analyze_command;
pub mod extract_command;

pub use command_traits::{Command, CommandFactory};
pub use analyze_command::AnalyzeCommand;
pub use extract_command::ExtractCommand;

use clap::{Arg, ArgAction, ArgMatches, Command as ClapCommand};
use crate::errors::RiverResult;

/// Factory for creating command instances based on CLI arguments
pub struct RiverkitCommandFactory;

impl RiverkitCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        RiverkitCommandFactory
    }
}

impl Default for RiverkitCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandFactory for RiverkitCommandFactory {
    fn create_command(&self, args: &ArgMatches) -> RiverResult<Box<dyn Command>> {
        if args.get_flag("analyze") {
            Ok(Box::new(AnalyzeCommand::new(args)?))
        } else {
            // Extraction is the default
            Ok(Box::new(ExtractCommand::new(args)?))
        }
    }
}

/// Command-line interface definition
pub fn build_cli() -> ClapCommand {
    ClapCommand::new("riverkit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract the dominant river polygon from a surface-water GeoTIFF")
        .arg(
            Arg::new("raster")
                .help("Input GeoTIFF (relative paths are looked up in the data directory)")
                .value_name("RASTER")
                .index(1),
        )
        .arg(
            Arg::new("threshold")
                .help("Cells strictly above this value are water")
                .value_name("THRESHOLD")
                .allow_negative_numbers(true)
                .index(2),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML configuration file; command-line values override it")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output GeoJSON file (default: <data-dir>/riverArea.geojson)")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("bbox")
                .long("bbox")
                .help("Area of interest in decimal degrees (minx,miny,maxx,maxy)")
                .value_name("BBOX")
                .allow_hyphen_values(true),
        )
        .arg(
            Arg::new("dataset")
                .long("dataset")
                .help("Source product, picks the default threshold (seasonality, occurrence)")
                .value_name("NAME"),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Directory holding rasters and the default output")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("mask-nodata")
                .long("mask-nodata")
                .help("Treat nodata cells as not-water")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-progress")
                .long("no-progress")
                .help("Do not draw progress bars")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("analyze")
                .short('a')
                .long("analyze")
                .help("Print raster metadata instead of extracting")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Log file path")
                .value_name("FILE")
                .default_value("riverkit.log"),
        )
}

//! Error types for the river extraction pipeline

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::tiff::errors::TiffError;

/// Errors raised by the extraction pipeline
///
/// None of these are transient; callers processing many rasters decide
/// whether to skip or abort.
#[derive(Debug)]
pub enum RiverError {
    /// Raster missing, unreadable, malformed or not intersecting the box
    DataError(String),
    /// No region of the requested class exists in the clipped mask
    NoWaterFound { target_class: u8 },
    /// Largest-component selection was handed an empty list
    EmptyInput,
    /// The output could not be written (or read back)
    IoError { path: PathBuf, source: io::Error },
    /// Configuration file unreadable or invalid
    ConfigError(String),
}

impl fmt::Display for RiverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiverError::DataError(msg) => write!(f, "Data error: {}", msg),
            RiverError::NoWaterFound { target_class } => {
                write!(f, "No water found: no region with class {} in the clipped raster", target_class)
            }
            RiverError::EmptyInput => write!(f, "Cannot select the largest of zero components"),
            RiverError::IoError { path, source } => write!(f, "I/O error on {}: {}", path.display(), source),
            RiverError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for RiverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RiverError::IoError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<TiffError> for RiverError {
    fn from(error: TiffError) -> Self {
        RiverError::DataError(error.to_string())
    }
}

impl RiverError {
    /// Wraps an I/O failure on `path`
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        RiverError::IoError { path: path.into(), source }
    }
}

/// Result type for pipeline operations
pub type RiverResult<T> = Result<T, RiverError>;

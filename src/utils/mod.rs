//! Utility modules for common functionality
//!
//! Logging, progress reporting and the low-level helpers shared by the
//! TIFF reader.

pub mod logger;
pub mod progress;
pub(crate) mod ifd_utils;
pub(crate) mod string_utils;
pub(crate) mod format_utils;
pub(crate) mod tag_utils;

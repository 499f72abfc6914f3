//! Coordinate Reference System handling

use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::GeoInfo;

/// Identifier for common coordinate systems
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSystem {
    /// WGS 84 (EPSG:4326)
    WGS84,
    /// Web Mercator (EPSG:3857)
    WebMercator,
    /// UTM Zone (EPSG:326xx for northern hemisphere, 327xx for southern)
    UTM(u8, bool),
    /// Other geographic (longitude/latitude) system
    Geographic(u32),
    /// Other EPSG code, assumed projected
    Other(u32),
}

impl CoordinateSystem {
    /// Get the EPSG code for this coordinate system
    pub fn epsg_code(&self) -> u32 {
        match self {
            CoordinateSystem::WGS84 => 4326,
            CoordinateSystem::WebMercator => 3857,
            CoordinateSystem::UTM(zone, is_northern) => {
                if *is_northern {
                    32600 + *zone as u32
                } else {
                    32700 + *zone as u32
                }
            },
            CoordinateSystem::Geographic(code) | CoordinateSystem::Other(code) => *code,
        }
    }

    /// Whether coordinates are angular degrees, making planar areas square degrees
    pub fn is_geographic(&self) -> bool {
        matches!(self, CoordinateSystem::WGS84 | CoordinateSystem::Geographic(_))
    }

    /// Get a description of this coordinate system
    pub fn description(&self) -> String {
        match self {
            CoordinateSystem::WGS84 => "WGS 84 (EPSG:4326)".to_string(),
            CoordinateSystem::WebMercator => "Web Mercator (EPSG:3857)".to_string(),
            CoordinateSystem::UTM(zone, is_northern) => {
                let hemisphere = if *is_northern { 'N' } else { 'S' };
                format!("UTM Zone {}{} (EPSG:{})", zone, hemisphere, self.epsg_code())
            },
            CoordinateSystem::Geographic(code) => format!("Geographic (EPSG:{})", code),
            CoordinateSystem::Other(code) => format!("EPSG:{}", code),
        }
    }
}

/// Factory for creating coordinate systems
pub struct CoordinateSystemFactory;

impl CoordinateSystemFactory {
    /// Create a coordinate system from an EPSG code
    pub fn from_epsg(epsg: u32) -> CoordinateSystem {
        match epsg {
            4326 => CoordinateSystem::WGS84,
            3857 => CoordinateSystem::WebMercator,
            32601..=32660 => CoordinateSystem::UTM((epsg - 32600) as u8, true),
            32701..=32760 => CoordinateSystem::UTM((epsg - 32700) as u8, false),
            // EPSG block of 2D geographic systems
            4001..=4999 => CoordinateSystem::Geographic(epsg),
            _ => CoordinateSystem::Other(epsg),
        }
    }

    /// Coordinate system declared by a GeoTIFF's keys, if any
    ///
    /// A geographic model without an EPSG code is reported as WGS 84, the
    /// datum of all surface-water products.
    pub fn from_geo_info(info: &GeoInfo) -> Option<CoordinateSystem> {
        match info.epsg() {
            Some(epsg) => Some(Self::from_epsg(epsg)),
            None if info.is_geographic() => Some(CoordinateSystem::WGS84),
            None => None,
        }
    }

    /// Parse a coordinate system from a string (e.g. "EPSG:4326")
    pub fn from_string(crs_str: &str) -> TiffResult<CoordinateSystem> {
        let crs_str = crs_str.trim().to_uppercase();
        let code = crs_str.strip_prefix("EPSG:").unwrap_or(&crs_str);

        code.parse::<u32>()
            .map(Self::from_epsg)
            .map_err(|_| TiffError::GenericError(format!("Unsupported CRS format: {}", crs_str)))
    }
}

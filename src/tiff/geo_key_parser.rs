//! GeoTIFF metadata and GeoKey parsing
//!
//! Collects what the clipper needs from a GeoTIFF IFD: the affine
//! georeferencing (tiepoint + pixel scale, or a full transformation
//! matrix), the coordinate system keys and the GDAL nodata marker.

use log::{debug, warn};

use crate::io::SeekableReader;
use crate::tiff::constants::{geo_keys, model_type, raster_type, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;
use crate::utils::string_utils;

/// One entry of the GeoKey directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoKeyEntry {
    pub key_id: u16,
    /// 0 when the value is stored in `value_offset` itself
    pub tiff_tag_location: u16,
    pub count: u16,
    pub value_offset: u16,
}

/// Georeferencing read from a GeoTIFF
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoInfo {
    /// GTModelTypeGeoKey (1 = projected, 2 = geographic)
    pub model_type: Option<u16>,
    /// GTRasterTypeGeoKey (1 = pixel is area, 2 = pixel is point)
    pub raster_type: Option<u16>,
    /// ProjectedCSTypeGeoKey, when set
    pub projected_epsg: Option<u32>,
    /// GeographicTypeGeoKey, when set
    pub geographic_epsg: Option<u32>,
    /// ModelPixelScale (x, y, z)
    pub pixel_scale: Option<[f64; 3]>,
    /// First ModelTiepoint (i, j, k, x, y, z)
    pub tie_point: Option<[f64; 6]>,
    /// ModelTransformation, row-major 4x4
    pub transformation: Option<[f64; 16]>,
    /// GDAL_NODATA value
    pub nodata: Option<f64>,
}

impl GeoInfo {
    /// Whether enough tags are present to build an affine transform
    pub fn is_georeferenced(&self) -> bool {
        self.transformation.is_some() || (self.pixel_scale.is_some() && self.tie_point.is_some())
    }

    /// Whether tiepoints address cell centres rather than cell corners
    pub fn is_pixel_is_point(&self) -> bool {
        self.raster_type == Some(raster_type::PIXEL_IS_POINT)
    }

    /// EPSG code of the raster's coordinate system, projected first
    pub fn epsg(&self) -> Option<u32> {
        self.projected_epsg.or(self.geographic_epsg)
    }

    /// Whether coordinates are longitude/latitude degrees
    pub fn is_geographic(&self) -> bool {
        match self.model_type {
            Some(model_type::GEOGRAPHIC) => true,
            Some(model_type::PROJECTED) => false,
            _ => self.projected_epsg.is_none() && self.geographic_epsg.is_some(),
        }
    }
}

/// Parser for GeoTIFF geographic metadata
pub struct GeoKeyParser;

impl GeoKeyParser {
    /// Parses the GeoKey directory of an IFD
    ///
    /// Returns an empty list when the IFD has no GeoKeyDirectoryTag.
    pub fn parse_geo_key_directory(
        tiff_reader: &TiffReader,
        reader: &mut dyn SeekableReader,
        ifd: &IFD,
    ) -> TiffResult<Vec<GeoKeyEntry>> {
        if !ifd.has_tag(tags::GEO_KEY_DIRECTORY_TAG) {
            return Ok(Vec::new());
        }

        let values = tiff_reader.read_tag_values(reader, ifd, tags::GEO_KEY_DIRECTORY_TAG)?;

        // Header: KeyDirectoryVersion, KeyRevision, MinorRevision, NumberOfKeys
        if values.len() < 4 {
            return Err(TiffError::GenericError("Invalid GeoKey directory header".to_string()));
        }

        let num_keys = values[3] as usize;
        debug!("GeoKey directory: version={}, revision={}.{}, keys={}",
               values[0], values[1], values[2], num_keys);

        let available = (values.len() - 4) / 4;
        if available < num_keys {
            warn!("GeoKey directory declares {} keys but holds {}", num_keys, available);
        }

        let keys = values[4..]
            .chunks_exact(4)
            .take(num_keys)
            .map(|key| GeoKeyEntry {
                key_id: key[0] as u16,
                tiff_tag_location: key[1] as u16,
                count: key[2] as u16,
                value_offset: key[3] as u16,
            })
            .collect();

        Ok(keys)
    }

    /// Extracts georeferencing from an IFD
    pub fn extract_geo_info(
        tiff_reader: &TiffReader,
        reader: &mut dyn SeekableReader,
        ifd: &IFD,
    ) -> TiffResult<GeoInfo> {
        let mut geo_info = GeoInfo::default();

        for key in Self::parse_geo_key_directory(tiff_reader, reader, ifd)? {
            // Only short values stored directly in the directory are of interest
            if key.tiff_tag_location != 0 {
                continue;
            }
            match key.key_id {
                geo_keys::MODEL_TYPE => geo_info.model_type = Some(key.value_offset),
                geo_keys::RASTER_TYPE => geo_info.raster_type = Some(key.value_offset),
                geo_keys::PROJECTED_CS_TYPE => geo_info.projected_epsg = user_defined_or(key.value_offset),
                geo_keys::GEOGRAPHIC_TYPE => geo_info.geographic_epsg = user_defined_or(key.value_offset),
                _ => {}
            }
        }

        if ifd.has_tag(tags::MODEL_PIXEL_SCALE_TAG) {
            let scale = tiff_reader.read_tag_doubles(reader, ifd, tags::MODEL_PIXEL_SCALE_TAG)?;
            if scale.len() >= 2 {
                geo_info.pixel_scale = Some([scale[0], scale[1], scale.get(2).copied().unwrap_or(0.0)]);
            }
        }

        if ifd.has_tag(tags::MODEL_TIEPOINT_TAG) {
            let tie_points = tiff_reader.read_tag_doubles(reader, ifd, tags::MODEL_TIEPOINT_TAG)?;
            if tie_points.len() >= 6 {
                if tie_points.len() > 6 {
                    debug!("Using the first of {} tiepoints", tie_points.len() / 6);
                }
                let mut tie_point = [0.0; 6];
                tie_point.copy_from_slice(&tie_points[..6]);
                geo_info.tie_point = Some(tie_point);
            }
        }

        if ifd.has_tag(tags::MODEL_TRANSFORMATION_TAG) {
            let matrix = tiff_reader.read_tag_doubles(reader, ifd, tags::MODEL_TRANSFORMATION_TAG)?;
            if matrix.len() >= 16 {
                let mut transformation = [0.0; 16];
                transformation.copy_from_slice(&matrix[..16]);
                geo_info.transformation = Some(transformation);
            }
        }

        if ifd.has_tag(tags::GDAL_NODATA) {
            let text = tiff_reader.read_tag_ascii(reader, ifd, tags::GDAL_NODATA)?;
            geo_info.nodata = string_utils::parse_numeric(&text);
            if geo_info.nodata.is_none() {
                warn!("Ignoring unparseable nodata value '{}'", text);
            }
        }

        debug!("GeoInfo: {:?}", geo_info);
        Ok(geo_info)
    }
}

/// 32767 marks a user-defined coordinate system, which has no EPSG code
fn user_defined_or(code: u16) -> Option<u32> {
    match code {
        0 | 32767 => None,
        code => Some(code as u32),
    }
}

//! String utility functions

/// Trims trailing null characters from a byte buffer
pub fn trim_trailing_nulls(buffer: &mut Vec<u8>) {
    while buffer.last() == Some(&0) {
        buffer.pop();
    }
}

/// Parses a numeric value stored as text, such as the GDAL nodata tag
///
/// Accepts surrounding whitespace and the spellings GDAL writes for NaN.
pub fn parse_numeric(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("nan") || trimmed.eq_ignore_ascii_case("-nan") {
        return Some(f64::NAN);
    }
    trimmed.parse::<f64>().ok()
}

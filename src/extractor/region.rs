//! Pixel window of a raster
//!
//! Coordinates are in pixels with (0,0) at the top-left cell.

use std::fmt;

/// Rectangular pixel window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Column of the top-left cell
    pub x: u32,

    /// Row of the top-left cell
    pub y: u32,

    /// Width of the window in pixels
    pub width: u32,

    /// Height of the window in pixels
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Region { x, y, width, height }
    }

    /// Column just right of the window (exclusive)
    pub fn end_x(&self) -> u32 {
        self.x + self.width
    }

    /// Row just below the window (exclusive)
    pub fn end_y(&self) -> u32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of cells in the window
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Overlap with another window, if any
    pub fn intersection(&self, other: &Region) -> Option<Region> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let end_x = self.end_x().min(other.end_x());
        let end_y = self.end_y().min(other.end_y());

        if end_x <= x || end_y <= y {
            None
        } else {
            Some(Region::new(x, y, end_x - x, end_y - y))
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={}, y={}, width={}, height={}", self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_of_overlapping_windows() {
        let window = Region::new(10, 5, 20, 10);
        let strip = Region::new(0, 12, 100, 8);

        assert_eq!(window.intersection(&strip), Some(Region::new(10, 12, 20, 3)));
        assert_eq!(window.intersection(&Region::new(30, 0, 5, 5)), None);
    }

    #[test]
    fn counts_cells() {
        assert_eq!(Region::new(3, 4, 5, 6).pixel_count(), 30);
        assert!(Region::new(0, 0, 0, 6).is_empty());
    }
}

//! Raster-to-vector region extraction
//!
//! Every 4-connected run of equal-valued cells becomes one polygon. Cells
//! that only touch at a corner belong to different regions.
//!
//! Boundaries are traced on the cell-corner lattice. Vertex (c, r) is the
//! top-left corner of cell (c, r), and each boundary edge is directed so the
//! region lies on its right when rows grow downward. Where two boundary
//! passes meet at one vertex (cells of the region touching diagonally) the
//! trace turns left, wrapping the same outside cell. Rings therefore touch
//! at such vertices but never cross or revisit themselves.

use std::collections::{HashMap, HashSet, VecDeque};

use geo::orient::{Direction, Orient};
use geo::{coord, LineString, Polygon};
use log::trace;

use crate::mask::ClassifiedGrid;
use crate::utils::progress::ProgressTracker;

/// One connected region of equal cell value
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Outline in world coordinates, exterior CCW and holes CW
    pub geometry: Polygon<f64>,
    /// Cell value shared by the region
    pub value: u8,
    /// Number of cells in the region
    pub cell_count: usize,
}

/// Heading of a boundary edge, rows growing downward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Heading {
    East,
    South,
    West,
    North,
}

impl Heading {
    fn left(self) -> Heading {
        match self {
            Heading::East => Heading::North,
            Heading::North => Heading::West,
            Heading::West => Heading::South,
            Heading::South => Heading::East,
        }
    }

    fn right(self) -> Heading {
        match self {
            Heading::East => Heading::South,
            Heading::South => Heading::West,
            Heading::West => Heading::North,
            Heading::North => Heading::East,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    from: (usize, usize),
    to: (usize, usize),
    heading: Heading,
}

/// Lazily yields the regions of a classified grid
///
/// Regions come out in row-major order of their first cell, both classes
/// included. Iterating again means calling [`polygonize`] again.
pub struct Shapes<'a> {
    grid: &'a ClassifiedGrid,
    visited: Vec<bool>,
    next_seed: usize,
    progress: ProgressTracker,
}

/// Splits `grid` into connected regions
pub fn polygonize(grid: &ClassifiedGrid) -> Shapes<'_> {
    Shapes::new(grid, false)
}

impl<'a> Shapes<'a> {
    /// Iterator over the regions of `grid`, optionally drawing progress per cell
    pub fn new(grid: &'a ClassifiedGrid, show_progress: bool) -> Self {
        let cells = grid.rows * grid.cols;
        Shapes {
            grid,
            visited: vec![false; cells],
            next_seed: 0,
            progress: ProgressTracker::optional(show_progress, cells as u64, "Polygonizing"),
        }
    }

    /// Collects the cells 4-connected to `seed` with the same value
    fn flood_fill(&mut self, seed: usize) -> Vec<usize> {
        let cols = self.grid.cols;
        let rows = self.grid.rows;
        let value = self.grid.data[seed];

        let mut cells = Vec::new();
        let mut queue = VecDeque::new();
        self.visited[seed] = true;
        queue.push_back(seed);

        while let Some(index) = queue.pop_front() {
            cells.push(index);
            let (row, col) = (index / cols, index % cols);

            let mut neighbours = [None; 4];
            if row > 0 {
                neighbours[0] = Some(index - cols);
            }
            if col + 1 < cols {
                neighbours[1] = Some(index + 1);
            }
            if row + 1 < rows {
                neighbours[2] = Some(index + cols);
            }
            if col > 0 {
                neighbours[3] = Some(index - 1);
            }

            for neighbour in neighbours.into_iter().flatten() {
                if !self.visited[neighbour] && self.grid.data[neighbour] == value {
                    self.visited[neighbour] = true;
                    queue.push_back(neighbour);
                }
            }
        }

        cells
    }

    /// Outline of a set of cells, exterior first
    fn outline(&self, cells: &[usize]) -> Polygon<f64> {
        let cols = self.grid.cols;
        let rows = self.grid.rows;

        let member: HashSet<usize> = cells.iter().copied().collect();
        let inside = |row: isize, col: isize| {
            row >= 0 && col >= 0 && (row as usize) < rows && (col as usize) < cols
                && member.contains(&(row as usize * cols + col as usize))
        };

        let mut edges = Vec::new();
        for &cell in cells {
            let (r, c) = ((cell / cols) as isize, (cell % cols) as isize);
            let (ru, cu) = (r as usize, c as usize);

            if !inside(r - 1, c) {
                edges.push(Edge { from: (cu, ru), to: (cu + 1, ru), heading: Heading::East });
            }
            if !inside(r, c + 1) {
                edges.push(Edge { from: (cu + 1, ru), to: (cu + 1, ru + 1), heading: Heading::South });
            }
            if !inside(r + 1, c) {
                edges.push(Edge { from: (cu + 1, ru + 1), to: (cu, ru + 1), heading: Heading::West });
            }
            if !inside(r, c - 1) {
                edges.push(Edge { from: (cu, ru + 1), to: (cu, ru), heading: Heading::North });
            }
        }

        let rings = trace_rings(&edges);
        trace!("Traced {} rings from {} edges", rings.len(), edges.len());

        let mut rings: Vec<(f64, Vec<(usize, usize)>)> = rings
            .into_iter()
            .map(|ring| (lattice_area(&ring).abs(), ring))
            .collect();

        // Largest ring first; it encloses every other ring of the region
        let exterior_index = rings
            .iter()
            .enumerate()
            .fold(0, |best, (i, (area, _))| if *area > rings[best].0 { i } else { best });
        let (_, exterior) = rings.swap_remove(exterior_index);

        let transform = self.grid.transform;
        let to_world = |ring: &[(usize, usize)]| -> LineString<f64> {
            ring.iter()
                .map(|&(c, r)| {
                    let (x, y) = transform.apply(c as f64, r as f64);
                    coord! { x: x, y: y }
                })
                .collect()
        };

        let interiors = rings.iter().map(|(_, ring)| to_world(ring)).collect();
        Polygon::new(to_world(&exterior), interiors).orient(Direction::Default)
    }
}

impl<'a> Iterator for Shapes<'a> {
    type Item = Region;

    fn next(&mut self) -> Option<Region> {
        while self.next_seed < self.visited.len() && self.visited[self.next_seed] {
            self.next_seed += 1;
        }

        if self.next_seed >= self.visited.len() {
            self.progress.finish();
            return None;
        }

        let seed = self.next_seed;
        let value = self.grid.data[seed];
        let cells = self.flood_fill(seed);
        self.progress.increment(cells.len() as u64);

        trace!("Region at cell {} (value {}) has {} cells", seed, value, cells.len());

        Some(Region {
            geometry: self.outline(&cells),
            value,
            cell_count: cells.len(),
        })
    }
}

/// Links directed edges into closed rings of corner vertices
///
/// Collinear vertices are left out, so every returned vertex is a corner.
fn trace_rings(edges: &[Edge]) -> Vec<Vec<(usize, usize)>> {
    let mut outgoing: HashMap<(usize, usize), Vec<usize>> = HashMap::with_capacity(edges.len());
    for (index, edge) in edges.iter().enumerate() {
        outgoing.entry(edge.from).or_default().push(index);
    }

    let mut used = vec![false; edges.len()];
    let mut rings = Vec::new();

    for start in 0..edges.len() {
        if used[start] {
            continue;
        }

        let mut ring = Vec::new();
        let mut current = start;
        loop {
            used[current] = true;
            let edge = edges[current];

            let next = match outgoing.get(&edge.to) {
                Some(candidates) => pick_next(edges, candidates, edge.heading, start, &used),
                None => None,
            };

            // Both ends of a direction change are corners
            let next = match next {
                Some(next) => next,
                None => break,
            };
            if edges[next].heading != edge.heading {
                ring.push(edge.to);
            }
            if next == start {
                break;
            }
            current = next;
        }

        if ring.len() >= 4 {
            rings.push(ring);
        }
    }

    rings
}

/// Next edge after one arriving with `heading`: left turn, then straight,
/// then right turn. The ring's start edge counts as available so the ring
/// can close.
fn pick_next(
    edges: &[Edge],
    candidates: &[usize],
    heading: Heading,
    start: usize,
    used: &[bool],
) -> Option<usize> {
    let available = |index: &&usize| **index == start || !used[**index];

    for wanted in [heading.left(), heading, heading.right()] {
        if let Some(&index) = candidates.iter().filter(available).find(|i| edges[**i].heading == wanted) {
            return Some(index);
        }
    }
    None
}

/// Signed shoelace area of a lattice ring
fn lattice_area(ring: &[(usize, usize)]) -> f64 {
    let mut twice_area = 0.0;
    for (i, &(x0, y0)) in ring.iter().enumerate() {
        let (x1, y1) = ring[(i + 1) % ring.len()];
        twice_area += x0 as f64 * y1 as f64 - x1 as f64 * y0 as f64;
    }
    twice_area / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::GeoTransform;
    use geo::{Area, Winding};

    fn classified(rows: usize, cols: usize, data: Vec<u8>) -> ClassifiedGrid {
        ClassifiedGrid::new(rows, cols, data, GeoTransform::from_origin(0.0, rows as f64, 1.0, 1.0)).unwrap()
    }

    #[test]
    fn block_in_a_grid_gives_two_regions() {
        #[rustfmt::skip]
        let grid = classified(4, 4, vec![
            0, 0, 0, 0,
            0, 1, 1, 0,
            0, 1, 1, 0,
            0, 0, 0, 0,
        ]);

        let regions: Vec<Region> = polygonize(&grid).collect();
        assert_eq!(regions.len(), 2);

        // Background seeds at cell 0 and wraps the block as a hole
        assert_eq!(regions[0].value, 0);
        assert_eq!(regions[0].geometry.interiors().len(), 1);
        assert_eq!(regions[0].geometry.unsigned_area(), 12.0);

        assert_eq!(regions[1].value, 1);
        assert_eq!(regions[1].cell_count, 4);
        assert_eq!(regions[1].geometry.unsigned_area(), 4.0);
        // Square block reduces to its four corners
        assert_eq!(regions[1].geometry.exterior().0.len(), 5);
    }

    #[test]
    fn uniform_grid_is_one_region_covering_the_extent() {
        let grid = classified(3, 5, vec![1; 15]);
        let regions: Vec<Region> = polygonize(&grid).collect();

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].geometry.unsigned_area(), 15.0);
        assert!(regions[0].geometry.interiors().is_empty());
    }

    #[test]
    fn diagonal_cells_are_separate_regions() {
        #[rustfmt::skip]
        let grid = classified(2, 2, vec![
            1, 0,
            0, 1,
        ]);

        let water: Vec<Region> = polygonize(&grid).filter(|r| r.value == 1).collect();
        assert_eq!(water.len(), 2);
        assert!(water.iter().all(|r| r.geometry.unsigned_area() == 1.0));
    }

    #[test]
    fn rings_are_oriented_exterior_ccw_holes_cw() {
        #[rustfmt::skip]
        let grid = classified(3, 3, vec![
            1, 1, 1,
            1, 0, 1,
            1, 1, 1,
        ]);

        let ring = polygonize(&grid).next().unwrap();
        assert_eq!(ring.value, 1);
        assert!(ring.geometry.exterior().is_ccw());
        assert_eq!(ring.geometry.interiors().len(), 1);
        assert!(ring.geometry.interiors()[0].is_cw());
        assert_eq!(ring.geometry.unsigned_area(), 8.0);
    }

    #[test]
    fn hole_touching_the_outline_at_a_corner() {
        // The enclosed zero at (1,1) meets the outside zero at (2,2) only
        // at a corner
        #[rustfmt::skip]
        let grid = classified(3, 3, vec![
            1, 1, 1,
            1, 0, 1,
            1, 1, 0,
        ]);

        let water = polygonize(&grid).find(|r| r.value == 1).unwrap();
        assert_eq!(water.cell_count, 7);
        assert_eq!(water.geometry.interiors().len(), 1);
        assert_eq!(water.geometry.unsigned_area(), 7.0);
        assert_eq!(water.geometry.exterior().0.len(), 7);
    }

    #[test]
    fn regions_follow_the_transform() {
        let grid = ClassifiedGrid::new(1, 2, vec![1, 1], GeoTransform::from_origin(100.0, 50.0, 0.5, 0.25)).unwrap();
        let region = polygonize(&grid).next().unwrap();

        assert_eq!(region.geometry.unsigned_area(), 0.25);
        let xs: Vec<f64> = region.geometry.exterior().0.iter().map(|c| c.x).collect();
        assert!(xs.iter().all(|x| *x == 100.0 || *x == 101.0));
    }

    #[test]
    fn iteration_is_row_major_and_restartable() {
        #[rustfmt::skip]
        let grid = classified(2, 3, vec![
            1, 0, 1,
            1, 0, 1,
        ]);

        let values: Vec<u8> = polygonize(&grid).map(|r| r.value).collect();
        assert_eq!(values, vec![1, 0, 1]);
        assert_eq!(polygonize(&grid).count(), 3);
    }
}

//! Ring-based equirectangular surface grid.
//!
//! The sphere is sampled as `ring_count` latitude rings stacked pole to pole. Each
//! ring only uses a centered run of `ring_length[r]` columns, proportional to
//! `cos(latitude)`, so cells cover roughly equal surface area. Columns outside that
//! run are padding and are never read.
//!
//! Moving east or west wraps around the current ring's own run, so every ring is a
//! closed loop. Moving north or south keeps the global column index and wraps it into
//! the target ring's run. The two poles are hard edges.

use std::f64::consts::FRAC_PI_2;

use crate::error::ConfigError;
use crate::plates::PlateId;
use crate::tilemap::Tilemap;

/// Smallest equator length that still yields two rings with interior cells.
pub const MIN_EQUATOR_LENGTH: usize = 4;

/// Grid coordinate: `(ring, column)`.
pub type Coord = (usize, usize);

/// Axis-aligned step on the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards ring 0
    North,
    /// Towards the last ring
    South,
    /// Decreasing column, wraps within the ring
    West,
    /// Increasing column, wraps within the ring
    East,
}

impl Direction {
    /// All directions in neighbor resolution order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }

    /// (ring delta, column delta)
    fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
            Direction::East => (0, 1),
        }
    }
}

/// Which rectangular view of the surface to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Projection {
    /// Each ring stretched to the full equator width
    #[default]
    Stretched,
    /// The backing array as stored, padding included
    Raw,
}

impl std::fmt::Display for Projection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stretched => write!(f, "stretched"),
            Self::Raw => write!(f, "raw"),
        }
    }
}

/// Number of rings for a given equator length (rounded half to even).
pub fn ring_count_for(equator_length: usize) -> usize {
    (equator_length as f64 / 2.0).round_ties_even() as usize
}

/// Valid column count of every ring, pole to pole.
///
/// Latitudes are evenly spaced over `[-pi/2, pi/2]`. The angle is built from a signed
/// integer numerator so ring `r` and ring `n-1-r` get exactly mirrored values.
pub fn ring_lengths_for(equator_length: usize) -> Vec<usize> {
    let n = ring_count_for(equator_length);
    let span = (n.max(2) - 1) as f64;

    (0..n)
        .map(|r| {
            let numerator = 2.0 * r as f64 - (n as f64 - 1.0);
            let theta = FRAC_PI_2 * numerator / span;
            let length = (equator_length as f64 * theta.cos()).round_ties_even();
            (length.max(1.0) as usize).min(equator_length)
        })
        .collect()
}

/// Equirectangular surface with a per-ring valid window.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceGrid<T> {
    equator_length: usize,
    ring_lengths: Vec<usize>,
    ring_offsets: Vec<usize>,
    data: Vec<T>,
}

impl<T: Clone> SurfaceGrid<T> {
    /// Build a grid with every cell (padding included) set to `value`.
    pub fn new_with(equator_length: usize, value: T) -> Result<Self, ConfigError> {
        if equator_length < MIN_EQUATOR_LENGTH {
            return Err(ConfigError::InvalidEquatorLength(equator_length));
        }

        let ring_lengths = ring_lengths_for(equator_length);
        let ring_offsets = ring_lengths
            .iter()
            .map(|&len| (equator_length - len) / 2)
            .collect();
        let rings = ring_lengths.len();

        Ok(Self {
            equator_length,
            ring_lengths,
            ring_offsets,
            data: vec![value; rings * equator_length],
        })
    }

    /// Build a grid with the same layout as `other`, filled with `value`.
    pub fn like<U>(other: &SurfaceGrid<U>, value: T) -> Self {
        Self {
            equator_length: other.equator_length,
            ring_lengths: other.ring_lengths.clone(),
            ring_offsets: other.ring_offsets.clone(),
            data: vec![value; other.data.len()],
        }
    }

    pub fn equator_length(&self) -> usize {
        self.equator_length
    }

    pub fn ring_count(&self) -> usize {
        self.ring_lengths.len()
    }

    pub fn ring_length(&self, ring: usize) -> usize {
        self.ring_lengths[ring]
    }

    pub fn ring_offset(&self, ring: usize) -> usize {
        self.ring_offsets[ring]
    }

    /// One past the last valid column of `ring`.
    pub fn ring_end(&self, ring: usize) -> usize {
        self.ring_offsets[ring] + self.ring_lengths[ring]
    }

    pub fn ring_lengths(&self) -> &[usize] {
        &self.ring_lengths
    }

    /// True when `(ring, col)` lies inside the ring's valid window.
    pub fn is_valid(&self, ring: usize, col: usize) -> bool {
        ring < self.ring_count() && col >= self.ring_offset(ring) && col < self.ring_end(ring)
    }

    fn index(&self, ring: usize, col: usize) -> usize {
        debug_assert!(ring < self.ring_count() && col < self.equator_length);
        ring * self.equator_length + col
    }

    pub fn get(&self, ring: usize, col: usize) -> &T {
        &self.data[self.index(ring, col)]
    }

    pub fn set(&mut self, ring: usize, col: usize, value: T) {
        let idx = self.index(ring, col);
        self.data[idx] = value;
    }

    /// Set every valid cell to `value`, leaving padding untouched.
    pub fn fill_valid(&mut self, value: T) {
        for ring in 0..self.ring_count() {
            let start = self.index(ring, self.ring_offset(ring));
            let end = start + self.ring_length(ring);
            self.data[start..end].fill(value.clone());
        }
    }

    /// Map an arbitrary column into `ring`'s valid window.
    ///
    /// Columns left of the window come back in from the far end, columns past the
    /// end wrap around to the start.
    pub fn wrap_column(&self, ring: usize, col: isize) -> usize {
        let offset = self.ring_offset(ring) as isize;
        let length = self.ring_length(ring) as isize;
        (offset + (col - offset).rem_euclid(length)) as usize
    }

    /// Resolve a single step from `(ring, col)`, or `None` when it would cross a pole.
    pub fn neighbor(&self, ring: usize, col: usize, direction: Direction) -> Option<Coord> {
        let (dr, dc) = direction.delta();
        let target = ring as isize + dr;
        if target < 0 || target >= self.ring_count() as isize {
            return None;
        }
        let target = target as usize;
        Some((target, self.wrap_column(target, col as isize + dc)))
    }

    /// Up to four in-bounds neighbors in N, S, W, E order.
    pub fn neighbors(&self, ring: usize, col: usize) -> Vec<Coord> {
        Direction::ALL
            .iter()
            .filter_map(|&dir| self.neighbor(ring, col, dir))
            .collect()
    }

    /// Iterate over valid cells only, ring by ring, left to right.
    pub fn valid_cells(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        (0..self.ring_count()).flat_map(move |ring| {
            (self.ring_offset(ring)..self.ring_end(ring))
                .map(move |col| (ring, col, self.get(ring, col)))
        })
    }

    /// Total addressable surface area.
    pub fn valid_cell_count(&self) -> usize {
        self.ring_lengths.iter().sum()
    }

    /// Count valid cells whose value satisfies `pred`.
    pub fn count_where<F: Fn(&T) -> bool>(&self, pred: F) -> usize {
        self.valid_cells().filter(|(_, _, v)| pred(v)).count()
    }

    /// The valid run of `ring`.
    pub fn ring_cells(&self, ring: usize) -> &[T] {
        let start = self.index(ring, self.ring_offset(ring));
        &self.data[start..start + self.ring_length(ring)]
    }

    /// Stretch every ring's valid run to the full equator width.
    ///
    /// Nearest-neighbor upsampling: source cell `i` is repeated
    /// `round(remaining_width / remaining_cells)` times, so the repeats are spread
    /// evenly and left-to-right order is preserved.
    pub fn to_equirectangular(&self) -> Tilemap<T> {
        let width = self.equator_length;
        let mut data = Vec::with_capacity(width * self.ring_count());

        for ring in 0..self.ring_count() {
            let src = self.ring_cells(ring);
            let mut written = 0usize;
            for (i, value) in src.iter().enumerate() {
                let left = src.len() - i;
                let repeat = ((width - written) as f64 / left as f64).round_ties_even() as usize;
                let repeat = repeat.min(width - written);
                data.extend(std::iter::repeat(value.clone()).take(repeat));
                written += repeat;
            }
        }

        Tilemap::from_vec(width, self.ring_count(), data)
    }

    /// The backing array as-is: rings centered, padding included.
    pub fn to_raw(&self) -> Tilemap<T> {
        Tilemap::from_vec(self.equator_length, self.ring_count(), self.data.clone())
    }

    pub fn project(&self, projection: Projection) -> Tilemap<T> {
        match projection {
            Projection::Stretched => self.to_equirectangular(),
            Projection::Raw => self.to_raw(),
        }
    }
}

/// Plate-id specific queries.
impl SurfaceGrid<PlateId> {
    /// Empty plate map: every cell unassigned.
    pub fn new(equator_length: usize) -> Result<Self, ConfigError> {
        Self::new_with(equator_length, PlateId::NONE)
    }

    pub fn is_free(&self, ring: usize, col: usize) -> bool {
        self.get(ring, col).is_none()
    }

    /// Cells currently owned by some plate.
    pub fn nonzero_count(&self) -> usize {
        self.count_where(|id| !id.is_none())
    }

    /// Valid cells not yet owned by any plate.
    pub fn free_count(&self) -> usize {
        self.valid_cell_count() - self.nonzero_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_layout_for_equator_8() {
        let grid = SurfaceGrid::new(8).unwrap();

        assert_eq!(grid.ring_count(), 4);
        assert_eq!(grid.ring_lengths(), &[1, 7, 7, 1]);
        assert_eq!(
            (0..4).map(|r| grid.ring_offset(r)).collect::<Vec<_>>(),
            vec![3, 0, 0, 3]
        );
        assert_eq!(grid.valid_cell_count(), 16);
        assert_eq!(grid.free_count(), 16);
    }

    #[test]
    fn test_odd_equator_rounds_half_to_even() {
        assert_eq!(ring_count_for(9), 4);
        assert_eq!(ring_count_for(11), 6);
        let grid = SurfaceGrid::new(9).unwrap();
        assert_eq!(grid.ring_lengths(), &[1, 8, 8, 1]);
        assert_eq!(grid.ring_offset(1), 0);
        assert_eq!(grid.ring_offset(0), 4);
    }

    #[test]
    fn test_ring_lengths_sum_positive_and_symmetric() {
        for equator in MIN_EQUATOR_LENGTH..300 {
            let grid = SurfaceGrid::new(equator).unwrap();
            let lengths = grid.ring_lengths();
            let n = lengths.len();

            assert_eq!(lengths.iter().sum::<usize>(), grid.valid_cell_count());
            assert!(lengths.iter().all(|&len| len >= 1 && len <= equator));
            for r in 0..n {
                assert_eq!(lengths[r], lengths[n - 1 - r], "equator {} ring {}", equator, r);
            }
            // Non-increasing from the equator towards either pole
            for r in 1..n / 2 {
                assert!(lengths[r] >= lengths[r - 1]);
            }
        }
    }

    #[test]
    fn test_rejects_short_equator() {
        assert_eq!(
            SurfaceGrid::new(3).unwrap_err(),
            ConfigError::InvalidEquatorLength(3)
        );
        assert!(SurfaceGrid::new(0).is_err());
    }

    #[test]
    fn test_wrap_column_stays_in_window() {
        let grid = SurfaceGrid::new(8).unwrap();

        // Ring 1 spans columns 0..7
        assert_eq!(grid.wrap_column(1, -1), 6);
        assert_eq!(grid.wrap_column(1, 7), 0);
        assert_eq!(grid.wrap_column(1, 3), 3);

        // Polar ring 0 has a single cell at column 3
        assert_eq!(grid.wrap_column(0, 2), 3);
        assert_eq!(grid.wrap_column(0, 4), 3);
        assert_eq!(grid.wrap_column(0, 0), 3);

        for ring in 0..grid.ring_count() {
            for col in -20isize..40 {
                let wrapped = grid.wrap_column(ring, col);
                assert!(grid.is_valid(ring, wrapped));
            }
        }
    }

    #[test]
    fn test_poles_are_edges() {
        let grid = SurfaceGrid::new(8).unwrap();
        assert_eq!(grid.neighbor(0, 3, Direction::North), None);
        assert_eq!(grid.neighbor(3, 3, Direction::South), None);
        assert_eq!(grid.neighbor(0, 3, Direction::South), Some((1, 3)));
        // From the wide ring into the single polar cell
        assert_eq!(grid.neighbor(1, 0, Direction::North), Some((0, 3)));
        assert_eq!(grid.neighbors(0, 3).len(), 3);
    }

    #[test]
    fn test_reverse_step_returns_to_origin() {
        for equator in [8usize, 13, 64, 101] {
            let grid = SurfaceGrid::new(equator).unwrap();
            let coords: Vec<Coord> = grid.valid_cells().map(|(r, c, _)| (r, c)).collect();

            for (ring, col) in coords {
                for dir in [Direction::West, Direction::East] {
                    let (nr, nc) = grid.neighbor(ring, col, dir).unwrap();
                    assert_eq!(grid.neighbor(nr, nc, dir.opposite()), Some((ring, col)));
                }
                for dir in [Direction::North, Direction::South] {
                    if let Some((nr, nc)) = grid.neighbor(ring, col, dir) {
                        // Only columns shared by both rings map back exactly
                        if nc == col {
                            assert_eq!(grid.neighbor(nr, nc, dir.opposite()), Some((ring, col)));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_stretch_preserves_order() {
        let mut grid = SurfaceGrid::new_with(8, 0u8).unwrap();
        grid.fill_valid(9);
        for col in 0..7 {
            grid.set(1, col, col as u8 + 1);
        }

        let rect = grid.to_equirectangular();
        assert_eq!((rect.width, rect.height), (8, 4));
        assert_eq!(rect.row(0), &[9; 8]);
        assert_eq!(rect.row(1), &[1, 2, 3, 4, 5, 6, 6, 7]);
    }

    #[test]
    fn test_raw_projection_keeps_padding() {
        let mut grid = SurfaceGrid::new_with(8, 0u8).unwrap();
        grid.fill_valid(5);

        let raw = grid.project(Projection::Raw);
        assert_eq!(raw.row(0), &[0, 0, 0, 5, 0, 0, 0, 0]);
        assert_eq!(raw.row(1), &[5, 5, 5, 5, 5, 5, 5, 0]);
    }

    #[test]
    fn test_like_copies_layout() {
        let plates = SurfaceGrid::new(20).unwrap();
        let heights = SurfaceGrid::like(&plates, 0u8);

        assert_eq!(heights.ring_lengths(), plates.ring_lengths());
        assert_eq!(heights.valid_cell_count(), plates.valid_cell_count());
    }
}

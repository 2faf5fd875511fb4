//! Elevation from plate identity.
//!
//! Every valid cell first gets a flat base height depending on its plate's type,
//! then a square box filter blurs the plate outlines into slopes. The filter walks
//! the surface with the same ring rules as plate growth: columns wrap inside each
//! ring, and rings past a pole are left out of the average instead of counted as 0.

use serde::{Deserialize, Serialize};

use crate::plates::{Plate, PlateId, PlateType};
use crate::surface::{Projection, SurfaceGrid};
use crate::tilemap::Tilemap;

/// Parameters for base heights and smoothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightParams {
    /// Height of oceanic plates and unassigned cells
    pub base_ocean: u8,
    /// Height of continental plates
    pub base_continent: u8,
    /// Box filter size; even sizes are bumped to the next odd one
    pub smooth_window: usize,
}

impl Default for HeightParams {
    fn default() -> Self {
        Self {
            base_ocean: 20,
            base_continent: 60,
            smooth_window: 3,
        }
    }
}

/// Normalize a requested window size: at least 1, always odd.
pub fn smoothing_window(requested: usize) -> usize {
    let k = requested.max(1);
    if k % 2 == 0 {
        k + 1
    } else {
        k
    }
}

/// Elevation grid with the same ring layout as the plate map.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightMap {
    surface: SurfaceGrid<u8>,
}

impl HeightMap {
    pub fn from_surface(surface: SurfaceGrid<u8>) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &SurfaceGrid<u8> {
        &self.surface
    }

    pub fn get(&self, ring: usize, col: usize) -> u8 {
        *self.surface.get(ring, col)
    }

    /// Lowest and highest elevation over valid cells.
    pub fn min_max(&self) -> (u8, u8) {
        self.surface
            .valid_cells()
            .fold((u8::MAX, u8::MIN), |(lo, hi), (_, _, &h)| (lo.min(h), hi.max(h)))
    }

    /// Raw elevations as a rectangle.
    pub fn project(&self, projection: Projection) -> Tilemap<u8> {
        self.surface.project(projection)
    }

    /// Elevations rescaled from `[min, max]` to `[0, 255]` for display.
    ///
    /// A flat map comes out all zeros. Padding cells in the raw projection are 0.
    pub fn to_image_data(&self, projection: Projection) -> Tilemap<u8> {
        let (lo, hi) = self.min_max();
        let mut normalized = SurfaceGrid::like(&self.surface, 0u8);

        if hi > lo {
            let range = (hi - lo) as u32;
            for (ring, col, &h) in self.surface.valid_cells() {
                let value = (h - lo) as u32 * 255 / range;
                normalized.set(ring, col, value as u8);
            }
        }

        normalized.project(projection)
    }
}

/// Base height of every valid cell from its plate's type.
pub fn assign_base_heights(
    plate_map: &SurfaceGrid<PlateId>,
    plates: &[Plate],
    params: &HeightParams,
) -> SurfaceGrid<u8> {
    let mut heights = SurfaceGrid::like(plate_map, 0u8);

    for (ring, col, id) in plate_map.valid_cells() {
        let plate_type = id.index().and_then(|i| plates.get(i)).map(|p| p.plate_type);
        let height = match plate_type {
            Some(PlateType::Continental) => params.base_continent,
            Some(PlateType::Oceanic) | None => params.base_ocean,
        };
        heights.set(ring, col, height);
    }

    heights
}

/// Square box filter over the ring grid.
///
/// The window spans `k` rings and `k` columns around each cell. A ring no wider than
/// the window contributes each of its cells once. Sums are kept in `u64`, and the
/// mean is rounded and clamped to `u8`.
pub fn box_smooth(heights: &SurfaceGrid<u8>, window: usize) -> SurfaceGrid<u8> {
    let k = smoothing_window(window);
    if k == 1 {
        return heights.clone();
    }

    let half = (k / 2) as isize;
    let rings = heights.ring_count() as isize;
    let mut result = SurfaceGrid::like(heights, 0u8);

    for (ring, col, _) in heights.valid_cells() {
        let mut sum: u64 = 0;
        let mut count: u64 = 0;

        for dr in -half..=half {
            let target = ring as isize + dr;
            if target < 0 || target >= rings {
                continue;
            }
            let target = target as usize;

            if heights.ring_length(target) <= k {
                for &h in heights.ring_cells(target) {
                    sum += h as u64;
                    count += 1;
                }
            } else {
                for dc in -half..=half {
                    let c = heights.wrap_column(target, col as isize + dc);
                    sum += *heights.get(target, c) as u64;
                    count += 1;
                }
            }
        }

        let mean = (sum as f64 / count as f64).round();
        result.set(ring, col, mean.clamp(0.0, u8::MAX as f64) as u8);
    }

    result
}

/// Base heights followed by smoothing.
pub fn generate_heightmap(
    plate_map: &SurfaceGrid<PlateId>,
    plates: &[Plate],
    params: &HeightParams,
) -> HeightMap {
    let base = assign_base_heights(plate_map, plates, params);
    let window = smoothing_window(params.smooth_window);
    log::debug!("Smoothing heightmap with a {}x{} window", window, window);
    HeightMap::from_surface(box_smooth(&base, window))
}

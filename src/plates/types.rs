use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::surface::{ring_lengths_for, Coord, SurfaceGrid, MIN_EQUATOR_LENGTH};

/// Largest plate count representable with `u8` ids (0 is reserved).
pub const MAX_PLATES: usize = u8::MAX as usize;

/// Unique identifier for a tectonic plate. `PlateId(0)` marks an unassigned cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct PlateId(pub u8);

impl PlateId {
    pub const NONE: PlateId = PlateId(0);

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Position of this plate in the engine's plate list.
    pub fn index(&self) -> Option<usize> {
        (self.0 as usize).checked_sub(1)
    }
}

impl std::fmt::Display for PlateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Type of tectonic plate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlateType {
    /// Oceanic plates sit low and become ocean floor.
    Oceanic,
    /// Continental plates sit high and become land.
    Continental,
}

impl std::fmt::Display for PlateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Oceanic => write!(f, "oceanic"),
            Self::Continental => write!(f, "continental"),
        }
    }
}

/// What to do when a plate's random seed lands on a cell that is already taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedCollision {
    /// The plate silently fails to start and ends up owning no cells.
    Keep,
    /// Draw again until a free cell is found.
    #[default]
    Reroll,
}

/// Parameters for plate creation and growth.
#[derive(Clone, Debug, PartialEq)]
pub struct PlateConfig {
    pub equator_length: usize,
    pub continental_plates: usize,
    pub oceanic_plates: usize,
    /// Growth rates are drawn from `[1, growth_rate_range)`
    pub growth_rate_range: u32,
    pub seed_collision: SeedCollision,
}

impl PlateConfig {
    pub fn total_plates(&self) -> usize {
        self.continental_plates + self.oceanic_plates
    }

    /// Check every parameter without allocating the grid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.equator_length < MIN_EQUATOR_LENGTH {
            return Err(ConfigError::InvalidEquatorLength(self.equator_length));
        }
        let total = self.total_plates();
        if total == 0 {
            return Err(ConfigError::NoPlates);
        }
        if total > MAX_PLATES {
            return Err(ConfigError::TooManyPlates {
                requested: total,
                max: MAX_PLATES,
            });
        }
        if self.growth_rate_range < 2 {
            return Err(ConfigError::InvalidGrowthRateRange(self.growth_rate_range));
        }
        if self.seed_collision == SeedCollision::Reroll {
            let cells: usize = ring_lengths_for(self.equator_length).iter().sum();
            if total > cells {
                return Err(ConfigError::PlatesExceedSurface { plates: total, cells });
            }
        }
        Ok(())
    }
}

/// A tectonic plate and its growth bookkeeping.
///
/// Cells are stored as coordinates only. The grid itself is the authority on who
/// owns what.
#[derive(Clone, Debug)]
pub struct Plate {
    pub id: PlateId,
    pub plate_type: PlateType,
    /// Starting cell (ring, column)
    pub seed: Coord,
    /// Expansion sub-steps per growth round
    pub growth_rate: u32,
    /// Whether the seed cell was actually claimed
    pub seeded: bool,
    pub owned_cells: Vec<Coord>,
    /// Cells claimed in the latest sub-step, expanded from next
    pub frontier: Vec<Coord>,
    /// Frontier cells that ran into taken cells or a pole edge
    pub exhausted_frontier: Vec<Coord>,
}

impl Plate {
    pub fn new(id: PlateId, plate_type: PlateType, seed: Coord, growth_rate: u32) -> Self {
        Self {
            id,
            plate_type,
            seed,
            growth_rate,
            seeded: false,
            owned_cells: Vec::new(),
            frontier: Vec::new(),
            exhausted_frontier: Vec::new(),
        }
    }

    /// Create a plate with a random seed cell and growth rate.
    pub fn random<T: Clone>(
        id: PlateId,
        plate_type: PlateType,
        surface: &SurfaceGrid<T>,
        growth_rate_range: u32,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let seed = random_seed_cell(surface, rng);
        let growth_rate = rng.gen_range(1..growth_rate_range);
        Self::new(id, plate_type, seed, growth_rate)
    }

    pub fn is_continental(&self) -> bool {
        self.plate_type == PlateType::Continental
    }

    /// Number of cells owned.
    pub fn area(&self) -> usize {
        self.owned_cells.len()
    }

    /// True while the plate still has cells to expand from.
    pub fn is_growing(&self) -> bool {
        !self.frontier.is_empty()
    }
}

/// Pick a ring uniformly, then a column inside that ring's valid window.
pub fn random_seed_cell<T: Clone>(surface: &SurfaceGrid<T>, rng: &mut ChaCha8Rng) -> Coord {
    let ring = rng.gen_range(0..surface.ring_count());
    let col = rng.gen_range(surface.ring_offset(ring)..surface.ring_end(ring));
    (ring, col)
}

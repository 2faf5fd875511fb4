//! Competitive flood-fill that partitions the surface into plates.
//!
//! Every plate starts from a single seed cell. Each growth round visits the plates
//! in creation order, and each plate expands its frontier `growth_rate` times by
//! claiming all free 4-neighbors. A plate processed earlier in the round gets to
//! contested cells first. The run ends once the surface is full or a whole round
//! claims nothing.

use std::collections::HashSet;
use std::ops::ControlFlow;

use rand_chacha::ChaCha8Rng;

use crate::error::ConfigError;
use crate::surface::{Coord, Direction, SurfaceGrid};

use super::types::{
    random_seed_cell, Plate, PlateConfig, PlateId, PlateType, SeedCollision, MAX_PLATES,
};

/// Snapshot reported after every growth round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrowthProgress {
    pub round: usize,
    pub free_cells: usize,
    pub total_cells: usize,
    /// Cells claimed during this round alone
    pub claimed: usize,
}

impl GrowthProgress {
    pub fn filled_cells(&self) -> usize {
        self.total_cells - self.free_cells
    }

    /// Whole-number percentage of the surface that is assigned.
    pub fn percent_filled(&self) -> usize {
        if self.total_cells == 0 {
            return 100;
        }
        100 * self.filled_cells() / self.total_cells
    }
}

/// Receives progress after each round. Returning `Break` stops the run before the
/// next round starts.
pub trait GrowthObserver {
    fn on_round(&mut self, progress: &GrowthProgress) -> ControlFlow<()>;
}

impl<F: FnMut(&GrowthProgress) -> ControlFlow<()>> GrowthObserver for F {
    fn on_round(&mut self, progress: &GrowthProgress) -> ControlFlow<()> {
        self(progress)
    }
}

/// Observer that reports every round through the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogProgress;

impl GrowthObserver for LogProgress {
    fn on_round(&mut self, progress: &GrowthProgress) -> ControlFlow<()> {
        log::info!(
            "Round {}: {} free cells remaining ({}%)",
            progress.round,
            progress.free_cells,
            progress.percent_filled()
        );
        ControlFlow::Continue(())
    }
}

/// Why growth stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Every valid cell belongs to a plate
    Saturated,
    /// A full round claimed nothing while free cells remain
    Stalled,
    /// The observer asked to stop
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrowthState {
    Growing,
    Done(Termination),
}

/// Final outcome of [`PlateGrowthEngine::run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrowthSummary {
    pub rounds: usize,
    pub termination: Termination,
    pub free_cells: usize,
    pub total_cells: usize,
}

/// Owns the plate map and the plates, and runs growth rounds over them.
#[derive(Clone, Debug)]
pub struct PlateGrowthEngine {
    surface: SurfaceGrid<PlateId>,
    plates: Vec<Plate>,
    state: GrowthState,
    rounds: usize,
    free_cells: usize,
}

impl PlateGrowthEngine {
    /// Create and seed all plates: continental ones first, then oceanic.
    ///
    /// For every plate the seed cell is drawn before its growth rate, all from the
    /// same geometry stream, so a fixed `rng` seed reproduces the whole run.
    pub fn new(config: &PlateConfig, rng: &mut ChaCha8Rng) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut surface = SurfaceGrid::new(config.equator_length)?;
        let mut plates = Vec::with_capacity(config.total_plates());

        for i in 0..config.total_plates() {
            let plate_type = if i < config.continental_plates {
                PlateType::Continental
            } else {
                PlateType::Oceanic
            };
            let id = PlateId((i + 1) as u8);
            let mut plate =
                Plate::random(id, plate_type, &surface, config.growth_rate_range, rng);

            if config.seed_collision == SeedCollision::Reroll {
                while !surface.is_free(plate.seed.0, plate.seed.1) {
                    log::debug!("Plate {} seed {:?} is taken, rerolling", id, plate.seed);
                    plate.seed = random_seed_cell(&surface, rng);
                }
            }

            claim_seed(&mut surface, &mut plate);
            plates.push(plate);
        }

        Ok(Self::assemble(surface, plates))
    }

    /// Build an engine from hand-placed plates.
    ///
    /// Plates are renumbered `1..=n` in the given order. A seed outside the valid
    /// window, or on a cell an earlier plate already took, is left unclaimed.
    pub fn from_plates(equator_length: usize, mut plates: Vec<Plate>) -> Result<Self, ConfigError> {
        if plates.is_empty() {
            return Err(ConfigError::NoPlates);
        }
        if plates.len() > MAX_PLATES {
            return Err(ConfigError::TooManyPlates {
                requested: plates.len(),
                max: MAX_PLATES,
            });
        }

        let mut surface = SurfaceGrid::new(equator_length)?;
        for (i, plate) in plates.iter_mut().enumerate() {
            plate.id = PlateId((i + 1) as u8);
            plate.seeded = false;
            plate.owned_cells.clear();
            plate.frontier.clear();
            plate.exhausted_frontier.clear();

            if surface.is_valid(plate.seed.0, plate.seed.1) {
                claim_seed(&mut surface, plate);
            } else {
                log::warn!("Plate {} seed {:?} is outside the surface", plate.id, plate.seed);
            }
        }

        Ok(Self::assemble(surface, plates))
    }

    fn assemble(surface: SurfaceGrid<PlateId>, plates: Vec<Plate>) -> Self {
        let free_cells = surface.free_count();
        let state = if free_cells == 0 {
            GrowthState::Done(Termination::Saturated)
        } else {
            GrowthState::Growing
        };
        log::info!(
            "Seeded {} plates, {} free cells of {}",
            plates.iter().filter(|p| p.seeded).count(),
            free_cells,
            surface.valid_cell_count()
        );

        Self {
            surface,
            plates,
            state,
            rounds: 0,
            free_cells,
        }
    }

    pub fn surface(&self) -> &SurfaceGrid<PlateId> {
        &self.surface
    }

    pub fn plates(&self) -> &[Plate] {
        &self.plates
    }

    pub fn plate(&self, id: PlateId) -> Option<&Plate> {
        id.index().and_then(|i| self.plates.get(i))
    }

    pub fn state(&self) -> GrowthState {
        self.state
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn free_cells(&self) -> usize {
        self.free_cells
    }

    /// Hand the plate map and plates over to later stages.
    pub fn into_parts(self) -> (SurfaceGrid<PlateId>, Vec<Plate>) {
        (self.surface, self.plates)
    }

    fn progress(&self, claimed: usize) -> GrowthProgress {
        GrowthProgress {
            round: self.rounds,
            free_cells: self.free_cells,
            total_cells: self.surface.valid_cell_count(),
            claimed,
        }
    }

    /// Run exactly one growth round. Does nothing once growth is done.
    pub fn step_round(&mut self) -> GrowthProgress {
        if self.state != GrowthState::Growing {
            return self.progress(0);
        }

        let claimed: usize = self
            .plates
            .iter_mut()
            .map(|plate| grow_plate(&mut self.surface, plate))
            .sum();

        self.rounds += 1;
        self.free_cells -= claimed;
        debug_assert_eq!(self.free_cells, self.surface.free_count());

        if self.free_cells == 0 {
            self.state = GrowthState::Done(Termination::Saturated);
        } else if claimed == 0 {
            log::info!("No more growth possible, stopping with {} free cells", self.free_cells);
            self.state = GrowthState::Done(Termination::Stalled);
        }

        self.progress(claimed)
    }

    /// Run rounds until saturation, stall or cancellation.
    pub fn run<O: GrowthObserver + ?Sized>(&mut self, observer: &mut O) -> GrowthSummary {
        log::info!("Starting plate growth: {} free cells", self.free_cells);

        while self.state == GrowthState::Growing {
            let progress = self.step_round();
            if observer.on_round(&progress).is_break() && self.state == GrowthState::Growing {
                log::info!("Plate growth cancelled after round {}", self.rounds);
                self.state = GrowthState::Done(Termination::Cancelled);
            }
        }

        log::info!("Plate growth complete after {} rounds", self.rounds);
        self.summary()
    }

    pub fn summary(&self) -> GrowthSummary {
        let termination = match self.state {
            GrowthState::Done(t) => t,
            GrowthState::Growing => Termination::Cancelled,
        };
        GrowthSummary {
            rounds: self.rounds,
            termination,
            free_cells: self.free_cells,
            total_cells: self.surface.valid_cell_count(),
        }
    }
}

/// Claim the plate's seed cell if it is still free.
fn claim_seed(surface: &mut SurfaceGrid<PlateId>, plate: &mut Plate) {
    let (ring, col) = plate.seed;
    if surface.is_free(ring, col) {
        surface.set(ring, col, plate.id);
        plate.owned_cells.push(plate.seed);
        plate.frontier.push(plate.seed);
        plate.seeded = true;
    } else {
        log::debug!(
            "Plate {} seed {:?} already belongs to {}, plate starts empty",
            plate.id,
            plate.seed,
            surface.get(ring, col)
        );
    }
}

/// Expand one plate by `growth_rate` breadth-first sub-steps. Returns cells claimed.
fn grow_plate(surface: &mut SurfaceGrid<PlateId>, plate: &mut Plate) -> usize {
    let mut claimed = 0;

    for _ in 0..plate.growth_rate {
        if plate.frontier.is_empty() {
            break;
        }

        let mut next_frontier: Vec<Coord> = Vec::new();
        for &(ring, col) in &plate.frontier {
            let mut blocked = 0;
            for direction in Direction::ALL {
                match surface.neighbor(ring, col, direction) {
                    Some((nr, nc)) if surface.is_free(nr, nc) => {
                        surface.set(nr, nc, plate.id);
                        next_frontier.push((nr, nc));
                    }
                    _ => blocked += 1,
                }
            }
            if blocked > 0 {
                plate.exhausted_frontier.push((ring, col));
            }
        }

        claimed += next_frontier.len();
        plate.owned_cells.extend_from_slice(&next_frontier);
        plate.frontier = next_frontier;
    }

    claimed
}

/// Check the ownership invariants: plates own disjoint cells, and exactly the
/// nonzero cells of the map, each tagged with the owner's id.
pub fn ownership_is_consistent(surface: &SurfaceGrid<PlateId>, plates: &[Plate]) -> bool {
    let mut seen: HashSet<Coord> = HashSet::new();
    for plate in plates {
        for &(ring, col) in &plate.owned_cells {
            if !seen.insert((ring, col)) || *surface.get(ring, col) != plate.id {
                return false;
            }
        }
    }
    seen.len() == surface.nonzero_count()
}

//! World data container module
//!
//! Runs the full pipeline (plate growth, then heights) and bundles the outputs.

use crate::config::GeneratorConfig;
use crate::error::ConfigError;
use crate::heightmap::{self, HeightMap};
use crate::plates::{
    GrowthObserver, GrowthSummary, Plate, PlateGrowthEngine, PlateId, PlateType,
};
use crate::seeds::GenerationSeeds;
use crate::surface::SurfaceGrid;

/// All generated world data bundled together
#[derive(Clone, Debug)]
pub struct WorldData {
    /// Seeds used for generation (allows recreation)
    pub seeds: GenerationSeeds,
    pub config: GeneratorConfig,
    /// Plate assignment per cell
    pub plate_map: SurfaceGrid<PlateId>,
    pub plates: Vec<Plate>,
    /// Smoothed elevation per cell
    pub heightmap: HeightMap,
    /// How plate growth ended
    pub growth: GrowthSummary,
}

impl WorldData {
    /// Convenience accessor for master seed
    pub fn seed(&self) -> u64 {
        self.seeds.master
    }

    pub fn count_plates(&self, plate_type: PlateType) -> usize {
        self.plates.iter().filter(|p| p.plate_type == plate_type).count()
    }

    /// Fraction of valid cells owned by continental plates.
    pub fn land_fraction(&self) -> f64 {
        let land: usize = self
            .plates
            .iter()
            .filter(|p| p.is_continental())
            .map(|p| p.area())
            .sum();
        land as f64 / self.plate_map.valid_cell_count() as f64
    }
}

/// Generate plates and heights. Only the geometry stream is consumed here.
pub fn generate_world<O: GrowthObserver + ?Sized>(
    config: &GeneratorConfig,
    seeds: GenerationSeeds,
    observer: &mut O,
) -> Result<WorldData, ConfigError> {
    let mut rng = seeds.geometry_rng();
    let mut engine = PlateGrowthEngine::new(&config.plate_config(), &mut rng)?;
    let growth = engine.run(observer);
    let (plate_map, plates) = engine.into_parts();

    let heightmap = heightmap::generate_heightmap(&plate_map, &plates, &config.height_params());

    Ok(WorldData {
        seeds,
        config: config.clone(),
        plate_map,
        plates,
        heightmap,
        growth,
    })
}

//! Debug tool for inspecting plate growth round by round
//! Steps the engine manually, prints per-plate statistics and dumps snapshots

use std::path::Path;

use sphere_plates::export;
use sphere_plates::plates::{GrowthState, PlateConfig, PlateGrowthEngine, SeedCollision};
use sphere_plates::surface::Projection;
use sphere_plates::GenerationSeeds;

const EQUATOR_LENGTH: usize = 128;
const SEED: u64 = 42;
const SNAPSHOT_EVERY: usize = 10;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = Path::new("debug_growth");
    std::fs::create_dir_all(out_dir)?;

    let seeds = GenerationSeeds::from_master(SEED);
    let config = PlateConfig {
        equator_length: EQUATOR_LENGTH,
        continental_plates: 3,
        oceanic_plates: 5,
        growth_rate_range: 4,
        seed_collision: SeedCollision::Keep,
    };

    let mut engine = PlateGrowthEngine::new(&config, &mut seeds.geometry_rng())?;
    let palette = export::plate_palette(engine.plates(), &mut seeds.presentation_rng());

    println!("Seeds:");
    for plate in engine.plates() {
        println!(
            "  {} {:<11} seed {:?} rate {} {}",
            plate.id,
            plate.plate_type.to_string(),
            plate.seed,
            plate.growth_rate,
            if plate.seeded { "" } else { "(collided)" }
        );
    }

    while engine.state() == GrowthState::Growing {
        let progress = engine.step_round();
        println!(
            "Round {:>4}: claimed {:>6}, free {:>6} ({}%)",
            progress.round,
            progress.claimed,
            progress.free_cells,
            progress.percent_filled()
        );

        if progress.round % SNAPSHOT_EVERY == 0 {
            let path = out_dir.join(format!("round_{:04}.png", progress.round));
            export::export_plate_map(engine.surface(), &palette, Projection::Raw, &path)?;
        }
    }

    println!("Finished: {:?}", engine.summary());
    println!("Plate areas:");
    for plate in engine.plates() {
        println!(
            "  {} area {:>6}, frontier {:>4}, exhausted frontier {:>6}{}",
            plate.id,
            plate.area(),
            plate.frontier.len(),
            plate.exhausted_frontier.len(),
            if plate.is_growing() { " (still growing)" } else { "" }
        );
    }

    export::export_plate_map(engine.surface(), &palette, Projection::Raw, &out_dir.join("final_raw.png"))?;
    export::export_plate_map(
        engine.surface(),
        &palette,
        Projection::Stretched,
        &out_dir.join("final.png"),
    )?;
    println!("Snapshots written to {}", out_dir.display());

    Ok(())
}

use std::ops::ControlFlow;

use sphere_plates::heightmap::{generate_heightmap, HeightParams};
use sphere_plates::plates::{
    ownership_is_consistent, GrowthProgress, Plate, PlateGrowthEngine, PlateId, PlateType,
    SeedCollision, Termination,
};
use sphere_plates::world::generate_world;
use sphere_plates::{GenerationSeeds, GeneratorConfig, Projection};

fn quiet(_: &GrowthProgress) -> ControlFlow<()> {
    ControlFlow::Continue(())
}

fn small_config() -> GeneratorConfig {
    GeneratorConfig {
        equator_length: 96,
        continental_plates: 3,
        oceanic_plates: 4,
        ..GeneratorConfig::default()
    }
}

#[test]
fn test_same_seed_gives_identical_world() {
    let config = small_config();
    let a = generate_world(&config, GenerationSeeds::from_master(2024), &mut quiet).unwrap();
    let b = generate_world(&config, GenerationSeeds::from_master(2024), &mut quiet).unwrap();

    assert_eq!(a.seed(), 2024);
    assert_eq!(a.plate_map, b.plate_map);
    assert_eq!(a.heightmap, b.heightmap);
    assert_eq!(a.growth, b.growth);
    for (pa, pb) in a.plates.iter().zip(&b.plates) {
        assert_eq!(pa.seed, pb.seed);
        assert_eq!(pa.growth_rate, pb.growth_rate);
    }
}

#[test]
fn test_color_seed_does_not_change_geometry() {
    let config = small_config();
    let base = GenerationSeeds::from_master(7);
    let recolored = GenerationSeeds::builder(7).presentation(123).build();

    let a = generate_world(&config, base, &mut quiet).unwrap();
    let b = generate_world(&config, recolored, &mut quiet).unwrap();
    assert_eq!(a.plate_map, b.plate_map);
}

#[test]
fn test_full_pipeline_invariants() {
    let config = GeneratorConfig {
        smooth_window: 5,
        ..small_config()
    };
    let world = generate_world(&config, GenerationSeeds::from_master(11), &mut quiet).unwrap();

    assert_eq!(world.growth.termination, Termination::Saturated);
    assert_eq!(world.plate_map.free_count(), 0);
    assert!(ownership_is_consistent(&world.plate_map, &world.plates));

    let (lo, hi) = world.heightmap.min_max();
    assert!(lo >= config.base_ocean && hi <= config.base_continent);

    let stretched = world.heightmap.to_image_data(Projection::Stretched);
    assert_eq!(stretched.width, 96);
    assert_eq!(stretched.height, 48);
}

#[test]
fn test_single_continent_on_tiny_surface() {
    // equator 8 -> rings [1, 7, 7, 1]
    let plate = Plate::new(PlateId(1), PlateType::Continental, (1, 3), 1);
    let mut engine = PlateGrowthEngine::from_plates(8, vec![plate]).unwrap();
    assert_eq!(engine.surface().ring_count(), 4);
    assert!(engine.plates()[0].is_growing());

    let first = engine.step_round();
    assert_eq!(first.round, 1);
    // The polar cell above the seed is claimed right away
    assert_eq!(*engine.surface().get(0, 3), PlateId(1));

    let summary = engine.run(&mut quiet);
    assert_eq!(summary.termination, Termination::Saturated);
    assert_eq!(engine.surface().free_count(), 0);
    assert!(engine
        .surface()
        .valid_cells()
        .all(|(_, _, &id)| id == PlateId(1)));

    let (plate_map, plates) = engine.into_parts();
    let params = HeightParams {
        base_ocean: 20,
        base_continent: 60,
        smooth_window: 1,
    };
    let heightmap = generate_heightmap(&plate_map, &plates, &params);
    assert_eq!(heightmap.min_max(), (60, 60));
}

#[test]
fn test_keep_policy_can_leave_empty_plates() {
    // Many plates on a tiny surface make collisions certain
    let config = GeneratorConfig {
        equator_length: 6,
        continental_plates: 10,
        oceanic_plates: 10,
        seed_collision: SeedCollision::Keep,
        ..GeneratorConfig::default()
    };
    let world = generate_world(&config, GenerationSeeds::from_master(1), &mut quiet).unwrap();

    assert!(world.plates.iter().any(|p| !p.seeded && p.area() == 0));
    assert!(ownership_is_consistent(&world.plate_map, &world.plates));
    assert_eq!(world.plate_map.free_count(), 0);
}

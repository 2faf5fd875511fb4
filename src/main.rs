use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use sphere_plates::plates::{LogProgress, PlateType, SeedCollision};
use sphere_plates::{export, viewer, world, GenerationSeeds, GeneratorConfig, Projection};

#[derive(Parser, Debug)]
#[command(name = "sphere_plates")]
#[command(about = "Grow tectonic plates on a sphere surface and derive a heightmap")]
struct Args {
    /// Load parameters from a JSON config file (flags below override it)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective parameters to a JSON config file
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Number of columns at the equator (rings = half of this)
    #[arg(short = 'e', long)]
    equator_length: Option<usize>,

    /// Number of continental plates
    #[arg(short = 'c', long)]
    continental: Option<usize>,

    /// Number of oceanic plates
    #[arg(short = 'o', long)]
    oceanic: Option<usize>,

    /// Growth rates are drawn from [1, RANGE)
    #[arg(long)]
    growth_rate_range: Option<u32>,

    /// Base height of oceanic plates
    #[arg(long)]
    base_ocean: Option<u8>,

    /// Base height of continental plates
    #[arg(long)]
    base_continent: Option<u8>,

    /// Box filter size for smoothing (1 disables smoothing)
    #[arg(long)]
    smooth_window: Option<usize>,

    /// Let a plate whose seed lands on a taken cell start empty instead of rerolling
    #[arg(long)]
    keep_colliding_seeds: bool,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Seed for plate colors only
    #[arg(long)]
    color_seed: Option<u64>,

    /// Directory for exported PNGs
    #[arg(long, default_value = "output")]
    out_dir: PathBuf,

    /// Start the viewer in the raw (unstretched) projection
    #[arg(long)]
    raw: bool,

    /// Open the interactive viewer instead of exporting
    #[arg(long)]
    view: bool,
}

impl Args {
    fn projection(&self) -> Projection {
        if self.raw {
            Projection::Raw
        } else {
            Projection::Stretched
        }
    }

    fn apply_to(&self, config: &mut GeneratorConfig) {
        if let Some(v) = self.equator_length {
            config.equator_length = v;
        }
        if let Some(v) = self.continental {
            config.continental_plates = v;
        }
        if let Some(v) = self.oceanic {
            config.oceanic_plates = v;
        }
        if let Some(v) = self.growth_rate_range {
            config.growth_rate_range = v;
        }
        if let Some(v) = self.base_ocean {
            config.base_ocean = v;
        }
        if let Some(v) = self.base_continent {
            config.base_continent = v;
        }
        if let Some(v) = self.smooth_window {
            config.smooth_window = v;
        }
        if self.keep_colliding_seeds {
            config.seed_collision = SeedCollision::Keep;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GeneratorConfig::from_json_file(path)?,
        None => GeneratorConfig::default(),
    };
    args.apply_to(&mut config);
    config.validate()?;

    if let Some(path) = &args.save_config {
        config.to_json_file(path)?;
        println!("Saved config to {}", path.display());
    }

    let master = args.seed.unwrap_or_else(rand::random);
    let mut builder = GenerationSeeds::builder(master);
    if let Some(color_seed) = args.color_seed {
        builder = builder.presentation(color_seed);
    }
    let seeds = builder.build();

    if args.view {
        return viewer::run_viewer(config, seeds, args.projection());
    }

    println!("Generating planet with seed: {}", seeds.master);
    println!(
        "Equator length: {} ({} plates: {} continental, {} oceanic)",
        config.equator_length,
        config.continental_plates + config.oceanic_plates,
        config.continental_plates,
        config.oceanic_plates
    );

    let world = world::generate_world(&config, seeds, &mut LogProgress)?;
    println!(
        "Plate growth finished after {} rounds ({:?}), {} cells left free",
        world.growth.rounds, world.growth.termination, world.growth.free_cells
    );
    println!(
        "Created {} continental and {} oceanic plates, {:.1}% land",
        world.count_plates(PlateType::Continental),
        world.count_plates(PlateType::Oceanic),
        100.0 * world.land_fraction()
    );
    let (lo, hi) = world.heightmap.min_max();
    println!("Heightmap range: {} to {}", lo, hi);

    let palette = export::plate_palette(&world.plates, &mut seeds.presentation_rng());
    let written = export::export_all(&args.out_dir, &world.plate_map, &palette, &world.heightmap)?;
    for path in &written {
        println!("Wrote {}", path.display());
    }
    println!("Exported {} images for seed {}", written.len(), world.seed());

    Ok(())
}

//! Tectonic plate map and heightmap generation on a ring-based sphere surface.
//!
//! Re-exports modules for use by binaries and tools.

pub mod config;
pub mod error;
pub mod export;
pub mod heightmap;
pub mod plates;
pub mod seeds;
pub mod surface;
pub mod tilemap;
pub mod viewer;
pub mod world;

pub use config::GeneratorConfig;
pub use error::{ConfigError, GenerateError};
pub use heightmap::{HeightMap, HeightParams};
pub use plates::{Plate, PlateGrowthEngine, PlateId, PlateType};
pub use seeds::GenerationSeeds;
pub use surface::{Direction, Projection, SurfaceGrid};

pub mod growth;
pub mod types;

pub use growth::{
    ownership_is_consistent, GrowthObserver, GrowthProgress, GrowthState, GrowthSummary,
    LogProgress, PlateGrowthEngine, Termination,
};
pub use types::{random_seed_cell, Plate, PlateConfig, PlateId, PlateType, SeedCollision, MAX_PLATES};

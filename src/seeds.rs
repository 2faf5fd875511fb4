//! Seed management for generation
//!
//! Geometry (seed placement, growth rates) and presentation (plate colors) draw from
//! separate random streams, so changing a palette never changes the map.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeds for each random stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Plate seed cells and growth rates
    pub geometry: u64,
    /// Plate colors
    pub presentation: u64,
}

impl GenerationSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            geometry: derive_seed(master, "geometry"),
            presentation: derive_seed(master, "presentation"),
        }
    }

    /// Create a builder for customizing individual seeds
    pub fn builder(master: u64) -> GenerationSeedsBuilder {
        GenerationSeedsBuilder {
            seeds: Self::from_master(master),
        }
    }

    pub fn geometry_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.geometry)
    }

    pub fn presentation_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.presentation)
    }
}

impl Default for GenerationSeeds {
    fn default() -> Self {
        Self::from_master(rand::random())
    }
}

/// Builder for overriding individual seeds while deriving others from master
pub struct GenerationSeedsBuilder {
    seeds: GenerationSeeds,
}

impl GenerationSeedsBuilder {
    /// Override the geometry seed
    pub fn geometry(mut self, seed: u64) -> Self {
        self.seeds.geometry = seed;
        self
    }

    /// Override the presentation seed
    pub fn presentation(mut self, seed: u64) -> Self {
        self.seeds.presentation = seed;
        self
    }

    pub fn build(self) -> GenerationSeeds {
        self.seeds
    }
}

/// Derive a sub-seed from a master seed and a stream name.
fn derive_seed(master: u64, stream: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    stream.hash(&mut hasher);
    hasher.finish()
}

impl std::fmt::Display for GenerationSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "master: {}, geometry: {}, presentation: {}",
            self.master, self.geometry, self.presentation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_deterministic_derivation() {
        assert_eq!(
            GenerationSeeds::from_master(12345),
            GenerationSeeds::from_master(12345)
        );
    }

    #[test]
    fn test_streams_are_independent() {
        let seeds = GenerationSeeds::from_master(12345);
        assert_ne!(seeds.geometry, seeds.presentation);

        let a: u64 = seeds.geometry_rng().gen();
        let b: u64 = seeds.presentation_rng().gen();
        assert_ne!(a, b);
    }

    #[test]
    fn test_builder_override() {
        let seeds = GenerationSeeds::builder(12345).presentation(42).build();

        assert_eq!(seeds.presentation, 42);
        assert_eq!(seeds.geometry, GenerationSeeds::from_master(12345).geometry);
    }
}

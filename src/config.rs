//! Generation parameters, loadable from and savable to JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, GenerateError};
use crate::heightmap::HeightParams;
use crate::plates::{PlateConfig, SeedCollision};

/// Everything needed to generate a plate map and heightmap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Columns at the equator; rings = round(equator_length / 2)
    pub equator_length: usize,
    pub continental_plates: usize,
    pub oceanic_plates: usize,
    /// Growth rates are drawn from `[1, growth_rate_range)`
    pub growth_rate_range: u32,
    pub base_ocean: u8,
    pub base_continent: u8,
    pub smooth_window: usize,
    pub seed_collision: SeedCollision,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let heights = HeightParams::default();
        Self {
            equator_length: 512,
            continental_plates: 5,
            oceanic_plates: 7,
            growth_rate_range: 3,
            base_ocean: heights.base_ocean,
            base_continent: heights.base_continent,
            smooth_window: heights.smooth_window,
            seed_collision: SeedCollision::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn plate_config(&self) -> PlateConfig {
        PlateConfig {
            equator_length: self.equator_length,
            continental_plates: self.continental_plates,
            oceanic_plates: self.oceanic_plates,
            growth_rate_range: self.growth_rate_range,
            seed_collision: self.seed_collision,
        }
    }

    pub fn height_params(&self) -> HeightParams {
        HeightParams {
            base_ocean: self.base_ocean,
            base_continent: self.base_continent,
            smooth_window: self.smooth_window,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.plate_config().validate()
    }

    /// Load a config file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, GenerateError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_file(&self, path: &Path) -> Result<(), GenerateError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GeneratorConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.plate_config().total_plates(), 12);
        assert_eq!(config.height_params(), HeightParams::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "equator_length": 64, "seed_collision": "keep" }"#;
        let config: GeneratorConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.equator_length, 64);
        assert_eq!(config.seed_collision, SeedCollision::Keep);
        assert_eq!(config.oceanic_plates, 7);
        assert_eq!(config.base_continent, 60);
    }

    #[test]
    fn test_json_file_round_trip() {
        let path = std::env::temp_dir().join(format!("sphere_plates_cfg_{}.json", std::process::id()));
        let config = GeneratorConfig {
            equator_length: 100,
            smooth_window: 5,
            ..GeneratorConfig::default()
        };

        config.to_json_file(&path).unwrap();
        let loaded = GeneratorConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file_config_is_rejected() {
        let path = std::env::temp_dir().join(format!("sphere_plates_bad_{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "equator_length": 2 }"#).unwrap();
        let result = GeneratorConfig::from_json_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(
            result,
            Err(GenerateError::Config(ConfigError::InvalidEquatorLength(2)))
        ));
    }
}

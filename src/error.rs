//! Error types for grid construction, plate configuration and export.

/// Invalid generation parameters, reported before anything is allocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Equator length below the minimum of 4 columns
    InvalidEquatorLength(usize),
    /// Neither continental nor oceanic plates were requested
    NoPlates,
    /// Plate ids are stored as `u8`, with 0 reserved for unassigned cells
    TooManyPlates { requested: usize, max: usize },
    /// Growth rates are drawn from `[1, range)`, so the range must be at least 2
    InvalidGrowthRateRange(u32),
    /// Rerolling colliding seeds needs at least one free cell per plate
    PlatesExceedSurface { plates: usize, cells: usize },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidEquatorLength(len) => {
                write!(f, "Equator length must be at least 4, got {}", len)
            }
            ConfigError::NoPlates => write!(f, "At least one plate is required"),
            ConfigError::TooManyPlates { requested, max } => {
                write!(f, "Too many plates: {} requested, at most {} supported", requested, max)
            }
            ConfigError::InvalidGrowthRateRange(range) => {
                write!(f, "Growth rate range must be at least 2, got {}", range)
            }
            ConfigError::PlatesExceedSurface { plates, cells } => write!(
                f,
                "Cannot place {} distinct plate seeds on a surface of {} cells",
                plates, cells
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised by the outer surfaces: config files, image export.
#[derive(Debug)]
pub enum GenerateError {
    Config(ConfigError),
    Io(std::io::Error),
    Json(serde_json::Error),
    Image(image::ImageError),
}

impl std::fmt::Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateError::Config(e) => write!(f, "Configuration error: {}", e),
            GenerateError::Io(e) => write!(f, "I/O error: {}", e),
            GenerateError::Json(e) => write!(f, "Config parse error: {}", e),
            GenerateError::Image(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerateError::Config(e) => Some(e),
            GenerateError::Io(e) => Some(e),
            GenerateError::Json(e) => Some(e),
            GenerateError::Image(e) => Some(e),
        }
    }
}

impl From<ConfigError> for GenerateError {
    fn from(e: ConfigError) -> Self {
        GenerateError::Config(e)
    }
}

impl From<std::io::Error> for GenerateError {
    fn from(e: std::io::Error) -> Self {
        GenerateError::Io(e)
    }
}

impl From<serde_json::Error> for GenerateError {
    fn from(e: serde_json::Error) -> Self {
        GenerateError::Json(e)
    }
}

impl From<image::ImageError> for GenerateError {
    fn from(e: image::ImageError) -> Self {
        GenerateError::Image(e)
    }
}

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::diamond_square::DiamondSquare;
use crate::error::{Error, InvalidArgument};
use crate::grid::Grid;
use crate::rng::SeededSource;

pub const DEFAULT_SIZE: usize = 129; // 2^7 + 1
pub const DEFAULT_ROUGHNESS: f64 = 0.8;
pub const DEFAULT_SEED: u64 = 2025;
// 2^16 + 1 = 65537 cells per side
pub const MAX_EXPONENT: u32 = 16;

// Generation parameters as read from a JSON file.
// Missing fields fall back to the defaults above.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub size: usize,
    pub roughness: f64,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            roughness: DEFAULT_ROUGHNESS,
            seed: DEFAULT_SEED,
        }
    }
}

impl GeneratorConfig {
    // size = 2^exp + 1, exp in 1..=MAX_EXPONENT
    pub fn from_exponent(exp: u32) -> Result<Self, Error> {
        let size = Some(exp)
            .filter(|exp| (1..=MAX_EXPONENT).contains(exp))
            .and_then(|exp| 1usize.checked_shl(exp))
            .and_then(|side| side.checked_add(1))
            .ok_or(InvalidArgument::Exponent {
                exp,
                max: MAX_EXPONENT,
            })?;
        Ok(Self {
            size,
            ..Self::default()
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&contents)?;
        tracing::info!(
            path = %path.display(),
            size = config.size,
            roughness = config.roughness,
            seed = config.seed,
            "config.loaded"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.build().map(|_| ())
    }

    pub fn build(&self) -> Result<DiamondSquare, Error> {
        DiamondSquare::new(self.size, self.roughness)
    }

    pub fn source(&self) -> SeededSource {
        SeededSource::new(self.seed)
    }

    pub fn generate(&self) -> Result<Grid, Error> {
        Ok(self.build()?.generate(&mut self.source()))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse generator config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read generator config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid generator config: {0}")]
    Invalid(#[from] Error),
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, GeneratorConfig, MAX_EXPONENT};
    use crate::error::{Error, InvalidArgument};
    use std::path::Path;

    #[test]
    fn missing_fields_take_defaults() {
        let config = GeneratorConfig::from_json_str(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(
            config,
            GeneratorConfig {
                seed: 7,
                ..GeneratorConfig::default()
            }
        );
    }

    #[test]
    fn rejects_even_size() {
        let err = GeneratorConfig::from_json_str(r#"{ "size": 64 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(e) if e.is_invalid_argument()));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = GeneratorConfig::from_json_str("{ size: 65 ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = GeneratorConfig::from_path(Path::new("/nonexistent/heightmap.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/heightmap.json"));
    }

    #[test]
    fn shipped_config_is_the_default() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../configs/default.json");
        assert_eq!(
            GeneratorConfig::from_path(&path).unwrap(),
            GeneratorConfig::default()
        );
    }

    #[test]
    fn exponent_builds_dyadic_size() {
        let config = GeneratorConfig::from_exponent(6).unwrap();
        assert_eq!(config.size, 65);
        assert_eq!(config.build().unwrap().levels(), 6);
        assert_eq!(
            GeneratorConfig::from_exponent(MAX_EXPONENT).unwrap().size,
            65537
        );
    }

    #[test]
    fn out_of_range_exponent_is_an_error() {
        for exp in [0, MAX_EXPONENT + 1, 64, u32::MAX] {
            let err = GeneratorConfig::from_exponent(exp).unwrap_err();
            assert_eq!(
                err,
                Error::InvalidArgument(InvalidArgument::Exponent {
                    exp,
                    max: MAX_EXPONENT
                })
            );
        }
    }

    #[test]
    fn same_config_same_grid() {
        let config = GeneratorConfig {
            size: 33,
            roughness: 1.2,
            seed: 99,
        };
        assert_eq!(config.generate().unwrap(), config.generate().unwrap());
    }
}

//! Optional `mosaic.toml` configuration.
//!
//! Every field is defaulted, so an empty or missing file yields the same
//! configuration the engine ships with. CLI flags override file values.
//!
//! ```toml
//! [cost]
//! lambda_overlap = 1.0
//! lambda_density = 0.1
//!
//! [anneal]
//! t0 = 1000.0
//! alpha = 0.90
//! max_epochs = 100
//!
//! [detail]
//! window_size = 5
//! max_iterations = 10
//! ```

use mosaic_place::{AnnealConfig, CostModel, DetailConfig, PlaceConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "mosaic.toml";

/// Errors that can occur while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config file {path}: {source}")]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid TOML for this schema.
    #[error("invalid config file {path}: {source}")]
    Parse {
        /// The path that failed.
        path: PathBuf,
        /// The underlying TOML error.
        source: toml::de::Error,
    },
}

/// The top-level configuration parsed from `mosaic.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct MosaicConfig {
    /// Cost weight settings.
    #[serde(default)]
    pub cost: CostSection,
    /// Annealing settings.
    #[serde(default)]
    pub anneal: AnnealSection,
    /// Detail placement settings.
    #[serde(default)]
    pub detail: DetailSection,
}

/// The `[cost]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CostSection {
    /// Weight for the overlap area component.
    pub lambda_overlap: f64,
    /// Weight for the density variance component.
    pub lambda_density: f64,
}

impl Default for CostSection {
    fn default() -> Self {
        let weights = CostModel::default();
        Self {
            lambda_overlap: weights.lambda_overlap,
            lambda_density: weights.lambda_density,
        }
    }
}

/// The `[anneal]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AnnealSection {
    /// Initial temperature.
    pub t0: f64,
    /// Geometric cooling factor.
    pub alpha: f64,
    /// Maximum number of epochs.
    pub max_epochs: usize,
    /// Move proposals per epoch; omitted means `10 × cell count`.
    pub moves_per_epoch: Option<usize>,
    /// Averaging window for stall detection.
    pub stall_window: usize,
}

impl Default for AnnealSection {
    fn default() -> Self {
        let config = AnnealConfig::default();
        Self {
            t0: config.t0,
            alpha: config.alpha,
            max_epochs: config.max_epochs,
            moves_per_epoch: config.moves_per_epoch,
            stall_window: config.stall_window,
        }
    }
}

/// The `[detail]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DetailSection {
    /// Side length of the sweep windows.
    pub window_size: i32,
    /// Maximum number of sweeps.
    pub max_iterations: usize,
}

impl Default for DetailSection {
    fn default() -> Self {
        let config = DetailConfig::default();
        Self {
            window_size: config.window_size,
            max_iterations: config.max_iterations,
        }
    }
}

impl MosaicConfig {
    /// Loads configuration.
    ///
    /// With an explicit path, the file must exist and parse. Without one,
    /// `mosaic.toml` in the working directory is used when present;
    /// otherwise every setting takes its default.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Converts the file configuration into the engine's pipeline config.
    pub fn to_place_config(&self) -> PlaceConfig {
        PlaceConfig {
            weights: CostModel {
                lambda_overlap: self.cost.lambda_overlap,
                lambda_density: self.cost.lambda_density,
            },
            anneal: AnnealConfig {
                t0: self.anneal.t0,
                alpha: self.anneal.alpha,
                max_epochs: self.anneal.max_epochs,
                moves_per_epoch: self.anneal.moves_per_epoch,
                stall_window: self.anneal.stall_window,
                seed: None,
            },
            detail: DetailConfig {
                window_size: self.detail.window_size,
                max_iterations: self.detail.max_iterations,
                seed: None,
            },
        }
    }
}

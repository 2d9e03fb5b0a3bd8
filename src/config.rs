//! TOML configuration for the analysis pipeline.
//!
//! Every section and key is optional; absent values take the library
//! defaults. A minimal file:
//!
//! ```toml
//! [seed]
//! exponential_years = 30
//!
//! [solver]
//! max_iterations = 500
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisOptions, SeedOptions, SolverOptions};
use crate::error::CatchError;

/// Unit handling for raw catch volumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// Raw volumes are divided by this before fitting
    pub unit_scale: f64,
    pub unit_label: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        let options = AnalysisOptions::default();
        Self {
            unit_scale: options.unit_scale,
            unit_label: options.unit_label,
        }
    }
}

/// Terminal chart grid size in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    pub width: usize,
    pub height: usize,
}

impl ChartConfig {
    pub const MIN_WIDTH: usize = 20;
    pub const MIN_HEIGHT: usize = 8;
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 20,
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub data: DataConfig,
    pub seed: SeedOptions,
    pub solver: SolverOptions,
    pub chart: ChartConfig,
}

impl AppConfig {
    /// Read and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatchError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, CatchError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, CatchError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), CatchError> {
        if !(self.data.unit_scale.is_finite() && self.data.unit_scale > 0.0) {
            return Err(CatchError::ValidationError(format!(
                "data.unit_scale must be positive, got {}",
                self.data.unit_scale
            )));
        }
        if self.seed.exponential_years < 3 {
            return Err(CatchError::ValidationError(format!(
                "seed.exponential_years must be at least 3, got {}",
                self.seed.exponential_years
            )));
        }
        if let Some(capacity) = self.seed.capacity {
            if !(capacity.is_finite() && capacity > 0.0) {
                return Err(CatchError::ValidationError(format!(
                    "seed.capacity must be positive, got {capacity}"
                )));
            }
        }
        self.solver.validate()?;
        if self.chart.width < ChartConfig::MIN_WIDTH || self.chart.height < ChartConfig::MIN_HEIGHT
        {
            return Err(CatchError::ValidationError(format!(
                "chart must be at least {}x{}, got {}x{}",
                ChartConfig::MIN_WIDTH,
                ChartConfig::MIN_HEIGHT,
                self.chart.width,
                self.chart.height
            )));
        }
        Ok(())
    }

    /// Options for [`crate::Analyzer`].
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            unit_scale: self.data.unit_scale,
            unit_label: self.data.unit_label.clone(),
            seed: self.seed.clone(),
            solver: self.solver.clone(),
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::stage_machine::StageTimings;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Root configuration. Thresholds and durations are injected data, never
/// module globals, so analyses and presentations stay reproducible under
/// synthetic configs of any shape.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VitrineConfig {
    #[serde(default)]
    pub coverage: CoverageConfig,
    #[serde(default)]
    pub stages: StageConfig,
}

/// Coverage analyzer thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageConfig {
    /// A combination is flagged as over-concentrated when the top count
    /// exceeds this ratio times the median combination count.
    pub over_concentration_ratio: f32,
    /// Upper bound on emitted recommendations per report.
    pub recommendation_limit: usize,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        CoverageConfig {
            over_concentration_ratio: 3.0,
            recommendation_limit: 8,
        }
    }
}

/// Stage progression durations, milliseconds, plus the interaction budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    pub arriving_ms: u64,
    pub present_ms: u64,
    pub grace_ms: u64,
    pub resonant_ms: u64,
    pub max_steps: u32,
}

impl Default for StageConfig {
    fn default() -> Self {
        StageConfig {
            arriving_ms: 600,
            present_ms: 900,
            grace_ms: 450,
            resonant_ms: 1200,
            max_steps: 5,
        }
    }
}

impl StageConfig {
    pub fn to_timings(&self) -> StageTimings {
        StageTimings {
            arriving_us: self.arriving_ms * 1_000,
            present_us: self.present_ms * 1_000,
            grace_us: self.grace_ms * 1_000,
            resonant_us: self.resonant_ms * 1_000,
        }
    }
}

impl VitrineConfig {
    /// Load from a TOML file and validate. Missing sections fall back to
    /// defaults.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config: VitrineConfig = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.coverage.over_concentration_ratio <= 1.0 {
            return Err(ConfigError::Validation(format!(
                "over_concentration_ratio must exceed 1.0, got {}",
                self.coverage.over_concentration_ratio
            )));
        }
        if self.coverage.recommendation_limit == 0 {
            return Err(ConfigError::Validation(
                "recommendation_limit must be at least 1".into(),
            ));
        }
        if self.stages.arriving_ms == 0 || self.stages.present_ms == 0 || self.stages.resonant_ms == 0
        {
            return Err(ConfigError::Validation(
                "stage durations must be non-zero".into(),
            ));
        }
        if self.stages.max_steps == 0 {
            return Err(ConfigError::Validation(
                "max_steps must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

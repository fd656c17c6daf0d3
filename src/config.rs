// Engine configuration: inclusion thresholds and scoring weights
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{CodelensError, Result};

/// Tunable knobs for the confidence scorer and both call sites.
///
/// Defaults reproduce the stock heuristics; a config file only needs the
/// fields it wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum confidence for `PatternEngine::predict` results
    pub engine_threshold: f64,
    /// Minimum confidence for `PatternRecognizer::analyze` results
    pub recognizer_threshold: f64,
    /// Flat bonus per matched keyword
    pub keyword_weight: f64,
    /// Upper bound of the per-keyword density bonus
    pub density_cap: f64,
    /// Weight applied to each structural predicate value
    pub structural_weight: f64,
    /// Weight applied to each complexity indicator value
    pub indicator_weight: f64,
    /// Optional cap on the number of returned predictions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine_threshold: 0.2,
            recognizer_threshold: 0.3,
            keyword_weight: 0.15,
            density_cap: 0.10,
            structural_weight: 0.20,
            indicator_weight: 0.15,
            max_results: None,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| CodelensError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: EngineConfig =
            serde_json::from_str(&content).map_err(|source| CodelensError::Config {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("Loaded engine config from {}", path.display());
        Ok(config.sanitized())
    }

    /// Load from an explicit path, else the default location if it exists, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::config_file_path() {
            Some(default_path) if default_path.exists() => Self::load(&default_path),
            _ => Ok(Self::default()),
        }
    }

    /// Save configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| CodelensError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|source| CodelensError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| CodelensError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Default config file location (`<config dir>/codelens/config.json`)
    pub fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|dir| dir.join("codelens").join("config.json"))
    }

    /// Clamp every threshold and weight into [0, 1]; NaN falls back to the default
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let clamp = |value: f64, fallback: f64| {
            if value.is_nan() {
                fallback
            } else {
                value.clamp(0.0, 1.0)
            }
        };

        Self {
            engine_threshold: clamp(self.engine_threshold, defaults.engine_threshold),
            recognizer_threshold: clamp(self.recognizer_threshold, defaults.recognizer_threshold),
            keyword_weight: clamp(self.keyword_weight, defaults.keyword_weight),
            density_cap: clamp(self.density_cap, defaults.density_cap),
            structural_weight: clamp(self.structural_weight, defaults.structural_weight),
            indicator_weight: clamp(self.indicator_weight, defaults.indicator_weight),
            max_results: self.max_results,
        }
    }
}

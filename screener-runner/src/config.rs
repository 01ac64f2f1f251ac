//! Serializable screening configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use screener_core::{ThresholdProvider, ThresholdSet, DEFAULT_RF};

/// Errors from reading a screening config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Parameters for one screening run.
///
/// Every field has a default, so an empty TOML document is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScreenConfig {
    /// Risk-free rate. When unset, `sharpe.rf` from the thresholds is used,
    /// then 0.005.
    pub rf: Option<f64>,

    /// Maximum number of candidates returned.
    pub top_n: usize,

    /// Threshold file. When unset, the process-wide thresholds are used.
    pub thresholds_path: Option<PathBuf>,

    /// Score symbols on the rayon pool.
    pub parallel: bool,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            rf: None,
            top_n: 20,
            thresholds_path: None,
            parallel: true,
        }
    }
}

impl ScreenConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Deterministic BLAKE3 digest of this configuration.
    ///
    /// Two screens with identical configs carry the same hash, so outputs can
    /// be tagged and compared.
    pub fn config_hash(&self) -> Result<String, ConfigError> {
        let json = serde_json::to_string(self)?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }

    /// Thresholds before framework overrides.
    pub fn base_thresholds(&self) -> ThresholdSet {
        match &self.thresholds_path {
            Some(path) => ThresholdSet::load_or_empty(path),
            None => ThresholdSet::global().clone(),
        }
    }

    /// Risk-free rate for this run.
    pub fn effective_rf(&self, thresholds: &dyn ThresholdProvider) -> f64 {
        self.rf
            .unwrap_or_else(|| thresholds.lookup("sharpe", "rf", DEFAULT_RF))
    }
}

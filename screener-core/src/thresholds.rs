//! Threshold lookup: (section, key) → number, with a caller-supplied default.
//!
//! The detector and the Sharpe orchestrator never read configuration
//! directly; they receive a `&dyn ThresholdProvider`. A lookup miss returns
//! the default and never fails.
//!
//! `ThresholdSet::global()` is the process-wide set, loaded once from a TOML
//! file of `[section]` tables. Any load failure resolves to an empty set, so
//! every lookup falls back to its default.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;
use tracing::{debug, warn};

/// Environment variable naming the threshold file for the global set.
pub const THRESHOLDS_ENV: &str = "SCREENER_THRESHOLDS";

/// Threshold file used when `SCREENER_THRESHOLDS` is unset.
pub const DEFAULT_THRESHOLDS_PATH: &str = "config/thresholds.toml";

/// Read-only numeric configuration.
pub trait ThresholdProvider: Send + Sync {
    /// Value for `section.key`, or `default` when absent.
    fn lookup(&self, section: &str, key: &str, default: f64) -> f64;
}

impl<T: ThresholdProvider + ?Sized> ThresholdProvider for &T {
    fn lookup(&self, section: &str, key: &str, default: f64) -> f64 {
        (**self).lookup(section, key, default)
    }
}

/// Errors from loading a threshold file explicitly.
#[derive(Debug, Error)]
pub enum ThresholdError {
    #[error("failed to read threshold file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid threshold TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Immutable-after-load mapping from (section, key) to a number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThresholdSet {
    sections: BTreeMap<String, BTreeMap<String, f64>>,
}

static GLOBAL: OnceLock<ThresholdSet> = OnceLock::new();

impl ThresholdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document. Top-level tables become sections; integer and
    /// float entries become values. Anything else is ignored.
    pub fn from_toml_str(text: &str) -> Result<Self, ThresholdError> {
        let table: toml::Table = toml::from_str(text)?;
        let mut set = Self::new();
        for (section, value) in table {
            let toml::Value::Table(entries) = value else {
                continue;
            };
            for (key, entry) in entries {
                let number = match entry {
                    toml::Value::Float(f) => f,
                    toml::Value::Integer(i) => i as f64,
                    _ => continue,
                };
                set.set(&section, &key, number);
            }
        }
        Ok(set)
    }

    /// Read and parse a threshold file.
    pub fn load(path: &Path) -> Result<Self, ThresholdError> {
        let text = std::fs::read_to_string(path).map_err(|source| ThresholdError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Like [`ThresholdSet::load`], but a failure yields an empty set.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(set) => {
                debug!(path = %path.display(), sections = set.sections.len(), "Loaded thresholds");
                set
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Threshold config unavailable, using defaults");
                Self::new()
            }
        }
    }

    /// Path the global set is loaded from.
    pub fn default_path() -> PathBuf {
        std::env::var_os(THRESHOLDS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_THRESHOLDS_PATH))
    }

    /// Process-wide set, loaded on first use and served from memory after.
    pub fn global() -> &'static ThresholdSet {
        GLOBAL.get_or_init(|| Self::load_or_empty(&Self::default_path()))
    }

    pub fn set(&mut self, section: &str, key: &str, value: f64) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    /// Builder-style override.
    pub fn with_value(mut self, section: &str, key: &str, value: f64) -> Self {
        self.set(section, key, value);
        self
    }

    pub fn get(&self, section: &str, key: &str) -> Option<f64> {
        self.sections.get(section)?.get(key).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.values().all(|s| s.is_empty())
    }
}

impl ThresholdProvider for ThresholdSet {
    fn lookup(&self, section: &str, key: &str, default: f64) -> f64 {
        self.get(section, key).unwrap_or(default)
    }
}

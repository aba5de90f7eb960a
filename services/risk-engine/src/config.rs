//! Engine configuration
//!
//! Every field has a default, so a JSON file only needs to name the
//! values it overrides. Loaded configurations are validated before use.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use types::errors::ConfigError;

use crate::fuzzy::DEFAULT_RESOLUTION;
use crate::ml::svm::SvmParams;
use crate::ml::tree::TreeParams;

/// Risk engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sampling step of fuzzy output universes
    pub fuzzy_resolution: f64,
    /// Directory of pre-trained model artifacts for the ensemble
    pub model_dir: Option<PathBuf>,
    /// Vote weight of the fuzzy classifier in the ensemble
    pub ensemble_fuzzy_weight: f64,
    /// Worker threads for batch comparison
    pub batch_workers: usize,
    pub svm: SvmParams,
    pub tree: TreeParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fuzzy_resolution: DEFAULT_RESOLUTION,
            model_dir: None,
            ensemble_fuzzy_weight: 1.0,
            batch_workers: 4,
            svm: SvmParams::default(),
            tree: TreeParams::default(),
        }
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.into(),
    }
}

impl EngineConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fuzzy_resolution.is_finite()
            && self.fuzzy_resolution > 0.0
            && self.fuzzy_resolution <= 0.5)
        {
            return Err(invalid("fuzzy_resolution", "must be in (0, 0.5]"));
        }
        if !(self.ensemble_fuzzy_weight.is_finite() && self.ensemble_fuzzy_weight >= 0.0) {
            return Err(invalid("ensemble_fuzzy_weight", "must be a non-negative number"));
        }
        if self.batch_workers == 0 {
            return Err(invalid("batch_workers", "must be at least 1"));
        }
        if !(self.svm.c.is_finite() && self.svm.c > 0.0) {
            return Err(invalid("svm.c", "must be positive"));
        }
        if let Some(gamma) = self.svm.gamma {
            if !(gamma.is_finite() && gamma > 0.0) {
                return Err(invalid("svm.gamma", "must be positive"));
            }
        }
        if !(self.svm.tolerance.is_finite() && self.svm.tolerance > 0.0) {
            return Err(invalid("svm.tolerance", "must be positive"));
        }
        if self.svm.max_passes == 0 || self.svm.max_iterations == 0 {
            return Err(invalid("svm.max_passes", "passes and iterations must be at least 1"));
        }
        if self.tree.min_samples_split < 2 {
            return Err(invalid("tree.min_samples_split", "must be at least 2"));
        }
        Ok(())
    }
}

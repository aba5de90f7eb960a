//! Ensemble classification
//!
//! Blends the fuzzy classifier's vote with the predictions of pre-trained
//! models loaded from a directory of JSON artifacts. Each model is
//! independently fallible: a file that fails to load, or a model that
//! fails to predict, is logged and left out of the vote.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use types::attributes::AssetAttributes;
use types::classification::{ClassificationCategory, ClassificationResult};
use types::comparison::Consensus;
use types::errors::ClassificationError;

use crate::classifier::AssetClassifier;
use crate::consensus::{weighted_vote, Vote};
use crate::ml::artifact::ModelArtifact;
use crate::ml::TrainedModel;

/// Source name of the fuzzy vote
pub const FUZZY_SOURCE: &str = "fuzzy_logic";

/// Load every `*.json` artifact in `dir`, in file name order
///
/// An unreadable directory yields no models.
pub fn load_models(dir: &Path) -> Vec<Box<dyn TrainedModel>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Model directory unreadable, ensemble has no models");
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().map_or(false, |ext| ext == "json"))
        .collect();
    paths.sort();

    let mut models: Vec<Box<dyn TrainedModel>> = Vec::with_capacity(paths.len());
    for path in paths {
        match ModelArtifact::load(&path) {
            Ok(artifact) => {
                debug!(path = %path.display(), model = %artifact.name, "Loaded model artifact");
                models.push(Box::new(artifact));
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping model artifact");
            }
        }
    }
    info!(dir = %dir.display(), loaded = models.len(), "Model directory scanned");
    models
}

/// Outcome of an ensemble classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleResult {
    pub category: ClassificationCategory,
    pub consensus: Consensus,
    /// Fuzzy classification the ensemble started from
    pub fuzzy: ClassificationResult,
    pub votes: Vec<Vote>,
    /// Models that failed to predict
    pub skipped: Vec<String>,
}

/// Fuzzy classifier plus any number of trained models
#[derive(Debug)]
pub struct EnsembleClassifier {
    classifier: AssetClassifier,
    models: Vec<Box<dyn TrainedModel>>,
    fuzzy_weight: f64,
}

impl EnsembleClassifier {
    pub fn new(classifier: AssetClassifier, fuzzy_weight: f64) -> Self {
        Self {
            classifier,
            models: Vec::new(),
            fuzzy_weight,
        }
    }

    /// Ensemble over every artifact found in `dir`
    pub fn from_dir(classifier: AssetClassifier, fuzzy_weight: f64, dir: &Path) -> Self {
        Self {
            classifier,
            models: load_models(dir),
            fuzzy_weight,
        }
    }

    pub fn with_model(mut self, model: Box<dyn TrainedModel>) -> Self {
        self.models.push(model);
        self
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Confidence-weighted vote of the fuzzy classifier and every model
    ///
    /// The fuzzy vote carries the configured weight and comes first, so it
    /// wins ties.
    pub fn classify(&self, attrs: &AssetAttributes) -> Result<EnsembleResult, ClassificationError> {
        let fuzzy = self.classifier.classify(attrs)?;
        let features = attrs.to_features();

        let mut votes = vec![Vote::new(FUZZY_SOURCE, fuzzy.category, self.fuzzy_weight)];
        let mut skipped = Vec::new();
        for model in &self.models {
            match model.predict(&features) {
                Ok(prediction) => {
                    votes.push(Vote::new(model.name(), prediction.category, prediction.confidence));
                }
                Err(e) => {
                    warn!(model = model.name(), kind = %model.kind(), error = %e, "Model prediction failed, skipping");
                    skipped.push(model.name().to_string());
                }
            }
        }

        let consensus = weighted_vote(&votes).unwrap_or(Consensus {
            category: fuzzy.category,
            support: 0.0,
            total: 0.0,
            unanimous: true,
        });
        debug!(
            category = %consensus.category,
            votes = votes.len(),
            skipped = skipped.len(),
            "Ensemble classification"
        );

        Ok(EnsembleResult {
            category: consensus.category,
            consensus,
            fuzzy,
            votes,
            skipped,
        })
    }
}

//! Model comparison and consensus
//!
//! Classifies the same attribute vector with the fuzzy classifier, an RBF
//! SVM and a Gini decision tree, then takes the majority. The fuzzy
//! classification is recomputed from the raw inputs rather than reused
//! from an earlier pipeline stage so all three approaches see identical
//! data. Both models are trained once per engine on the reference corpus
//! with fixed seeds, so repeated comparisons give identical predictions.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{debug, error, info};
use types::attributes::AssetAttributes;
use types::classification::ClassificationCategory;
use types::comparison::{
    Approach, ApproachPrediction, BatchComparison, BatchEntry, BatchOutcome, ComparisonResult,
};
use types::errors::{ComparisonError, ModelError};
use types::ids::ComparisonId;

use crate::classifier::AssetClassifier;
use crate::config::EngineConfig;
use crate::consensus::majority_vote;
use crate::metrics::performance_report;
use crate::ml::artifact::ModelArtifact;
use crate::ml::{train_reference_svm, train_reference_tree, TrainedModel};

static SHARED: Lazy<Result<ComparisonEngine, ModelError>> =
    Lazy::new(|| ComparisonEngine::new(&EngineConfig::default()));

/// Half the width of a classification band
const BAND_HALF_WIDTH: f64 = 0.125;

/// How centrally a fuzzy score sits inside its category band
///
/// 1.0 at the band midpoint, falling to 0.5 at the band edges.
pub fn fuzzy_confidence(score: f64, category: ClassificationCategory) -> f64 {
    (1.0 - (score - category.midpoint()).abs() / (2.0 * BAND_HALF_WIDTH)).clamp(0.0, 1.0)
}

fn approach_failed(approach: Approach, err: ModelError) -> ComparisonError {
    ComparisonError::ApproachFailed {
        approach: approach.to_string(),
        reason: err.to_string(),
    }
}

/// Fuzzy vs SVM vs decision tree comparison engine
#[derive(Debug, Clone)]
pub struct ComparisonEngine {
    classifier: AssetClassifier,
    svm: ModelArtifact,
    tree: ModelArtifact,
    workers: usize,
}

impl ComparisonEngine {
    /// Train both models on the reference corpus
    pub fn new(config: &EngineConfig) -> Result<Self, ModelError> {
        let svm = train_reference_svm(&config.svm)?;
        let tree = train_reference_tree(&config.tree)?;
        info!(
            seed = config.svm.seed,
            max_depth = config.tree.max_depth,
            "Comparison models trained"
        );
        Ok(Self {
            classifier: AssetClassifier::new(config.fuzzy_resolution),
            svm,
            tree,
            workers: config.batch_workers.max(1),
        })
    }

    /// Process-wide engine built from the default configuration
    pub fn shared() -> Result<&'static ComparisonEngine, ModelError> {
        SHARED.as_ref().map_err(|e| e.clone())
    }

    pub fn svm(&self) -> &ModelArtifact {
        &self.svm
    }

    pub fn decision_tree(&self) -> &ModelArtifact {
        &self.tree
    }

    /// Compare the three approaches on one attribute vector
    ///
    /// Any approach failing fails the whole comparison. The result is
    /// stamped with `timestamp`.
    pub fn compare(
        &self,
        attrs: &AssetAttributes,
        timestamp: DateTime<Utc>,
    ) -> Result<ComparisonResult, ComparisonError> {
        attrs.validate()?;
        let features = attrs.to_features();

        let fuzzy_result = self.classifier.classify(attrs)?;
        let fuzzy = ApproachPrediction {
            approach: Approach::FuzzyLogic,
            category: fuzzy_result.category,
            score: fuzzy_result.score,
            confidence: fuzzy_confidence(fuzzy_result.score, fuzzy_result.category),
        };

        let svm = self.predict(Approach::Svm, &self.svm, &features)?;
        let decision_tree = self.predict(Approach::DecisionTree, &self.tree, &features)?;

        let consensus = majority_vote(&[fuzzy.category, svm.category, decision_tree.category])
            .ok_or_else(|| ComparisonError::ApproachFailed {
                approach: "consensus".to_string(),
                reason: "no votes".to_string(),
            })?;

        if !consensus.unanimous {
            info!(
                fuzzy = %fuzzy.category,
                svm = %svm.category,
                decision_tree = %decision_tree.category,
                consensus = %consensus.category,
                "Classifiers disagree"
            );
        }

        Ok(ComparisonResult {
            comparison_id: ComparisonId::new(),
            attributes: *attrs,
            fuzzy,
            svm,
            decision_tree,
            consensus,
            fuzzy_degraded: fuzzy_result.degraded,
            created_at: timestamp,
        })
    }

    fn predict(
        &self,
        approach: Approach,
        model: &ModelArtifact,
        features: &[f64],
    ) -> Result<ApproachPrediction, ComparisonError> {
        let prediction = model
            .predict(features)
            .map_err(|e| approach_failed(approach, e))?;
        Ok(ApproachPrediction {
            approach,
            category: prediction.category,
            score: prediction.category.midpoint(),
            confidence: prediction.confidence,
        })
    }

    /// Compare many attribute vectors in parallel
    ///
    /// Items fail independently; entries keep input order.
    pub fn batch_compare(&self, items: &[AssetAttributes], timestamp: DateTime<Utc>) -> BatchComparison {
        let entries = self.run_batch(items, timestamp);
        summarize(entries, None)
    }

    /// Batch comparison scored against ground truth labels
    pub fn batch_compare_labelled(
        &self,
        items: &[(AssetAttributes, ClassificationCategory)],
        timestamp: DateTime<Utc>,
    ) -> BatchComparison {
        let attrs: Vec<AssetAttributes> = items.iter().map(|(a, _)| *a).collect();
        let entries = self.run_batch(&attrs, timestamp);
        let truths: Vec<ClassificationCategory> = items.iter().map(|(_, t)| *t).collect();
        summarize(entries, Some(&truths))
    }

    fn run_batch(&self, items: &[AssetAttributes], timestamp: DateTime<Utc>) -> Vec<BatchEntry> {
        if items.is_empty() {
            return Vec::new();
        }
        let chunk_size = items.len().div_ceil(self.workers).max(1);
        let mut entries = Vec::with_capacity(items.len());

        thread::scope(|scope| {
            let handles: Vec<_> = items
                .chunks(chunk_size)
                .enumerate()
                .map(|(chunk_index, chunk)| {
                    let offset = chunk_index * chunk_size;
                    let handle = scope.spawn(move || {
                        chunk
                            .iter()
                            .enumerate()
                            .map(|(i, attrs)| self.entry(offset + i, attrs, timestamp))
                            .collect::<Vec<_>>()
                    });
                    (offset, chunk.len(), handle)
                })
                .collect();

            for (offset, len, handle) in handles {
                match handle.join() {
                    Ok(chunk_entries) => entries.extend(chunk_entries),
                    Err(_) => {
                        error!(offset, len, "Batch worker panicked");
                        entries.extend((offset..offset + len).map(|index| BatchEntry {
                            index,
                            outcome: BatchOutcome::Failed {
                                error: "worker panicked".to_string(),
                            },
                        }));
                    }
                }
            }
        });

        entries
    }

    fn entry(&self, index: usize, attrs: &AssetAttributes, timestamp: DateTime<Utc>) -> BatchEntry {
        let outcome = match self.compare(attrs, timestamp) {
            Ok(result) => BatchOutcome::Completed {
                result: Box::new(result),
            },
            Err(e) => {
                debug!(index, error = %e, "Batch item failed");
                BatchOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        BatchEntry { index, outcome }
    }

    /// Write the trained SVM and decision tree as loadable artifacts
    pub fn export_models(&self, dir: &Path) -> Result<Vec<PathBuf>, ModelError> {
        let mut written = Vec::with_capacity(2);
        for artifact in [&self.svm, &self.tree] {
            let path = dir.join(format!("{}.json", artifact.name));
            artifact.save(&path)?;
            written.push(path);
        }
        info!(dir = %dir.display(), count = written.len(), "Exported comparison models");
        Ok(written)
    }
}

fn summarize(entries: Vec<BatchEntry>, truths: Option<&[ClassificationCategory]>) -> BatchComparison {
    let completed = entries
        .iter()
        .filter(|e| matches!(e.outcome, BatchOutcome::Completed { .. }))
        .count();
    let failed = entries.len() - completed;
    let success_rate = if entries.is_empty() {
        0.0
    } else {
        completed as f64 / entries.len() as f64
    };

    let performance = truths.and_then(|truths| {
        let labelled: Vec<_> = entries
            .iter()
            .filter_map(|entry| match &entry.outcome {
                BatchOutcome::Completed { result } => {
                    truths.get(entry.index).map(|truth| (result.as_ref(), *truth))
                }
                BatchOutcome::Failed { .. } => None,
            })
            .collect();
        performance_report(&labelled)
    });

    info!(completed, failed, success_rate, "Batch comparison finished");

    BatchComparison {
        entries,
        completed,
        failed,
        success_rate,
        performance,
    }
}

/// Compare seven positional attributes with the shared engine, stamped now
#[allow(clippy::too_many_arguments)]
pub fn compare_models(
    business_criticality: f64,
    data_sensitivity: f64,
    operational_dependency: f64,
    regulatory_impact: f64,
    confidentiality: f64,
    integrity: f64,
    availability: f64,
) -> Result<ComparisonResult, ComparisonError> {
    let engine = ComparisonEngine::shared().map_err(|e| ComparisonError::ApproachFailed {
        approach: "model training".to_string(),
        reason: e.to_string(),
    })?;
    let attrs = AssetAttributes::new(
        business_criticality,
        data_sensitivity,
        operational_dependency,
        regulatory_impact,
        confidentiality,
        integrity,
        availability,
    );
    engine.compare(&attrs, Utc::now())
}

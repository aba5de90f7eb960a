//! Model comparison and consensus records

use crate::attributes::AssetAttributes;
use crate::classification::ClassificationCategory;
use crate::ids::ComparisonId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification approach taking part in a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Approach {
    FuzzyLogic,
    Svm,
    DecisionTree,
}

impl Approach {
    /// Approaches in consensus encounter order
    pub const ALL: [Approach; 3] = [Approach::FuzzyLogic, Approach::Svm, Approach::DecisionTree];

    pub fn as_str(&self) -> &'static str {
        match self {
            Approach::FuzzyLogic => "fuzzy_logic",
            Approach::Svm => "svm",
            Approach::DecisionTree => "decision_tree",
        }
    }
}

impl fmt::Display for Approach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One approach's verdict on an attribute vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApproachPrediction {
    pub approach: Approach,
    pub category: ClassificationCategory,
    /// Classification score; label-only models report the category midpoint
    pub score: f64,
    pub confidence: f64,
}

/// Outcome of a majority or weighted vote
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Consensus {
    pub category: ClassificationCategory,
    /// Number of votes (or total weight) behind the winning category
    pub support: f64,
    /// Number of votes (or total weight) cast
    pub total: f64,
    pub unanimous: bool,
}

impl Consensus {
    /// Share of the vote won by the consensus category
    pub fn agreement(&self) -> f64 {
        if self.total > 0.0 {
            self.support / self.total
        } else {
            0.0
        }
    }
}

/// Immutable record comparing fuzzy, SVM and decision tree classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub comparison_id: ComparisonId,
    pub attributes: AssetAttributes,
    pub fuzzy: ApproachPrediction,
    pub svm: ApproachPrediction,
    pub decision_tree: ApproachPrediction,
    pub consensus: Consensus,
    /// True when the fuzzy classification ran on its linear fallback
    pub fuzzy_degraded: bool,
    pub created_at: DateTime<Utc>,
}

impl ComparisonResult {
    /// Predictions in consensus encounter order
    pub fn predictions(&self) -> [ApproachPrediction; 3] {
        [self.fuzzy, self.svm, self.decision_tree]
    }

    pub fn prediction(&self, approach: Approach) -> &ApproachPrediction {
        match approach {
            Approach::FuzzyLogic => &self.fuzzy,
            Approach::Svm => &self.svm,
            Approach::DecisionTree => &self.decision_tree,
        }
    }

    /// Approaches whose prediction differs from the consensus
    pub fn dissenters(&self) -> Vec<Approach> {
        self.predictions()
            .iter()
            .filter(|p| p.category != self.consensus.category)
            .map(|p| p.approach)
            .collect()
    }
}

/// Outcome of one item in a batch comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    Completed { result: Box<ComparisonResult> },
    Failed { error: String },
}

/// Batch item tagged with its input position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub index: usize,
    pub outcome: BatchOutcome,
}

/// Classification quality of one approach against ground truth labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproachMetrics {
    pub approach: Approach,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    /// Rows are true categories, columns predicted, both in ordinal order
    pub confusion_matrix: [[usize; 4]; 4],
    pub samples: usize,
}

/// Per-approach metrics ranked by F1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub metrics: Vec<ApproachMetrics>,
    pub ranking: Vec<Approach>,
    pub best: Approach,
}

/// Result of comparing a batch of attribute vectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchComparison {
    pub entries: Vec<BatchEntry>,
    pub completed: usize,
    pub failed: usize,
    pub success_rate: f64,
    pub performance: Option<PerformanceReport>,
}

impl BatchComparison {
    pub fn results(&self) -> impl Iterator<Item = &ComparisonResult> {
        self.entries.iter().filter_map(|entry| match &entry.outcome {
            BatchOutcome::Completed { result } => Some(result.as_ref()),
            BatchOutcome::Failed { .. } => None,
        })
    }
}

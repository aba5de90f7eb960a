//! Machine-learned classifiers
//!
//! Support vector machine and decision tree models trained on the
//! reference corpus, plus the artifact format used to exchange them.

pub mod artifact;
pub mod corpus;
pub mod scaler;
pub mod svm;
pub mod tree;

use serde::{Deserialize, Serialize};
use std::fmt;
use types::classification::ClassificationCategory;
use types::errors::ModelError;

use artifact::{LabelEncoder, ModelArtifact, ModelParams};
use scaler::StandardScaler;
use svm::{Svm, SvmParams};
use tree::{DecisionTree, TreeParams};

/// Family of a trained model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Svm,
    DecisionTree,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Svm => write!(f, "svm"),
            ModelKind::DecisionTree => write!(f, "decision_tree"),
        }
    }
}

/// Category predicted by a model with its confidence in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub category: ClassificationCategory,
    pub confidence: f64,
}

/// A model able to classify a seven-attribute feature vector
pub trait TrainedModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn kind(&self) -> ModelKind;

    fn predict(&self, features: &[f64]) -> Result<Prediction, ModelError>;
}

/// Standardized RBF SVM trained on the reference corpus
pub fn train_reference_svm(params: &SvmParams) -> Result<ModelArtifact, ModelError> {
    let (samples, labels) = corpus::training_set();
    let scaler = StandardScaler::fit(&samples)?;
    let scaled = samples
        .iter()
        .map(|s| scaler.transform(s))
        .collect::<Result<Vec<_>, _>>()?;
    let svm = Svm::fit(&scaled, &labels, ClassificationCategory::ALL.len(), params)?;
    ModelArtifact::new(
        "reference_svm",
        ModelParams::Svm(svm),
        Some(scaler),
        LabelEncoder::ordinal(),
    )
}

/// Gini decision tree trained on the raw reference corpus
pub fn train_reference_tree(params: &TreeParams) -> Result<ModelArtifact, ModelError> {
    let (samples, labels) = corpus::training_set();
    let tree = DecisionTree::fit(&samples, &labels, ClassificationCategory::ALL.len(), params)?;
    ModelArtifact::new(
        "reference_decision_tree",
        ModelParams::DecisionTree(tree),
        None,
        LabelEncoder::ordinal(),
    )
}

//! Serialized model artifacts
//!
//! An artifact is a JSON document holding a model-type tag with the model
//! parameters, an optional standard scaler applied before prediction and a
//! label encoder mapping class indices back to categories.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use types::classification::ClassificationCategory;
use types::errors::ModelError;

use super::scaler::StandardScaler;
use super::svm::Svm;
use super::tree::DecisionTree;
use super::{ModelKind, Prediction, TrainedModel};

/// Model parameters tagged by model type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model_type", content = "params", rename_all = "snake_case")]
pub enum ModelParams {
    Svm(Svm),
    DecisionTree(DecisionTree),
}

impl ModelParams {
    pub fn kind(&self) -> ModelKind {
        match self {
            ModelParams::Svm(_) => ModelKind::Svm,
            ModelParams::DecisionTree(_) => ModelKind::DecisionTree,
        }
    }

    fn n_features(&self) -> usize {
        match self {
            ModelParams::Svm(m) => m.n_features(),
            ModelParams::DecisionTree(m) => m.n_features(),
        }
    }

    fn n_classes(&self) -> usize {
        match self {
            ModelParams::Svm(m) => m.n_classes(),
            ModelParams::DecisionTree(m) => m.n_classes(),
        }
    }

    fn predict(&self, x: &[f64]) -> Result<(usize, f64), ModelError> {
        match self {
            ModelParams::Svm(m) => m.predict(x),
            ModelParams::DecisionTree(m) => m.predict(x),
        }
    }
}

/// Maps class indices to categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelEncoder {
    classes: Vec<ClassificationCategory>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<ClassificationCategory>) -> Self {
        Self { classes }
    }

    /// Class index equals the category's ordinal index
    pub fn ordinal() -> Self {
        Self::new(ClassificationCategory::ALL.to_vec())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn decode(&self, index: usize) -> Result<ClassificationCategory, ModelError> {
        self.classes
            .get(index)
            .copied()
            .ok_or(ModelError::UnknownClass(index))
    }
}

/// Loadable, predictable model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    pub model: ModelParams,
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
    pub label_encoder: LabelEncoder,
}

impl ModelArtifact {
    pub fn new(
        name: impl Into<String>,
        model: ModelParams,
        scaler: Option<StandardScaler>,
        label_encoder: LabelEncoder,
    ) -> Result<Self, ModelError> {
        let artifact = Self {
            name: name.into(),
            model,
            scaler,
            label_encoder,
        };
        artifact.check_consistency()?;
        Ok(artifact)
    }

    /// Read and validate an artifact file
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let display = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|e| ModelError::Io {
            path: display.clone(),
            reason: e.to_string(),
        })?;
        let artifact: ModelArtifact = serde_json::from_str(&raw).map_err(|e| ModelError::Parse {
            path: display,
            reason: e.to_string(),
        })?;
        artifact.check_consistency()?;
        Ok(artifact)
    }

    /// Write the artifact as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let display = path.display().to_string();
        let json = serde_json::to_string_pretty(self).map_err(|e| ModelError::Parse {
            path: display.clone(),
            reason: e.to_string(),
        })?;
        fs::write(path, json).map_err(|e| ModelError::Io {
            path: display,
            reason: e.to_string(),
        })
    }

    fn check_consistency(&self) -> Result<(), ModelError> {
        if matches!(self.model, ModelParams::Svm(_)) && self.model.n_classes() < 2 {
            return Err(ModelError::Parse {
                path: self.name.clone(),
                reason: format!(
                    "svm needs at least two classes, found {}",
                    self.model.n_classes()
                ),
            });
        }
        if self.label_encoder.len() < self.model.n_classes() {
            return Err(ModelError::Parse {
                path: self.name.clone(),
                reason: format!(
                    "label encoder has {} classes, model expects {}",
                    self.label_encoder.len(),
                    self.model.n_classes()
                ),
            });
        }
        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != self.model.n_features() {
                return Err(ModelError::FeatureMismatch {
                    expected: self.model.n_features(),
                    actual: scaler.mean.len(),
                });
            }
        }
        Ok(())
    }
}

impl TrainedModel for ModelArtifact {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ModelKind {
        self.model.kind()
    }

    fn predict(&self, features: &[f64]) -> Result<Prediction, ModelError> {
        if features.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::Prediction("features must be finite".to_string()));
        }
        let prepared = match &self.scaler {
            Some(scaler) => scaler.transform(features)?,
            None => features.to_vec(),
        };
        let (class, confidence) = self.model.predict(&prepared)?;
        Ok(Prediction {
            category: self.label_encoder.decode(class)?,
            confidence,
        })
    }
}

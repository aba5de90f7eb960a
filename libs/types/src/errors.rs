//! Error types for the risk classification engine
//!
//! Comprehensive error taxonomy using thiserror

use crate::attributes::AttributeName;
use std::fmt;
use thiserror::Error;

/// Top-level engine error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Classification error: {0}")]
    Classification(#[from] ClassificationError),

    #[error("Comparison error: {0}")]
    Comparison(#[from] ComparisonError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Missing prerequisite: {0}")]
    MissingPrerequisite(String),

    #[error("Invalid asset context: {field} must be between 0 and 1, got {value}")]
    InvalidContext { field: String, value: f64 },
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be between 0 and 1, got {value}")]
    OutOfRange { field: AttributeName, value: f64 },

    #[error("{field} must be a finite number")]
    NotFinite { field: AttributeName },

    #[error("Expected {expected} features, got {actual}")]
    WrongLength { expected: usize, actual: usize },
}

/// Asset classification errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassificationError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),
}

/// Fuzzy inference errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("Rule references unknown variable: {name}")]
    UnknownVariable { name: String },

    #[error("Missing input for variable: {name}")]
    MissingInput { name: String },

    #[error("Input for {name} is not finite")]
    NonFiniteInput { name: String },

    #[error("Invalid universe for {name}: {reason}")]
    InvalidUniverse { name: String, reason: String },

    #[error("Rule set is empty")]
    EmptyRuleSet,

    #[error("No rule fired")]
    NoRuleFired,
}

/// Trained model errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("Expected {expected} features, got {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("Unknown class index: {0}")]
    UnknownClass(usize),

    #[error("Training failed: {0}")]
    Training(String),

    #[error("Prediction failed: {0}")]
    Prediction(String),
}

/// Model comparison errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComparisonError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("{approach} classification failed: {reason}")]
    ApproachFailed { approach: String, reason: String },
}

impl From<ClassificationError> for ComparisonError {
    fn from(err: ClassificationError) -> Self {
        match err {
            ClassificationError::InvalidInput(inner) => ComparisonError::InvalidInput(inner),
        }
    }
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

/// Pipeline stage that can degrade to a fixed fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Classification,
    RiskIdentification,
    RiskAnalysis,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Classification => "classification",
            Stage::RiskIdentification => "risk identification",
            Stage::RiskAnalysis => "risk analysis",
        };
        write!(f, "{}", name)
    }
}

/// Marker returned by `try_*` stage functions when the exact computation
/// could not run and the documented fallback would be used instead
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{stage} fell back: {reason}")]
pub struct FallbackUsed {
    pub stage: Stage,
    pub reason: String,
}

impl FallbackUsed {
    pub fn new(stage: Stage, reason: impl Into<String>) -> Self {
        Self {
            stage,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_field() {
        let err = ValidationError::OutOfRange {
            field: AttributeName::Confidentiality,
            value: 1.5,
        };
        assert_eq!(err.to_string(), "confidentiality must be between 0 and 1, got 1.5");
    }

    #[test]
    fn test_error_conversion_chain() {
        let validation = ValidationError::NotFinite {
            field: AttributeName::Availability,
        };
        let classification: ClassificationError = validation.clone().into();
        let engine: EngineError = classification.into();
        assert!(matches!(engine, EngineError::Classification(_)));

        let comparison: ComparisonError = ClassificationError::InvalidInput(validation.clone()).into();
        assert_eq!(comparison, ComparisonError::InvalidInput(validation));
    }

    #[test]
    fn test_fallback_display() {
        let fallback = FallbackUsed::new(Stage::RiskAnalysis, "non-finite risk index");
        assert_eq!(fallback.to_string(), "risk analysis fell back: non-finite risk index");
    }
}

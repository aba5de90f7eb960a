//! Asset classifier
//!
//! Maps the seven normalized attributes onto a classification score by
//! blending a 17-rule fuzzy system with a weighted linear combination of
//! the raw attributes, then bands the score into a category.

use once_cell::sync::Lazy;
use tracing::{debug, warn};
use types::attributes::{AssetAttributes, AttributeName};
use types::classification::{
    ClassificationCategory, ClassificationExplanation, ClassificationResult, ComponentScores,
    ContributingFactor, FactorInfluence,
};
use types::errors::{ClassificationError, FallbackUsed, InferenceError, Stage};

use crate::fuzzy::{FuzzyRule, FuzzySystem, FuzzyVariable, Inference, Term, DEFAULT_RESOLUTION};

const BC: &str = "business_criticality";
const DS: &str = "data_sensitivity";
const OD: &str = "operational_dependency";
const RI: &str = "regulatory_impact";
const C: &str = "confidentiality";
const I: &str = "integrity";
const A: &str = "availability";

/// Weight of the defuzzified output in the final score
pub const FUZZY_WEIGHT: f64 = 0.7;
/// Weight of the business factors component
pub const BUSINESS_WEIGHT: f64 = 0.6;
/// Weight of the mean CIA component
pub const CIA_WEIGHT: f64 = 0.25;
/// Weight of the data sensitivity component
pub const DATA_WEIGHT: f64 = 0.15;

/// Linear stand-in for the fuzzy output, in feature-vector order
const FALLBACK_WEIGHTS: [f64; 7] = [0.20, 0.20, 0.15, 0.15, 0.10, 0.10, 0.10];

/// Attribute values at or above this raise the classification
pub const HIGH_FACTOR_THRESHOLD: f64 = 0.7;
/// Attribute values at or below this lower the classification
pub const LOW_FACTOR_THRESHOLD: f64 = 0.3;

static SHARED: Lazy<AssetClassifier> = Lazy::new(|| AssetClassifier::new(DEFAULT_RESOLUTION));

fn rule_table() -> Vec<FuzzyRule> {
    use Term::{High, Low, Medium};
    vec![
        // Critical business with high CIA
        FuzzyRule::new(&[(BC, High), (DS, High), (C, High)], High),
        FuzzyRule::new(&[(BC, High), (I, High), (A, High)], High),
        FuzzyRule::new(&[(DS, High), (RI, High), (C, High)], High),
        FuzzyRule::new(&[(BC, High), (OD, High), (RI, High)], High),
        FuzzyRule::new(&[(DS, High), (C, High), (I, High), (A, High)], High),
        // Moderate combinations
        FuzzyRule::new(&[(BC, Medium), (DS, Medium)], Medium),
        FuzzyRule::new(&[(BC, Medium), (C, Medium), (I, Medium)], Medium),
        FuzzyRule::new(&[(OD, Medium), (RI, Medium)], Medium),
        FuzzyRule::new(&[(DS, Medium), (C, Medium), (A, Medium)], Medium),
        FuzzyRule::new(&[(BC, High), (DS, Medium)], Medium),
        FuzzyRule::new(&[(DS, High), (BC, Medium)], Medium),
        // Uniformly low profiles
        FuzzyRule::new(&[(BC, Low), (DS, Low), (OD, Low)], Low),
        FuzzyRule::new(&[(C, Low), (I, Low), (A, Low)], Low),
        FuzzyRule::new(&[(BC, Low), (RI, Low), (DS, Low)], Low),
        FuzzyRule::new(&[(OD, Low), (RI, Low), (A, Low)], Low),
        // Asymmetric profiles
        FuzzyRule::new(&[(BC, Low), (DS, High), (C, High)], Medium),
        FuzzyRule::new(&[(BC, High), (DS, Low), (A, High)], Medium),
    ]
}

fn build_system(resolution: f64) -> Result<FuzzySystem, InferenceError> {
    let inputs = AttributeName::ALL
        .iter()
        .map(|name| FuzzyVariable::standard(name.as_str()))
        .collect();
    FuzzySystem::new(
        inputs,
        FuzzyVariable::standard("classification"),
        &rule_table(),
        resolution,
    )
}

/// Weighted mean of the raw attributes used when no rule fires
pub fn fallback_fuzzy_output(attrs: &AssetAttributes) -> f64 {
    attrs
        .to_features()
        .iter()
        .zip(FALLBACK_WEIGHTS)
        .map(|(value, weight)| value * weight)
        .sum()
}

/// Fuzzy/linear asset classifier
///
/// Holds its fuzzy system for its whole lifetime. A system that fails to
/// build is kept as the error so every classification degrades to the
/// linear fallback instead of panicking.
#[derive(Debug, Clone)]
pub struct AssetClassifier {
    system: Result<FuzzySystem, InferenceError>,
}

impl AssetClassifier {
    pub fn new(resolution: f64) -> Self {
        Self {
            system: build_system(resolution),
        }
    }

    /// Process-wide classifier at the default resolution
    pub fn shared() -> &'static AssetClassifier {
        &SHARED
    }

    /// Defuzzified output, or the reason the fallback must be used
    pub fn try_fuzzy_output(&self, attrs: &AssetAttributes) -> Result<Inference, FallbackUsed> {
        let system = self
            .system
            .as_ref()
            .map_err(|e| FallbackUsed::new(Stage::Classification, e.to_string()))?;
        system
            .evaluate_ordered(&attrs.to_features())
            .map_err(|e| FallbackUsed::new(Stage::Classification, e.to_string()))
    }

    /// Classify an attribute vector
    ///
    /// Rejects any attribute that is non-finite or outside [0, 1].
    pub fn classify(&self, attrs: &AssetAttributes) -> Result<ClassificationResult, ClassificationError> {
        attrs.validate()?;

        let (fuzzy_output, degraded) = match self.try_fuzzy_output(attrs) {
            Ok(inference) => (inference.value, false),
            Err(fallback) => {
                let estimate = fallback_fuzzy_output(attrs);
                warn!(reason = %fallback.reason, estimate, "Fuzzy classification fell back to linear estimate");
                (estimate, true)
            }
        };

        let business_factors = BUSINESS_WEIGHT
            * (0.4 * attrs.business_criticality
                + 0.3 * attrs.operational_dependency
                + 0.3 * attrs.regulatory_impact);
        let cia_triad = CIA_WEIGHT * attrs.cia().mean();
        let data_sensitivity = DATA_WEIGHT * attrs.data_sensitivity;

        let score = (FUZZY_WEIGHT * fuzzy_output + business_factors + cia_triad + data_sensitivity)
            .clamp(0.0, 1.0);
        let category = ClassificationCategory::from_score(score);

        debug!(score, %category, fuzzy_output, degraded, "Asset classified");

        Ok(ClassificationResult {
            score,
            category,
            component_scores: ComponentScores {
                fuzzy_output,
                business_factors,
                cia_triad,
                data_sensitivity,
            },
            degraded,
        })
    }

    /// Classify and list the attributes that notably pushed the result
    pub fn explain(&self, attrs: &AssetAttributes) -> Result<ClassificationExplanation, ClassificationError> {
        let result = self.classify(attrs)?;

        let factors: Vec<ContributingFactor> = attrs
            .iter()
            .filter_map(|(attribute, value)| {
                if value >= HIGH_FACTOR_THRESHOLD {
                    Some(ContributingFactor {
                        attribute,
                        value,
                        influence: FactorInfluence::Raises,
                        description: format!(
                            "{} is high ({:.2}), pushing toward a stricter category",
                            attribute.label(),
                            value
                        ),
                    })
                } else if value <= LOW_FACTOR_THRESHOLD {
                    Some(ContributingFactor {
                        attribute,
                        value,
                        influence: FactorInfluence::Lowers,
                        description: format!(
                            "{} is low ({:.2}), pushing toward a lighter category",
                            attribute.label(),
                            value
                        ),
                    })
                } else {
                    None
                }
            })
            .collect();

        let raising = factors
            .iter()
            .filter(|f| f.influence == FactorInfluence::Raises)
            .count();
        let lowering = factors.len() - raising;
        let summary = format!(
            "Classified as {} with score {:.3}: {} raising and {} lowering factors{}",
            result.category,
            result.score,
            raising,
            lowering,
            if result.degraded { " (linear fallback)" } else { "" }
        );

        Ok(ClassificationExplanation {
            result,
            factors,
            summary,
        })
    }
}

/// Classify seven positional attributes with the shared classifier
#[allow(clippy::too_many_arguments)]
pub fn classify_asset(
    business_criticality: f64,
    data_sensitivity: f64,
    operational_dependency: f64,
    regulatory_impact: f64,
    confidentiality: f64,
    integrity: f64,
    availability: f64,
) -> Result<ClassificationResult, ClassificationError> {
    AssetClassifier::shared().classify(&AssetAttributes::new(
        business_criticality,
        data_sensitivity,
        operational_dependency,
        regulatory_impact,
        confidentiality,
        integrity,
        availability,
    ))
}

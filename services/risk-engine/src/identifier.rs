//! Risk identifier
//!
//! Derives the probability of harm from the CIA ratings and the
//! classification score through an 18-rule fuzzy system. Inputs are clamped
//! rather than rejected; when inference cannot produce a value the
//! equal-weight mean of the clamped inputs stands in.
//!
//! The low and high terms meet at the midpoint without overlapping, and the
//! low and high consequents need all four inputs on the same side of it.
//! Below the midpoint only the low and medium activations move, above it
//! only the medium and high ones, and a profile straddling it sits at 0.5.
//! Raising any single input therefore never lowers the index.

use once_cell::sync::Lazy;
use tracing::{debug, warn};
use types::attributes::{clamp_unit, CiaTriad};
use types::errors::{FallbackUsed, InferenceError, Stage};
use types::risk::RiskIndex;

use crate::fuzzy::{
    FuzzyRule, FuzzySystem, FuzzyVariable, MembershipFunction, Term, DEFAULT_RESOLUTION,
};

const C: &str = "confidentiality";
const I: &str = "integrity";
const A: &str = "availability";
const K: &str = "classification";

const INPUTS: [&str; 4] = [C, I, A, K];

static SHARED: Lazy<RiskIdentifier> = Lazy::new(|| RiskIdentifier::new(DEFAULT_RESOLUTION));

fn rule_table() -> Vec<FuzzyRule> {
    use Term::{High, Low, Medium};
    let mut rules = vec![
        FuzzyRule::new(&[(C, High), (I, High), (A, High), (K, High)], High),
        FuzzyRule::new(&[(C, Low), (I, Low), (A, Low), (K, Low)], Low),
    ];
    // Any input at the midpoint
    rules.extend(INPUTS.iter().map(|name| FuzzyRule::new(&[(*name, Medium)], Medium)));
    // Inputs on opposite sides of the midpoint
    for low in INPUTS {
        for high in INPUTS {
            if low != high {
                rules.push(FuzzyRule::new(&[(low, Low), (high, High)], Medium));
            }
        }
    }
    rules
}

/// Input axis split at 0.5, with a narrow medium term around the split
fn input_variable(name: &str) -> FuzzyVariable {
    FuzzyVariable::new(
        name,
        MembershipFunction::triangular(0.0, 0.0, 0.5),
        MembershipFunction::triangular(0.4, 0.5, 0.6),
        MembershipFunction::triangular(0.5, 1.0, 1.0),
    )
}

fn build_system(resolution: f64) -> Result<FuzzySystem, InferenceError> {
    FuzzySystem::new(
        vec![input_variable(C), input_variable(I), input_variable(A), input_variable(K)],
        FuzzyVariable::standard("risk_index"),
        &rule_table(),
        resolution,
    )
}

/// Equal-weight mean of the clamped inputs
pub fn fallback_risk_index(cia: &CiaTriad, classification_value: f64) -> f64 {
    let cia = cia.clamped();
    0.25 * cia.confidentiality
        + 0.25 * cia.integrity
        + 0.25 * cia.availability
        + 0.25 * clamp_unit(classification_value)
}

/// Fuzzy risk index estimator
#[derive(Debug, Clone)]
pub struct RiskIdentifier {
    system: Result<FuzzySystem, InferenceError>,
}

impl RiskIdentifier {
    pub fn new(resolution: f64) -> Self {
        Self {
            system: build_system(resolution),
        }
    }

    /// Process-wide identifier at the default resolution
    pub fn shared() -> &'static RiskIdentifier {
        &SHARED
    }

    /// Exact fuzzy risk index, or the reason the fallback applies
    pub fn try_compute(&self, cia: &CiaTriad, classification_value: f64) -> Result<f64, FallbackUsed> {
        let system = self
            .system
            .as_ref()
            .map_err(|e| FallbackUsed::new(Stage::RiskIdentification, e.to_string()))?;
        let cia = cia.clamped();
        let inputs = [
            cia.confidentiality,
            cia.integrity,
            cia.availability,
            clamp_unit(classification_value),
        ];
        let inference = system
            .evaluate_ordered(&inputs)
            .map_err(|e| FallbackUsed::new(Stage::RiskIdentification, e.to_string()))?;
        Ok(inference.value.clamp(0.0, 1.0))
    }

    /// Risk index in [0, 1]; never fails
    pub fn compute(&self, cia: &CiaTriad, classification_value: f64) -> RiskIndex {
        match self.try_compute(cia, classification_value) {
            Ok(value) => {
                debug!(risk_index = value, "Risk index computed");
                RiskIndex::exact(value)
            }
            Err(fallback) => {
                let value = fallback_risk_index(cia, classification_value);
                warn!(reason = %fallback.reason, risk_index = value, "Risk identification fell back to mean of inputs");
                RiskIndex::fallback(value)
            }
        }
    }
}

/// Compute the risk index with the shared identifier
pub fn compute_risk_index(
    confidentiality: f64,
    integrity: f64,
    availability: f64,
    classification_value: f64,
) -> RiskIndex {
    RiskIdentifier::shared().compute(
        &CiaTriad::new(confidentiality, integrity, availability),
        classification_value,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_profile_scores_well_below_threshold() {
        let index = compute_risk_index(0.3, 0.4, 0.3, 0.2);
        assert!(!index.degraded);
        assert!(index.value < 0.3, "got {}", index.value);
        assert!((index.value - 0.1330).abs() < 1e-3);
    }

    #[test]
    fn test_high_profile_scores_high() {
        let index = compute_risk_index(0.9, 0.9, 0.9, 0.9);
        assert!(!index.degraded);
        assert!(index.value > 0.7, "got {}", index.value);
    }

    #[test]
    fn test_balanced_medium_profile_is_centered() {
        let index = compute_risk_index(0.5, 0.5, 0.5, 0.5);
        assert!((index.value - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        let clamped = compute_risk_index(1.5, -0.2, 2.0, 7.0);
        let explicit = compute_risk_index(1.0, 0.0, 1.0, 1.0);
        assert_eq!(clamped, explicit);
    }

    #[test]
    fn test_nan_input_is_treated_as_zero() {
        let with_nan = compute_risk_index(f64::NAN, 0.4, 0.3, 0.2);
        let with_zero = compute_risk_index(0.0, 0.4, 0.3, 0.2);
        assert_eq!(with_nan, with_zero);
    }

    #[test]
    fn test_fallback_is_equal_weight_mean() {
        let broken = RiskIdentifier::new(0.0);
        let index = broken.compute(&CiaTriad::new(0.2, 0.4, 0.6), 0.8);
        assert!(index.degraded);
        assert!((index.value - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_fallback_clamps_inputs() {
        let value = fallback_risk_index(&CiaTriad::new(2.0, -1.0, 1.0), 1.0);
        assert!((value - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_rule_table_size() {
        let identifier = RiskIdentifier::new(DEFAULT_RESOLUTION);
        let system = identifier.system.as_ref().unwrap();
        assert_eq!(system.rule_count(), 18);
    }

    #[test]
    fn test_mixed_profile_sits_at_midpoint() {
        // two ratings high, availability low
        let index = compute_risk_index(1.0, 1.0, 0.2, 0.9);
        assert!(!index.degraded);
        assert!((index.value - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_every_grid_profile_fires_a_rule() {
        let identifier = RiskIdentifier::shared();
        let steps: Vec<f64> = (0..=20).map(|s| s as f64 * 0.05).collect();
        for &c in &steps {
            for &i in &steps {
                for &a in &steps {
                    for &k in &steps {
                        let cia = CiaTriad::new(c, i, a);
                        assert!(
                            identifier.try_compute(&cia, k).is_ok(),
                            "no rule fired at ({}, {}, {}, {})",
                            c,
                            i,
                            a,
                            k
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_raising_one_rating_across_the_midpoint() {
        // availability climbs through the low, mixed and high regions
        let identifier = RiskIdentifier::shared();
        let mut previous = 0.0;
        for step in 0..=100 {
            let availability = step as f64 * 0.01;
            let value = identifier
                .compute(&CiaTriad::new(0.55, 0.7, availability), 0.6)
                .value;
            assert!(value >= previous - 1e-9, "dropped at availability {}", availability);
            previous = value;
        }
    }
}

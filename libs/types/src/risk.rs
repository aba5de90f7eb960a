//! Risk index and mathematical risk analysis types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Probability of harm produced by the risk identifier, in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskIndex {
    pub value: f64,
    /// Set when the equal-weight average replaced fuzzy inference
    pub degraded: bool,
}

impl RiskIndex {
    pub fn exact(value: f64) -> Self {
        Self {
            value,
            degraded: false,
        }
    }

    pub fn fallback(value: f64) -> Self {
        Self {
            value,
            degraded: true,
        }
    }
}

/// Discrete risk category derived from the calculated risk level
///
/// The highest band is tracked internally as `Critical` and rendered with the
/// label "Very High Risk".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskCategory {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "High Risk")]
    High,
    #[serde(rename = "Very High Risk")]
    Critical,
}

impl RiskCategory {
    /// Band a calculated risk level at 0.25 / 0.50 / 0.75, upper bounds inclusive
    pub fn from_level(level: f64) -> Self {
        if level <= 0.25 {
            RiskCategory::Low
        } else if level <= 0.50 {
            RiskCategory::Medium
        } else if level <= 0.75 {
            RiskCategory::High
        } else {
            RiskCategory::Critical
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::Low => "Low Risk",
            RiskCategory::Medium => "Medium Risk",
            RiskCategory::High => "High Risk",
            RiskCategory::Critical => "Very High Risk",
        }
    }

    pub fn priority(&self) -> PriorityLevel {
        match self {
            RiskCategory::Low => PriorityLevel::Low,
            RiskCategory::Medium => PriorityLevel::Medium,
            RiskCategory::High => PriorityLevel::High,
            RiskCategory::Critical => PriorityLevel::Immediate,
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Treatment urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLevel {
    Low,
    Medium,
    High,
    Immediate,
}

/// Probability axis of the risk matrix, banded at 0.2 steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProbabilityRating {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl ProbabilityRating {
    pub fn from_value(value: f64) -> Self {
        if value <= 0.2 {
            ProbabilityRating::VeryLow
        } else if value <= 0.4 {
            ProbabilityRating::Low
        } else if value <= 0.6 {
            ProbabilityRating::Medium
        } else if value <= 0.8 {
            ProbabilityRating::High
        } else {
            ProbabilityRating::VeryHigh
        }
    }
}

/// Impact axis of the risk matrix, banded at 0.2 steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ImpactRating {
    Minimal,
    Minor,
    Moderate,
    Major,
    Severe,
}

impl ImpactRating {
    pub fn from_value(value: f64) -> Self {
        if value <= 0.2 {
            ImpactRating::Minimal
        } else if value <= 0.4 {
            ImpactRating::Minor
        } else if value <= 0.6 {
            ImpactRating::Moderate
        } else if value <= 0.8 {
            ImpactRating::Major
        } else {
            ImpactRating::Severe
        }
    }
}

/// Position of an analysed risk on the probability/impact matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskMatrixRating {
    pub probability: ProbabilityRating,
    pub impact: ImpactRating,
}

/// How quickly and at which level a risk must be treated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MitigationPriority {
    pub level: PriorityLevel,
    pub timeframe: String,
    pub resources: String,
    pub escalation: String,
}

/// Output of the exponential-impact risk model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAnalysisResult {
    pub risk_index: f64,
    pub likelihood: f64,
    pub impact: f64,
    pub environmental_factor: f64,
    pub calculated_risk_level: f64,
    pub harm_value: f64,
    pub risk_category: RiskCategory,
    pub priority: PriorityLevel,
    pub matrix: RiskMatrixRating,
    pub mitigation: MitigationPriority,
    pub recommendations: Vec<String>,
    /// Set when the neutral fallback replaced the formula
    pub degraded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_bands() {
        assert_eq!(RiskCategory::from_level(0.0), RiskCategory::Low);
        assert_eq!(RiskCategory::from_level(0.25), RiskCategory::Low);
        assert_eq!(RiskCategory::from_level(0.250001), RiskCategory::Medium);
        assert_eq!(RiskCategory::from_level(0.5), RiskCategory::Medium);
        assert_eq!(RiskCategory::from_level(0.75), RiskCategory::High);
        assert_eq!(RiskCategory::from_level(0.750001), RiskCategory::Critical);
    }

    #[test]
    fn test_critical_renders_as_very_high() {
        assert_eq!(RiskCategory::Critical.to_string(), "Very High Risk");
        let json = serde_json::to_string(&RiskCategory::Critical).unwrap();
        assert_eq!(json, "\"Very High Risk\"");
    }

    #[test]
    fn test_matrix_bands() {
        assert_eq!(ProbabilityRating::from_value(0.19), ProbabilityRating::VeryLow);
        assert_eq!(ProbabilityRating::from_value(0.21), ProbabilityRating::Low);
        assert_eq!(ProbabilityRating::from_value(0.81), ProbabilityRating::VeryHigh);
        assert_eq!(ImpactRating::from_value(0.0), ImpactRating::Minimal);
        assert_eq!(ImpactRating::from_value(0.59), ImpactRating::Moderate);
        assert_eq!(ImpactRating::from_value(1.0), ImpactRating::Severe);
    }

    #[test]
    fn test_matrix_band_edges_are_inclusive() {
        use ImpactRating::*;
        use ProbabilityRating::{High, Low, Medium, VeryHigh, VeryLow};
        let edges = [
            (0.2, VeryLow, Minimal),
            (0.4, Low, Minor),
            (0.6, Medium, Moderate),
            (0.8, High, Major),
        ];
        for (value, probability, impact) in edges {
            assert_eq!(ProbabilityRating::from_value(value), probability, "at {}", value);
            assert_eq!(ImpactRating::from_value(value), impact, "at {}", value);
        }
        assert_eq!(ProbabilityRating::from_value(0.800001), VeryHigh);
        assert_eq!(ImpactRating::from_value(0.800001), Severe);
    }
}

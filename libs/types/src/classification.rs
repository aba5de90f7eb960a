//! Government classification categories and classifier output

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal classification category
///
/// Partitions the score range at 0.25 / 0.50 / 0.75 with inclusive upper
/// bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClassificationCategory {
    Public,
    Official,
    Confidential,
    Restricted,
}

impl ClassificationCategory {
    /// Categories in ordinal order
    pub const ALL: [ClassificationCategory; 4] = [
        ClassificationCategory::Public,
        ClassificationCategory::Official,
        ClassificationCategory::Confidential,
        ClassificationCategory::Restricted,
    ];

    /// Map a score in [0, 1] onto its category
    pub fn from_score(score: f64) -> Self {
        if score <= 0.25 {
            ClassificationCategory::Public
        } else if score <= 0.50 {
            ClassificationCategory::Official
        } else if score <= 0.75 {
            ClassificationCategory::Confidential
        } else {
            ClassificationCategory::Restricted
        }
    }

    /// Representative score used when a model predicts only a label
    pub fn midpoint(&self) -> f64 {
        match self {
            ClassificationCategory::Public => 0.125,
            ClassificationCategory::Official => 0.375,
            ClassificationCategory::Confidential => 0.625,
            ClassificationCategory::Restricted => 0.875,
        }
    }

    /// Ordinal index, Public = 0
    pub fn index(&self) -> usize {
        match self {
            ClassificationCategory::Public => 0,
            ClassificationCategory::Official => 1,
            ClassificationCategory::Confidential => 2,
            ClassificationCategory::Restricted => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationCategory::Public => "Public",
            ClassificationCategory::Official => "Official",
            ClassificationCategory::Confidential => "Confidential",
            ClassificationCategory::Restricted => "Restricted",
        }
    }

    /// Parse a label as written by model artifacts, case-insensitive
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for ClassificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Weighted contributions that make up a classification score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    /// Raw defuzzified output before weighting
    pub fuzzy_output: f64,
    pub business_factors: f64,
    pub cia_triad: f64,
    pub data_sensitivity: f64,
}

/// Result of classifying one attribute vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub score: f64,
    pub category: ClassificationCategory,
    pub component_scores: ComponentScores,
    /// Set when no fuzzy rule fired and the linear estimate stood in
    pub degraded: bool,
}

/// Direction in which an attribute pushes the classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorInfluence {
    Raises,
    Lowers,
}

/// One attribute that notably drove a classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributingFactor {
    pub attribute: crate::attributes::AttributeName,
    pub value: f64,
    pub influence: FactorInfluence,
    pub description: String,
}

/// Human readable account of a classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationExplanation {
    pub result: ClassificationResult,
    pub factors: Vec<ContributingFactor>,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_upper_bounds_inclusive() {
        assert_eq!(ClassificationCategory::from_score(0.0), ClassificationCategory::Public);
        assert_eq!(ClassificationCategory::from_score(0.25), ClassificationCategory::Public);
        assert_eq!(ClassificationCategory::from_score(0.250001), ClassificationCategory::Official);
        assert_eq!(ClassificationCategory::from_score(0.5), ClassificationCategory::Official);
        assert_eq!(ClassificationCategory::from_score(0.500001), ClassificationCategory::Confidential);
        assert_eq!(ClassificationCategory::from_score(0.75), ClassificationCategory::Confidential);
        assert_eq!(ClassificationCategory::from_score(0.750001), ClassificationCategory::Restricted);
        assert_eq!(ClassificationCategory::from_score(1.0), ClassificationCategory::Restricted);
    }

    #[test]
    fn test_midpoints_fall_inside_their_band() {
        for category in ClassificationCategory::ALL {
            assert_eq!(ClassificationCategory::from_score(category.midpoint()), category);
        }
    }

    #[test]
    fn test_index_roundtrip() {
        for category in ClassificationCategory::ALL {
            assert_eq!(ClassificationCategory::from_index(category.index()), Some(category));
        }
        assert_eq!(ClassificationCategory::from_index(4), None);
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!(ClassificationCategory::parse("restricted"), Some(ClassificationCategory::Restricted));
        assert_eq!(ClassificationCategory::parse(" Official "), Some(ClassificationCategory::Official));
        assert_eq!(ClassificationCategory::parse("Secret"), None);
    }
}

//! Normalized asset attributes
//!
//! Every scoring stage consumes the same seven attributes, each a float in
//! [0, 1]. Construction does not validate; the classifier and comparison
//! engine reject out-of-range values while the risk identifier clamps them.

use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of attributes in a feature vector
pub const ATTRIBUTE_COUNT: usize = 7;

/// Name of one of the seven attributes, in feature-vector order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeName {
    BusinessCriticality,
    DataSensitivity,
    OperationalDependency,
    RegulatoryImpact,
    Confidentiality,
    Integrity,
    Availability,
}

impl AttributeName {
    /// All attributes in feature-vector order
    pub const ALL: [AttributeName; ATTRIBUTE_COUNT] = [
        AttributeName::BusinessCriticality,
        AttributeName::DataSensitivity,
        AttributeName::OperationalDependency,
        AttributeName::RegulatoryImpact,
        AttributeName::Confidentiality,
        AttributeName::Integrity,
        AttributeName::Availability,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeName::BusinessCriticality => "business_criticality",
            AttributeName::DataSensitivity => "data_sensitivity",
            AttributeName::OperationalDependency => "operational_dependency",
            AttributeName::RegulatoryImpact => "regulatory_impact",
            AttributeName::Confidentiality => "confidentiality",
            AttributeName::Integrity => "integrity",
            AttributeName::Availability => "availability",
        }
    }

    /// Human readable label used in explanations
    pub fn label(&self) -> &'static str {
        match self {
            AttributeName::BusinessCriticality => "Business criticality",
            AttributeName::DataSensitivity => "Data sensitivity",
            AttributeName::OperationalDependency => "Operational dependency",
            AttributeName::RegulatoryImpact => "Regulatory impact",
            AttributeName::Confidentiality => "Confidentiality",
            AttributeName::Integrity => "Integrity",
            AttributeName::Availability => "Availability",
        }
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Check that a single attribute is finite and inside [0, 1]
pub fn check_unit_interval(field: AttributeName, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::OutOfRange { field, value });
    }
    Ok(value)
}

/// Clamp an attribute into [0, 1], mapping NaN to 0
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Confidentiality, integrity and availability ratings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CiaTriad {
    pub confidentiality: f64,
    pub integrity: f64,
    pub availability: f64,
}

impl CiaTriad {
    pub fn new(confidentiality: f64, integrity: f64, availability: f64) -> Self {
        Self {
            confidentiality,
            integrity,
            availability,
        }
    }

    pub fn mean(&self) -> f64 {
        (self.confidentiality + self.integrity + self.availability) / 3.0
    }

    /// Copy with every component clamped into [0, 1]
    pub fn clamped(&self) -> Self {
        Self::new(
            clamp_unit(self.confidentiality),
            clamp_unit(self.integrity),
            clamp_unit(self.availability),
        )
    }
}

/// The seven normalized attributes describing an asset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetAttributes {
    pub business_criticality: f64,
    pub data_sensitivity: f64,
    pub operational_dependency: f64,
    pub regulatory_impact: f64,
    pub confidentiality: f64,
    pub integrity: f64,
    pub availability: f64,
}

impl AssetAttributes {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        business_criticality: f64,
        data_sensitivity: f64,
        operational_dependency: f64,
        regulatory_impact: f64,
        confidentiality: f64,
        integrity: f64,
        availability: f64,
    ) -> Self {
        Self {
            business_criticality,
            data_sensitivity,
            operational_dependency,
            regulatory_impact,
            confidentiality,
            integrity,
            availability,
        }
    }

    /// Every attribute set to the same value
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value, value, value, value)
    }

    /// Build from a feature vector in [`AttributeName::ALL`] order
    pub fn from_features(features: &[f64]) -> Result<Self, ValidationError> {
        if features.len() != ATTRIBUTE_COUNT {
            return Err(ValidationError::WrongLength {
                expected: ATTRIBUTE_COUNT,
                actual: features.len(),
            });
        }
        Ok(Self::new(
            features[0],
            features[1],
            features[2],
            features[3],
            features[4],
            features[5],
            features[6],
        ))
    }

    /// Feature vector in [`AttributeName::ALL`] order
    pub fn to_features(&self) -> [f64; ATTRIBUTE_COUNT] {
        [
            self.business_criticality,
            self.data_sensitivity,
            self.operational_dependency,
            self.regulatory_impact,
            self.confidentiality,
            self.integrity,
            self.availability,
        ]
    }

    pub fn get(&self, name: AttributeName) -> f64 {
        match name {
            AttributeName::BusinessCriticality => self.business_criticality,
            AttributeName::DataSensitivity => self.data_sensitivity,
            AttributeName::OperationalDependency => self.operational_dependency,
            AttributeName::RegulatoryImpact => self.regulatory_impact,
            AttributeName::Confidentiality => self.confidentiality,
            AttributeName::Integrity => self.integrity,
            AttributeName::Availability => self.availability,
        }
    }

    /// Attribute name and value pairs in feature-vector order
    pub fn iter(&self) -> impl Iterator<Item = (AttributeName, f64)> + '_ {
        AttributeName::ALL.into_iter().map(move |name| (name, self.get(name)))
    }

    pub fn cia(&self) -> CiaTriad {
        CiaTriad::new(self.confidentiality, self.integrity, self.availability)
    }

    /// Reject the first attribute that is non-finite or outside [0, 1]
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, value) in self.iter() {
            check_unit_interval(name, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_order_matches_attribute_names() {
        let attrs = AssetAttributes::new(0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7);
        let features = attrs.to_features();
        for (idx, name) in AttributeName::ALL.iter().enumerate() {
            assert_eq!(features[idx], attrs.get(*name));
        }
    }

    #[test]
    fn test_from_features_rejects_wrong_length() {
        let err = AssetAttributes::from_features(&[0.5; 6]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::WrongLength {
                expected: 7,
                actual: 6
            }
        );
    }

    #[test]
    fn test_validate_names_offending_field() {
        let mut attrs = AssetAttributes::uniform(0.5);
        attrs.integrity = 1.2;
        match attrs.validate() {
            Err(ValidationError::OutOfRange { field, value }) => {
                assert_eq!(field, AttributeName::Integrity);
                assert_eq!(value, 1.2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_nan() {
        let mut attrs = AssetAttributes::uniform(0.5);
        attrs.data_sensitivity = f64::NAN;
        assert_eq!(
            attrs.validate(),
            Err(ValidationError::NotFinite {
                field: AttributeName::DataSensitivity
            })
        );
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(AssetAttributes::uniform(0.0).validate().is_ok());
        assert!(AssetAttributes::uniform(1.0).validate().is_ok());
    }

    #[test]
    fn test_clamp_unit() {
        assert_eq!(clamp_unit(-0.5), 0.0);
        assert_eq!(clamp_unit(1.5), 1.0);
        assert_eq!(clamp_unit(f64::NAN), 0.0);
        assert_eq!(clamp_unit(f64::INFINITY), 1.0);
        assert_eq!(clamp_unit(0.42), 0.42);
    }

    #[test]
    fn test_cia_mean() {
        let cia = CiaTriad::new(0.3, 0.6, 0.9);
        assert!((cia.mean() - 0.6).abs() < 1e-12);
    }
}

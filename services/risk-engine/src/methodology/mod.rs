//! Risk identification methodologies
//!
//! Each assessor turns an [`AssetContext`] into a [`StandardizedRiskResult`]:
//! ISO 27005 (asset-based, event-based or hybrid), NIST SP 800-30, OCTAVE,
//! and an integrated assessor that weighs the other three.

pub mod integrated;
pub mod iso27005;
pub mod nist;
pub mod octave;
pub mod threats;
pub mod validation;

use chrono::{DateTime, Utc};
use std::fmt::Debug;
use types::assessment::{AssetContext, Criticality, Methodology, StandardizedRiskResult};
use types::attributes::{clamp_unit, AssetAttributes};
use types::ids::AssetId;

use crate::identifier::RiskIdentifier;

pub use integrated::IntegratedAssessor;
pub use iso27005::Iso27005Assessor;
pub use nist::NistAssessor;
pub use octave::OctaveAssessor;

/// A risk identification methodology
pub trait RiskAssessor: Send + Sync + Debug {
    fn methodology(&self) -> Methodology;

    /// Assess one asset; `assessed_at` stamps the result
    fn assess(&self, ctx: &AssetContext, assessed_at: DateTime<Utc>) -> StandardizedRiskResult;
}

/// Assessor for a methodology, with that methodology's default settings
pub fn assessor_for(methodology: Methodology) -> Box<dyn RiskAssessor> {
    assessor_with(methodology, RiskIdentifier::shared())
}

/// Default assessor whose fuzzy risk index comes from `identifier`
pub fn assessor_with(methodology: Methodology, identifier: &RiskIdentifier) -> Box<dyn RiskAssessor> {
    match methodology {
        Methodology::Iso27005 => {
            Box::new(Iso27005Assessor::default().with_identifier(identifier.clone()))
        }
        Methodology::NistSp80030 => Box::new(NistAssessor),
        Methodology::Octave => Box::new(OctaveAssessor),
        Methodology::Integrated => {
            Box::new(IntegratedAssessor::default().with_identifier(identifier.clone()))
        }
    }
}

/// Build an assessor context from classifier attributes
///
/// Criticality is banded from the business criticality rating; ratings are
/// clamped into [0, 1].
pub fn standardize_context(
    asset_id: AssetId,
    attrs: &AssetAttributes,
    classification_value: f64,
) -> AssetContext {
    AssetContext::new(asset_id, attrs.cia().clamped(), clamp_unit(classification_value))
        .with_criticality(Criticality::from_score(clamp_unit(attrs.business_criticality)))
}

pub(crate) fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

pub(crate) fn push_unique(list: &mut Vec<String>, item: impl Into<String>) {
    let item = item.into();
    if !list.contains(&item) {
        list.push(item);
    }
}

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_returns_requested_methodology() {
        for methodology in Methodology::ALL {
            assert_eq!(assessor_for(methodology).methodology(), methodology);
        }
    }

    #[test]
    fn test_standardize_context_bands_criticality() {
        let mut attrs = AssetAttributes::uniform(0.5);
        attrs.business_criticality = 0.85;
        let ctx = standardize_context(AssetId::new(), &attrs, 0.7);
        assert_eq!(ctx.criticality, Criticality::Critical);
        assert_eq!(ctx.classification_value, 0.7);
        assert_eq!(ctx.cia.integrity, 0.5);

        attrs.business_criticality = 0.1;
        let ctx = standardize_context(AssetId::new(), &attrs, 2.0);
        assert_eq!(ctx.criticality, Criticality::Low);
        assert_eq!(ctx.classification_value, 1.0);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(std::iter::empty()), None);
        let value = mean([0.2, 0.4].into_iter()).unwrap();
        assert!((value - 0.3).abs() < 1e-12);
    }
}

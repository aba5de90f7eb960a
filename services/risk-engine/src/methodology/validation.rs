//! Result validation
//!
//! Checks an ISO 27005 identification for compliance and a standardized
//! result for completeness.

use serde::{Deserialize, Serialize};
use types::assessment::{StandardizedRiskResult, ValidationReport};

use super::iso27005::IsoIdentification;

/// Completeness below which a broader assessment is recommended
pub const COMPLETENESS_TARGET: f64 = 0.8;

/// ISO 27005 compliance of an identification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsoComplianceReport {
    pub compliant: bool,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub threats_identified: usize,
    pub vulnerabilities_identified: usize,
}

fn in_unit_interval(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

pub fn check_iso_compliance(identification: &IsoIdentification) -> IsoComplianceReport {
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    if !in_unit_interval(identification.risk_index) {
        issues.push("Risk index must be between 0 and 1".to_string());
    }
    if !in_unit_interval(identification.likelihood) {
        issues.push("Likelihood must be between 0 and 1".to_string());
    }
    if !in_unit_interval(identification.probability_of_harm) {
        issues.push("Probability of harm must be between 0 and 1".to_string());
    }
    if identification.threats.is_empty() {
        recommendations.push(
            "Consider identifying specific threat scenarios for more comprehensive assessment"
                .to_string(),
        );
    }
    if identification.vulnerabilities.is_empty() {
        recommendations.push(
            "Vulnerability identification would enhance risk assessment completeness".to_string(),
        );
    }

    IsoComplianceReport {
        compliant: issues.is_empty(),
        issues,
        recommendations,
        threats_identified: identification.threats.len(),
        vulnerabilities_identified: identification.vulnerabilities.len(),
    }
}

/// Check a standardized result for errors, gaps and completeness
///
/// A nil asset id or a score outside [0, 1] invalidates the result; missing
/// threats or vulnerabilities only warn.
pub fn validate_result(result: &StandardizedRiskResult) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut recommendations = Vec::new();

    let has_id = result.asset_id.is_assigned();
    let score_ok = in_unit_interval(result.risk_score);
    if !has_id {
        errors.push("Asset ID is required".to_string());
    }
    if !score_ok {
        errors.push("Risk score must be between 0 and 1".to_string());
    }
    if result.threats.is_empty() {
        warnings.push(
            "No threats identified - consider reviewing threat identification process".to_string(),
        );
    }
    if result.vulnerabilities.is_empty() {
        warnings.push(
            "No vulnerabilities identified - consider comprehensive vulnerability assessment"
                .to_string(),
        );
    }

    // the risk level is always present on a typed result
    let factors = [
        has_id,
        score_ok,
        true,
        !result.threats.is_empty(),
        !result.vulnerabilities.is_empty(),
        !result.recommendations.is_empty(),
    ];
    let completeness = factors.iter().filter(|f| **f).count() as f64 / factors.len() as f64;

    if completeness < COMPLETENESS_TARGET {
        recommendations.push("Consider more comprehensive risk assessment".to_string());
    }
    if warnings.len() > 2 {
        recommendations.push("Review risk identification methodology for completeness".to_string());
    }

    ValidationReport {
        valid: errors.is_empty(),
        completeness,
        errors,
        warnings,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::RiskIdentifier;
    use crate::methodology::iso27005::{asset_based, event_based};
    use crate::methodology::{NistAssessor, RiskAssessor};
    use chrono::Utc;
    use types::assessment::AssetContext;
    use types::attributes::CiaTriad;
    use types::ids::AssetId;

    #[test]
    fn test_iso_identification_is_compliant() {
        let cia = CiaTriad::new(0.6, 0.6, 0.6);
        let report = check_iso_compliance(&asset_based(RiskIdentifier::shared(), &cia, 0.6));
        assert!(report.compliant);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_iso_compliance_flags_gaps() {
        let mut identification = event_based(&["T999".to_string()], None);
        identification.likelihood = 1.5;
        let report = check_iso_compliance(&identification);
        assert!(!report.compliant);
        assert_eq!(report.issues, vec!["Likelihood must be between 0 and 1"]);
        assert_eq!(report.recommendations.len(), 2);
    }

    #[test]
    fn test_complete_result() {
        let ctx = AssetContext::new(AssetId::new(), CiaTriad::new(0.3, 0.3, 0.3), 0.5);
        let result = NistAssessor.assess(&ctx, Utc::now());
        let report = validate_result(&result);
        assert!(report.valid);
        assert_eq!(report.completeness, 1.0);
        assert!(report.warnings.is_empty());
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_invalid_result() {
        let ctx = AssetContext::new(AssetId::unassigned(), CiaTriad::new(0.9, 0.9, 0.9), 0.5);
        let mut result = NistAssessor.assess(&ctx, Utc::now());
        result.risk_score = 1.2;
        let report = validate_result(&result);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 2);
        // no vulnerabilities on a strong asset
        assert_eq!(report.warnings.len(), 1);
        assert!((report.completeness - 3.0 / 6.0).abs() < 1e-12);
        assert_eq!(report.recommendations, vec!["Consider more comprehensive risk assessment"]);
    }
}

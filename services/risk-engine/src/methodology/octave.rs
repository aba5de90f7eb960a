//! OCTAVE-S risk assessment
//!
//! Combines the organizational view (business impact of the asset's
//! criticality, organizational weaknesses) with the technological view
//! (technical weaknesses and technology threats).

use chrono::{DateTime, Utc};
use tracing::debug;
use types::assessment::{
    AssetContext, Criticality, IdentifiedThreat, Methodology, MethodologyDetails, RiskLevel,
    Severity, StandardizedRiskResult, ThreatCategory, Vulnerability,
};

use super::{strings, RiskAssessor};

/// CIA rating below which a technical weakness is reported
pub const WEAK_RATING: f64 = 0.5;
/// Likelihood contributed by each technical weakness
pub const LIKELIHOOD_PER_WEAKNESS: f64 = 0.2;

pub const FRAMEWORKS: [&str; 2] = ["OCTAVE", "Asset-Centric Risk Management"];

pub fn business_impact(criticality: Criticality) -> f64 {
    match criticality {
        Criticality::Low => 0.3,
        Criticality::Moderate => 0.5,
        Criticality::High => 0.8,
        Criticality::Critical => 1.0,
    }
}

fn vulnerability(id: &str, name: &str, category: &str, description: &str) -> Vulnerability {
    Vulnerability {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        severity: Severity::Moderate,
        description: description.to_string(),
    }
}

pub fn technical_vulnerabilities(ctx: &AssetContext) -> Vec<Vulnerability> {
    let mut found = Vec::new();
    if ctx.cia.confidentiality < WEAK_RATING {
        found.push(vulnerability(
            "OCTAVE-TV1",
            "Weak Encryption",
            "technical",
            "Insufficient encryption implementation",
        ));
    }
    if ctx.cia.integrity < WEAK_RATING {
        found.push(vulnerability(
            "OCTAVE-TV2",
            "Inadequate Input Validation",
            "technical",
            "Lack of proper input validation controls",
        ));
    }
    if ctx.cia.availability < WEAK_RATING {
        found.push(vulnerability(
            "OCTAVE-TV3",
            "Insufficient Redundancy",
            "technical",
            "Lack of system redundancy and backup",
        ));
    }
    found
}

pub fn organizational_vulnerabilities() -> Vec<Vulnerability> {
    vec![
        vulnerability(
            "OCTAVE-OV1",
            "Inadequate Security Awareness",
            "organizational",
            "Lack of security awareness among staff",
        ),
        vulnerability(
            "OCTAVE-OV2",
            "Insufficient Security Policies",
            "organizational",
            "Inadequate or outdated security policies",
        ),
    ]
}

pub fn technology_threats() -> Vec<IdentifiedThreat> {
    vec![
        IdentifiedThreat {
            id: "OCTAVE-T1".to_string(),
            name: "System Compromise".to_string(),
            source: "Technology".to_string(),
            category: ThreatCategory::Technical,
            likelihood: 0.6,
            description: "Unauthorized access to system resources".to_string(),
        },
        IdentifiedThreat {
            id: "OCTAVE-T2".to_string(),
            name: "Data Corruption".to_string(),
            source: "Technology".to_string(),
            category: ThreatCategory::Technical,
            likelihood: 0.3,
            description: "Intentional or accidental data corruption".to_string(),
        },
    ]
}

/// Band a risk score at 0.4 / 0.7
pub fn risk_level(score: f64) -> RiskLevel {
    if score >= 0.7 {
        RiskLevel::High
    } else if score >= 0.4 {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    }
}

pub fn recommendations(level: RiskLevel) -> Vec<String> {
    let mut items = strings(&[
        "Develop comprehensive security awareness program",
        "Implement asset-centric security controls",
        "Establish regular risk assessment procedures",
        "Create incident response capabilities",
    ]);
    match level {
        RiskLevel::High | RiskLevel::VeryHigh => items.extend(strings(&[
            "Immediate security control implementation",
            "Enhanced monitoring and detection",
            "Executive-level risk communication",
        ])),
        RiskLevel::Moderate => items.extend(strings(&[
            "Prioritized security improvements",
            "Quarterly risk reviews",
            "Staff security training",
        ])),
        RiskLevel::Low | RiskLevel::VeryLow => {}
    }
    items
}

/// OCTAVE assessor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OctaveAssessor;

impl RiskAssessor for OctaveAssessor {
    fn methodology(&self) -> Methodology {
        Methodology::Octave
    }

    fn assess(&self, ctx: &AssetContext, assessed_at: DateTime<Utc>) -> StandardizedRiskResult {
        let impact = business_impact(ctx.criticality);
        let technical = technical_vulnerabilities(ctx);
        let organizational = organizational_vulnerabilities();
        let likelihood = (technical.len() as f64 * LIKELIHOOD_PER_WEAKNESS).min(1.0);
        let risk_score = likelihood * impact;
        let risk_level = risk_level(risk_score);

        debug!(
            asset_id = %ctx.asset_id,
            technical = technical.len(),
            risk_score,
            level = %risk_level,
            "OCTAVE assessment"
        );

        let details = MethodologyDetails::Octave {
            business_impact: impact,
            technical_vulnerabilities: technical.len(),
            organizational_vulnerabilities: organizational.len(),
        };
        let mut vulnerabilities = technical;
        vulnerabilities.extend(organizational);

        StandardizedRiskResult {
            asset_id: ctx.asset_id,
            methodology: Methodology::Octave,
            risk_score,
            risk_level,
            likelihood,
            impact,
            threats: technology_threats(),
            vulnerabilities,
            recommendations: recommendations(risk_level),
            compliance_frameworks: strings(&FRAMEWORKS),
            details,
            assessed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::attributes::CiaTriad;
    use types::ids::AssetId;

    fn context(c: f64, i: f64, a: f64, criticality: Criticality) -> AssetContext {
        AssetContext::new(AssetId::new(), CiaTriad::new(c, i, a), 0.5).with_criticality(criticality)
    }

    #[test]
    fn test_strong_asset_has_no_technical_likelihood() {
        let result = OctaveAssessor.assess(&context(0.8, 0.8, 0.8, Criticality::Critical), Utc::now());
        assert_eq!(result.likelihood, 0.0);
        assert_eq!(result.risk_score, 0.0);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.impact, 1.0);
        // organizational weaknesses are always reported
        assert_eq!(result.vulnerabilities.len(), 2);
        assert_eq!(result.recommendations.len(), 4);
    }

    #[test]
    fn test_weak_critical_asset() {
        let result = OctaveAssessor.assess(&context(0.2, 0.3, 0.4, Criticality::Critical), Utc::now());
        assert!((result.likelihood - 0.6).abs() < 1e-12);
        assert!((result.risk_score - 0.6).abs() < 1e-12);
        assert_eq!(result.risk_level, RiskLevel::Moderate);
        assert_eq!(result.vulnerabilities.len(), 5);
        assert_eq!(result.threats.len(), 2);
        assert_eq!(result.recommendations.len(), 7);
        assert!(matches!(
            result.details,
            MethodologyDetails::Octave { technical_vulnerabilities: 3, organizational_vulnerabilities: 2, .. }
        ));
    }

    #[test]
    fn test_business_impact_and_bands() {
        assert_eq!(business_impact(Criticality::Low), 0.3);
        assert_eq!(business_impact(Criticality::High), 0.8);
        assert_eq!(risk_level(0.7), RiskLevel::High);
        assert_eq!(risk_level(0.4), RiskLevel::Moderate);
        assert_eq!(risk_level(0.39), RiskLevel::Low);
        assert_eq!(recommendations(RiskLevel::High).len(), 7);
    }
}

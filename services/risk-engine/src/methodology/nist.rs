//! NIST SP 800-30 Rev 1 risk assessment
//!
//! Prepare, conduct, then calculate: threat sources are selected by asset
//! criticality, vulnerabilities by weak CIA ratings, and risk is the product
//! of likelihood and impact.

use chrono::{DateTime, Utc};
use tracing::debug;
use types::assessment::{
    AssetContext, Criticality, IdentifiedThreat, Methodology, MethodologyDetails, RiskLevel,
    Severity, StandardizedRiskResult, ThreatCategory, Vulnerability,
};

use super::{mean, strings, RiskAssessor};

/// CIA rating below which a vulnerability is reported
pub const VULNERABLE_RATING: f64 = 0.6;
/// CIA rating below which a reported vulnerability is high severity
pub const HIGH_SEVERITY_RATING: f64 = 0.4;
/// Likelihood boost per high severity vulnerability
pub const HIGH_SEVERITY_BOOST: f64 = 0.15;
/// Adversarial likelihood multiplier for elevated assets
pub const ELEVATED_TARGET_FACTOR: f64 = 1.3;
/// Likelihood assigned to environmental threat sources
pub const ENVIRONMENTAL_LIKELIHOOD: f64 = 0.2;

pub const FRAMEWORKS: [&str; 2] = ["NIST SP 800-30 Rev 1", "NIST Cybersecurity Framework"];

struct ThreatSource {
    id: &'static str,
    name: &'static str,
    category: ThreatCategory,
    base_likelihood: f64,
}

const THREAT_SOURCES: [ThreatSource; 4] = [
    ThreatSource {
        id: "TS-1",
        name: "Cyber Criminals",
        category: ThreatCategory::Adversarial,
        base_likelihood: 0.7,
    },
    ThreatSource {
        id: "TS-2",
        name: "Nation State Actors",
        category: ThreatCategory::Adversarial,
        base_likelihood: 0.3,
    },
    ThreatSource {
        id: "TS-3",
        name: "Insider Threats",
        category: ThreatCategory::Adversarial,
        base_likelihood: 0.2,
    },
    ThreatSource {
        id: "TS-4",
        name: "Natural Disasters",
        category: ThreatCategory::Environmental,
        base_likelihood: 0.1,
    },
];

/// Threat sources relevant to the asset
///
/// Adversarial sources only target high or critical assets; environmental
/// sources always apply.
pub fn relevant_threats(ctx: &AssetContext) -> Vec<IdentifiedThreat> {
    let elevated = ctx.criticality.is_elevated();
    THREAT_SOURCES
        .iter()
        .filter_map(|source| match source.category {
            ThreatCategory::Adversarial if elevated => Some(IdentifiedThreat {
                id: source.id.to_string(),
                name: source.name.to_string(),
                source: source.name.to_string(),
                category: source.category,
                likelihood: (source.base_likelihood * ELEVATED_TARGET_FACTOR).min(1.0),
                description: format!("{} targeting {} assets", source.name, ctx.asset_type),
            }),
            ThreatCategory::Environmental => Some(IdentifiedThreat {
                id: source.id.to_string(),
                name: source.name.to_string(),
                source: source.name.to_string(),
                category: source.category,
                likelihood: ENVIRONMENTAL_LIKELIHOOD,
                description: format!("Environmental threats affecting {} availability", ctx.asset_type),
            }),
            _ => None,
        })
        .collect()
}

/// Vulnerabilities implied by weak CIA ratings
pub fn vulnerabilities(ctx: &AssetContext) -> Vec<Vulnerability> {
    let checks = [
        (
            ctx.cia.confidentiality,
            "V-001",
            "Access Control Deficiencies",
            "confidentiality",
            "Inadequate access control mechanisms",
        ),
        (
            ctx.cia.integrity,
            "V-002",
            "Data Integrity Weaknesses",
            "integrity",
            "Insufficient data validation and integrity controls",
        ),
        (
            ctx.cia.availability,
            "V-003",
            "Availability Risks",
            "availability",
            "Single points of failure and insufficient redundancy",
        ),
    ];

    checks
        .iter()
        .filter(|(rating, ..)| *rating < VULNERABLE_RATING)
        .map(|(rating, id, name, category, description)| Vulnerability {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            severity: if *rating < HIGH_SEVERITY_RATING {
                Severity::High
            } else {
                Severity::Moderate
            },
            description: description.to_string(),
        })
        .collect()
}

/// Mean threat likelihood boosted per high severity vulnerability
pub fn likelihood(threats: &[IdentifiedThreat], vulnerabilities: &[Vulnerability]) -> f64 {
    let Some(threat_likelihood) = mean(threats.iter().map(|t| t.likelihood)) else {
        return 0.0;
    };
    let high = vulnerabilities
        .iter()
        .filter(|v| v.severity == Severity::High)
        .count();
    (threat_likelihood * (1.0 + high as f64 * HIGH_SEVERITY_BOOST)).min(1.0)
}

/// Mean CIA rating scaled by criticality
pub fn impact(ctx: &AssetContext) -> f64 {
    let weight = match ctx.criticality {
        Criticality::Low => 0.8,
        Criticality::Moderate => 1.0,
        Criticality::High => 1.2,
        Criticality::Critical => 1.4,
    };
    (ctx.cia.mean() * weight).min(1.0)
}

/// Band a risk score at 0.04 / 0.16 / 0.36 / 0.64
pub fn risk_level(score: f64) -> RiskLevel {
    if score >= 0.64 {
        RiskLevel::VeryHigh
    } else if score >= 0.36 {
        RiskLevel::High
    } else if score >= 0.16 {
        RiskLevel::Moderate
    } else if score >= 0.04 {
        RiskLevel::Low
    } else {
        RiskLevel::VeryLow
    }
}

pub fn recommendations(level: RiskLevel) -> Vec<String> {
    match level {
        RiskLevel::VeryHigh => strings(&[
            "Implement immediate security controls",
            "Activate incident response procedures",
            "Conduct emergency risk review",
            "Consider asset isolation if necessary",
        ]),
        RiskLevel::High => strings(&[
            "Prioritize security control implementation",
            "Increase monitoring frequency",
            "Review and update security policies",
            "Conduct quarterly risk assessments",
        ]),
        RiskLevel::Moderate => strings(&[
            "Implement recommended security controls",
            "Conduct semi-annual risk reviews",
            "Maintain current monitoring levels",
            "Update security awareness training",
        ]),
        RiskLevel::Low => strings(&[
            "Continue routine monitoring",
            "Annual risk assessment",
            "Maintain current security controls",
            "Document risk acceptance",
        ]),
        RiskLevel::VeryLow => strings(&[
            "Routine monitoring sufficient",
            "Biennial risk review",
            "Standard security controls adequate",
        ]),
    }
}

/// NIST SP 800-30 assessor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NistAssessor;

impl RiskAssessor for NistAssessor {
    fn methodology(&self) -> Methodology {
        Methodology::NistSp80030
    }

    fn assess(&self, ctx: &AssetContext, assessed_at: DateTime<Utc>) -> StandardizedRiskResult {
        let threats = relevant_threats(ctx);
        let vulnerabilities = vulnerabilities(ctx);
        let likelihood = likelihood(&threats, &vulnerabilities);
        let impact = impact(ctx);
        let risk_score = likelihood * impact;
        let risk_level = risk_level(risk_score);
        let high_severity_vulnerabilities = vulnerabilities
            .iter()
            .filter(|v| v.severity == Severity::High)
            .count();

        debug!(
            asset_id = %ctx.asset_id,
            likelihood,
            impact,
            risk_score,
            level = %risk_level,
            "NIST SP 800-30 assessment"
        );

        StandardizedRiskResult {
            asset_id: ctx.asset_id,
            methodology: Methodology::NistSp80030,
            risk_score,
            risk_level,
            likelihood,
            impact,
            threats,
            vulnerabilities,
            recommendations: recommendations(risk_level),
            compliance_frameworks: strings(&FRAMEWORKS),
            details: MethodologyDetails::Nist {
                tier: ctx.scope.tier(),
                high_severity_vulnerabilities,
            },
            assessed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::assessment::AssessmentScope;
    use types::attributes::CiaTriad;
    use types::ids::AssetId;

    fn context(c: f64, i: f64, a: f64, criticality: Criticality) -> AssetContext {
        AssetContext::new(AssetId::new(), CiaTriad::new(c, i, a), 0.5).with_criticality(criticality)
    }

    #[test]
    fn test_moderate_asset_sees_only_environmental_threats() {
        let threats = relevant_threats(&context(0.5, 0.5, 0.5, Criticality::Moderate));
        assert_eq!(threats.len(), 1);
        assert_eq!(threats[0].id, "TS-4");
        assert_eq!(threats[0].likelihood, 0.2);
    }

    #[test]
    fn test_critical_asset_attracts_adversaries() {
        let threats = relevant_threats(&context(0.9, 0.9, 0.9, Criticality::Critical));
        assert_eq!(threats.len(), 4);
        assert!((threats[0].likelihood - 0.91).abs() < 1e-12);
        assert!((threats[1].likelihood - 0.39).abs() < 1e-12);
    }

    #[test]
    fn test_vulnerability_severity() {
        let found = vulnerabilities(&context(0.3, 0.5, 0.9, Criticality::Moderate));
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, "V-001");
        assert_eq!(found[0].severity, Severity::High);
        assert_eq!(found[1].id, "V-002");
        assert_eq!(found[1].severity, Severity::Moderate);
    }

    #[test]
    fn test_likelihood_boost_and_cap() {
        let ctx = context(0.1, 0.1, 0.1, Criticality::Moderate);
        let threats = relevant_threats(&ctx);
        let vulns = vulnerabilities(&ctx);
        // three high severity vulnerabilities
        assert!((likelihood(&threats, &vulns) - 0.2 * 1.45).abs() < 1e-12);
        assert_eq!(likelihood(&[], &vulns), 0.0);
    }

    #[test]
    fn test_impact_weights() {
        assert!((impact(&context(0.5, 0.5, 0.5, Criticality::Low)) - 0.4).abs() < 1e-12);
        assert!((impact(&context(0.5, 0.5, 0.5, Criticality::High)) - 0.6).abs() < 1e-12);
        assert_eq!(impact(&context(0.9, 0.9, 0.9, Criticality::Critical)), 1.0);
    }

    #[test]
    fn test_risk_bands() {
        assert_eq!(risk_level(0.03), RiskLevel::VeryLow);
        assert_eq!(risk_level(0.04), RiskLevel::Low);
        assert_eq!(risk_level(0.16), RiskLevel::Moderate);
        assert_eq!(risk_level(0.36), RiskLevel::High);
        assert_eq!(risk_level(0.64), RiskLevel::VeryHigh);
        assert_eq!(recommendations(RiskLevel::VeryLow).len(), 3);
    }

    #[test]
    fn test_assessment() {
        let ctx = context(0.9, 0.9, 0.9, Criticality::Critical).with_scope(AssessmentScope::Organization);
        let result = NistAssessor.assess(&ctx, Utc::now());
        // mean of 0.91, 0.39, 0.26, 0.2 with no vulnerabilities
        assert!((result.likelihood - 0.44).abs() < 1e-12);
        assert_eq!(result.impact, 1.0);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert!(result.vulnerabilities.is_empty());
        assert!(matches!(result.details, MethodologyDetails::Nist { tier: 1, .. }));
    }
}

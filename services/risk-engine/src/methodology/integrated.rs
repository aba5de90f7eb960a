//! Integrated multi-methodology assessment
//!
//! Runs a set of component assessors and merges their results with fixed
//! weights. Threats, vulnerabilities, recommendations and frameworks are
//! deduplicated in first-seen order.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use types::assessment::{
    AssetContext, ConsensusLevel, IdentifiedThreat, Methodology, MethodologyDetails,
    MethodologyScore, RiskLevel, StandardizedRiskResult, Vulnerability,
};
use types::ids::AssetId;

use super::{assessor_with, mean, push_unique, strings, RiskAssessor};
use crate::identifier::RiskIdentifier;

/// Recommendations carried over from component assessments
pub const CARRIED_RECOMMENDATIONS: usize = 5;

/// Integration weight of a component methodology
pub fn weight(methodology: Methodology) -> f64 {
    match methodology {
        Methodology::Iso27005 => 0.4,
        Methodology::NistSp80030 => 0.35,
        Methodology::Octave => 0.25,
        Methodology::Integrated => 0.0,
    }
}

/// Band an integrated score at 0.2 / 0.4 / 0.6 / 0.8
pub fn risk_level(score: f64) -> RiskLevel {
    if score >= 0.8 {
        RiskLevel::VeryHigh
    } else if score >= 0.6 {
        RiskLevel::High
    } else if score >= 0.4 {
        RiskLevel::Moderate
    } else if score >= 0.2 {
        RiskLevel::Low
    } else {
        RiskLevel::VeryLow
    }
}

/// Agreement from the population standard deviation of the scores
pub fn consensus_level(scores: &[f64]) -> ConsensusLevel {
    if scores.len() < 2 {
        return ConsensusLevel::SingleAssessment;
    }
    let n = scores.len() as f64;
    let avg = scores.iter().sum::<f64>() / n;
    let std_dev = (scores.iter().map(|s| (s - avg).powi(2)).sum::<f64>() / n).sqrt();
    if std_dev <= 0.1 {
        ConsensusLevel::High
    } else if std_dev <= 0.2 {
        ConsensusLevel::Moderate
    } else if std_dev <= 0.3 {
        ConsensusLevel::Low
    } else {
        ConsensusLevel::SignificantDisagreement
    }
}

fn recommendations(level: RiskLevel, carried: &[String]) -> Vec<String> {
    let mut items = strings(&[
        "Implement multi-framework risk management approach",
        "Regular cross-methodology risk assessments",
        "Maintain compliance with multiple standards",
    ]);
    match level {
        RiskLevel::VeryHigh | RiskLevel::High => items.extend(strings(&[
            "Immediate implementation of critical security controls",
            "Executive escalation and oversight required",
            "Continuous monitoring and assessment",
            "Consider multiple risk treatment options",
        ])),
        RiskLevel::Moderate => items.extend(strings(&[
            "Systematic implementation of security improvements",
            "Regular monitoring and periodic reassessment",
            "Balance risk treatment costs with benefits",
        ])),
        RiskLevel::Low | RiskLevel::VeryLow => items.extend(strings(&[
            "Maintain current security posture",
            "Routine monitoring and annual assessment",
            "Document risk acceptance decisions",
        ])),
    }
    let mut unique: Vec<String> = Vec::new();
    for item in carried {
        push_unique(&mut unique, item.as_str());
    }
    items.extend(unique.into_iter().take(CARRIED_RECOMMENDATIONS));
    items
}

fn fallback(asset_id: AssetId, assessed_at: DateTime<Utc>) -> StandardizedRiskResult {
    StandardizedRiskResult {
        asset_id,
        methodology: Methodology::Integrated,
        risk_score: 0.5,
        risk_level: RiskLevel::Moderate,
        likelihood: 0.5,
        impact: 0.5,
        threats: Vec::new(),
        vulnerabilities: Vec::new(),
        recommendations: strings(&["No assessment results available"]),
        compliance_frameworks: Vec::new(),
        details: MethodologyDetails::Integrated {
            components: Vec::new(),
            consensus: ConsensusLevel::SingleAssessment,
            score_range: (0.5, 0.5),
        },
        assessed_at,
    }
}

fn weighted_mean(
    results: &[StandardizedRiskResult],
    total_weight: f64,
    field: impl Fn(&StandardizedRiskResult) -> f64,
) -> f64 {
    if total_weight > 0.0 {
        results
            .iter()
            .map(|r| field(r) * weight(r.methodology))
            .sum::<f64>()
            / total_weight
    } else {
        mean(results.iter().map(&field)).unwrap_or(0.5)
    }
}

/// Merge component results into one integrated result
///
/// Scores are weight-normalized over the components present. No components
/// yields a Moderate 0.5 placeholder.
pub fn integrate(
    asset_id: AssetId,
    results: &[StandardizedRiskResult],
    assessed_at: DateTime<Utc>,
) -> StandardizedRiskResult {
    if results.is_empty() {
        warn!(asset_id = %asset_id, "No component assessments to integrate, using placeholder");
        return fallback(asset_id, assessed_at);
    }

    let components: Vec<MethodologyScore> = results
        .iter()
        .map(|r| MethodologyScore {
            methodology: r.methodology,
            risk_score: r.risk_score,
            weight: weight(r.methodology),
        })
        .collect();
    let total_weight: f64 = components.iter().map(|c| c.weight).sum();
    let risk_score = weighted_mean(results, total_weight, |r| r.risk_score);
    let likelihood = weighted_mean(results, total_weight, |r| r.likelihood);
    let impact = weighted_mean(results, total_weight, |r| r.impact);
    let risk_level = risk_level(risk_score);

    let mut threats: Vec<IdentifiedThreat> = Vec::new();
    let mut vulnerabilities: Vec<Vulnerability> = Vec::new();
    let mut carried = Vec::new();
    let mut frameworks = Vec::new();
    for result in results {
        for threat in &result.threats {
            let key = if threat.id.is_empty() { &threat.name } else { &threat.id };
            let seen = threats.iter().any(|t| {
                let other = if t.id.is_empty() { &t.name } else { &t.id };
                other == key
            });
            if !seen {
                threats.push(threat.clone());
            }
        }
        for vulnerability in &result.vulnerabilities {
            if !vulnerability.name.is_empty()
                && !vulnerabilities.iter().any(|v| v.name == vulnerability.name)
            {
                vulnerabilities.push(vulnerability.clone());
            }
        }
        carried.extend(result.recommendations.iter().cloned());
        for framework in &result.compliance_frameworks {
            push_unique(&mut frameworks, framework.as_str());
        }
    }

    let scores: Vec<f64> = components.iter().map(|c| c.risk_score).collect();
    let low = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let high = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let consensus = consensus_level(&scores);

    debug!(
        asset_id = %asset_id,
        components = components.len(),
        risk_score,
        level = %risk_level,
        consensus = %consensus,
        "Integrated assessment"
    );

    StandardizedRiskResult {
        asset_id,
        methodology: Methodology::Integrated,
        risk_score,
        risk_level,
        likelihood,
        impact,
        threats,
        vulnerabilities,
        recommendations: recommendations(risk_level, &carried),
        compliance_frameworks: frameworks,
        details: MethodologyDetails::Integrated {
            components,
            consensus,
            score_range: (low, high),
        },
        assessed_at,
    }
}

/// Assessor combining ISO 27005, NIST SP 800-30 and OCTAVE
#[derive(Debug, Clone)]
pub struct IntegratedAssessor {
    methodologies: Vec<Methodology>,
    identifier: RiskIdentifier,
}

impl Default for IntegratedAssessor {
    fn default() -> Self {
        Self::with_methodologies(&[
            Methodology::Iso27005,
            Methodology::NistSp80030,
            Methodology::Octave,
        ])
    }
}

impl IntegratedAssessor {
    /// Integrate a chosen subset; nested integrated assessments are ignored
    pub fn with_methodologies(methodologies: &[Methodology]) -> Self {
        let mut chosen = Vec::new();
        for methodology in methodologies {
            if *methodology != Methodology::Integrated && !chosen.contains(methodology) {
                chosen.push(*methodology);
            }
        }
        Self {
            methodologies: chosen,
            identifier: RiskIdentifier::shared().clone(),
        }
    }

    /// Use `identifier` for the ISO 27005 component
    pub fn with_identifier(mut self, identifier: RiskIdentifier) -> Self {
        self.identifier = identifier;
        self
    }

    pub fn methodologies(&self) -> &[Methodology] {
        &self.methodologies
    }

    /// Component results followed by their integration
    pub fn assess_all(
        &self,
        ctx: &AssetContext,
        assessed_at: DateTime<Utc>,
    ) -> (Vec<StandardizedRiskResult>, StandardizedRiskResult) {
        let components: Vec<StandardizedRiskResult> = self
            .methodologies
            .iter()
            .map(|m| assessor_with(*m, &self.identifier).assess(ctx, assessed_at))
            .collect();
        let integrated = integrate(ctx.asset_id, &components, assessed_at);
        (components, integrated)
    }
}

impl RiskAssessor for IntegratedAssessor {
    fn methodology(&self) -> Methodology {
        Methodology::Integrated
    }

    fn assess(&self, ctx: &AssetContext, assessed_at: DateTime<Utc>) -> StandardizedRiskResult {
        self.assess_all(ctx, assessed_at).1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::attributes::CiaTriad;
    use types::assessment::Criticality;

    fn result(methodology: Methodology, score: f64) -> StandardizedRiskResult {
        StandardizedRiskResult {
            asset_id: AssetId::new(),
            methodology,
            risk_score: score,
            risk_level: RiskLevel::Moderate,
            likelihood: score,
            impact: score,
            threats: Vec::new(),
            vulnerabilities: Vec::new(),
            recommendations: vec!["Shared".to_string(), format!("{methodology} only")],
            compliance_frameworks: vec!["Common".to_string(), methodology.name().to_string()],
            details: MethodologyDetails::Nist {
                tier: 3,
                high_severity_vulnerabilities: 0,
            },
            assessed_at: Utc::now(),
        }
    }

    #[test]
    fn test_weighted_integration() {
        let results = [
            result(Methodology::Iso27005, 0.8),
            result(Methodology::NistSp80030, 0.4),
            result(Methodology::Octave, 0.2),
        ];
        let integrated = integrate(AssetId::new(), &results, Utc::now());
        let expected = 0.4 * 0.8 + 0.35 * 0.4 + 0.25 * 0.2;
        assert!((integrated.risk_score - expected).abs() < 1e-12);
        assert_eq!(integrated.risk_level, RiskLevel::Moderate);
        assert_eq!(
            integrated.compliance_frameworks,
            vec!["Common", "ISO 27005", "NIST SP 800-30", "OCTAVE"]
        );
        match integrated.details {
            MethodologyDetails::Integrated { components, consensus, score_range } => {
                assert_eq!(components.len(), 3);
                assert_eq!(score_range, (0.2, 0.8));
                assert_eq!(consensus, ConsensusLevel::Low);
            }
            other => panic!("unexpected details {other:?}"),
        }
    }

    #[test]
    fn test_partial_weights_are_normalized() {
        let results = [result(Methodology::NistSp80030, 0.3), result(Methodology::Octave, 0.3)];
        let integrated = integrate(AssetId::new(), &results, Utc::now());
        assert!((integrated.risk_score - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_recommendations_carry_unique_items() {
        let results = [result(Methodology::Iso27005, 0.9), result(Methodology::Octave, 0.9)];
        let integrated = integrate(AssetId::new(), &results, Utc::now());
        assert_eq!(integrated.risk_level, RiskLevel::VeryHigh);
        // three base, four for high risk, three unique carried items
        assert_eq!(integrated.recommendations.len(), 10);
        assert_eq!(integrated.recommendations[7], "Shared");
    }

    #[test]
    fn test_empty_integration_is_placeholder() {
        let integrated = integrate(AssetId::new(), &[], Utc::now());
        assert_eq!(integrated.risk_score, 0.5);
        assert_eq!(integrated.risk_level, RiskLevel::Moderate);
        assert_eq!(integrated.recommendations, vec!["No assessment results available"]);
    }

    #[test]
    fn test_consensus_levels() {
        assert_eq!(consensus_level(&[0.5]), ConsensusLevel::SingleAssessment);
        assert_eq!(consensus_level(&[0.5, 0.55]), ConsensusLevel::High);
        assert_eq!(consensus_level(&[0.2, 0.5]), ConsensusLevel::Moderate);
        assert_eq!(consensus_level(&[0.0, 0.5]), ConsensusLevel::Low);
        assert_eq!(consensus_level(&[0.0, 1.0]), ConsensusLevel::SignificantDisagreement);
    }

    #[test]
    fn test_full_assessment() {
        let ctx = AssetContext::new(AssetId::new(), CiaTriad::new(0.9, 0.85, 0.8), 0.9)
            .with_criticality(Criticality::Critical);
        let (components, integrated) = IntegratedAssessor::default().assess_all(&ctx, Utc::now());
        assert_eq!(components.len(), 3);
        assert_eq!(integrated.methodology, Methodology::Integrated);
        assert!((0.0..=1.0).contains(&integrated.risk_score));
        let ids: Vec<_> = integrated.threats.iter().map(|t| t.id.as_str()).collect();
        assert!(ids.contains(&"T004") && ids.contains(&"TS-1") && ids.contains(&"OCTAVE-T1"));
    }

    #[test]
    fn test_subset_ignores_nested_integration() {
        let assessor = IntegratedAssessor::with_methodologies(&[
            Methodology::Octave,
            Methodology::Integrated,
            Methodology::Octave,
        ]);
        assert_eq!(assessor.methodologies(), &[Methodology::Octave]);
    }
}

//! ISO 27005:2022 risk identification
//!
//! The asset-based approach starts from the asset's CIA ratings and the
//! fuzzy risk index; the event-based approach starts from threat scenarios.
//! The hybrid approach blends the two 60/40.

use chrono::{DateTime, Utc};
use tracing::debug;
use types::assessment::{
    AssetContext, IsoApproach, Methodology, MethodologyDetails, RiskLevel, Severity,
    StandardizedRiskResult, ThreatCategory, Vulnerability,
};
use types::attributes::{clamp_unit, CiaTriad};

use super::threats::{systemic_vulnerabilities, ThreatScenario, STANDARD_THREATS};
use super::{mean, push_unique, strings, RiskAssessor};
use crate::identifier::RiskIdentifier;

/// Minimum CIA-weighted impact for a threat to count against an asset
pub const RELEVANCE_THRESHOLD: f64 = 0.3;
/// CIA rating below which the asset-based approach reports weaknesses
pub const WEAK_RATING: f64 = 0.5;
/// Share of the asset-based result in a hybrid identification
pub const ASSET_SHARE: f64 = 0.6;

pub const FRAMEWORKS: [&str; 2] = ["ISO 27005:2022", "ISO 27001"];

/// Raw ISO 27005 identification before standardization
#[derive(Debug, Clone, PartialEq)]
pub struct IsoIdentification {
    pub approach: IsoApproach,
    pub risk_index: f64,
    pub likelihood: f64,
    pub probability_of_harm: f64,
    pub threats: Vec<ThreatScenario>,
    pub vulnerabilities: Vec<String>,
}

fn asset_vulnerabilities(cia: &CiaTriad) -> Vec<String> {
    let mut found = Vec::new();
    if cia.confidentiality < WEAK_RATING {
        found.extend(strings(&[
            "Weak access controls",
            "Insufficient data encryption",
            "Inadequate user authentication",
        ]));
    }
    if cia.integrity < WEAK_RATING {
        found.extend(strings(&[
            "Lack of data validation",
            "Insufficient change management",
            "Weak data integrity controls",
        ]));
    }
    if cia.availability < WEAK_RATING {
        found.extend(strings(&[
            "Single points of failure",
            "Inadequate backup systems",
            "Insufficient redundancy",
        ]));
    }
    found
}

/// Asset-based identification, with the fuzzy risk index from `identifier`
pub fn asset_based(
    identifier: &RiskIdentifier,
    cia: &CiaTriad,
    classification_value: f64,
) -> IsoIdentification {
    let cia = cia.clamped();
    let risk_index = identifier.compute(&cia, classification_value).value;

    let threats: Vec<ThreatScenario> = STANDARD_THREATS
        .iter()
        .filter(|t| t.relevance(&cia) >= RELEVANCE_THRESHOLD)
        .copied()
        .collect();

    let (likelihood, probability_of_harm) =
        match mean(threats.iter().map(|t| t.likelihood)) {
            Some(threat_likelihood) => {
                let likelihood = (0.4 * cia.mean() + 0.6 * threat_likelihood).min(1.0);
                let avg_impact = mean(threats.iter().map(|t| t.mean_impact())).unwrap_or(0.0);
                let harm = (likelihood * avg_impact * (1.0 + 0.2 * risk_index)).min(1.0);
                (likelihood, harm)
            }
            None => (0.0, risk_index),
        };

    IsoIdentification {
        approach: IsoApproach::AssetBased,
        risk_index,
        likelihood,
        probability_of_harm,
        threats,
        vulnerabilities: asset_vulnerabilities(&cia),
    }
}

/// Threat scenarios for an industry sector
///
/// Financial and banking organizations face technical and human threats;
/// healthcare faces data and system threats; anything else faces all of them.
pub fn contextual_threats(industry_sector: Option<&str>) -> Vec<ThreatScenario> {
    let sector = industry_sector.unwrap_or_default().to_lowercase();
    STANDARD_THREATS
        .iter()
        .filter(|t| {
            if sector.contains("financial") || sector.contains("banking") {
                matches!(t.category, ThreatCategory::Technical | ThreatCategory::Human)
            } else if sector.contains("healthcare") {
                let name = t.name.to_lowercase();
                name.contains("data") || name.contains("system")
            } else {
                true
            }
        })
        .copied()
        .collect()
}

fn average(threats: &[ThreatScenario], field: impl Fn(&ThreatScenario) -> f64) -> f64 {
    mean(threats.iter().map(field)).unwrap_or(0.0)
}

/// Event-based identification
///
/// Named scenarios take precedence over the industry filter. No matching
/// scenario yields an all-zero identification.
pub fn event_based(threat_ids: &[String], industry_sector: Option<&str>) -> IsoIdentification {
    let threats: Vec<ThreatScenario> = if threat_ids.is_empty() {
        contextual_threats(industry_sector)
    } else {
        STANDARD_THREATS
            .iter()
            .filter(|t| threat_ids.iter().any(|id| id == t.id))
            .copied()
            .collect()
    };

    let likelihood = average(&threats, |t| t.likelihood);
    let risk_index = (average(&threats, |t| t.impact_confidentiality)
        + average(&threats, |t| t.impact_integrity)
        + average(&threats, |t| t.impact_availability))
        / 3.0;

    let mut vulnerabilities = Vec::new();
    for threat in &threats {
        for weakness in systemic_vulnerabilities(threat.category) {
            push_unique(&mut vulnerabilities, *weakness);
        }
    }

    IsoIdentification {
        approach: IsoApproach::EventBased,
        risk_index,
        likelihood,
        probability_of_harm: (likelihood * risk_index).min(1.0),
        threats,
        vulnerabilities,
    }
}

/// Hybrid identification blending both approaches
pub fn hybrid(identifier: &RiskIdentifier, ctx: &AssetContext) -> IsoIdentification {
    let asset = asset_based(identifier, &ctx.cia, ctx.classification_value);
    let event = event_based(&ctx.threat_ids, ctx.industry_sector.as_deref());
    let blend = |a: f64, e: f64| ASSET_SHARE * a + (1.0 - ASSET_SHARE) * e;

    let mut threats = asset.threats.clone();
    for threat in &event.threats {
        if !threats.iter().any(|t| t.id == threat.id) {
            threats.push(*threat);
        }
    }
    let mut vulnerabilities = asset.vulnerabilities.clone();
    for weakness in &event.vulnerabilities {
        push_unique(&mut vulnerabilities, weakness.as_str());
    }

    IsoIdentification {
        approach: IsoApproach::Hybrid,
        risk_index: blend(asset.risk_index, event.risk_index),
        likelihood: blend(asset.likelihood, event.likelihood),
        probability_of_harm: blend(asset.probability_of_harm, event.probability_of_harm),
        threats,
        vulnerabilities,
    }
}

/// Risk level of an ISO risk index, banded at 0.25 / 0.5 / 0.75 / 0.9
///
/// Values outside [0, 1] report Moderate.
pub fn risk_level(risk_index: f64) -> RiskLevel {
    match risk_index {
        r if (0.0..0.25).contains(&r) => RiskLevel::VeryLow,
        r if (0.25..0.5).contains(&r) => RiskLevel::Low,
        r if (0.5..0.75).contains(&r) => RiskLevel::Moderate,
        r if (0.75..0.9).contains(&r) => RiskLevel::High,
        r if (0.9..=1.0).contains(&r) => RiskLevel::VeryHigh,
        _ => RiskLevel::Moderate,
    }
}

/// ISO 27005 assessor
#[derive(Debug, Clone)]
pub struct Iso27005Assessor {
    pub approach: IsoApproach,
    identifier: RiskIdentifier,
}

impl Default for Iso27005Assessor {
    fn default() -> Self {
        Self::new(IsoApproach::Hybrid)
    }
}

impl Iso27005Assessor {
    /// Assessor backed by the shared risk identifier
    pub fn new(approach: IsoApproach) -> Self {
        Self {
            approach,
            identifier: RiskIdentifier::shared().clone(),
        }
    }

    /// Use `identifier` for the asset-based risk index
    pub fn with_identifier(mut self, identifier: RiskIdentifier) -> Self {
        self.identifier = identifier;
        self
    }

    pub fn identify(&self, ctx: &AssetContext) -> IsoIdentification {
        match self.approach {
            IsoApproach::AssetBased => {
                asset_based(&self.identifier, &ctx.cia, ctx.classification_value)
            }
            IsoApproach::EventBased => event_based(&ctx.threat_ids, ctx.industry_sector.as_deref()),
            IsoApproach::Hybrid => hybrid(&self.identifier, ctx),
        }
    }

    /// Standardize an identification for `ctx`
    pub fn standardize(
        &self,
        ctx: &AssetContext,
        identification: IsoIdentification,
        assessed_at: DateTime<Utc>,
    ) -> StandardizedRiskResult {
        let vulnerabilities = identification
            .vulnerabilities
            .iter()
            .enumerate()
            .map(|(i, name)| Vulnerability {
                id: format!("ISO-V{:03}", i + 1),
                name: name.clone(),
                category: "general".to_string(),
                severity: Severity::Moderate,
                description: name.clone(),
            })
            .collect();

        StandardizedRiskResult {
            asset_id: ctx.asset_id,
            methodology: Methodology::Iso27005,
            risk_score: identification.risk_index,
            risk_level: risk_level(identification.risk_index),
            likelihood: identification.likelihood,
            impact: identification.risk_index,
            threats: identification.threats.iter().map(|t| t.to_identified()).collect(),
            vulnerabilities,
            recommendations: strings(&[
                "Follow ISO 27005:2022 risk treatment procedures",
                "Implement appropriate security controls",
                "Monitor and review risk status regularly",
            ]),
            compliance_frameworks: strings(&FRAMEWORKS),
            details: MethodologyDetails::Iso27005 {
                approach: identification.approach,
                risk_index: identification.risk_index,
                probability_of_harm: clamp_unit(identification.probability_of_harm),
            },
            assessed_at,
        }
    }
}

impl RiskAssessor for Iso27005Assessor {
    fn methodology(&self) -> Methodology {
        Methodology::Iso27005
    }

    fn assess(&self, ctx: &AssetContext, assessed_at: DateTime<Utc>) -> StandardizedRiskResult {
        let identification = self.identify(ctx);
        debug!(
            asset_id = %ctx.asset_id,
            approach = ?identification.approach,
            risk_index = identification.risk_index,
            threats = identification.threats.len(),
            "ISO 27005 identification"
        );
        self.standardize(ctx, identification, assessed_at)
    }
}

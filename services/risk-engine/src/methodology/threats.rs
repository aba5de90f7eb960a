//! ISO 27005 threat scenario catalogue

use types::assessment::{IdentifiedThreat, ThreatCategory};
use types::attributes::CiaTriad;

/// Catalogued threat with its per-dimension impact on the CIA triad
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreatScenario {
    pub id: &'static str,
    pub name: &'static str,
    pub source: &'static str,
    pub category: ThreatCategory,
    pub likelihood: f64,
    pub impact_confidentiality: f64,
    pub impact_integrity: f64,
    pub impact_availability: f64,
    pub description: &'static str,
}

impl ThreatScenario {
    /// CIA-weighted impact against an asset's ratings
    pub fn relevance(&self, cia: &CiaTriad) -> f64 {
        (self.impact_confidentiality * cia.confidentiality
            + self.impact_integrity * cia.integrity
            + self.impact_availability * cia.availability)
            / 3.0
    }

    pub fn mean_impact(&self) -> f64 {
        (self.impact_confidentiality + self.impact_integrity + self.impact_availability) / 3.0
    }

    pub fn to_identified(&self) -> IdentifiedThreat {
        IdentifiedThreat {
            id: self.id.to_string(),
            name: self.name.to_string(),
            source: self.source.to_string(),
            category: self.category,
            likelihood: self.likelihood,
            description: self.description.to_string(),
        }
    }
}

pub const STANDARD_THREATS: [ThreatScenario; 6] = [
    ThreatScenario {
        id: "T001",
        name: "Unauthorized Access",
        source: "External Attacker",
        category: ThreatCategory::Technical,
        likelihood: 0.6,
        impact_confidentiality: 0.8,
        impact_integrity: 0.3,
        impact_availability: 0.2,
        description: "Access to the asset by parties without authorization",
    },
    ThreatScenario {
        id: "T002",
        name: "Data Breach",
        source: "Internal/External",
        category: ThreatCategory::Technical,
        likelihood: 0.4,
        impact_confidentiality: 0.9,
        impact_integrity: 0.7,
        impact_availability: 0.3,
        description: "Disclosure of sensitive information",
    },
    ThreatScenario {
        id: "T003",
        name: "System Failure",
        source: "Technical Failure",
        category: ThreatCategory::Technical,
        likelihood: 0.3,
        impact_confidentiality: 0.1,
        impact_integrity: 0.6,
        impact_availability: 0.9,
        description: "Hardware or software failure taking the asset offline",
    },
    ThreatScenario {
        id: "T004",
        name: "Malware Attack",
        source: "External Attacker",
        category: ThreatCategory::Technical,
        likelihood: 0.7,
        impact_confidentiality: 0.6,
        impact_integrity: 0.8,
        impact_availability: 0.7,
        description: "Malicious software compromising integrity and availability",
    },
    ThreatScenario {
        id: "T005",
        name: "Insider Threat",
        source: "Internal Employee",
        category: ThreatCategory::Human,
        likelihood: 0.2,
        impact_confidentiality: 0.8,
        impact_integrity: 0.7,
        impact_availability: 0.4,
        description: "Malicious or negligent action by authorized personnel",
    },
    ThreatScenario {
        id: "T006",
        name: "Natural Disaster",
        source: "Environmental",
        category: ThreatCategory::Physical,
        likelihood: 0.1,
        impact_confidentiality: 0.2,
        impact_integrity: 0.3,
        impact_availability: 0.9,
        description: "Natural events damaging physical infrastructure",
    },
];

/// Systemic weaknesses implied by a threat category
pub fn systemic_vulnerabilities(category: ThreatCategory) -> &'static [&'static str] {
    match category {
        ThreatCategory::Technical => &[
            "Outdated software systems",
            "Insufficient network security",
            "Weak endpoint protection",
        ],
        ThreatCategory::Human => &[
            "Inadequate security awareness training",
            "Weak access management processes",
            "Insufficient background checks",
        ],
        ThreatCategory::Physical => &[
            "Inadequate physical security controls",
            "Insufficient environmental monitoring",
            "Lack of disaster recovery planning",
        ],
        ThreatCategory::Organizational => &[
            "Weak security governance",
            "Insufficient security policies",
            "Inadequate incident response procedures",
        ],
        ThreatCategory::Adversarial | ThreatCategory::Environmental => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_ids_are_unique() {
        let mut ids: Vec<_> = STANDARD_THREATS.iter().map(|t| t.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), STANDARD_THREATS.len());
    }

    #[test]
    fn test_relevance() {
        let malware = &STANDARD_THREATS[3];
        let relevance = malware.relevance(&CiaTriad::new(1.0, 1.0, 1.0));
        assert!((relevance - 0.7).abs() < 1e-12);
        assert_eq!(malware.relevance(&CiaTriad::new(0.0, 0.0, 0.0)), 0.0);
    }

    #[test]
    fn test_systemic_vulnerabilities() {
        assert_eq!(systemic_vulnerabilities(ThreatCategory::Human).len(), 3);
        assert!(systemic_vulnerabilities(ThreatCategory::Adversarial).is_empty());
    }
}

//! Multi-methodology risk identification records
//!
//! ISO 27005, NIST SP 800-30, OCTAVE and the integrated assessor all report
//! through [`StandardizedRiskResult`] so their outputs can be compared.

use crate::attributes::CiaTriad;
use crate::ids::AssetId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk identification methodology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Methodology {
    #[serde(rename = "iso_27005")]
    Iso27005,
    #[serde(rename = "nist_sp_800_30")]
    NistSp80030,
    Octave,
    Integrated,
}

impl Methodology {
    pub const ALL: [Methodology; 4] = [
        Methodology::Iso27005,
        Methodology::NistSp80030,
        Methodology::Octave,
        Methodology::Integrated,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Methodology::Iso27005 => "ISO 27005",
            Methodology::NistSp80030 => "NIST SP 800-30",
            Methodology::Octave => "OCTAVE",
            Methodology::Integrated => "Integrated",
        }
    }
}

impl fmt::Display for Methodology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Five-step qualitative risk level shared by all methodologies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "Very Low",
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Business criticality of an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criticality {
    Low,
    Moderate,
    High,
    Critical,
}

impl Criticality {
    /// Band a business criticality score at 0.4 / 0.6 / 0.8
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            Criticality::Critical
        } else if score >= 0.6 {
            Criticality::High
        } else if score >= 0.4 {
            Criticality::Moderate
        } else {
            Criticality::Low
        }
    }

    /// High or critical assets attract adversarial attention
    pub fn is_elevated(&self) -> bool {
        matches!(self, Criticality::High | Criticality::Critical)
    }
}

impl Default for Criticality {
    fn default() -> Self {
        Criticality::Moderate
    }
}

/// Organizational level of an assessment, mapped onto NIST tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentScope {
    Organization,
    MissionBusinessProcess,
    InformationSystem,
}

impl AssessmentScope {
    pub fn tier(&self) -> u8 {
        match self {
            AssessmentScope::Organization => 1,
            AssessmentScope::MissionBusinessProcess => 2,
            AssessmentScope::InformationSystem => 3,
        }
    }
}

impl Default for AssessmentScope {
    fn default() -> Self {
        AssessmentScope::InformationSystem
    }
}

/// Everything an assessor knows about the asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetContext {
    pub asset_id: AssetId,
    pub asset_name: String,
    pub asset_type: String,
    pub cia: CiaTriad,
    /// Classification score from the asset classifier
    pub classification_value: f64,
    pub criticality: Criticality,
    #[serde(default)]
    pub industry_sector: Option<String>,
    #[serde(default)]
    pub scope: AssessmentScope,
    /// Threat scenario ids selected for event-based assessment
    #[serde(default)]
    pub threat_ids: Vec<String>,
}

impl AssetContext {
    pub fn new(asset_id: AssetId, cia: CiaTriad, classification_value: f64) -> Self {
        Self {
            asset_id,
            asset_name: String::new(),
            asset_type: "information_system".to_string(),
            cia,
            classification_value,
            criticality: Criticality::default(),
            industry_sector: None,
            scope: AssessmentScope::default(),
            threat_ids: Vec::new(),
        }
    }

    pub fn with_criticality(mut self, criticality: Criticality) -> Self {
        self.criticality = criticality;
        self
    }

    pub fn with_industry(mut self, sector: impl Into<String>) -> Self {
        self.industry_sector = Some(sector.into());
        self
    }

    pub fn with_scope(mut self, scope: AssessmentScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_threats(mut self, ids: Vec<String>) -> Self {
        self.threat_ids = ids;
        self
    }
}

/// Threat grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatCategory {
    Physical,
    Technical,
    Human,
    Organizational,
    Adversarial,
    Environmental,
}

/// Vulnerability severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Moderate,
    High,
}

/// Threat found relevant to the asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifiedThreat {
    pub id: String,
    pub name: String,
    pub source: String,
    pub category: ThreatCategory,
    pub likelihood: f64,
    pub description: String,
}

/// Weakness found in the asset or its organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: String,
    pub name: String,
    pub category: String,
    pub severity: Severity,
    pub description: String,
}

/// ISO 27005 identification approach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsoApproach {
    AssetBased,
    EventBased,
    Hybrid,
}

/// Agreement among the methodologies of an integrated assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsensusLevel {
    #[serde(rename = "Single Assessment")]
    SingleAssessment,
    #[serde(rename = "High Consensus")]
    High,
    #[serde(rename = "Moderate Consensus")]
    Moderate,
    #[serde(rename = "Low Consensus")]
    Low,
    #[serde(rename = "Significant Disagreement")]
    SignificantDisagreement,
}

impl ConsensusLevel {
    pub fn label(&self) -> &'static str {
        match self {
            ConsensusLevel::SingleAssessment => "Single Assessment",
            ConsensusLevel::High => "High Consensus",
            ConsensusLevel::Moderate => "Moderate Consensus",
            ConsensusLevel::Low => "Low Consensus",
            ConsensusLevel::SignificantDisagreement => "Significant Disagreement",
        }
    }
}

impl fmt::Display for ConsensusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Weighted score of one methodology inside an integrated assessment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MethodologyScore {
    pub methodology: Methodology,
    pub risk_score: f64,
    pub weight: f64,
}

/// Methodology-specific detail carried alongside the common fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MethodologyDetails {
    Iso27005 {
        approach: IsoApproach,
        risk_index: f64,
        probability_of_harm: f64,
    },
    Nist {
        tier: u8,
        high_severity_vulnerabilities: usize,
    },
    Octave {
        business_impact: f64,
        technical_vulnerabilities: usize,
        organizational_vulnerabilities: usize,
    },
    Integrated {
        components: Vec<MethodologyScore>,
        consensus: ConsensusLevel,
        score_range: (f64, f64),
    },
}

/// Common output of every risk assessor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardizedRiskResult {
    pub asset_id: AssetId,
    pub methodology: Methodology,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub likelihood: f64,
    pub impact: f64,
    pub threats: Vec<IdentifiedThreat>,
    pub vulnerabilities: Vec<Vulnerability>,
    pub recommendations: Vec<String>,
    pub compliance_frameworks: Vec<String>,
    pub details: MethodologyDetails,
    pub assessed_at: DateTime<Utc>,
}

/// Outcome of checking a standardized result for completeness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    /// Share of expected fields that are populated, in [0, 1]
    pub completeness: f64,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criticality_bands() {
        assert_eq!(Criticality::from_score(0.39), Criticality::Low);
        assert_eq!(Criticality::from_score(0.4), Criticality::Moderate);
        assert_eq!(Criticality::from_score(0.6), Criticality::High);
        assert_eq!(Criticality::from_score(0.8), Criticality::Critical);
        assert_eq!(Criticality::from_score(1.0), Criticality::Critical);
    }

    #[test]
    fn test_scope_tiers() {
        assert_eq!(AssessmentScope::Organization.tier(), 1);
        assert_eq!(AssessmentScope::MissionBusinessProcess.tier(), 2);
        assert_eq!(AssessmentScope::InformationSystem.tier(), 3);
    }

    #[test]
    fn test_methodology_serde_names() {
        let json = serde_json::to_string(&Methodology::NistSp80030).unwrap();
        assert_eq!(json, "\"nist_sp_800_30\"");
        let parsed: Methodology = serde_json::from_str("\"iso_27005\"").unwrap();
        assert_eq!(parsed, Methodology::Iso27005);
    }

    #[test]
    fn test_consensus_labels() {
        assert_eq!(ConsensusLevel::SignificantDisagreement.to_string(), "Significant Disagreement");
        assert_eq!(ConsensusLevel::SingleAssessment.to_string(), "Single Assessment");
    }
}

//! Mathematical risk analyzer
//!
//! Closed-form exponential-impact model over the risk index:
//!
//! - likelihood = risk_index
//! - impact = min(risk_index^1.3 × 1.05, 1), zero for a zero index
//! - environmental factor = 1 + 0.15 × risk_index
//! - level = clamp(likelihood × impact × environmental factor, 0, 1)
//!
//! Analysis never aborts. A non-finite index yields the neutral
//! "Medium Risk" result at level 0.5.

use tracing::{debug, warn};
use types::errors::{FallbackUsed, Stage};
use types::risk::{
    ImpactRating, MitigationPriority, PriorityLevel, ProbabilityRating, RiskAnalysisResult,
    RiskCategory, RiskMatrixRating,
};

/// Exponent applied to the risk index to derive impact
pub const IMPACT_EXPONENT: f64 = 1.3;
/// Multiplier applied after the exponent
pub const IMPACT_SCALE: f64 = 1.05;
/// Environmental amplification per unit of risk index
pub const ENVIRONMENTAL_SLOPE: f64 = 0.15;
/// Level reported when the formula cannot be evaluated
pub const FALLBACK_LEVEL: f64 = 0.5;

/// Impact of a risk index in [0, 1]
pub fn impact(risk_index: f64) -> f64 {
    if risk_index > 0.0 {
        (risk_index.powf(IMPACT_EXPONENT) * IMPACT_SCALE).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

pub fn environmental_factor(risk_index: f64) -> f64 {
    1.0 + ENVIRONMENTAL_SLOPE * risk_index
}

/// Exact analysis, or the reason the neutral fallback applies
pub fn try_analyze(risk_index: f64) -> Result<RiskAnalysisResult, FallbackUsed> {
    if !risk_index.is_finite() {
        return Err(FallbackUsed::new(
            Stage::RiskAnalysis,
            format!("risk index {} is not finite", risk_index),
        ));
    }
    let risk_index = risk_index.clamp(0.0, 1.0);

    let likelihood = risk_index;
    let impact = impact(risk_index);
    let environmental_factor = environmental_factor(risk_index);
    let level = likelihood * impact * environmental_factor;
    if !level.is_finite() {
        return Err(FallbackUsed::new(
            Stage::RiskAnalysis,
            "calculated risk level is not finite",
        ));
    }
    let calculated_risk_level = level.clamp(0.0, 1.0);
    let risk_category = RiskCategory::from_level(calculated_risk_level);

    Ok(RiskAnalysisResult {
        risk_index,
        likelihood,
        impact,
        environmental_factor,
        calculated_risk_level,
        harm_value: impact,
        risk_category,
        priority: risk_category.priority(),
        matrix: matrix_rating(likelihood, impact),
        mitigation: mitigation_priority(calculated_risk_level),
        recommendations: recommendations(risk_category),
        degraded: false,
    })
}

/// Analyze a risk index; never fails
pub fn analyze(risk_index: f64) -> RiskAnalysisResult {
    match try_analyze(risk_index) {
        Ok(result) => {
            debug!(
                risk_index,
                level = result.calculated_risk_level,
                category = %result.risk_category,
                "Risk analyzed"
            );
            result
        }
        Err(fallback) => {
            warn!(reason = %fallback.reason, "Risk analysis fell back to neutral level");
            fallback_result()
        }
    }
}

fn fallback_result() -> RiskAnalysisResult {
    let risk_category = RiskCategory::Medium;
    RiskAnalysisResult {
        risk_index: FALLBACK_LEVEL,
        likelihood: FALLBACK_LEVEL,
        impact: FALLBACK_LEVEL,
        environmental_factor: 1.0,
        calculated_risk_level: FALLBACK_LEVEL,
        harm_value: FALLBACK_LEVEL,
        risk_category,
        priority: risk_category.priority(),
        matrix: matrix_rating(FALLBACK_LEVEL, FALLBACK_LEVEL),
        mitigation: mitigation_priority(FALLBACK_LEVEL),
        recommendations: recommendations(risk_category),
        degraded: true,
    }
}

/// Place a likelihood/impact pair on the 5×5 risk matrix
pub fn matrix_rating(likelihood: f64, impact: f64) -> RiskMatrixRating {
    RiskMatrixRating {
        probability: ProbabilityRating::from_value(likelihood),
        impact: ImpactRating::from_value(impact),
    }
}

/// Treatment urgency for a calculated risk level
pub fn mitigation_priority(level: f64) -> MitigationPriority {
    let (priority, timeframe, resources, escalation) = if level >= 0.75 {
        (
            PriorityLevel::Immediate,
            "Within 24 hours",
            "Dedicated incident response team",
            "Executive leadership",
        )
    } else if level >= 0.5 {
        (
            PriorityLevel::High,
            "Within 1 week",
            "Security team with management oversight",
            "Senior management",
        )
    } else if level >= 0.25 {
        (
            PriorityLevel::Medium,
            "Within 1 month",
            "Security team",
            "Department head",
        )
    } else {
        (
            PriorityLevel::Low,
            "Within 3 months",
            "Routine operations",
            "Asset owner",
        )
    };
    MitigationPriority {
        level: priority,
        timeframe: timeframe.to_string(),
        resources: resources.to_string(),
        escalation: escalation.to_string(),
    }
}

/// Treatment recommendations for a risk category
pub fn recommendations(category: RiskCategory) -> Vec<String> {
    let items: &[&str] = match category {
        RiskCategory::Low => &[
            "Maintain current security controls",
            "Review the asset during the next scheduled assessment",
            "Keep security awareness training current",
        ],
        RiskCategory::Medium => &[
            "Strengthen monitoring of the asset",
            "Review and update access controls",
            "Schedule a vulnerability assessment",
            "Document incident response procedures for the asset",
        ],
        RiskCategory::High => &[
            "Apply additional technical controls",
            "Enable continuous monitoring and alerting",
            "Restrict access to essential personnel",
            "Test backup and recovery procedures",
            "Report the risk to senior management",
        ],
        RiskCategory::Critical => &[
            "Apply emergency risk treatment immediately",
            "Isolate the asset where operations allow",
            "Enforce multi-factor authentication for all access",
            "Activate incident response readiness",
            "Escalate to executive leadership",
            "Reassess after treatment is in place",
        ],
    };
    items.iter().map(|s| s.to_string()).collect()
}

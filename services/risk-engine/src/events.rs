//! Assessment event definitions
//!
//! Events emitted by the risk engine alongside its results, for audit
//! trails and alerting on degraded or disputed classifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use types::assessment::{Methodology, RiskLevel};
use types::classification::{ClassificationCategory, ClassificationResult};
use types::comparison::{BatchComparison, ComparisonResult};
use types::errors::{FallbackUsed, Stage};
use types::ids::AssetId;
use types::risk::{RiskAnalysisResult, RiskCategory, RiskIndex};
use uuid::Uuid;

/// Event emitted by the risk engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentEvent {
    pub event_id: Uuid,
    /// Asset the event concerns; batch events have none
    pub asset_id: Option<AssetId>,
    pub event_type: AssessmentEventType,
    pub timestamp: DateTime<Utc>,
}

/// Assessment event type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssessmentEventType {
    ClassificationCompleted {
        category: ClassificationCategory,
        score: f64,
    },
    /// A stage produced its documented fallback value
    FallbackUsed { stage: Stage, reason: String },
    RiskIdentified { risk_index: f64 },
    RiskAnalyzed {
        category: RiskCategory,
        level: f64,
    },
    /// The fuzzy, SVM and decision tree classifiers did not all agree
    ModelDisagreement {
        fuzzy: ClassificationCategory,
        svm: ClassificationCategory,
        decision_tree: ClassificationCategory,
        consensus: ClassificationCategory,
    },
    ComparisonFailed { reason: String },
    BatchCompleted { completed: usize, failed: usize },
    MethodologyAssessed {
        methodology: Methodology,
        risk_level: RiskLevel,
        risk_score: f64,
    },
}

impl AssessmentEvent {
    pub fn new(
        asset_id: Option<AssetId>,
        event_type: AssessmentEventType,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            asset_id,
            event_type,
            timestamp,
        }
    }
}

pub fn fallback_event(
    asset_id: AssetId,
    fallback: &FallbackUsed,
    timestamp: DateTime<Utc>,
) -> AssessmentEvent {
    AssessmentEvent::new(
        Some(asset_id),
        AssessmentEventType::FallbackUsed {
            stage: fallback.stage,
            reason: fallback.reason.clone(),
        },
        timestamp,
    )
}

/// Completion event, preceded by a fallback event when the fuzzy stage degraded
pub fn events_for_classification(
    asset_id: AssetId,
    result: &ClassificationResult,
    timestamp: DateTime<Utc>,
) -> Vec<AssessmentEvent> {
    let mut events = Vec::new();
    if result.degraded {
        events.push(fallback_event(
            asset_id,
            &FallbackUsed::new(Stage::Classification, "no fuzzy rule fired"),
            timestamp,
        ));
    }
    events.push(AssessmentEvent::new(
        Some(asset_id),
        AssessmentEventType::ClassificationCompleted {
            category: result.category,
            score: result.score,
        },
        timestamp,
    ));
    events
}

pub fn events_for_identification(
    asset_id: AssetId,
    risk_index: &RiskIndex,
    timestamp: DateTime<Utc>,
) -> Vec<AssessmentEvent> {
    let mut events = Vec::new();
    if risk_index.degraded {
        events.push(fallback_event(
            asset_id,
            &FallbackUsed::new(Stage::RiskIdentification, "fuzzy inference unavailable"),
            timestamp,
        ));
    }
    events.push(AssessmentEvent::new(
        Some(asset_id),
        AssessmentEventType::RiskIdentified {
            risk_index: risk_index.value,
        },
        timestamp,
    ));
    events
}

pub fn events_for_analysis(
    asset_id: AssetId,
    result: &RiskAnalysisResult,
    timestamp: DateTime<Utc>,
) -> Vec<AssessmentEvent> {
    let mut events = Vec::new();
    if result.degraded {
        events.push(fallback_event(
            asset_id,
            &FallbackUsed::new(Stage::RiskAnalysis, "risk index was not a finite number"),
            timestamp,
        ));
    }
    events.push(AssessmentEvent::new(
        Some(asset_id),
        AssessmentEventType::RiskAnalyzed {
            category: result.risk_category,
            level: result.calculated_risk_level,
        },
        timestamp,
    ));
    events
}

/// Disagreement event when the comparison was not unanimous
pub fn events_for_comparison(
    asset_id: AssetId,
    result: &ComparisonResult,
    timestamp: DateTime<Utc>,
) -> Vec<AssessmentEvent> {
    if result.consensus.unanimous {
        return Vec::new();
    }
    vec![AssessmentEvent::new(
        Some(asset_id),
        AssessmentEventType::ModelDisagreement {
            fuzzy: result.fuzzy.category,
            svm: result.svm.category,
            decision_tree: result.decision_tree.category,
            consensus: result.consensus.category,
        },
        timestamp,
    )]
}

pub fn comparison_failed_event(
    asset_id: AssetId,
    reason: String,
    timestamp: DateTime<Utc>,
) -> AssessmentEvent {
    AssessmentEvent::new(
        Some(asset_id),
        AssessmentEventType::ComparisonFailed { reason },
        timestamp,
    )
}

pub fn batch_completed_event(batch: &BatchComparison, timestamp: DateTime<Utc>) -> AssessmentEvent {
    AssessmentEvent::new(
        None,
        AssessmentEventType::BatchCompleted {
            completed: batch.completed,
            failed: batch.failed,
        },
        timestamp,
    )
}

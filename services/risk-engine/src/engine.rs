//! Risk engine orchestrator
//!
//! Ties together classification, risk identification, risk analysis,
//! model comparison, ensemble classification and methodology assessment,
//! and emits assessment events alongside every result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use types::assessment::{AssetContext, Methodology, StandardizedRiskResult, ValidationReport};
use types::attributes::{AssetAttributes, CiaTriad};
use types::classification::{ClassificationCategory, ClassificationResult};
use types::comparison::{BatchComparison, ComparisonResult};
use types::errors::{ComparisonError, EngineError};
use types::ids::AssetId;
use types::risk::{RiskAnalysisResult, RiskIndex};

use crate::analyzer;
use crate::classifier::AssetClassifier;
use crate::comparison::ComparisonEngine;
use crate::config::EngineConfig;
use crate::ensemble::{EnsembleClassifier, EnsembleResult};
use crate::events::{self, AssessmentEvent, AssessmentEventType};
use crate::identifier::RiskIdentifier;
use crate::methodology::{self, validation};
use crate::validator;

/// Classification, identification and analysis of one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub asset_id: AssetId,
    pub classification: ClassificationResult,
    pub risk_index: RiskIndex,
    pub analysis: RiskAnalysisResult,
}

impl PipelineReport {
    /// True when any stage used its fallback
    pub fn degraded(&self) -> bool {
        self.classification.degraded || self.risk_index.degraded || self.analysis.degraded
    }
}

/// Methodology assessment with its completeness check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodologyReport {
    pub result: StandardizedRiskResult,
    pub validation: ValidationReport,
}

/// Risk engine service
#[derive(Debug)]
pub struct RiskEngine {
    config: EngineConfig,
    classifier: AssetClassifier,
    identifier: RiskIdentifier,
    comparison: ComparisonEngine,
    ensemble: EnsembleClassifier,
}

impl RiskEngine {
    /// Create a new risk engine with default configuration
    pub fn new() -> Result<Self, EngineError> {
        Self::with_config(EngineConfig::default())
    }

    /// Create a new risk engine with custom configuration
    ///
    /// Trains the comparison models and, when a model directory is
    /// configured, loads the ensemble artifacts found there.
    pub fn with_config(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let classifier = AssetClassifier::new(config.fuzzy_resolution);
        let identifier = RiskIdentifier::new(config.fuzzy_resolution);
        let comparison = ComparisonEngine::new(&config)?;
        let ensemble = match &config.model_dir {
            Some(dir) => EnsembleClassifier::from_dir(
                classifier.clone(),
                config.ensemble_fuzzy_weight,
                dir,
            ),
            None => EnsembleClassifier::new(classifier.clone(), config.ensemble_fuzzy_weight),
        };
        info!(
            resolution = config.fuzzy_resolution,
            ensemble_models = ensemble.model_count(),
            workers = config.batch_workers,
            "Risk engine ready"
        );
        Ok(Self {
            config,
            classifier,
            identifier,
            comparison,
            ensemble,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn comparison_engine(&self) -> &ComparisonEngine {
        &self.comparison
    }

    /// Classify an asset
    pub fn classify(
        &self,
        asset_id: AssetId,
        attrs: &AssetAttributes,
        timestamp: DateTime<Utc>,
    ) -> Result<(ClassificationResult, Vec<AssessmentEvent>), EngineError> {
        let result = self.classifier.classify(attrs)?;
        let events = events::events_for_classification(asset_id, &result, timestamp);
        Ok((result, events))
    }

    /// Risk index of a classified asset
    ///
    /// Fails only when no classification is supplied.
    pub fn identify_risk(
        &self,
        asset_id: AssetId,
        cia: &CiaTriad,
        classification: Option<&ClassificationResult>,
        timestamp: DateTime<Utc>,
    ) -> Result<(RiskIndex, Vec<AssessmentEvent>), EngineError> {
        let classification = validator::require_classification(classification)?;
        let risk_index = self.identifier.compute(cia, classification.score);
        let events = events::events_for_identification(asset_id, &risk_index, timestamp);
        Ok((risk_index, events))
    }

    /// Analyze a risk index; never fails
    pub fn analyze_risk(
        &self,
        asset_id: AssetId,
        risk_index: f64,
        timestamp: DateTime<Utc>,
    ) -> (RiskAnalysisResult, Vec<AssessmentEvent>) {
        let result = analyzer::analyze(risk_index);
        let events = events::events_for_analysis(asset_id, &result, timestamp);
        (result, events)
    }

    /// Full pipeline: classify, identify, analyze
    pub fn assess(
        &self,
        asset_id: AssetId,
        attrs: &AssetAttributes,
        timestamp: DateTime<Utc>,
    ) -> Result<(PipelineReport, Vec<AssessmentEvent>), EngineError> {
        let (classification, mut all_events) = self.classify(asset_id, attrs, timestamp)?;
        let (risk_index, identify_events) =
            self.identify_risk(asset_id, &attrs.cia(), Some(&classification), timestamp)?;
        all_events.extend(identify_events);
        let (analysis, analysis_events) = self.analyze_risk(asset_id, risk_index.value, timestamp);
        all_events.extend(analysis_events);

        let report = PipelineReport {
            asset_id,
            classification,
            risk_index,
            analysis,
        };
        info!(
            asset_id = %asset_id,
            category = %report.classification.category,
            risk_index = report.risk_index.value,
            risk_category = %report.analysis.risk_category,
            degraded = report.degraded(),
            "Asset assessed"
        );
        Ok((report, all_events))
    }

    /// Compare the fuzzy, SVM and decision tree classifications
    ///
    /// A failed comparison is returned alongside a ComparisonFailed event.
    pub fn compare_models(
        &self,
        asset_id: AssetId,
        attrs: &AssetAttributes,
        timestamp: DateTime<Utc>,
    ) -> (Result<ComparisonResult, ComparisonError>, Vec<AssessmentEvent>) {
        match self.comparison.compare(attrs, timestamp) {
            Ok(result) => {
                let events = events::events_for_comparison(asset_id, &result, timestamp);
                (Ok(result), events)
            }
            Err(e) => {
                let event = events::comparison_failed_event(asset_id, e.to_string(), timestamp);
                (Err(e), vec![event])
            }
        }
    }

    /// Compare many assets; failures are counted, not propagated
    pub fn batch_compare(
        &self,
        items: &[AssetAttributes],
        timestamp: DateTime<Utc>,
    ) -> (BatchComparison, Vec<AssessmentEvent>) {
        let batch = self.comparison.batch_compare(items, timestamp);
        let event = events::batch_completed_event(&batch, timestamp);
        (batch, vec![event])
    }

    /// Batch comparison scored against ground truth labels
    pub fn batch_compare_labelled(
        &self,
        items: &[(AssetAttributes, ClassificationCategory)],
        timestamp: DateTime<Utc>,
    ) -> (BatchComparison, Vec<AssessmentEvent>) {
        let batch = self.comparison.batch_compare_labelled(items, timestamp);
        let event = events::batch_completed_event(&batch, timestamp);
        (batch, vec![event])
    }

    /// Weighted vote of the fuzzy classifier and the loaded model artifacts
    pub fn classify_ensemble(
        &self,
        asset_id: AssetId,
        attrs: &AssetAttributes,
        timestamp: DateTime<Utc>,
    ) -> Result<(EnsembleResult, Vec<AssessmentEvent>), EngineError> {
        let result = self.ensemble.classify(attrs)?;
        let events = events::events_for_classification(asset_id, &result.fuzzy, timestamp);
        Ok((result, events))
    }

    /// Assess a caller-built context with one methodology
    pub fn assess_context(
        &self,
        ctx: &AssetContext,
        methodology: Methodology,
        timestamp: DateTime<Utc>,
    ) -> Result<(MethodologyReport, Vec<AssessmentEvent>), EngineError> {
        validator::validate_context(ctx)?;
        let result = methodology::assessor_with(methodology, &self.identifier).assess(ctx, timestamp);
        let validation = validation::validate_result(&result);
        let event = AssessmentEvent::new(
            Some(ctx.asset_id),
            AssessmentEventType::MethodologyAssessed {
                methodology,
                risk_level: result.risk_level,
                risk_score: result.risk_score,
            },
            timestamp,
        );
        Ok((MethodologyReport { result, validation }, vec![event]))
    }

    /// Classify an asset, then assess it with one methodology
    pub fn assess_methodology(
        &self,
        asset_id: AssetId,
        attrs: &AssetAttributes,
        methodology: Methodology,
        timestamp: DateTime<Utc>,
    ) -> Result<(MethodologyReport, Vec<AssessmentEvent>), EngineError> {
        let (classification, mut all_events) = self.classify(asset_id, attrs, timestamp)?;
        let ctx = methodology::standardize_context(asset_id, attrs, classification.score);
        let (report, assess_events) = self.assess_context(&ctx, methodology, timestamp)?;
        all_events.extend(assess_events);
        Ok((report, all_events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methodology::RiskAssessor;
    use types::errors::ClassificationError;
    use types::risk::RiskCategory;

    const TS: &str = "2024-02-16T22:50:56Z";

    fn timestamp() -> DateTime<Utc> {
        TS.parse().unwrap()
    }

    fn engine() -> RiskEngine {
        RiskEngine::new().unwrap()
    }

    fn scenario_one() -> AssetAttributes {
        AssetAttributes::new(0.9, 0.95, 0.85, 0.8, 0.9, 0.95, 0.9)
    }

    // ── Pipeline tests ──

    #[test]
    fn test_classify_emits_completion() {
        let (result, events) = engine()
            .classify(AssetId::new(), &scenario_one(), timestamp())
            .unwrap();
        assert_eq!(result.category, ClassificationCategory::Restricted);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp, timestamp());
    }

    #[test]
    fn test_classify_rejects_invalid_input() {
        let err = engine()
            .classify(AssetId::new(), &AssetAttributes::uniform(-0.1), timestamp())
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Classification(ClassificationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_identify_requires_classification() {
        let err = engine()
            .identify_risk(AssetId::new(), &CiaTriad::new(0.5, 0.5, 0.5), None, timestamp())
            .unwrap_err();
        assert!(matches!(err, EngineError::MissingPrerequisite(_)));
    }

    #[test]
    fn test_full_pipeline() {
        let asset_id = AssetId::new();
        let (report, events) = engine().assess(asset_id, &scenario_one(), timestamp()).unwrap();
        assert_eq!(report.asset_id, asset_id);
        assert_eq!(report.classification.category, ClassificationCategory::Restricted);
        assert!(report.analysis.calculated_risk_level > 0.5);
        assert!(!report.degraded());
        // classification, identification, analysis
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.asset_id == Some(asset_id)));
    }

    #[test]
    fn test_analyze_non_finite_emits_fallback() {
        let (result, events) = engine().analyze_risk(AssetId::new(), f64::NAN, timestamp());
        assert!(result.degraded);
        assert_eq!(result.risk_category, RiskCategory::Medium);
        assert_eq!(events.len(), 2);
    }

    // ── Comparison tests ──

    #[test]
    fn test_unanimous_comparison_emits_nothing() {
        let (result, events) = engine().compare_models(AssetId::new(), &scenario_one(), timestamp());
        assert!(result.unwrap().consensus.unanimous);
        assert!(events.is_empty());
    }

    #[test]
    fn test_split_comparison_emits_disagreement() {
        let attrs = AssetAttributes::new(0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0);
        let (result, events) = engine().compare_models(AssetId::new(), &attrs, timestamp());
        let result = result.unwrap();
        assert!(!result.consensus.unanimous);
        assert_eq!(result.created_at, events[0].timestamp);
        assert!(matches!(
            events[0].event_type,
            AssessmentEventType::ModelDisagreement { .. }
        ));
    }

    #[test]
    fn test_failed_comparison_emits_event() {
        let (result, events) =
            engine().compare_models(AssetId::new(), &AssetAttributes::uniform(2.0), timestamp());
        assert!(result.is_err());
        assert!(matches!(
            events[0].event_type,
            AssessmentEventType::ComparisonFailed { .. }
        ));
    }

    #[test]
    fn test_batch_emits_summary() {
        let items = [AssetAttributes::uniform(0.1), AssetAttributes::uniform(1.5)];
        let (batch, events) = engine().batch_compare(&items, timestamp());
        assert_eq!(batch.completed, 1);
        assert_eq!(
            events[0].event_type,
            AssessmentEventType::BatchCompleted {
                completed: 1,
                failed: 1
            }
        );
        assert_eq!(events[0].asset_id, None);
    }

    // ── Ensemble and methodology tests ──

    #[test]
    fn test_ensemble_without_models_follows_fuzzy() {
        let (result, events) = engine()
            .classify_ensemble(AssetId::new(), &AssetAttributes::uniform(0.1), timestamp())
            .unwrap();
        assert_eq!(result.category, ClassificationCategory::Public);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_assess_methodology() {
        let (report, events) = engine()
            .assess_methodology(AssetId::new(), &scenario_one(), Methodology::Integrated, timestamp())
            .unwrap();
        assert_eq!(report.result.methodology, Methodology::Integrated);
        assert!(report.validation.valid);
        assert_eq!(report.result.assessed_at, timestamp());
        assert!(matches!(
            events.last().map(|e| &e.event_type),
            Some(AssessmentEventType::MethodologyAssessed {
                methodology: Methodology::Integrated,
                ..
            })
        ));
    }

    #[test]
    fn test_iso_assessment_uses_configured_resolution() {
        let config = EngineConfig {
            fuzzy_resolution: 0.25,
            ..EngineConfig::default()
        };
        let engine = RiskEngine::with_config(config).unwrap();
        let ctx = AssetContext::new(AssetId::new(), CiaTriad::new(0.3, 0.4, 0.3), 0.2);

        let (report, _) = engine
            .assess_context(&ctx, Methodology::Iso27005, timestamp())
            .unwrap();
        let coarse = methodology::Iso27005Assessor::default()
            .with_identifier(RiskIdentifier::new(0.25))
            .assess(&ctx, timestamp());
        let fine = methodology::assessor_for(Methodology::Iso27005).assess(&ctx, timestamp());
        assert_eq!(report.result, coarse);
        assert!((report.result.risk_score - fine.risk_score).abs() > 1e-6);
    }

    #[test]
    fn test_assess_context_rejects_bad_rating() {
        let ctx = AssetContext::new(AssetId::new(), CiaTriad::new(0.5, 1.5, 0.5), 0.5);
        let err = engine()
            .assess_context(&ctx, Methodology::Octave, timestamp())
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidContext { .. }));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            batch_workers: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            RiskEngine::with_config(config),
            Err(EngineError::Config(_))
        ));
    }
}

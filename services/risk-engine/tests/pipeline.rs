//! End-to-end pipeline tests for the risk engine
//!
//! Tests include:
//! - Critical asset classified Restricted and analyzed as high risk
//! - Low CIA profile identified well below the medium band
//! - Maximum risk index analyzed as Very High Risk
//! - Category thresholds at the band edges
//! - Risk matrix ratings including their upper band edge
//! - Every methodology producing a valid standardized result

mod common;

use common::{critical_asset, init_tracing, timestamp};
use risk_engine::analyzer;
use risk_engine::classifier::classify_asset;
use risk_engine::identifier::compute_risk_index;
use risk_engine::methodology::validation::validate_result;
use risk_engine::RiskEngine;
use types::assessment::Methodology;
use types::attributes::AssetAttributes;
use types::classification::ClassificationCategory;
use types::ids::AssetId;
use types::risk::{ImpactRating, PriorityLevel, ProbabilityRating, RiskCategory};

#[test]
fn critical_asset_is_restricted() {
    init_tracing();
    let result = classify_asset(0.9, 0.95, 0.85, 0.8, 0.9, 0.95, 0.9).unwrap();
    assert_eq!(result.category, ClassificationCategory::Restricted);
    assert!(result.score > 0.75);
    assert!(!result.degraded);
}

#[test]
fn low_cia_profile_is_low_risk() {
    init_tracing();
    let risk_index = compute_risk_index(0.3, 0.4, 0.3, 0.2);
    assert!(!risk_index.degraded);
    assert!(risk_index.value < 0.3);

    let analysis = analyzer::analyze(risk_index.value);
    assert_eq!(analysis.risk_category, RiskCategory::Low);
    assert_eq!(analysis.risk_category.label(), "Low Risk");
    assert_eq!(analysis.priority, PriorityLevel::Low);
}

#[test]
fn maximum_index_is_very_high_risk() {
    let analysis = analyzer::analyze(1.0);
    assert_eq!(analysis.impact, 1.0);
    assert!((analysis.environmental_factor - 1.15).abs() < 1e-12);
    assert_eq!(analysis.calculated_risk_level, 1.0);
    assert_eq!(analysis.risk_category.label(), "Very High Risk");
    assert_eq!(analysis.mitigation.timeframe, "Within 24 hours");
}

#[test]
fn category_thresholds_are_exact() {
    use ClassificationCategory::*;
    assert_eq!(ClassificationCategory::from_score(0.25), Public);
    assert_eq!(ClassificationCategory::from_score(0.250001), Official);
    assert_eq!(ClassificationCategory::from_score(0.5), Official);
    assert_eq!(ClassificationCategory::from_score(0.500001), Confidential);
    assert_eq!(ClassificationCategory::from_score(0.75), Confidential);
    assert_eq!(ClassificationCategory::from_score(0.750001), Restricted);
}

#[test]
fn matrix_ratings_include_their_upper_edge() {
    let at_edge = |value: f64| analyzer::matrix_rating(value, value);

    assert_eq!(at_edge(0.2).probability, ProbabilityRating::VeryLow);
    assert_eq!(at_edge(0.2).impact, ImpactRating::Minimal);
    assert_eq!(at_edge(0.4).probability, ProbabilityRating::Low);
    assert_eq!(at_edge(0.4).impact, ImpactRating::Minor);
    assert_eq!(at_edge(0.6).probability, ProbabilityRating::Medium);
    assert_eq!(at_edge(0.6).impact, ImpactRating::Moderate);
    assert_eq!(at_edge(0.8).probability, ProbabilityRating::High);
    assert_eq!(at_edge(0.8).impact, ImpactRating::Major);

    let above = analyzer::matrix_rating(0.800001, 0.200001);
    assert_eq!(above.probability, ProbabilityRating::VeryHigh);
    assert_eq!(above.impact, ImpactRating::Minor);
}

#[test]
fn engine_pipeline_matches_stage_functions() {
    init_tracing();
    let engine = RiskEngine::new().unwrap();
    let attrs = critical_asset();
    let (report, events) = engine.assess(AssetId::new(), &attrs, timestamp()).unwrap();

    let classification = classify_asset(0.9, 0.95, 0.85, 0.8, 0.9, 0.95, 0.9).unwrap();
    assert_eq!(report.classification, classification);

    let risk_index = compute_risk_index(0.9, 0.95, 0.9, classification.score);
    assert_eq!(report.risk_index, risk_index);
    assert_eq!(report.analysis, analyzer::analyze(risk_index.value));
    assert_eq!(report.analysis.likelihood, report.risk_index.value);
    assert_eq!(events.len(), 3);
}

#[test]
fn every_methodology_produces_valid_result() {
    init_tracing();
    let engine = RiskEngine::new().unwrap();
    let profiles = [
        critical_asset(),
        AssetAttributes::uniform(0.2),
        AssetAttributes::new(0.5, 0.3, 0.6, 0.4, 0.35, 0.55, 0.45),
    ];
    for attrs in &profiles {
        for methodology in Methodology::ALL {
            let (report, _) = engine
                .assess_methodology(AssetId::new(), attrs, methodology, timestamp())
                .unwrap();
            assert_eq!(report.result.methodology, methodology);
            assert!((0.0..=1.0).contains(&report.result.risk_score));
            assert!((0.0..=1.0).contains(&report.result.likelihood));
            assert!((0.0..=1.0).contains(&report.result.impact));
            assert!(report.validation.valid, "{methodology}: {:?}", report.validation);
            assert_eq!(report.validation, validate_result(&report.result));
        }
    }
}

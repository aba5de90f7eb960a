//! Classification quality metrics
//!
//! Precision, recall and F1 are support-weighted averages over the
//! categories present in the ground truth; an undefined ratio counts as 0.

use types::classification::ClassificationCategory;
use types::comparison::{Approach, ApproachMetrics, ComparisonResult, PerformanceReport};

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Metrics for one approach from (truth, predicted) pairs
pub fn approach_metrics(
    approach: Approach,
    pairs: &[(ClassificationCategory, ClassificationCategory)],
) -> ApproachMetrics {
    let mut confusion_matrix = [[0usize; 4]; 4];
    for (truth, predicted) in pairs {
        confusion_matrix[truth.index()][predicted.index()] += 1;
    }

    let samples = pairs.len();
    let correct: usize = (0..4).map(|c| confusion_matrix[c][c]).sum();

    let mut precision = 0.0;
    let mut recall = 0.0;
    let mut f1_score = 0.0;
    for class in 0..4 {
        let support: usize = confusion_matrix[class].iter().sum();
        if support == 0 {
            continue;
        }
        let true_positive = confusion_matrix[class][class];
        let predicted: usize = (0..4).map(|row| confusion_matrix[row][class]).sum();
        let p = ratio(true_positive, predicted);
        let r = ratio(true_positive, support);
        let f = if p + r > 0.0 { 2.0 * p * r / (p + r) } else { 0.0 };
        let weight = ratio(support, samples);
        precision += weight * p;
        recall += weight * r;
        f1_score += weight * f;
    }

    ApproachMetrics {
        approach,
        accuracy: ratio(correct, samples),
        precision,
        recall,
        f1_score,
        confusion_matrix,
        samples,
    }
}

/// Score every approach against ground truth and rank them by F1
///
/// Returns `None` when there is nothing to score. Equal F1 scores keep the
/// fuzzy, SVM, decision tree order.
pub fn performance_report(
    labelled: &[(&ComparisonResult, ClassificationCategory)],
) -> Option<PerformanceReport> {
    if labelled.is_empty() {
        return None;
    }

    let metrics: Vec<ApproachMetrics> = Approach::ALL
        .iter()
        .map(|approach| {
            let pairs: Vec<_> = labelled
                .iter()
                .map(|(result, truth)| (*truth, result.prediction(*approach).category))
                .collect();
            approach_metrics(*approach, &pairs)
        })
        .collect();

    let mut ranked: Vec<&ApproachMetrics> = metrics.iter().collect();
    ranked.sort_by(|a, b| b.f1_score.total_cmp(&a.f1_score));
    let ranking: Vec<Approach> = ranked.iter().map(|m| m.approach).collect();
    let best = *ranking.first()?;

    Some(PerformanceReport {
        metrics,
        ranking,
        best,
    })
}

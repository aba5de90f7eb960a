//! Reference training corpus
//!
//! Six hand-labelled attribute vectors per category, in feature order
//! business criticality, data sensitivity, operational dependency,
//! regulatory impact, confidentiality, integrity, availability.

use types::classification::ClassificationCategory;

const PUBLIC: [[f64; 7]; 6] = [
    [0.10, 0.05, 0.10, 0.05, 0.10, 0.10, 0.15],
    [0.15, 0.10, 0.05, 0.10, 0.05, 0.15, 0.10],
    [0.05, 0.15, 0.10, 0.10, 0.15, 0.05, 0.10],
    [0.20, 0.10, 0.15, 0.05, 0.10, 0.10, 0.20],
    [0.10, 0.20, 0.10, 0.15, 0.20, 0.10, 0.05],
    [0.15, 0.05, 0.20, 0.10, 0.05, 0.20, 0.15],
];

const OFFICIAL: [[f64; 7]; 6] = [
    [0.35, 0.30, 0.40, 0.30, 0.35, 0.40, 0.35],
    [0.40, 0.35, 0.30, 0.35, 0.30, 0.35, 0.40],
    [0.30, 0.40, 0.35, 0.40, 0.40, 0.30, 0.30],
    [0.45, 0.30, 0.35, 0.30, 0.35, 0.45, 0.40],
    [0.35, 0.45, 0.40, 0.35, 0.45, 0.35, 0.35],
    [0.40, 0.35, 0.45, 0.40, 0.30, 0.40, 0.45],
];

const CONFIDENTIAL: [[f64; 7]; 6] = [
    [0.60, 0.65, 0.55, 0.60, 0.65, 0.60, 0.55],
    [0.65, 0.60, 0.60, 0.55, 0.60, 0.65, 0.60],
    [0.55, 0.70, 0.60, 0.65, 0.70, 0.55, 0.60],
    [0.70, 0.60, 0.65, 0.60, 0.55, 0.70, 0.65],
    [0.60, 0.55, 0.70, 0.65, 0.60, 0.60, 0.70],
    [0.65, 0.65, 0.60, 0.70, 0.65, 0.65, 0.55],
];

const RESTRICTED: [[f64; 7]; 6] = [
    [0.90, 0.95, 0.85, 0.90, 0.95, 0.90, 0.85],
    [0.85, 0.90, 0.90, 0.85, 0.90, 0.95, 0.90],
    [0.95, 0.85, 0.80, 0.90, 0.85, 0.90, 0.95],
    [0.80, 0.95, 0.90, 0.95, 0.90, 0.85, 0.80],
    [0.90, 0.90, 0.95, 0.80, 0.85, 0.80, 0.90],
    [0.85, 0.80, 0.85, 0.85, 0.80, 0.85, 0.85],
];

/// Labelled samples in category order
pub fn reference_corpus() -> Vec<([f64; 7], ClassificationCategory)> {
    [
        (PUBLIC, ClassificationCategory::Public),
        (OFFICIAL, ClassificationCategory::Official),
        (CONFIDENTIAL, ClassificationCategory::Confidential),
        (RESTRICTED, ClassificationCategory::Restricted),
    ]
    .into_iter()
    .flat_map(|(rows, category)| rows.into_iter().map(move |row| (row, category)))
    .collect()
}

/// Corpus split into feature rows and class indices
pub fn training_set() -> (Vec<Vec<f64>>, Vec<usize>) {
    reference_corpus()
        .into_iter()
        .map(|(row, category)| (row.to_vec(), category.index()))
        .unzip()
}

//! Multi-class support vector machine with an RBF kernel
//!
//! One binary machine per class pair (one-vs-one), each trained with the
//! simplified SMO algorithm. The second multiplier of every SMO step is
//! drawn from a seeded ChaCha8 stream so training is reproducible.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use types::errors::ModelError;

/// Minimum multiplier change that counts as progress
const ALPHA_EPSILON: f64 = 1e-5;

/// SMO hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvmParams {
    /// Box constraint
    pub c: f64,
    /// RBF width; `None` uses 1 / feature count
    pub gamma: Option<f64>,
    pub tolerance: f64,
    /// Consecutive sweeps without change before training stops
    pub max_passes: usize,
    /// Hard cap on sweeps
    pub max_iterations: usize,
    pub seed: u64,
}

impl Default for SvmParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            gamma: None,
            tolerance: 1e-3,
            max_passes: 10,
            max_iterations: 1000,
            seed: 42,
        }
    }
}

fn rbf(gamma: f64, a: &[f64], b: &[f64]) -> f64 {
    let distance: f64 = a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum();
    (-gamma * distance).exp()
}

/// Binary machine voting for `positive` when its decision value is > 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PairwiseMachine {
    positive: usize,
    negative: usize,
    support_vectors: Vec<Vec<f64>>,
    /// Multiplier times label for each support vector
    coefficients: Vec<f64>,
    bias: f64,
}

impl PairwiseMachine {
    fn decision(&self, gamma: f64, x: &[f64]) -> f64 {
        self.support_vectors
            .iter()
            .zip(&self.coefficients)
            .map(|(sv, coef)| coef * rbf(gamma, sv, x))
            .sum::<f64>()
            + self.bias
    }
}

/// Trained one-vs-one RBF SVM over class indices `0..n_classes`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Svm {
    gamma: f64,
    n_features: usize,
    n_classes: usize,
    machines: Vec<PairwiseMachine>,
}

impl Svm {
    /// Train on samples labelled with class indices
    pub fn fit(
        samples: &[Vec<f64>],
        labels: &[usize],
        n_classes: usize,
        params: &SvmParams,
    ) -> Result<Self, ModelError> {
        if samples.is_empty() || samples.len() != labels.len() {
            return Err(ModelError::Training(format!(
                "{} samples with {} labels",
                samples.len(),
                labels.len()
            )));
        }
        if n_classes < 2 {
            return Err(ModelError::Training("need at least two classes".to_string()));
        }
        let n_features = samples[0].len();
        if let Some(bad) = samples.iter().find(|s| s.len() != n_features) {
            return Err(ModelError::FeatureMismatch {
                expected: n_features,
                actual: bad.len(),
            });
        }
        if let Some(bad) = labels.iter().find(|l| **l >= n_classes) {
            return Err(ModelError::UnknownClass(*bad));
        }

        let gamma = params.gamma.unwrap_or(1.0 / n_features as f64);
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        let mut machines = Vec::new();

        for positive in 0..n_classes {
            for negative in (positive + 1)..n_classes {
                let (xs, ys): (Vec<&[f64]>, Vec<f64>) = samples
                    .iter()
                    .zip(labels)
                    .filter(|(_, l)| **l == positive || **l == negative)
                    .map(|(s, l)| (s.as_slice(), if *l == positive { 1.0 } else { -1.0 }))
                    .unzip();
                if !ys.iter().any(|y| *y > 0.0) || !ys.iter().any(|y| *y < 0.0) {
                    return Err(ModelError::Training(format!(
                        "class pair ({}, {}) is missing samples",
                        positive, negative
                    )));
                }

                let (alphas, bias) = smo(&xs, &ys, gamma, params, &mut rng);
                let mut support_vectors = Vec::new();
                let mut coefficients = Vec::new();
                for ((x, y), alpha) in xs.iter().zip(&ys).zip(&alphas) {
                    if *alpha > 0.0 {
                        support_vectors.push(x.to_vec());
                        coefficients.push(alpha * y);
                    }
                }
                debug!(
                    positive,
                    negative,
                    support_vectors = support_vectors.len(),
                    "Trained pairwise SVM"
                );
                machines.push(PairwiseMachine {
                    positive,
                    negative,
                    support_vectors,
                    coefficients,
                    bias,
                });
            }
        }

        Ok(Self {
            gamma,
            n_features,
            n_classes,
            machines,
        })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Predicted class index and vote share
    ///
    /// Each pairwise machine casts one vote; ties go to the lowest index.
    pub fn predict(&self, x: &[f64]) -> Result<(usize, f64), ModelError> {
        if x.len() != self.n_features {
            return Err(ModelError::FeatureMismatch {
                expected: self.n_features,
                actual: x.len(),
            });
        }
        if self.n_classes == 0 || self.machines.is_empty() {
            return Err(ModelError::Prediction("model has no machines".to_string()));
        }

        let mut votes = vec![0usize; self.n_classes];
        for machine in &self.machines {
            let winner = if machine.decision(self.gamma, x) > 0.0 {
                machine.positive
            } else {
                machine.negative
            };
            let slot = votes
                .get_mut(winner)
                .ok_or(ModelError::UnknownClass(winner))?;
            *slot += 1;
        }

        let mut best = 0;
        for (class, count) in votes.iter().enumerate() {
            if *count > votes[best] {
                best = class;
            }
        }
        let confidence = votes[best] as f64 / (self.n_classes - 1) as f64;
        Ok((best, confidence))
    }
}

/// Simplified SMO for one binary problem with labels ±1
fn smo(
    xs: &[&[f64]],
    ys: &[f64],
    gamma: f64,
    params: &SvmParams,
    rng: &mut ChaCha8Rng,
) -> (Vec<f64>, f64) {
    let m = xs.len();
    let kernel: Vec<Vec<f64>> = xs
        .iter()
        .map(|a| xs.iter().map(|b| rbf(gamma, a, b)).collect())
        .collect();
    let c = params.c;
    let mut alphas = vec![0.0; m];
    let mut bias = 0.0;

    let output = |alphas: &[f64], bias: f64, i: usize| -> f64 {
        (0..m).map(|k| alphas[k] * ys[k] * kernel[k][i]).sum::<f64>() + bias
    };

    if m < 2 {
        return (alphas, bias);
    }

    let mut passes = 0;
    let mut iterations = 0;
    while passes < params.max_passes && iterations < params.max_iterations {
        iterations += 1;
        let mut changed = 0;
        for i in 0..m {
            let error_i = output(&alphas, bias, i) - ys[i];
            let violates = (ys[i] * error_i < -params.tolerance && alphas[i] < c)
                || (ys[i] * error_i > params.tolerance && alphas[i] > 0.0);
            if !violates {
                continue;
            }

            let mut j = rng.gen_range(0..m - 1);
            if j >= i {
                j += 1;
            }
            let error_j = output(&alphas, bias, j) - ys[j];
            let (alpha_i_old, alpha_j_old) = (alphas[i], alphas[j]);

            let (low, high) = if ys[i] != ys[j] {
                ((alpha_j_old - alpha_i_old).max(0.0), (c + alpha_j_old - alpha_i_old).min(c))
            } else {
                ((alpha_i_old + alpha_j_old - c).max(0.0), (alpha_i_old + alpha_j_old).min(c))
            };
            if low == high {
                continue;
            }

            let eta = 2.0 * kernel[i][j] - kernel[i][i] - kernel[j][j];
            if eta >= 0.0 {
                continue;
            }

            let alpha_j = (alpha_j_old - ys[j] * (error_i - error_j) / eta).clamp(low, high);
            if (alpha_j - alpha_j_old).abs() < ALPHA_EPSILON {
                continue;
            }
            let alpha_i = alpha_i_old + ys[i] * ys[j] * (alpha_j_old - alpha_j);
            alphas[i] = alpha_i;
            alphas[j] = alpha_j;

            let b1 = bias
                - error_i
                - ys[i] * (alpha_i - alpha_i_old) * kernel[i][i]
                - ys[j] * (alpha_j - alpha_j_old) * kernel[i][j];
            let b2 = bias
                - error_j
                - ys[i] * (alpha_i - alpha_i_old) * kernel[i][j]
                - ys[j] * (alpha_j - alpha_j_old) * kernel[j][j];
            bias = if alpha_i > 0.0 && alpha_i < c {
                b1
            } else if alpha_j > 0.0 && alpha_j < c {
                b2
            } else {
                (b1 + b2) / 2.0
            };
            changed += 1;
        }
        passes = if changed == 0 { passes + 1 } else { 0 };
    }

    (alphas, bias)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blobs() -> (Vec<Vec<f64>>, Vec<usize>) {
        let samples = vec![
            vec![-1.0, -1.0],
            vec![-1.2, -0.8],
            vec![-0.8, -1.1],
            vec![1.0, 1.0],
            vec![1.1, 0.9],
            vec![0.9, 1.2],
        ];
        (samples, vec![0, 0, 0, 1, 1, 1])
    }

    #[test]
    fn test_separates_two_blobs() {
        let (samples, labels) = two_blobs();
        let svm = Svm::fit(&samples, &labels, 2, &SvmParams::default()).unwrap();
        assert_eq!(svm.predict(&[-1.0, -0.9]).unwrap(), (0, 1.0));
        assert_eq!(svm.predict(&[1.0, 1.1]).unwrap(), (1, 1.0));
    }

    #[test]
    fn test_same_seed_same_model() {
        let (samples, labels) = two_blobs();
        let a = Svm::fit(&samples, &labels, 2, &SvmParams::default()).unwrap();
        let b = Svm::fit(&samples, &labels, 2, &SvmParams::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_feature_mismatch() {
        let (samples, labels) = two_blobs();
        let svm = Svm::fit(&samples, &labels, 2, &SvmParams::default()).unwrap();
        assert_eq!(
            svm.predict(&[0.0]),
            Err(ModelError::FeatureMismatch { expected: 2, actual: 1 })
        );
    }

    #[test]
    fn test_missing_class_rejected() {
        let (samples, _) = two_blobs();
        let result = Svm::fit(&samples, &[0; 6], 2, &SvmParams::default());
        assert!(matches!(result, Err(ModelError::Training(_))));
    }

    #[test]
    fn test_label_out_of_range_rejected() {
        let (samples, _) = two_blobs();
        let result = Svm::fit(&samples, &[0, 0, 0, 1, 1, 5], 2, &SvmParams::default());
        assert_eq!(result, Err(ModelError::UnknownClass(5)));
    }
}

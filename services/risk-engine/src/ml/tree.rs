//! CART decision tree with Gini impurity

use serde::{Deserialize, Serialize};
use types::errors::ModelError;

/// Split gains smaller than this are treated as ties
const GINI_EPSILON: f64 = 1e-12;

/// Tree growth limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 5,
            min_samples_split: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Node {
    Leaf {
        class: usize,
        confidence: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        /// Samples with `x[feature] <= threshold`
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// Trained classification tree over class indices `0..n_classes`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    n_features: usize,
    n_classes: usize,
    root: Node,
}

fn gini(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts.iter().map(|c| (*c as f64 / total).powi(2)).sum::<f64>()
}

struct Builder<'a> {
    samples: &'a [Vec<f64>],
    labels: &'a [usize],
    n_features: usize,
    n_classes: usize,
    params: &'a TreeParams,
}

impl Builder<'_> {
    fn counts(&self, indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes];
        for &i in indices {
            counts[self.labels[i]] += 1;
        }
        counts
    }

    fn leaf(counts: &[usize]) -> Node {
        let mut class = 0;
        for (c, count) in counts.iter().enumerate() {
            if *count > counts[class] {
                class = c;
            }
        }
        let total: usize = counts.iter().sum();
        let confidence = if total > 0 {
            counts[class] as f64 / total as f64
        } else {
            0.0
        };
        Node::Leaf { class, confidence }
    }

    fn build(&self, indices: &[usize], depth: usize) -> Node {
        let counts = self.counts(indices);
        let impurity = gini(&counts);
        if depth >= self.params.max_depth
            || indices.len() < self.params.min_samples_split
            || impurity == 0.0
        {
            return Self::leaf(&counts);
        }

        let mut best: Option<(f64, usize, f64)> = None;
        for feature in 0..self.n_features {
            let mut values: Vec<f64> = indices.iter().map(|&i| self.samples[i][feature]).collect();
            values.sort_by(|a, b| a.total_cmp(b));
            values.dedup();

            for pair in values.windows(2) {
                let threshold = (pair[0] + pair[1]) / 2.0;
                let mut left = vec![0; self.n_classes];
                let mut right = vec![0; self.n_classes];
                for &i in indices {
                    if self.samples[i][feature] <= threshold {
                        left[self.labels[i]] += 1;
                    } else {
                        right[self.labels[i]] += 1;
                    }
                }
                let n_left: usize = left.iter().sum();
                let n_right: usize = right.iter().sum();
                let weighted = (n_left as f64 * gini(&left) + n_right as f64 * gini(&right))
                    / indices.len() as f64;
                let improves = match best {
                    None => true,
                    Some((score, _, _)) => weighted < score - GINI_EPSILON,
                };
                if improves {
                    best = Some((weighted, feature, threshold));
                }
            }
        }

        match best {
            Some((score, feature, threshold)) if score < impurity => {
                let (left, right): (Vec<usize>, Vec<usize>) = indices
                    .iter()
                    .copied()
                    .partition(|&i| self.samples[i][feature] <= threshold);
                Node::Split {
                    feature,
                    threshold,
                    left: Box::new(self.build(&left, depth + 1)),
                    right: Box::new(self.build(&right, depth + 1)),
                }
            }
            _ => Self::leaf(&counts),
        }
    }
}

impl DecisionTree {
    /// Grow a tree on samples labelled with class indices
    ///
    /// Candidate thresholds are midpoints between consecutive distinct
    /// values; the first strictly best split in feature order wins.
    pub fn fit(
        samples: &[Vec<f64>],
        labels: &[usize],
        n_classes: usize,
        params: &TreeParams,
    ) -> Result<Self, ModelError> {
        if samples.is_empty() || samples.len() != labels.len() {
            return Err(ModelError::Training(format!(
                "{} samples with {} labels",
                samples.len(),
                labels.len()
            )));
        }
        if n_classes == 0 {
            return Err(ModelError::Training("need at least one class".to_string()));
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

        let builder = Builder {
            samples,
            labels,
            n_features,
            n_classes,
            params,
        };
        let indices: Vec<usize> = (0..samples.len()).collect();
        let root = builder.build(&indices, 0);

        Ok(Self {
            n_features,
            n_classes,
            root,
        })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Depth of the deepest leaf, zero for a single leaf
    pub fn depth(&self) -> usize {
        fn walk(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(left).max(walk(right)),
            }
        }
        walk(&self.root)
    }

    /// Predicted class index and the leaf's class proportion
    pub fn predict(&self, x: &[f64]) -> Result<(usize, f64), ModelError> {
        if x.len() != self.n_features {
            return Err(ModelError::FeatureMismatch {
                expected: self.n_features,
                actual: x.len(),
            });
        }
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { class, confidence } => return Ok((*class, *confidence)),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = x
                        .get(*feature)
                        .ok_or(ModelError::FeatureMismatch {
                            expected: feature + 1,
                            actual: x.len(),
                        })?;
                    node = if *value <= *threshold { &**left } else { &**right };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gini_impurity() {
        assert_eq!(gini(&[4, 0]), 0.0);
        assert!((gini(&[2, 2]) - 0.5).abs() < 1e-12);
        assert_eq!(gini(&[]), 0.0);
    }

    #[test]
    fn test_single_threshold_split() {
        let samples = vec![vec![0.1], vec![0.2], vec![0.8], vec![0.9]];
        let tree = DecisionTree::fit(&samples, &[0, 0, 1, 1], 2, &TreeParams::default()).unwrap();
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.predict(&[0.5]).unwrap(), (0, 1.0));
        assert_eq!(tree.predict(&[0.51]).unwrap(), (1, 1.0));
    }

    #[test]
    fn test_depth_limit_yields_majority_leaf() {
        let samples = vec![vec![0.1], vec![0.2], vec![0.3], vec![0.9]];
        let params = TreeParams {
            max_depth: 0,
            min_samples_split: 2,
        };
        let tree = DecisionTree::fit(&samples, &[0, 0, 1, 1], 2, &params).unwrap();
        assert_eq!(tree.depth(), 0);
        // Tied counts resolve to the lowest class
        assert_eq!(tree.predict(&[0.9]).unwrap(), (0, 0.5));
    }

    #[test]
    fn test_identical_samples_cannot_split() {
        let samples = vec![vec![0.5], vec![0.5], vec![0.5]];
        let tree = DecisionTree::fit(&samples, &[1, 0, 1], 2, &TreeParams::default()).unwrap();
        let (class, confidence) = tree.predict(&[0.5]).unwrap();
        assert_eq!(class, 1);
        assert!((confidence - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_feature_mismatch() {
        let tree = DecisionTree::fit(&[vec![0.0, 1.0]], &[0], 1, &TreeParams::default()).unwrap();
        assert!(tree.predict(&[0.0]).is_err());
    }
}

//! Per-feature standardization

use serde::{Deserialize, Serialize};
use types::errors::ModelError;

/// Centers each feature on its mean and divides by its population standard
/// deviation. Constant features map to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(samples: &[Vec<f64>]) -> Result<Self, ModelError> {
        let first = samples
            .first()
            .ok_or_else(|| ModelError::Training("cannot fit scaler on no samples".to_string()))?;
        let width = first.len();
        if let Some(bad) = samples.iter().find(|s| s.len() != width) {
            return Err(ModelError::FeatureMismatch {
                expected: width,
                actual: bad.len(),
            });
        }

        let n = samples.len() as f64;
        let mean: Vec<f64> = (0..width)
            .map(|j| samples.iter().map(|s| s[j]).sum::<f64>() / n)
            .collect();
        let scale = (0..width)
            .map(|j| {
                let variance = samples.iter().map(|s| (s[j] - mean[j]).powi(2)).sum::<f64>() / n;
                variance.sqrt()
            })
            .collect();

        Ok(Self { mean, scale })
    }

    pub fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        if features.len() != self.mean.len() || self.scale.len() != self.mean.len() {
            return Err(ModelError::FeatureMismatch {
                expected: self.mean.len(),
                actual: features.len(),
            });
        }
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| if *scale > 0.0 { (x - mean) / scale } else { 0.0 })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_uses_population_deviation() {
        let scaler = StandardScaler::fit(&[vec![1.0, 5.0], vec![3.0, 5.0]]).unwrap();
        assert_eq!(scaler.mean, vec![2.0, 5.0]);
        assert_eq!(scaler.scale, vec![1.0, 0.0]);
    }

    #[test]
    fn test_transform_centers_and_scales() {
        let scaler = StandardScaler::fit(&[vec![1.0, 5.0], vec![3.0, 5.0]]).unwrap();
        assert_eq!(scaler.transform(&[3.0, 9.0]).unwrap(), vec![1.0, 0.0]);
    }

    #[test]
    fn test_width_mismatch_rejected() {
        let scaler = StandardScaler::fit(&[vec![0.0, 1.0]]).unwrap();
        assert_eq!(
            scaler.transform(&[0.0]),
            Err(ModelError::FeatureMismatch { expected: 2, actual: 1 })
        );
        assert!(StandardScaler::fit(&[vec![0.0], vec![0.0, 1.0]]).is_err());
        assert!(StandardScaler::fit(&[]).is_err());
    }
}

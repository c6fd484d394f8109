//! Standard scaler: `(x - mean) / scale` per feature.

use serde::{Deserialize, Serialize};

use crate::domain::StageFault;
use crate::ports::FeatureScaler;

/// Fitted `StandardScaler` statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Check the fitted statistics.
    ///
    /// # Errors
    /// Returns error if the vectors are empty, differ in length, or hold
    /// non-finite or negative values.
    pub fn validate(&self) -> Result<(), String> {
        if self.mean.is_empty() {
            return Err("Scaler has no features".into());
        }
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "Scaler mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if let Some(i) = self.mean.iter().position(|m| !m.is_finite()) {
            return Err(format!("Scaler mean[{i}] is not finite"));
        }
        if let Some(i) = self.scale.iter().position(|s| !s.is_finite() || *s < 0.0) {
            return Err(format!("Scaler scale[{i}] must be finite and non-negative"));
        }
        Ok(())
    }
}

impl FeatureScaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, StageFault> {
        if features.len() != self.mean.len() {
            return Err(StageFault::ShapeMismatch {
                expected: self.mean.len(),
                got: features.len(),
            });
        }

        features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .enumerate()
            .map(|(index, (x, (mean, scale)))| {
                // Constant features are fitted with scale 0; scikit-learn treats that as 1.
                let divisor = if *scale == 0.0 { 1.0 } else { *scale };
                let z = (x - mean) / divisor;
                if z.is_finite() {
                    Ok(z)
                } else {
                    Err(StageFault::NonFinite { index })
                }
            })
            .collect()
    }
}

//! Class balance statistics for imbalance-aware training

use crate::types::ValidationSet;
use serde::Serialize;

/// Label counts of a dataset split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassBalance {
    pub negatives: usize,
    pub positives: usize,
}

impl ClassBalance {
    pub fn from_labels(labels: &[u8]) -> Self {
        let positives = labels.iter().filter(|&&l| l == 1).count();
        Self {
            negatives: labels.len() - positives,
            positives,
        }
    }

    pub fn from_set(set: &ValidationSet) -> Self {
        Self {
            negatives: set.negatives(),
            positives: set.positives(),
        }
    }

    pub fn total(&self) -> usize {
        self.negatives + self.positives
    }

    /// Fraction of samples that are fraud
    pub fn positive_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.positives as f64 / self.total() as f64
        }
    }

    /// Negatives per positive; `None` without positives
    pub fn imbalance_ratio(&self) -> Option<f64> {
        (self.positives > 0).then(|| self.negatives as f64 / self.positives as f64)
    }

    /// Positive-class weight for gradient boosting: negatives / positives
    pub fn scale_pos_weight(&self) -> Option<f64> {
        self.imbalance_ratio()
    }
}

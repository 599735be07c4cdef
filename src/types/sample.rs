//! Validation samples scored by a fitted fraud classifier

use crate::error::InvalidInputError;
use serde::{Deserialize, Serialize};

/// A single scored validation record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationSample {
    /// Ground-truth label (1 = fraud)
    #[serde(alias = "Class", alias = "y_true")]
    pub label: u8,

    /// Predicted fraud probability
    #[serde(alias = "y_prob", alias = "score")]
    pub probability: f64,
}

impl ValidationSample {
    pub fn new(label: u8, probability: f64) -> Self {
        Self { label, probability }
    }

    /// Whether the sample is an actual fraud case
    pub fn is_positive(&self) -> bool {
        self.label == 1
    }
}

/// Ordered, validated collection of samples.
///
/// Construction checks every sample, so downstream code can rely on
/// labels in {0, 1}, probabilities in [0, 1], and at least one sample.
/// Duplicates are kept and order is preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationSet {
    samples: Vec<ValidationSample>,
    positives: usize,
}

impl ValidationSet {
    /// Build a set from index-aligned label and probability slices
    pub fn new(y_true: &[u8], y_prob: &[f64]) -> Result<Self, InvalidInputError> {
        if y_true.len() != y_prob.len() {
            return Err(InvalidInputError::LengthMismatch {
                labels: y_true.len(),
                probabilities: y_prob.len(),
            });
        }

        let samples = y_true
            .iter()
            .zip(y_prob)
            .map(|(&label, &probability)| ValidationSample::new(label, probability))
            .collect();

        Self::from_samples(samples)
    }

    /// Build a set from already paired samples
    pub fn from_samples(samples: Vec<ValidationSample>) -> Result<Self, InvalidInputError> {
        if samples.is_empty() {
            return Err(InvalidInputError::Empty);
        }

        let mut positives = 0;
        for (index, sample) in samples.iter().enumerate() {
            if sample.label > 1 {
                return Err(InvalidInputError::InvalidLabel {
                    index,
                    value: sample.label,
                });
            }
            // NaN fails this range check as well
            if !(0.0..=1.0).contains(&sample.probability) {
                return Err(InvalidInputError::ProbabilityOutOfRange {
                    index,
                    value: sample.probability,
                });
            }
            if sample.is_positive() {
                positives += 1;
            }
        }

        Ok(Self { samples, positives })
    }

    pub fn samples(&self) -> &[ValidationSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed set
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of fraud samples
    pub fn positives(&self) -> usize {
        self.positives
    }

    /// Number of legitimate samples
    pub fn negatives(&self) -> usize {
        self.samples.len() - self.positives
    }

    /// Fail unless at least one positive is present
    pub fn require_positives(&self) -> Result<(), InvalidInputError> {
        if self.positives == 0 {
            Err(InvalidInputError::NoPositives)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_classes() {
        let set = ValidationSet::new(&[0, 1, 0, 1, 1], &[0.1, 0.9, 0.2, 0.7, 0.7]).unwrap();
        assert_eq!(set.len(), 5);
        assert_eq!(set.positives(), 3);
        assert_eq!(set.negatives(), 2);
        assert!(set.require_positives().is_ok());
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(ValidationSet::new(&[], &[]), Err(InvalidInputError::Empty));
    }

    #[test]
    fn test_rejects_length_mismatch() {
        assert_eq!(
            ValidationSet::new(&[0, 1], &[0.5]),
            Err(InvalidInputError::LengthMismatch {
                labels: 2,
                probabilities: 1
            })
        );
    }

    #[test]
    fn test_rejects_out_of_range_probabilities() {
        assert!(matches!(
            ValidationSet::new(&[0, 1], &[0.5, 1.2]),
            Err(InvalidInputError::ProbabilityOutOfRange { index: 1, .. })
        ));
        assert!(matches!(
            ValidationSet::new(&[0, 1], &[-0.1, 0.2]),
            Err(InvalidInputError::ProbabilityOutOfRange { index: 0, .. })
        ));
        assert!(matches!(
            ValidationSet::new(&[0, 1], &[f64::NAN, 0.2]),
            Err(InvalidInputError::ProbabilityOutOfRange { index: 0, .. })
        ));
    }

    #[test]
    fn test_accepts_closed_interval_bounds() {
        assert!(ValidationSet::new(&[0, 1], &[0.0, 1.0]).is_ok());
    }

    #[test]
    fn test_rejects_non_binary_labels() {
        assert_eq!(
            ValidationSet::new(&[0, 2], &[0.1, 0.2]),
            Err(InvalidInputError::InvalidLabel { index: 1, value: 2 })
        );
    }

    #[test]
    fn test_require_positives_on_all_negative_set() {
        let set = ValidationSet::new(&[0, 0, 0], &[0.1, 0.5, 0.9]).unwrap();
        assert_eq!(set.require_positives(), Err(InvalidInputError::NoPositives));
    }

    #[test]
    fn test_sample_deserializes_from_aliases() {
        let sample: ValidationSample =
            serde_json::from_str(r#"{"Class": 1, "y_prob": 0.83}"#).unwrap();
        assert_eq!(sample, ValidationSample::new(1, 0.83));
    }
}

//! Error types for threshold selection

use thiserror::Error;

/// Malformed validation input rejected before any computation runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInputError {
    /// No samples were supplied
    #[error("validation set is empty")]
    Empty,

    /// Labels and probabilities are not aligned
    #[error("length mismatch: {labels} labels vs {probabilities} probabilities")]
    LengthMismatch { labels: usize, probabilities: usize },

    /// Probability is NaN, infinite, or outside [0, 1]
    #[error("probability at index {index} is {value}, expected a value in [0, 1]")]
    ProbabilityOutOfRange { index: usize, value: f64 },

    /// Label is neither 0 nor 1
    #[error("label at index {index} is {value}, expected 0 or 1")]
    InvalidLabel { index: usize, value: u8 },

    /// Precision and recall are undefined without a positive example
    #[error("validation set contains no positive labels")]
    NoPositives,

    /// Rank-based metrics need both classes present
    #[error("validation set contains a single class")]
    SingleClass,

    /// Minimum precision must itself be a probability
    #[error("min_precision {0} is outside [0, 1]")]
    InvalidMinPrecision(f64),

    /// Configured cutoff is NaN or outside [0, 1]
    #[error("threshold {0} is outside [0, 1]")]
    InvalidThreshold(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = InvalidInputError::ProbabilityOutOfRange {
            index: 3,
            value: 1.5,
        };
        assert_eq!(
            err.to_string(),
            "probability at index 3 is 1.5, expected a value in [0, 1]"
        );

        let err = InvalidInputError::LengthMismatch {
            labels: 4,
            probabilities: 5,
        };
        assert!(err.to_string().contains("4 labels vs 5 probabilities"));
    }
}

//! Threshold decisions produced by the selector

use crate::metrics::{f1_score, ConfusionMatrix};
use serde::{Deserialize, Serialize};

/// An operating point: cutoff plus the metrics it yields on the validation set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdDecision {
    /// Inclusive lower bound for classifying a sample as fraud
    pub threshold: f64,
    pub precision: f64,
    pub recall: f64,
    /// Epsilon-guarded F1
    pub f1: f64,
}

impl ThresholdDecision {
    /// Create a decision, deriving F1 from precision and recall
    pub fn new(threshold: f64, precision: f64, recall: f64) -> Self {
        Self {
            threshold,
            precision,
            recall,
            f1: f1_score(precision, recall),
        }
    }

    /// Create a decision from the confusion matrix measured at `threshold`
    pub fn from_confusion(threshold: f64, confusion: &ConfusionMatrix) -> Self {
        Self::new(threshold, confusion.precision(), confusion.recall())
    }
}

/// Raised when no candidate reaches the requested precision.
///
/// This is a flag on the result, not an error: the accompanying decision
/// uses the fallback threshold and must not be read as a computed optimum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DegradedResultWarning {
    /// Precision the caller asked for
    pub min_precision: f64,
    /// Highest precision any candidate threshold reached
    pub best_precision: f64,
    /// Threshold returned instead
    pub fallback_threshold: f64,
}

impl std::fmt::Display for DegradedResultWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "no threshold reached precision {:.4} (best {:.4}); using fallback {:.2}",
            self.min_precision, self.best_precision, self.fallback_threshold
        )
    }
}

/// Result of the precision-constrained search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstrainedThreshold {
    pub decision: ThresholdDecision,
    /// Present when the fallback threshold was used
    pub warning: Option<DegradedResultWarning>,
}

impl ConstrainedThreshold {
    pub fn computed(decision: ThresholdDecision) -> Self {
        Self {
            decision,
            warning: None,
        }
    }

    pub fn degraded(decision: ThresholdDecision, warning: DegradedResultWarning) -> Self {
        Self {
            decision,
            warning: Some(warning),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.warning.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_derives_f1() {
        let decision = ThresholdDecision::new(0.6, 0.5, 1.0);
        assert!((decision.f1 - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_precision_and_recall_give_zero_f1() {
        let decision = ThresholdDecision::new(0.9, 0.0, 0.0);
        assert_eq!(decision.f1, 0.0);
    }

    #[test]
    fn test_degraded_flag() {
        let decision = ThresholdDecision::new(0.9, 0.0, 0.0);
        let warning = DegradedResultWarning {
            min_precision: 0.5,
            best_precision: 0.2,
            fallback_threshold: 0.9,
        };

        assert!(!ConstrainedThreshold::computed(decision).is_degraded());
        let degraded = ConstrainedThreshold::degraded(decision, warning);
        assert!(degraded.is_degraded());
        assert!(warning.to_string().contains("fallback 0.90"));
    }

    #[test]
    fn test_decision_serialization() {
        let decision = ThresholdDecision::new(0.42, 0.8, 0.6);
        let json = serde_json::to_string(&decision).unwrap();
        let deserialized: ThresholdDecision = serde_json::from_str(&json).unwrap();
        assert_eq!(decision, deserialized);
    }
}

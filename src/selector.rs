//! Decision threshold selection for imbalanced fraud scores.
//!
//! Two strategies run over the precision-recall curve of a validation set:
//!
//! - **F1-optimal**: the threshold with the highest F1. Ties go to the
//!   highest threshold, which is the more conservative cutoff.
//! - **Precision-constrained**: among thresholds reaching a minimum
//!   precision, the one with the highest recall. Ties go to the lowest
//!   threshold. When no threshold qualifies, a fixed fallback is returned
//!   together with a [`DegradedResultWarning`].
//!
//! All thresholds are inclusive: `score >= threshold` means fraud.

use crate::config::SelectionConfig;
use crate::curve::{CurvePoint, PrecisionRecallCurve};
use crate::error::InvalidInputError;
use crate::metrics::ConfusionMatrix;
use crate::types::{ConstrainedThreshold, DegradedResultWarning, ThresholdDecision, ValidationSet};
use tracing::{debug, warn};

/// Minimum precision used when the caller does not specify one
pub const DEFAULT_MIN_PRECISION: f64 = 0.5;

/// Cutoff returned when no threshold reaches the minimum precision
pub const FALLBACK_THRESHOLD: f64 = 0.9;

/// Computes operating thresholds from validation-set scores
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdSelector {
    min_precision: f64,
    fallback_threshold: f64,
}

impl ThresholdSelector {
    /// Create a selector with an explicit minimum precision
    pub fn new(min_precision: f64) -> Result<Self, InvalidInputError> {
        validate_min_precision(min_precision)?;
        Ok(Self {
            min_precision,
            fallback_threshold: FALLBACK_THRESHOLD,
        })
    }

    /// Create a selector from configuration
    pub fn from_config(config: &SelectionConfig) -> Result<Self, InvalidInputError> {
        Self::new(config.min_precision)?.with_fallback_threshold(config.fallback_threshold)
    }

    /// Override the degraded-mode cutoff; it must lie in [0, 1]
    pub fn with_fallback_threshold(
        mut self,
        fallback_threshold: f64,
    ) -> Result<Self, InvalidInputError> {
        validate_threshold(fallback_threshold)?;
        self.fallback_threshold = fallback_threshold;
        Ok(self)
    }

    pub fn min_precision(&self) -> f64 {
        self.min_precision
    }

    pub fn fallback_threshold(&self) -> f64 {
        self.fallback_threshold
    }

    /// Threshold maximizing F1, highest threshold among ties
    pub fn f1_optimal(&self, set: &ValidationSet) -> Result<ThresholdDecision, InvalidInputError> {
        let curve = PrecisionRecallCurve::from_set(set)?;
        Ok(f1_optimal_on_curve(&curve))
    }

    /// Threshold maximizing recall subject to `precision >= min_precision`.
    ///
    /// Without positive labels every cutoff has precision 0, so any positive
    /// `min_precision` lands on the fallback. A zero floor leaves recall as
    /// the only criterion, which is undefined there, and fails.
    pub fn precision_constrained(
        &self,
        set: &ValidationSet,
    ) -> Result<ConstrainedThreshold, InvalidInputError> {
        if set.positives() == 0 && self.min_precision > 0.0 {
            return Ok(self.fallback(set, 0.0));
        }

        let curve = PrecisionRecallCurve::from_set(set)?;
        Ok(self.precision_constrained_on_curve(set, &curve))
    }

    /// Constrained search over a curve already built from `set`
    pub(crate) fn precision_constrained_on_curve(
        &self,
        set: &ValidationSet,
        curve: &PrecisionRecallCurve,
    ) -> ConstrainedThreshold {
        if let Some(point) = max_recall_at_precision(curve, self.min_precision) {
            debug!(
                threshold = point.threshold,
                precision = point.precision,
                recall = point.recall,
                min_precision = self.min_precision,
                "Precision-constrained threshold selected"
            );
            return ConstrainedThreshold::computed(decision_from_point(point));
        }

        let best_precision = curve
            .points()
            .iter()
            .map(|p| p.precision)
            .fold(0.0, f64::max);
        self.fallback(set, best_precision)
    }

    fn fallback(&self, set: &ValidationSet, best_precision: f64) -> ConstrainedThreshold {
        let warning = DegradedResultWarning {
            min_precision: self.min_precision,
            best_precision,
            fallback_threshold: self.fallback_threshold,
        };
        warn!(
            min_precision = self.min_precision,
            best_precision = best_precision,
            fallback_threshold = self.fallback_threshold,
            "No threshold reaches minimum precision, using fallback"
        );

        let confusion = ConfusionMatrix::at_threshold(set, self.fallback_threshold);
        let decision = ThresholdDecision::from_confusion(self.fallback_threshold, &confusion);
        ConstrainedThreshold::degraded(decision, warning)
    }
}

impl Default for ThresholdSelector {
    fn default() -> Self {
        Self {
            min_precision: DEFAULT_MIN_PRECISION,
            fallback_threshold: FALLBACK_THRESHOLD,
        }
    }
}

/// F1-optimal threshold for index-aligned labels and probabilities.
///
/// Fails with [`InvalidInputError`] on malformed input or when no label is 1.
pub fn compute_f1_optimal_threshold(
    y_true: &[u8],
    y_prob: &[f64],
) -> Result<ThresholdDecision, InvalidInputError> {
    let set = ValidationSet::new(y_true, y_prob)?;
    ThresholdSelector::default().f1_optimal(&set)
}

/// Precision-constrained threshold for index-aligned labels and probabilities.
///
/// Pass [`DEFAULT_MIN_PRECISION`] for the conventional 0.5 floor.
pub fn compute_precision_constrained_threshold(
    y_true: &[u8],
    y_prob: &[f64],
    min_precision: f64,
) -> Result<ConstrainedThreshold, InvalidInputError> {
    let set = ValidationSet::new(y_true, y_prob)?;
    ThresholdSelector::new(min_precision)?.precision_constrained(&set)
}

pub(crate) fn f1_optimal_on_curve(curve: &PrecisionRecallCurve) -> ThresholdDecision {
    let mut best: Option<&CurvePoint> = None;
    // Descending threshold order plus strict `>` keeps the highest tied threshold
    for point in curve.points() {
        if best.map_or(true, |b| point.f1 > b.f1) {
            best = Some(point);
        }
    }

    // A constructed curve always has at least one point
    best.map(decision_from_point)
        .unwrap_or_else(|| ThresholdDecision::new(FALLBACK_THRESHOLD, 0.0, 0.0))
}

/// Highest-recall point with `precision >= min_precision`, lowest threshold among ties
pub(crate) fn max_recall_at_precision(
    curve: &PrecisionRecallCurve,
    min_precision: f64,
) -> Option<&CurvePoint> {
    curve
        .points()
        .iter()
        .filter(|p| p.precision >= min_precision)
        // Later points have lower thresholds, so `>=` lets them win ties
        .fold(None, |best: Option<&CurvePoint>, point| match best {
            Some(b) if point.recall < b.recall => Some(b),
            _ => Some(point),
        })
}

fn decision_from_point(point: &CurvePoint) -> ThresholdDecision {
    ThresholdDecision {
        threshold: point.threshold,
        precision: point.precision,
        recall: point.recall,
        f1: point.f1,
    }
}

fn validate_min_precision(min_precision: f64) -> Result<(), InvalidInputError> {
    if (0.0..=1.0).contains(&min_precision) {
        Ok(())
    } else {
        Err(InvalidInputError::InvalidMinPrecision(min_precision))
    }
}

/// Cutoffs are probabilities; NaN fails the range check too
pub(crate) fn validate_threshold(threshold: f64) -> Result<(), InvalidInputError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(InvalidInputError::InvalidThreshold(threshold))
    }
}

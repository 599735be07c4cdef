//! Objective for hyperparameter trials.
//!
//! Each trial trains a candidate model and scores its validation
//! probabilities here. The score rewards recall at a usable precision,
//! falling back to the best F1 when the precision target is out of reach.

use crate::curve::PrecisionRecallCurve;
use crate::error::InvalidInputError;
use crate::metrics::harmonic_mean;
use crate::selector::{f1_optimal_on_curve, max_recall_at_precision};
use crate::types::ValidationSet;
use tracing::debug;

/// Precision a trial's operating point should reach
pub const DEFAULT_TARGET_PRECISION: f64 = 0.4;

/// Score a trial's validation predictions; higher is better
pub fn trial_objective(
    y_true: &[u8],
    y_prob: &[f64],
    target_precision: f64,
) -> Result<f64, InvalidInputError> {
    let set = ValidationSet::new(y_true, y_prob)?;
    score_trial(&set, target_precision)
}

/// [`trial_objective`] over an already validated set
pub fn score_trial(set: &ValidationSet, target_precision: f64) -> Result<f64, InvalidInputError> {
    if !(0.0..=1.0).contains(&target_precision) {
        return Err(InvalidInputError::InvalidMinPrecision(target_precision));
    }
    let curve = PrecisionRecallCurve::from_set(set)?;

    let score = match max_recall_at_precision(&curve, target_precision) {
        Some(point) => harmonic_mean(point.precision, point.recall),
        None => f1_optimal_on_curve(&curve).f1,
    };

    debug!(target_precision, score, "Trial scored");
    Ok(score)
}

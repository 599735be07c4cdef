//! Precision-recall curve over the distinct scores of a validation set

use crate::error::InvalidInputError;
use crate::metrics::f1_score;
use crate::types::ValidationSet;
use serde::Serialize;

/// One operating point of the curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    /// Samples scoring at or above this value are predicted positive
    pub threshold: f64,
    pub precision: f64,
    pub recall: f64,
    /// Epsilon-guarded F1
    pub f1: f64,
    pub true_positives: usize,
    pub false_positives: usize,
}

/// Precision-recall curve, one point per distinct probability,
/// ordered by descending threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecisionRecallCurve {
    points: Vec<CurvePoint>,
    positives: usize,
}

impl PrecisionRecallCurve {
    /// Build the curve. Requires at least one positive sample.
    pub fn from_set(set: &ValidationSet) -> Result<Self, InvalidInputError> {
        set.require_positives()?;

        let mut scored: Vec<(f64, bool)> = set
            .samples()
            .iter()
            .map(|s| (s.probability, s.is_positive()))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        let positives = set.positives();
        let mut points = Vec::new();
        let mut tp = 0usize;
        let mut fp = 0usize;

        let mut i = 0;
        while i < scored.len() {
            let threshold = scored[i].0;
            // Every sample tied at this score flips to positive together
            while i < scored.len() && scored[i].0 == threshold {
                if scored[i].1 {
                    tp += 1;
                } else {
                    fp += 1;
                }
                i += 1;
            }

            let precision = tp as f64 / (tp + fp) as f64;
            let recall = tp as f64 / positives as f64;
            points.push(CurvePoint {
                threshold,
                precision,
                recall,
                f1: f1_score(precision, recall),
                true_positives: tp,
                false_positives: fp,
            });
        }

        Ok(Self { points, positives })
    }

    /// Points in descending threshold order
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of actual positives the recall values are relative to
    pub fn positives(&self) -> usize {
        self.positives
    }

    /// Boundary point above every threshold: nothing predicted positive.
    ///
    /// Returned as (precision, recall). It has no threshold and is never
    /// a selection candidate.
    pub fn anchor(&self) -> (f64, f64) {
        (1.0, 0.0)
    }

    /// Step-wise area under the curve: sum of (R_k - R_{k-1}) * P_k
    pub fn average_precision(&self) -> f64 {
        let mut previous_recall = 0.0;
        let mut area = 0.0;
        for point in &self.points {
            area += (point.recall - previous_recall) * point.precision;
            previous_recall = point.recall;
        }
        area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(y_true: &[u8], y_prob: &[f64]) -> PrecisionRecallCurve {
        let set = ValidationSet::new(y_true, y_prob).unwrap();
        PrecisionRecallCurve::from_set(&set).unwrap()
    }

    #[test]
    fn test_one_point_per_distinct_score() {
        let curve = curve(&[0, 1, 0, 1, 1], &[0.3, 0.7, 0.3, 0.9, 0.7]);
        let thresholds: Vec<f64> = curve.points().iter().map(|p| p.threshold).collect();
        assert_eq!(thresholds, vec![0.9, 0.7, 0.3]);
    }

    #[test]
    fn test_counts_at_each_threshold() {
        let curve = curve(&[0, 0, 0, 1, 1], &[0.1, 0.2, 0.4, 0.8, 0.9]);
        let points = curve.points();

        assert_eq!(points[0].true_positives, 1);
        assert_eq!(points[0].false_positives, 0);
        assert_eq!(points[0].recall, 0.5);

        assert_eq!(points[1].threshold, 0.8);
        assert_eq!(points[1].precision, 1.0);
        assert_eq!(points[1].recall, 1.0);

        assert_eq!(points[4].threshold, 0.1);
        assert!((points[4].precision - 0.4).abs() < 1e-12);
        assert_eq!(points[4].recall, 1.0);
    }

    #[test]
    fn test_recall_never_increases_with_threshold() {
        let curve = curve(
            &[1, 0, 1, 0, 0, 1, 0, 1],
            &[0.95, 0.9, 0.6, 0.6, 0.4, 0.35, 0.1, 0.05],
        );
        for pair in curve.points().windows(2) {
            // pair[0] has the higher threshold
            assert!(pair[0].threshold > pair[1].threshold);
            assert!(pair[0].recall <= pair[1].recall);
        }
    }

    #[test]
    fn test_requires_positive_label() {
        let set = ValidationSet::new(&[0, 0], &[0.2, 0.8]).unwrap();
        assert_eq!(
            PrecisionRecallCurve::from_set(&set),
            Err(InvalidInputError::NoPositives)
        );
    }

    #[test]
    fn test_average_precision_perfect_ranking() {
        let curve = curve(&[0, 0, 1, 1], &[0.1, 0.2, 0.8, 0.9]);
        assert!((curve.average_precision() - 1.0).abs() < 1e-12);
        assert_eq!(curve.anchor(), (1.0, 0.0));
    }

    #[test]
    fn test_average_precision_mixed_ranking() {
        // Ranked: 1 (P=1, R=.5), 0 (P=.5, R=.5), 1 (P=2/3, R=1)
        let curve = curve(&[1, 0, 1], &[0.9, 0.8, 0.7]);
        let expected = 0.5 * 1.0 + 0.5 * (2.0 / 3.0);
        assert!((curve.average_precision() - expected).abs() < 1e-12);
    }
}

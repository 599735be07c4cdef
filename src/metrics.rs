//! Classification metrics for evaluating a fraud score at a cutoff.

use crate::error::InvalidInputError;
use crate::types::ValidationSet;
use serde::Serialize;

/// Added to the F1 denominator so precision = recall = 0 yields 0 instead of NaN
pub const F1_EPSILON: f64 = 1e-8;

/// F1 with the epsilon guard: 2PR / (P + R + 1e-8)
pub fn f1_score(precision: f64, recall: f64) -> f64 {
    2.0 * precision * recall / (precision + recall + F1_EPSILON)
}

/// Unguarded harmonic mean, 0 when both inputs are 0
pub fn harmonic_mean(precision: f64, recall: f64) -> f64 {
    let sum = precision + recall;
    if sum > 0.0 {
        2.0 * precision * recall / sum
    } else {
        0.0
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator > 0 {
        numerator as f64 / denominator as f64
    } else {
        0.0
    }
}

/// Outcome counts for `score >= threshold => fraud`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

impl ConfusionMatrix {
    /// Classify every sample at `threshold` and count outcomes
    pub fn at_threshold(set: &ValidationSet, threshold: f64) -> Self {
        let mut matrix = Self::default();
        for sample in set.samples() {
            let predicted = sample.probability >= threshold;
            match (predicted, sample.is_positive()) {
                (true, true) => matrix.true_positives += 1,
                (true, false) => matrix.false_positives += 1,
                (false, false) => matrix.true_negatives += 1,
                (false, true) => matrix.false_negatives += 1,
            }
        }
        matrix
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    pub fn predicted_positives(&self) -> usize {
        self.true_positives + self.false_positives
    }

    /// TP / (TP + FP), 0 when nothing is predicted positive
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.predicted_positives())
    }

    /// TP / (TP + FN), 0 without actual positives
    pub fn recall(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_negatives,
        )
    }

    pub fn f1(&self) -> f64 {
        f1_score(self.precision(), self.recall())
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    /// Negative-class precision: TN / (TN + FN)
    pub fn negative_predictive_value(&self) -> f64 {
        ratio(
            self.true_negatives,
            self.true_negatives + self.false_negatives,
        )
    }

    /// Negative-class recall: TN / (TN + FP)
    pub fn specificity(&self) -> f64 {
        ratio(
            self.true_negatives,
            self.true_negatives + self.false_positives,
        )
    }
}

/// Area under the ROC curve via the rank-sum statistic.
///
/// Tied scores share their average rank. Both classes must be present.
pub fn roc_auc(set: &ValidationSet) -> Result<f64, InvalidInputError> {
    let positives = set.positives();
    let negatives = set.negatives();
    if positives == 0 || negatives == 0 {
        return Err(InvalidInputError::SingleClass);
    }

    let mut scored: Vec<(f64, bool)> = set
        .samples()
        .iter()
        .map(|s| (s.probability, s.is_positive()))
        .collect();
    scored.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut positive_rank_sum = 0.0;
    let mut i = 0;
    while i < scored.len() {
        let mut j = i;
        while j < scored.len() && scored[j].0 == scored[i].0 {
            j += 1;
        }
        // Ranks are 1-based; the tie group spans ranks i+1..=j
        let average_rank = (i + 1 + j) as f64 / 2.0;
        let tied_positives = scored[i..j].iter().filter(|(_, pos)| *pos).count();
        positive_rank_sum += average_rank * tied_positives as f64;
        i = j;
    }

    let p = positives as f64;
    let n = negatives as f64;
    Ok((positive_rank_sum - p * (p + 1.0) / 2.0) / (p * n))
}

/// Per-class scores of a classification report
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassScores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Precision/recall/F1 for both classes at a single threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub threshold: f64,
    pub normal: ClassScores,
    pub fraud: ClassScores,
    pub accuracy: f64,
    pub macro_avg: ClassScores,
    pub weighted_avg: ClassScores,
}

impl ClassificationReport {
    pub fn at_threshold(set: &ValidationSet, threshold: f64) -> Self {
        Self::from_confusion(threshold, &ConfusionMatrix::at_threshold(set, threshold))
    }

    pub fn from_confusion(threshold: f64, cm: &ConfusionMatrix) -> Self {
        let normal_precision = cm.negative_predictive_value();
        let normal_recall = cm.specificity();
        let normal = ClassScores {
            precision: normal_precision,
            recall: normal_recall,
            f1: f1_score(normal_precision, normal_recall),
            support: cm.true_negatives + cm.false_positives,
        };
        let fraud = ClassScores {
            precision: cm.precision(),
            recall: cm.recall(),
            f1: cm.f1(),
            support: cm.true_positives + cm.false_negatives,
        };

        let total = cm.total();
        let macro_avg = ClassScores {
            precision: (normal.precision + fraud.precision) / 2.0,
            recall: (normal.recall + fraud.recall) / 2.0,
            f1: (normal.f1 + fraud.f1) / 2.0,
            support: total,
        };

        let weight = |a: f64, b: f64| {
            if total == 0 {
                0.0
            } else {
                (a * normal.support as f64 + b * fraud.support as f64) / total as f64
            }
        };
        let weighted_avg = ClassScores {
            precision: weight(normal.precision, fraud.precision),
            recall: weight(normal.recall, fraud.recall),
            f1: weight(normal.f1, fraud.f1),
            support: total,
        };

        Self {
            threshold,
            normal,
            fraud,
            accuracy: cm.accuracy(),
            macro_avg,
            weighted_avg,
        }
    }

    /// Rows as (label, scores), in display order
    pub fn rows(&self) -> [(&'static str, &ClassScores); 4] {
        [
            ("Normal", &self.normal),
            ("Fraud", &self.fraud),
            ("macro avg", &self.macro_avg),
            ("weighted avg", &self.weighted_avg),
        ]
    }
}

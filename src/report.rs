//! Threshold optimization report for a validation run.

use crate::config::SelectionConfig;
use crate::curve::PrecisionRecallCurve;
use crate::error::InvalidInputError;
use crate::imbalance::ClassBalance;
use crate::metrics::{roc_auc, ClassificationReport, ConfusionMatrix};
use crate::selector::{f1_optimal_on_curve, validate_threshold, ThresholdSelector};
use crate::tuning::score_trial;
use crate::types::{ConstrainedThreshold, ThresholdDecision, ValidationSet};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Everything the training pipeline records about a scored validation split
#[derive(Debug, Clone, Serialize)]
pub struct ThresholdReport {
    pub balance: ClassBalance,
    /// `None` when the split holds a single class
    pub roc_auc: Option<f64>,
    pub average_precision: f64,
    /// Score of the split under the trial objective
    pub trial_score: f64,
    pub default_decision: ThresholdDecision,
    pub f1_optimized: ThresholdDecision,
    pub precision_optimized: ConstrainedThreshold,
    pub min_precision: f64,
    pub fallback_threshold: f64,
    /// Confusion matrix at the F1-optimal threshold
    pub confusion: ConfusionMatrix,
    /// Classification report at the F1-optimal threshold
    pub classification: ClassificationReport,
}

impl ThresholdReport {
    /// Evaluate a validation set under the given selection settings
    pub fn evaluate(
        set: &ValidationSet,
        config: &SelectionConfig,
    ) -> Result<Self, InvalidInputError> {
        let selector = ThresholdSelector::from_config(config)?;
        validate_threshold(config.default_threshold)?;
        let curve = PrecisionRecallCurve::from_set(set)?;

        let f1_optimized = f1_optimal_on_curve(&curve);
        let precision_optimized = selector.precision_constrained_on_curve(set, &curve);

        let default_confusion = ConfusionMatrix::at_threshold(set, config.default_threshold);
        let default_decision =
            ThresholdDecision::from_confusion(config.default_threshold, &default_confusion);

        let confusion = ConfusionMatrix::at_threshold(set, f1_optimized.threshold);

        Ok(Self {
            balance: ClassBalance::from_set(set),
            roc_auc: roc_auc(set).ok(),
            average_precision: curve.average_precision(),
            trial_score: score_trial(set, config.tuning_target_precision)?,
            default_decision,
            f1_optimized,
            precision_optimized,
            min_precision: selector.min_precision(),
            fallback_threshold: selector.fallback_threshold(),
            confusion,
            classification: ClassificationReport::from_confusion(f1_optimized.threshold, &confusion),
        })
    }

    /// Metrics keyed the way the experiment tracker stores them
    pub fn tracking_metrics(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();
        let mut put = |key: &str, value: f64| {
            metrics.insert(key.to_string(), value);
        };

        if let Some(auc) = self.roc_auc {
            put("roc_auc", auc);
        }
        put("average_precision", self.average_precision);
        put("trial_score", self.trial_score);

        put("default_precision", self.default_decision.precision);
        put("default_recall", self.default_decision.recall);
        put("default_f1", self.default_decision.f1);

        put("f1_opt_threshold", self.f1_optimized.threshold);
        put("f1_opt_precision", self.f1_optimized.precision);
        put("f1_opt_recall", self.f1_optimized.recall);
        put("f1_opt_f1_score", self.f1_optimized.f1);

        let constrained = &self.precision_optimized.decision;
        put("precision_opt_threshold", constrained.threshold);
        put("precision_opt_precision", constrained.precision);
        put("precision_opt_recall", constrained.recall);
        put("precision_opt_f1_score", constrained.f1);
        put(
            "precision_opt_degraded",
            if self.precision_optimized.is_degraded() { 1.0 } else { 0.0 },
        );

        metrics
    }

    /// Run parameters describing the split and the selection settings
    pub fn tracking_params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("val_samples".to_string(), self.balance.total().to_string());
        params.insert("val_positives".to_string(), self.balance.positives.to_string());
        if let Some(weight) = self.balance.scale_pos_weight() {
            params.insert("scale_pos_weight".to_string(), format!("{:.4}", weight));
        }
        params.insert("min_precision".to_string(), self.min_precision.to_string());
        params.insert(
            "fallback_threshold".to_string(),
            self.fallback_threshold.to_string(),
        );
        params
    }

    /// Log a boxed summary of the report
    pub fn log_summary(&self) {
        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║           FRAUD THRESHOLD OPTIMIZATION - SUMMARY             ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Validation Samples: {:>8}  │  Fraud Rate: {:>6.2}%         ║",
            self.balance.total(),
            self.balance.positive_rate() * 100.0
        );
        match self.balance.imbalance_ratio() {
            Some(ratio) => info!("║ Class Imbalance Ratio: {:>8.1}:1                             ║", ratio),
            None => info!("║ Class Imbalance Ratio: n/a                                   ║"),
        }
        match self.roc_auc {
            Some(auc) => info!(
                "║ ROC-AUC: {:.4}  │  Average Precision: {:.4}                 ║",
                auc, self.average_precision
            ),
            None => info!(
                "║ ROC-AUC: n/a     │  Average Precision: {:.4}                 ║",
                self.average_precision
            ),
        }
        info!("╠══════════════════════════════════════════════════════════════╣");

        let constrained_label = if self.precision_optimized.is_degraded() {
            "Precision (fallback)"
        } else {
            "Precision-optimized"
        };
        for (label, decision) in [
            ("Default", &self.default_decision),
            ("F1-optimized", &self.f1_optimized),
            (constrained_label, &self.precision_optimized.decision),
        ] {
            info!(
                "║ {:<20} t={:.4}  P={:.4}  R={:.4}  F1={:.4} ║",
                label, decision.threshold, decision.precision, decision.recall, decision.f1
            );
        }

        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Classification Report (threshold {:.4}):                    ║",
            self.classification.threshold
        );
        info!("║   {:>12}  precision  recall  f1-score  support          ║", "");
        for (label, scores) in self.classification.rows() {
            info!(
                "║   {:>12}  {:>9.4}  {:>6.4}  {:>8.4}  {:>7}          ║",
                label, scores.precision, scores.recall, scores.f1, scores.support
            );
        }
        info!(
            "║   {:>12}  {:>34.4}          ║",
            "accuracy", self.classification.accuracy
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Confusion Matrix (F1-optimized):    Predicted                ║");
        info!("║   Actual       Normal   Fraud                                ║");
        info!(
            "║   Normal     {:>8} {:>7}                                ║",
            self.confusion.true_negatives, self.confusion.false_positives
        );
        info!(
            "║   Fraud      {:>8} {:>7}                                ║",
            self.confusion.false_negatives, self.confusion.true_positives
        );
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(y_true: &[u8], y_prob: &[f64]) -> ThresholdReport {
        let set = ValidationSet::new(y_true, y_prob).unwrap();
        ThresholdReport::evaluate(&set, &SelectionConfig::default()).unwrap()
    }

    #[test]
    fn test_report_on_separable_split() {
        let report = report(&[0, 0, 0, 1, 1], &[0.1, 0.2, 0.4, 0.8, 0.9]);

        assert_eq!(report.roc_auc, Some(1.0));
        assert_eq!(report.f1_optimized.threshold, 0.8);
        assert!(!report.precision_optimized.is_degraded());
        assert_eq!(report.confusion.true_positives, 2);
        assert_eq!(report.confusion.false_positives, 0);
        assert_eq!(report.classification.accuracy, 1.0);
        // At 0.5 the split is already perfectly separated
        assert_eq!(report.default_decision.precision, 1.0);
        assert_eq!(report.default_decision.recall, 1.0);
    }

    #[test]
    fn test_tracking_keys() {
        let report = report(&[0, 0, 1, 0, 1, 0], &[0.05, 0.3, 0.35, 0.6, 0.7, 0.2]);
        let metrics = report.tracking_metrics();

        for key in [
            "roc_auc",
            "average_precision",
            "trial_score",
            "default_precision",
            "default_recall",
            "default_f1",
            "f1_opt_threshold",
            "f1_opt_precision",
            "f1_opt_recall",
            "f1_opt_f1_score",
            "precision_opt_threshold",
            "precision_opt_precision",
            "precision_opt_recall",
            "precision_opt_f1_score",
            "precision_opt_degraded",
        ] {
            assert!(metrics.contains_key(key), "missing metric {}", key);
        }
        assert_eq!(metrics["precision_opt_degraded"], 0.0);

        let params = report.tracking_params();
        assert_eq!(params["val_samples"], "6");
        assert_eq!(params["val_positives"], "2");
        assert_eq!(params["scale_pos_weight"], "2.0000");
    }

    #[test]
    fn test_single_class_split_has_no_auc() {
        let report = report(&[1, 1], &[0.3, 0.6]);
        assert_eq!(report.roc_auc, None);
        assert!(!report.tracking_metrics().contains_key("roc_auc"));
    }

    #[test]
    fn test_degraded_flag_exported() {
        let report = report(&[0, 1, 0, 1, 0], &[0.5; 5]);
        assert!(report.precision_optimized.is_degraded());
        assert_eq!(report.tracking_metrics()["precision_opt_degraded"], 1.0);
        report.log_summary();
    }

    #[test]
    fn test_configured_cutoffs_must_be_probabilities() {
        let set = ValidationSet::new(&[0, 1], &[0.2, 0.8]).unwrap();

        let config = SelectionConfig {
            default_threshold: 1.5,
            ..SelectionConfig::default()
        };
        assert!(matches!(
            ThresholdReport::evaluate(&set, &config),
            Err(InvalidInputError::InvalidThreshold(_))
        ));

        let config = SelectionConfig {
            fallback_threshold: f64::NAN,
            ..SelectionConfig::default()
        };
        assert!(matches!(
            ThresholdReport::evaluate(&set, &config),
            Err(InvalidInputError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_invalid_selection_config() {
        let set = ValidationSet::new(&[0, 1], &[0.2, 0.8]).unwrap();
        let config = SelectionConfig {
            min_precision: 2.0,
            ..SelectionConfig::default()
        };
        assert!(matches!(
            ThresholdReport::evaluate(&set, &config),
            Err(InvalidInputError::InvalidMinPrecision(_))
        ));
    }
}

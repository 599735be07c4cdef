//! Fraud Threshold Optimizer Library
//!
//! Turns a fraud classifier's validation-set probabilities into decision
//! thresholds that account for severe class imbalance, where the default
//! 0.5 cutoff is rarely the right operating point.

pub mod config;
pub mod curve;
pub mod error;
pub mod imbalance;
pub mod loader;
pub mod metrics;
pub mod report;
pub mod selector;
pub mod tracking;
pub mod tuning;
pub mod types;

pub use config::AppConfig;
pub use curve::PrecisionRecallCurve;
pub use error::InvalidInputError;
pub use report::ThresholdReport;
pub use selector::{
    compute_f1_optimal_threshold, compute_precision_constrained_threshold, ThresholdSelector,
    DEFAULT_MIN_PRECISION, FALLBACK_THRESHOLD,
};
pub use tuning::trial_objective;
pub use types::{
    ConstrainedThreshold, DegradedResultWarning, ThresholdDecision, ValidationSample,
    ValidationSet,
};

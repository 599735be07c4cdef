//! Type definitions for threshold selection

pub mod decision;
pub mod sample;

pub use decision::{ConstrainedThreshold, DegradedResultWarning, ThresholdDecision};
pub use sample::{ValidationSample, ValidationSet};

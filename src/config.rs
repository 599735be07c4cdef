//! Configuration management for the threshold optimizer

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Environment variable pointing at an alternative config file
pub const CONFIG_PATH_ENV: &str = "FRAUD_THRESHOLD_CONFIG";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    pub tracking: TrackingConfig,
    pub logging: LoggingConfig,
}

/// Validation data source
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// JSON-lines file of `{"label": .., "probability": ..}` records
    pub validation_set: String,
}

/// Threshold selection parameters
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SelectionConfig {
    /// Precision floor for the recall-maximizing threshold
    #[serde(default = "default_min_precision")]
    pub min_precision: f64,
    /// Cutoff used when no threshold reaches `min_precision`
    #[serde(default = "default_fallback_threshold")]
    pub fallback_threshold: f64,
    /// Baseline cutoff reported for comparison
    #[serde(default = "default_threshold")]
    pub default_threshold: f64,
    /// Precision target for hyperparameter trial scoring
    #[serde(default = "default_target_precision")]
    pub tuning_target_precision: f64,
}

fn default_min_precision() -> f64 {
    crate::selector::DEFAULT_MIN_PRECISION
}

fn default_fallback_threshold() -> f64 {
    crate::selector::FALLBACK_THRESHOLD
}

fn default_threshold() -> f64 {
    0.5
}

fn default_target_precision() -> f64 {
    crate::tuning::DEFAULT_TARGET_PRECISION
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            min_precision: default_min_precision(),
            fallback_threshold: default_fallback_threshold(),
            default_threshold: default_threshold(),
            tuning_target_precision: default_target_precision(),
        }
    }
}

/// Experiment tracking configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TrackingConfig {
    /// Experiment name recorded on every run
    pub experiment: String,
    /// Directory receiving one JSON file per run
    pub runs_dir: String,
    /// Model type tag
    #[serde(default = "default_model_type")]
    pub model_type: String,
}

fn default_model_type() -> String {
    "xgboost_optimized".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from `$FRAUD_THRESHOLD_CONFIG` or `config/config.toml`
    pub fn load() -> Result<Self> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config/config.toml".to_string());
        Self::load_from_path(path)
    }

    /// Load configuration from a specific path.
    ///
    /// `FRAUD_THRESHOLD__SECTION__KEY` environment variables override file values.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("FRAUD_THRESHOLD")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: InputConfig {
                validation_set: "data/validation.jsonl".to_string(),
            },
            selection: SelectionConfig::default(),
            tracking: TrackingConfig {
                experiment: "FraudDetection_Optimized".to_string(),
                runs_dir: "runs".to_string(),
                model_type: default_model_type(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

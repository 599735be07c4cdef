//! Fraud Threshold Optimizer - Main Entry Point
//!
//! Loads a scored validation split, selects operating thresholds, logs a
//! summary, and stores the run record for the experiment tracker.

use anyhow::Result;
use fraud_threshold_optimizer::{
    config::{AppConfig, LoggingConfig},
    loader::load_validation_set,
    tracking::{RunRecord, RunStore},
    ThresholdReport,
};
use tracing::{info, warn};

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().or_else(|_| {
        tracing_subscriber::EnvFilter::try_new(format!(
            "fraud_threshold_optimizer={}",
            logging.level
        ))
    })?;

    if logging.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    Ok(())
}

fn main() -> Result<()> {
    // Load configuration before logging so its level and format apply
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    info!("Starting Fraud Threshold Optimizer");
    info!(
        "Selection: min_precision={:.2}, fallback={:.2}, default={:.2}",
        config.selection.min_precision,
        config.selection.fallback_threshold,
        config.selection.default_threshold
    );

    let set = load_validation_set(&config.input.validation_set)?;
    let report = ThresholdReport::evaluate(&set, &config.selection)?;

    if let Some(warning) = &report.precision_optimized.warning {
        warn!(
            min_precision = warning.min_precision,
            best_precision = warning.best_precision,
            "Precision-optimized threshold is a fallback, not a computed optimum"
        );
    }

    report.log_summary();

    let mut run = RunRecord::new(&config.tracking.experiment);
    run.log_params(report.tracking_params());
    run.log_param("validation_set", &config.input.validation_set);
    run.log_metrics(report.tracking_metrics());
    run.set_tag("model_type", &config.tracking.model_type);
    run.set_tag(
        "precision_opt_status",
        if report.precision_optimized.is_degraded() {
            "fallback"
        } else {
            "computed"
        },
    );

    let store = RunStore::new(&config.tracking.runs_dir);
    let path = store.save(&run)?;

    info!(
        run_id = %run.run_id,
        f1_threshold = report.f1_optimized.threshold,
        precision_threshold = report.precision_optimized.decision.threshold,
        path = %path.display(),
        "Threshold optimization complete"
    );

    Ok(())
}

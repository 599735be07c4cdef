//! Experiment run records for an external tracker.
//!
//! A run collects params, metrics and tags as flat key-value maps and is
//! persisted as one JSON document per run, ready for import by the tracker.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

/// Key-value metadata of a single threshold optimization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: String,
    pub experiment: String,
    pub started_at: DateTime<Utc>,
    pub params: BTreeMap<String, String>,
    pub metrics: BTreeMap<String, f64>,
    pub tags: BTreeMap<String, String>,
}

impl RunRecord {
    /// Start a new run under `experiment`
    pub fn new(experiment: &str) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            experiment: experiment.to_string(),
            started_at: Utc::now(),
            params: BTreeMap::new(),
            metrics: BTreeMap::new(),
            tags: BTreeMap::new(),
        }
    }

    pub fn log_param(&mut self, key: &str, value: impl ToString) {
        self.params.insert(key.to_string(), value.to_string());
    }

    pub fn log_params<I, K, V>(&mut self, params: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        for (key, value) in params {
            self.params.insert(key.into(), value.to_string());
        }
    }

    /// Non-finite values are dropped; JSON cannot carry them
    pub fn log_metric(&mut self, key: &str, value: f64) {
        if value.is_finite() {
            self.metrics.insert(key.to_string(), value);
        }
    }

    pub fn log_metrics<I, K>(&mut self, metrics: I)
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        for (key, value) in metrics {
            if value.is_finite() {
                self.metrics.insert(key.into(), value);
            }
        }
    }

    pub fn set_tag(&mut self, key: &str, value: &str) {
        self.tags.insert(key.to_string(), value.to_string());
    }
}

/// Directory-backed store of run records
pub struct RunStore {
    dir: PathBuf,
}

impl RunStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path a run is stored at
    pub fn path_for(&self, run_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", run_id))
    }

    /// Write the run as pretty JSON, creating the directory if needed
    pub fn save(&self, run: &RunRecord) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create runs directory {}", self.dir.display()))?;

        let path = self.path_for(&run.run_id);
        let payload = serde_json::to_vec_pretty(run)?;
        std::fs::write(&path, payload)
            .with_context(|| format!("Failed to write run record {}", path.display()))?;

        info!(
            run_id = %run.run_id,
            experiment = %run.experiment,
            metrics = run.metrics.len(),
            path = %path.display(),
            "Run record saved"
        );

        Ok(path)
    }

    pub fn load(&self, run_id: &str) -> Result<RunRecord> {
        let path = self.path_for(run_id);
        let payload = std::fs::read(&path)
            .with_context(|| format!("Failed to read run record {}", path.display()))?;
        serde_json::from_slice(&payload).context("Failed to deserialize run record")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_logging() {
        let mut run = RunRecord::new("FraudDetection_Optimized");
        run.log_param("val_samples", 120);
        run.log_metric("f1_opt_threshold", 0.61);
        run.log_metric("roc_auc", f64::NAN);
        run.log_metrics([("default_f1", 0.4), ("default_recall", 0.3)]);
        run.set_tag("model_type", "xgboost_optimized");

        assert_eq!(run.params.get("val_samples").map(String::as_str), Some("120"));
        assert_eq!(run.metrics.get("f1_opt_threshold"), Some(&0.61));
        assert!(!run.metrics.contains_key("roc_auc"));
        assert_eq!(run.metrics.len(), 3);
        assert_eq!(run.tags.get("model_type").map(String::as_str), Some("xgboost_optimized"));
        assert!(Uuid::parse_str(&run.run_id).is_ok());
    }

    #[test]
    fn test_store_save_and_load() {
        let dir = std::env::temp_dir().join(format!("fto-runs-{}", Uuid::new_v4()));
        let store = RunStore::new(&dir);

        let mut run = RunRecord::new("test");
        run.log_metric("precision_opt_recall", 0.75);
        let path = store.save(&run).unwrap();
        assert_eq!(path, store.path_for(&run.run_id));

        let loaded = store.load(&run.run_id).unwrap();
        assert_eq!(loaded, run);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}

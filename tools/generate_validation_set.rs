//! Validation Set Generator
//!
//! Writes a synthetic, class-imbalanced scored validation split as JSON lines
//! for exercising the threshold optimizer without a trained model.

use anyhow::{Context, Result};
use fraud_threshold_optimizer::ValidationSample;
use rand::Rng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Score generator mimicking a reasonably good but imperfect classifier
struct ScoreGenerator {
    rng: rand::rngs::ThreadRng,
    fraud_rate: f64,
}

impl ScoreGenerator {
    fn new(fraud_rate: f64) -> Self {
        Self {
            rng: rand::thread_rng(),
            fraud_rate,
        }
    }

    /// Legitimate transactions cluster near zero with a long tail
    fn legitimate_score(&mut self) -> f64 {
        let u: f64 = self.rng.gen();
        u.powi(4)
    }

    /// Fraud cases cluster near one, some are missed entirely
    fn fraud_score(&mut self) -> f64 {
        if self.rng.gen_bool(0.15) {
            return self.rng.gen_range(0.0..0.5);
        }
        let u: f64 = self.rng.gen();
        1.0 - u.powi(3) * 0.6
    }

    fn sample(&mut self) -> ValidationSample {
        if self.rng.gen_bool(self.fraud_rate) {
            ValidationSample::new(1, self.fraud_score())
        } else {
            ValidationSample::new(0, self.legitimate_score())
        }
    }
}

/// Fraud rate argument clamped to [0, 1]; missing, unparsable or
/// non-finite input falls back to the card-fraud base rate
fn parse_fraud_rate(arg: Option<&str>) -> f64 {
    arg.and_then(|s| s.parse::<f64>().ok())
        .filter(|rate| rate.is_finite())
        .unwrap_or(0.0017)
        .clamp(0.0, 1.0)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("generate_validation_set=info".parse()?),
        )
        .init();

    // Positional arguments: output path, sample count, fraud rate
    let args: Vec<String> = std::env::args().collect();
    let output = args
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or("data/validation.jsonl");
    let count: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(10_000);
    let fraud_rate = parse_fraud_rate(args.get(3).map(|s| s.as_str()));

    info!(output = %output, count = count, fraud_rate = fraud_rate, "Generating validation set");

    let path = Path::new(output);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let file = File::create(path).with_context(|| format!("Failed to create {}", output))?;
    let mut writer = BufWriter::new(file);
    let mut generator = ScoreGenerator::new(fraud_rate);
    let mut frauds = 0usize;

    for _ in 0..count {
        let sample = generator.sample();
        if sample.is_positive() {
            frauds += 1;
        }
        serde_json::to_writer(&mut writer, &sample)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    if frauds == 0 {
        tracing::warn!("No fraud samples generated; threshold selection will reject this set");
    }

    info!(samples = count, frauds = frauds, path = %output, "Validation set written");
    Ok(())
}

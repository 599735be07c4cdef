//! Validation set loader for JSON-lines score files

use crate::types::{ValidationSample, ValidationSet};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::info;

/// Load a validation set from a JSON-lines file
pub fn load_validation_set<P: AsRef<Path>>(path: P) -> Result<ValidationSet> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open validation set {}", path.display()))?;

    let set = read_validation_set(BufReader::new(file))
        .with_context(|| format!("Failed to read validation set {}", path.display()))?;

    info!(
        path = %path.display(),
        samples = set.len(),
        positives = set.positives(),
        "Validation set loaded"
    );

    Ok(set)
}

/// Parse JSON lines, one sample per non-blank line
pub fn read_validation_set<R: Read>(reader: BufReader<R>) -> Result<ValidationSet> {
    let mut samples = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("I/O error at line {}", index + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let sample: ValidationSample = serde_json::from_str(trimmed)
            .with_context(|| format!("Invalid sample at line {}", index + 1))?;
        samples.push(sample);
    }

    Ok(ValidationSet::from_samples(samples)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(input: &str) -> Result<ValidationSet> {
        read_validation_set(BufReader::new(input.as_bytes()))
    }

    #[test]
    fn test_reads_samples_and_skips_blank_lines() {
        let set = read(
            "{\"label\": 0, \"probability\": 0.12}\n\n{\"label\": 1, \"probability\": 0.91}\n",
        )
        .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.positives(), 1);
        assert_eq!(set.samples()[1], ValidationSample::new(1, 0.91));
    }

    #[test]
    fn test_reports_line_of_malformed_record() {
        let err = read("{\"label\": 0, \"probability\": 0.1}\nnot json\n").unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn test_validates_assembled_set() {
        let err = read("{\"label\": 0, \"probability\": 1.7}\n").unwrap_err();
        assert!(err.to_string().contains("probability at index 0"));

        assert!(read("\n\n").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_validation_set("does/not/exist.jsonl").unwrap_err();
        assert!(err.to_string().contains("Failed to open validation set"));
    }
}

//! Generate synthetic interval lists for testing the merge pipelines.
//!
//! The generator walks a chain of intervals upward through the value range;
//! each step either shares an endpoint with its predecessor (and will merge
//! away) or leaves a gap of one (and survives). Tokens are scattered across
//! several buffers that are written out back to back, so the file arrives
//! thoroughly unsorted. Deterministic per seed.

use crate::error::{MergeError, Result};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Configuration for the generate command.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub output: PathBuf,
    pub buffers: usize,
    pub per_buffer: usize,
    pub seed: u64,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("test_data.txt"),
            buffers: 30,
            per_buffer: 10_000,
            seed: 42,
        }
    }
}

/// Statistics from a generate run.
#[derive(Debug, Default, Clone)]
pub struct GenerateStats {
    pub total_intervals: u64,
    pub disjoint_spans: u64,
}

impl fmt::Display for GenerateStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} intervals, {} disjoint spans after merging",
            self.total_intervals, self.disjoint_spans
        )
    }
}

/// Test-data generator.
#[derive(Debug)]
pub struct GenerateCommand {
    config: GenerateConfig,
}

impl GenerateCommand {
    pub fn new(config: GenerateConfig) -> Self {
        Self { config }
    }

    /// Write the generated list to the configured output file.
    pub fn run(&self) -> Result<GenerateStats> {
        let cfg = &self.config;
        if cfg.buffers == 0 || cfg.per_buffer == 0 {
            return Err(MergeError::Config(
                "buffers and per-buffer counts must be greater than zero".into(),
            ));
        }

        let mut rng = SmallRng::seed_from_u64(cfg.seed);
        let mut buffers = vec![String::new(); cfg.buffers];
        let total = (cfg.buffers * cfg.per_buffer) as u64;

        let mut x: i64 = 1;
        let mut y: i64 = 2;
        let mut disjoint: u64 = 1;
        for i in 0..total {
            let slot = rng.gen_range(0..cfg.buffers);
            let _ = write!(buffers[slot], "[{},{}]", x, y);

            if rng.gen_bool(0.5) {
                // Continue the current span: share an endpoint.
                x = y;
                y += 1;
            } else if i < total - 1 {
                // Leave a gap of one so the next span stands alone.
                x = y + 1;
                y = x + 1;
                disjoint += 1;
            }
        }

        let file = File::create(&cfg.output)?;
        let mut writer = BufWriter::new(file);
        for buffer in &buffers {
            writer.write_all(buffer.as_bytes())?;
        }
        writer.flush()?;

        Ok(GenerateStats {
            total_intervals: total,
            disjoint_spans: disjoint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge_text;
    use std::fs;

    fn config_for(dir: &tempfile::TempDir, seed: u64) -> GenerateConfig {
        GenerateConfig {
            output: dir.path().join("data.txt"),
            buffers: 4,
            per_buffer: 50,
            seed,
        }
    }

    #[test]
    fn test_generated_data_parses() {
        let dir = tempfile::tempdir().unwrap();
        let stats = GenerateCommand::new(config_for(&dir, 1)).run().unwrap();
        assert_eq!(stats.total_intervals, 200);

        let content = fs::read_to_string(dir.path().join("data.txt")).unwrap();
        let merged = merge_text(&content).unwrap();
        assert_eq!(merged.len() as u64, stats.disjoint_spans);
    }

    #[test]
    fn test_same_seed_same_output() {
        let dir = tempfile::tempdir().unwrap();
        GenerateCommand::new(config_for(&dir, 9)).run().unwrap();
        let first = fs::read(dir.path().join("data.txt")).unwrap();

        GenerateCommand::new(config_for(&dir, 9)).run().unwrap();
        let second = fs::read(dir.path().join("data.txt")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_different_seeds_differ() {
        let dir = tempfile::tempdir().unwrap();
        GenerateCommand::new(config_for(&dir, 1)).run().unwrap();
        let first = fs::read(dir.path().join("data.txt")).unwrap();

        GenerateCommand::new(config_for(&dir, 2)).run().unwrap();
        let second = fs::read(dir.path().join("data.txt")).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_zero_counts_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_for(&dir, 1);
        config.buffers = 0;
        assert!(matches!(
            GenerateCommand::new(config).run(),
            Err(MergeError::Config(_))
        ));
    }
}

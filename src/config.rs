//! Bridge configuration parameters
//!
//! All tunable parameters for the command bridge.
//! Values are loaded through [`ConfigPort`](crate::app::ports::ConfigPort);
//! any field missing from the stored document falls back to its default.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::app::ports::{ConfigError, ConfigPort};

/// Core bridge configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    // --- Stress workload ---
    /// Worker thread count used when `startStress` carries no count
    pub default_thread_count: u32,
    /// Reject `startStress` while a workload is already Running or Paused
    pub reject_start_while_running: bool,

    // --- Benchmarks ---
    /// Repetitions for `runMultiCoreBenchmark` when `numRuns` is absent
    pub default_benchmark_runs: u32,
    /// Upper bound for `numRuns` (the engine clamps to the same range)
    pub max_benchmark_runs: u32,

    // --- Host ---
    /// Overrides the directory reported by `getAppDir`
    pub app_dir: Option<PathBuf>,
    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            default_thread_count: 4,
            reject_start_while_running: true,

            default_benchmark_runs: 3,
            max_benchmark_runs: 10,

            app_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Range-check every field. Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_thread_count == 0 {
            return Err(ConfigError::ValidationFailed(
                "default_thread_count must be at least 1",
            ));
        }
        if self.max_benchmark_runs == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_benchmark_runs must be at least 1",
            ));
        }
        if self.default_benchmark_runs == 0 || self.default_benchmark_runs > self.max_benchmark_runs {
            return Err(ConfigError::ValidationFailed(
                "default_benchmark_runs must be within 1..=max_benchmark_runs",
            ));
        }
        Ok(())
    }

    /// Load through `port`, surfacing failures as the crate error.
    pub fn load_from(port: &impl ConfigPort) -> crate::Result<Self> {
        Ok(port.load()?)
    }

    /// Clamp a requested repetition count into `1..=max_benchmark_runs`.
    pub fn clamp_benchmark_runs(&self, requested: i64) -> u32 {
        requested.clamp(1, i64::from(self.max_benchmark_runs)) as u32
    }
}

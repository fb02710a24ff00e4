//! Benchmark runner: single/multi-core benchmark calls with progress relay.
//!
//! Multi-core runs are serialized behind a gate: a second request blocks
//! until the first engine call returns, then runs in turn.

use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info};

use super::events::{BenchmarkProgress, BenchmarkResult};
use super::ports::ControlEngine;

pub struct BenchmarkRunner {
    engine: Arc<dyn ControlEngine>,
    multi_core_gate: Mutex<()>,
}

impl BenchmarkRunner {
    pub fn new(engine: Arc<dyn ControlEngine>) -> Self {
        Self {
            engine,
            multi_core_gate: Mutex::new(()),
        }
    }

    /// One blocking call, no progress.
    pub fn run_single_core(&self) -> BenchmarkResult {
        info!("BENCH | single-core start");
        let score = self.engine.run_single_core_benchmark();
        info!("BENCH | single-core score={:.2}", score);
        BenchmarkResult::from_score(score)
    }

    /// One blocking call that repeats `runs` times inside the engine.
    ///
    /// Every engine progress callback is forwarded to `on_progress`
    /// unchanged and in order, from whichever thread the engine used.
    pub fn run_multi_core(
        &self,
        runs: u32,
        on_progress: &(dyn Fn(BenchmarkProgress) + Send + Sync),
    ) -> BenchmarkResult {
        let _gate = self
            .multi_core_gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        info!("BENCH | multi-core start runs={}", runs);
        let relay = |current_run: u32, total_runs: u32| {
            debug!("BENCH | progress {}/{}", current_run, total_runs);
            on_progress(BenchmarkProgress {
                current_run,
                total_runs,
            });
        };
        let score = self
            .engine
            .run_multi_core_benchmark_with_progress(&relay, runs);
        info!("BENCH | multi-core score={:.2}", score);
        BenchmarkResult::from_score(score)
    }
}

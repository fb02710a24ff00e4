//! Simulated control engine.
//!
//! Implements [`ControlEngine`] without generating real load: worker count
//! and pause flag are tracked atomically, benchmarks sleep for a fixed
//! interval per repetition and return a score derived from the logical CPU
//! count. Used by the host binary and for manual UI testing.

use std::fs;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread;
use std::time::Duration;

use log::{debug, info};

use crate::app::ports::{ControlEngine, EngineCpuInfo, EngineMetrics, ProgressFn};

const IDLE_LOAD_PERCENT: f64 = 3.0;
const BASE_CLOCK_MHZ: u32 = 3600;
const BOOST_CLOCK_MHZ: u32 = 4700;
const SINGLE_CORE_SCORE: f64 = 1000.0;
/// Multi-core scaling per additional logical CPU.
const SMT_EFFICIENCY: f64 = 0.85;
const MAX_RUNS: u32 = 10;
const FALLBACK_MODEL: &str = "Simulated CPU @ 3.60GHz";

pub struct SimulatedEngine {
    threads: AtomicU32,
    paused: AtomicBool,
    run_delay: Duration,
    logical_cpus: u32,
}

impl SimulatedEngine {
    pub fn new() -> Self {
        Self::with_run_delay(Duration::from_millis(250))
    }

    /// `run_delay` is slept once per benchmark repetition.
    pub fn with_run_delay(run_delay: Duration) -> Self {
        let logical_cpus = thread::available_parallelism()
            .map(|n| u32::try_from(n.get()).unwrap_or(u32::MAX))
            .unwrap_or(1);
        Self {
            threads: AtomicU32::new(0),
            paused: AtomicBool::new(false),
            run_delay,
            logical_cpus,
        }
    }

    /// Simulated total CPU load, 0–100.
    pub fn load_percent(&self) -> f64 {
        let threads = self.threads.load(Ordering::Acquire);
        if threads == 0 || self.paused.load(Ordering::Acquire) {
            return IDLE_LOAD_PERCENT;
        }
        (f64::from(threads) / f64::from(self.logical_cpus) * 100.0).clamp(IDLE_LOAD_PERCENT, 100.0)
    }

    fn multi_core_score(&self, run: u32) -> f64 {
        let scale = 1.0 + f64::from(self.logical_cpus.saturating_sub(1)) * SMT_EFFICIENCY;
        // Small deterministic spread so the median is meaningful.
        let spread = 1.0 + (f64::from(run % 3) - 1.0) * 0.02;
        SINGLE_CORE_SCORE * scale * spread
    }
}

impl Default for SimulatedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlEngine for SimulatedEngine {
    fn start(&self, thread_count: u32) -> bool {
        if thread_count == 0 {
            return false;
        }
        let started = self
            .threads
            .compare_exchange(0, thread_count, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if started {
            self.paused.store(false, Ordering::Release);
            info!("SIM | started {} workers", thread_count);
        }
        started
    }

    fn stop(&self) -> bool {
        let previous = self.threads.swap(0, Ordering::AcqRel);
        self.paused.store(false, Ordering::Release);
        if previous > 0 {
            info!("SIM | stopped {} workers", previous);
        }
        previous > 0
    }

    fn pause(&self) -> bool {
        if self.threads.load(Ordering::Acquire) == 0 {
            return false;
        }
        self.paused.store(true, Ordering::Release);
        true
    }

    fn resume(&self) -> bool {
        if self.threads.load(Ordering::Acquire) == 0 {
            return false;
        }
        self.paused.store(false, Ordering::Release);
        true
    }

    fn active_thread_count(&self) -> u32 {
        self.threads.load(Ordering::Acquire)
    }

    fn run_single_core_benchmark(&self) -> f64 {
        thread::sleep(self.run_delay);
        SINGLE_CORE_SCORE
    }

    fn run_multi_core_benchmark(&self, num_runs: u32) -> f64 {
        self.run_multi_core_benchmark_with_progress(&|_: u32, _: u32| {}, num_runs)
    }

    fn run_multi_core_benchmark_with_progress(&self, progress: &ProgressFn<'_>, num_runs: u32) -> f64 {
        let runs = num_runs.clamp(1, MAX_RUNS);
        let mut scores = Vec::with_capacity(runs as usize);
        for run in 0..runs {
            progress(run + 1, runs);
            thread::sleep(self.run_delay);
            scores.push(self.multi_core_score(run));
        }
        let score = median(&mut scores);
        debug!("SIM | multi-core {} runs, median {:.1}", runs, score);
        score
    }

    fn hardware_metrics(&self) -> EngineMetrics {
        let load = self.load_percent();
        EngineMetrics {
            cpu_load: load,
            cpu_freq_mhz: if load > IDLE_LOAD_PERCENT { BOOST_CLOCK_MHZ } else { BASE_CLOCK_MHZ },
            is_valid: true,
            ..EngineMetrics::default()
        }
    }

    fn cpu_info(&self) -> EngineCpuInfo {
        let model_name = fs::read_to_string("/proc/cpuinfo")
            .ok()
            .and_then(|text| model_name_from_cpuinfo(&text))
            .unwrap_or_else(|| FALLBACK_MODEL.to_string());
        let max_mhz = parse_brand_mhz(&model_name).unwrap_or(BOOST_CLOCK_MHZ);
        EngineCpuInfo {
            cores: (self.logical_cpus / 2).max(1),
            threads: self.logical_cpus,
            max_mhz,
            model_name,
            success: true,
        }
    }
}

fn median(scores: &mut [f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.sort_by(f64::total_cmp);
    let mid = scores.len() / 2;
    if scores.len() % 2 == 0 {
        (scores[mid - 1] + scores[mid]) / 2.0
    } else {
        scores[mid]
    }
}

fn model_name_from_cpuinfo(text: &str) -> Option<String> {
    text.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim() == "model name")
        .map(|(_, value)| value.trim().to_string())
}

/// Extract the rated clock from a brand string such as
/// `"Intel(R) Core(TM) i7-9700K CPU @ 3.60GHz"`.
pub fn parse_brand_mhz(brand: &str) -> Option<u32> {
    let (_, tail) = brand.rsplit_once('@')?;
    let tail = tail.trim();
    let (number, scale) = if let Some(ghz) = tail.strip_suffix("GHz") {
        (ghz, 1000.0)
    } else if let Some(mhz) = tail.strip_suffix("MHz") {
        (mhz, 1.0)
    } else {
        return None;
    };
    let value: f64 = number.trim().parse().ok()?;
    if value <= 0.0 {
        return None;
    }
    Some((value * scale).round() as u32)
}

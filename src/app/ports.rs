//! Port traits: the hexagonal boundary between the bridge and its collaborators.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ BridgeService (domain)
//! ```
//!
//! The control engine, the sensor provider, the memory probe and the host
//! environment are external. Adapters implement these traits; the
//! [`BridgeService`](super::service::BridgeService) holds them as shared
//! trait objects constructed once at startup.
//!
//! ## Concurrency notes
//!
//! - Every port is `Send + Sync`: blocking handlers run on worker threads
//!   and call into the same engine and device tree concurrently.
//! - Thread safety of the engine and the device tree is the collaborator's
//!   contract. The bridge adds no lock around them, except the
//!   multi-core benchmark gate in [`BenchmarkRunner`](super::benchmark::BenchmarkRunner).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::BridgeConfig;
use crate::sensors::memory::MemoryStatus;
use crate::sensors::{DeviceKind, Sensor};

// ───────────────────────────────────────────────────────────────
// Control engine port (driven adapter: bridge → native engine)
// ───────────────────────────────────────────────────────────────

/// Progress callback handed to the engine: `(current_run, total_runs)`.
///
/// May be invoked from any engine-owned thread, zero or more times, before
/// the benchmark call returns.
pub type ProgressFn<'a> = dyn Fn(u32, u32) + Send + Sync + 'a;

/// Boundary contract of the native stress/benchmark engine.
///
/// All calls block. Booleans and validity flags signal failure; nothing here
/// returns an error.
pub trait ControlEngine: Send + Sync {
    /// Spawn `thread_count` stress workers.
    fn start(&self, thread_count: u32) -> bool;

    /// Stop and join every stress worker.
    fn stop(&self) -> bool;

    fn pause(&self) -> bool;

    fn resume(&self) -> bool;

    /// Number of live stress workers (0 when idle).
    fn active_thread_count(&self) -> u32;

    /// Single-threaded benchmark. Returns the score, `<= 0` on failure.
    fn run_single_core_benchmark(&self) -> f64;

    /// Multi-threaded benchmark repeated `num_runs` times; returns the
    /// engine-computed aggregate (median) score.
    fn run_multi_core_benchmark(&self, num_runs: u32) -> f64;

    /// Same as [`run_multi_core_benchmark`](Self::run_multi_core_benchmark),
    /// reporting each repetition through `progress`.
    fn run_multi_core_benchmark_with_progress(&self, progress: &ProgressFn<'_>, num_runs: u32) -> f64;

    /// Live load and frequency (plus the engine's own, usually empty,
    /// sensor fields).
    fn hardware_metrics(&self) -> EngineMetrics;

    /// Processor identity as reported by CPUID / the OS.
    fn cpu_info(&self) -> EngineCpuInfo;
}

/// Raw metrics record returned by [`ControlEngine::hardware_metrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EngineMetrics {
    pub cpu_load: f64,
    pub cpu_freq_mhz: u32,
    pub temp_c: f64,
    pub voltage: f64,
    pub package_power_w: f64,
    /// False when neither load nor frequency could be sampled.
    pub is_valid: bool,
}

/// Raw identity record returned by [`ControlEngine::cpu_info`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineCpuInfo {
    pub model_name: String,
    pub cores: u32,
    pub threads: u32,
    pub max_mhz: u32,
    pub success: bool,
}

// ───────────────────────────────────────────────────────────────
// Sensor provider port (driven adapter: hardware library → bridge)
// ───────────────────────────────────────────────────────────────

/// One enumerated hardware device (CPU package, motherboard SuperIO, ...).
///
/// Sensor values are only current immediately after [`refresh`](Self::refresh).
pub trait HardwareDevice: Send + Sync {
    fn name(&self) -> String;

    fn kind(&self) -> DeviceKind;

    /// Re-sample every sensor on this device.
    fn refresh(&self) -> Result<(), SensorError>;

    /// Current sensors, in provider-defined order.
    fn sensors(&self) -> Result<Vec<Sensor>, SensorError>;
}

/// Enumerates the device tree. Order is provider-defined and may change
/// between calls.
pub trait SensorProvider: Send + Sync {
    fn devices(&self) -> Result<Vec<Arc<dyn HardwareDevice>>, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Memory probe port
// ───────────────────────────────────────────────────────────────

/// Physical memory totals, queried independently of the sensor tree.
pub trait MemoryProbe: Send + Sync {
    fn memory_status(&self) -> Result<MemoryStatus, MemoryError>;
}

// ───────────────────────────────────────────────────────────────
// Host environment port
// ───────────────────────────────────────────────────────────────

/// Filesystem facts the presentation surface asks about.
pub trait HostEnvironment: Send + Sync {
    /// Directory the application was launched from.
    fn app_dir(&self) -> PathBuf;

    /// True only for an existing regular file.
    fn file_exists(&self, path: &Path) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads bridge configuration.
///
/// Implementations validate before returning; out-of-range values are
/// reported as [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Returns [`ConfigError::NotFound`] when no stored config exists.
    fn load(&self) -> Result<BridgeConfig, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`SensorProvider`] and [`HardwareDevice`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorError {
    /// The device tree could not be enumerated.
    Enumeration(String),
    /// A device refused to re-sample its sensors.
    Refresh { device: String, reason: String },
    /// A device's sensor list could not be read.
    Read { device: String, reason: String },
}

/// Errors from [`MemoryProbe`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// The platform exposes no memory statistics.
    Unavailable,
    /// The statistics source was present but malformed.
    Parse(String),
    /// Generic I/O error reading the statistics source.
    Io(String),
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No config document found.
    NotFound,
    /// Stored config failed deserialization.
    Corrupted(String),
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError(String),
}

impl core::fmt::Display for SensorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Enumeration(reason) => write!(f, "enumeration failed: {}", reason),
            Self::Refresh { device, reason } => write!(f, "refresh of '{}' failed: {}", device, reason),
            Self::Read { device, reason } => write!(f, "read of '{}' failed: {}", device, reason),
        }
    }
}

impl core::fmt::Display for MemoryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "memory statistics unavailable"),
            Self::Parse(msg) => write!(f, "malformed memory statistics: {}", msg),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted(msg) => write!(f, "config corrupted: {}", msg),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

//! Outbound payloads.
//!
//! Every reply carries exactly one [`ReplyPayload`] variant, chosen by the
//! command that produced it; broadcasts carry an [`AppEvent`]. Adapters on
//! the other side of the transport only see the serialized field sets.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::app::ports::EngineCpuInfo;
use crate::sensors::SensorReading;

/// Result of one command, one variant per reply shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReplyPayload {
    /// startStress / stopStress / resumeStress
    Control(ControlAck),
    /// togglePauseResume / pauseStress
    Toggle(ToggleAck),
    /// getStressStatus
    Status(StressStatus),
    /// getCpuInfo / getCPUInfo
    CpuInfo(CpuIdentity),
    /// getAppDir
    AppDir(String),
    /// fileExists
    FileExists(bool),
    /// getHardwareSensors
    Sensors(Vec<SensorReading>),
    /// runSingleCoreBenchmark / runMultiCoreBenchmark
    Benchmark(BenchmarkResult),
    /// getHardwareMetrics
    Metrics(HardwareMetricsSnapshot),
    /// Unknown command, bad arguments, malformed envelope, handler panic.
    Error(ErrorReply),
}

impl ReplyPayload {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(ErrorReply { error: message.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReply {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlAck {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleAck {
    pub success: bool,
    pub message: &'static str,
    /// Pause flag after the attempt.
    pub is_paused: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StressStatus {
    pub running: bool,
    pub paused: bool,
    pub thread_count: u32,
}

/// Processor identity as presented to the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuIdentity {
    pub success: bool,
    pub name: String,
    pub model: String,
    pub cores: u32,
    pub threads: u32,
    pub logical_processors: u32,
    #[serde(rename = "maxClockMHz")]
    pub max_clock_mhz: u32,
    #[serde(rename = "maxClockGHz")]
    pub max_clock_ghz: f64,
}

impl From<EngineCpuInfo> for CpuIdentity {
    fn from(info: EngineCpuInfo) -> Self {
        let model = info.model_name.trim().to_string();
        Self {
            success: info.success,
            name: model.clone(),
            model,
            cores: info.cores,
            threads: info.threads,
            logical_processors: info.threads,
            max_clock_mhz: info.max_mhz,
            max_clock_ghz: f64::from(info.max_mhz) / 1000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BenchmarkResult {
    pub score: f64,
    pub success: bool,
}

impl BenchmarkResult {
    pub fn from_score(score: f64) -> Self {
        Self {
            score,
            success: score > 0.0,
        }
    }
}

/// One assembled hardware metrics result.
///
/// `temp_c`, `voltage_v` and `package_power_w` serialize as `null` when no
/// qualifying sensor exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HardwareMetricsSnapshot {
    #[serde(rename = "cpuLoadPercent")]
    pub cpu_load_percent: f64,
    #[serde(rename = "cpuFreqMHz")]
    pub cpu_freq_mhz: u32,
    #[serde(rename = "tempC")]
    pub temp_c: Option<f64>,
    #[serde(rename = "voltageV")]
    pub voltage_v: Option<f64>,
    #[serde(rename = "packagePowerW")]
    pub package_power_w: Option<f64>,
    #[serde(rename = "ramUsedGB")]
    pub ram_used_gb: f64,
    #[serde(rename = "ramTotalGB")]
    pub ram_total_gb: f64,
    #[serde(rename = "ramUsagePercent")]
    pub ram_usage_percent: f64,
    pub timestamp: DateTime<Utc>,
}

/// Unsolicited events pushed to the presentation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AppEvent {
    /// A multi-core benchmark repetition is starting.
    BenchmarkProgress(BenchmarkProgress),
}

impl AppEvent {
    /// Event name carried in the broadcast envelope.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BenchmarkProgress(_) => "benchmarkProgress",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkProgress {
    pub current_run: u32,
    pub total_runs: u32,
}

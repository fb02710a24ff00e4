//! Inbound commands to the bridge service.
//!
//! The presentation surface names commands by string; [`Command::parse`]
//! resolves the name (including aliases) and its arguments into a typed
//! value that the [`BridgeService`](super::service::BridgeService) executes.

use serde_json::{Map, Value};

use crate::config::BridgeConfig;

/// Commands the presentation surface can send into the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the stress workload with `threads` workers.
    StartStress { threads: u32 },

    /// Stop the stress workload and clear the pause flag.
    StopStress,

    /// Pause when running, resume when paused (`pauseStress` is an alias).
    TogglePauseResume,

    /// Resume a paused workload.
    ResumeStress,

    /// Report running/paused flags and the live worker count.
    GetStressStatus,

    /// Processor identity, fetched fresh every time (`getCPUInfo` is an alias).
    GetCpuInfo,

    /// Directory the application runs from.
    GetAppDir,

    /// Whether `path` names an existing regular file.
    FileExists { path: String },

    /// Flat dump of every device/sensor pair.
    GetHardwareSensors,

    /// One blocking single-core benchmark.
    RunSingleCoreBenchmark,

    /// Multi-core benchmark repeated `runs` times, with progress broadcasts.
    RunMultiCoreBenchmark { runs: u32 },

    /// Assemble a full hardware metrics snapshot.
    GetHardwareMetrics,
}

/// Why an envelope's `cmd`/`args` could not become a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// No handler is registered under this name.
    Unknown,
    /// A required argument is absent or has the wrong type.
    MissingArgument(&'static str),
    /// An argument is present but its value cannot be used.
    InvalidArgument(&'static str),
}

impl core::fmt::Display for CommandError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown command"),
            Self::MissingArgument(name) => write!(f, "Missing argument: {}", name),
            Self::InvalidArgument(name) => write!(f, "Invalid argument: {}", name),
        }
    }
}

impl Command {
    /// Resolve a command name (exact, case-sensitive) and its arguments.
    pub fn parse(cmd: &str, args: Option<&Map<String, Value>>, config: &BridgeConfig) -> Result<Self, CommandError> {
        let command = match cmd {
            "startStress" => Self::StartStress {
                threads: thread_count(args, config.default_thread_count)?,
            },
            "stopStress" => Self::StopStress,
            "togglePauseResume" | "pauseStress" => Self::TogglePauseResume,
            "resumeStress" => Self::ResumeStress,
            "getStressStatus" => Self::GetStressStatus,
            "getCpuInfo" | "getCPUInfo" => Self::GetCpuInfo,
            "getAppDir" => Self::GetAppDir,
            "fileExists" => Self::FileExists {
                path: args
                    .and_then(|a| a.get("path"))
                    .and_then(Value::as_str)
                    .ok_or(CommandError::MissingArgument("path"))?
                    .to_string(),
            },
            "getHardwareSensors" => Self::GetHardwareSensors,
            "runSingleCoreBenchmark" => Self::RunSingleCoreBenchmark,
            "runMultiCoreBenchmark" => Self::RunMultiCoreBenchmark {
                runs: args
                    .and_then(|a| a.get("numRuns"))
                    .and_then(Value::as_i64)
                    .map_or(config.default_benchmark_runs, |n| config.clamp_benchmark_runs(n)),
            },
            "getHardwareMetrics" => Self::GetHardwareMetrics,
            _ => return Err(CommandError::Unknown),
        };
        Ok(command)
    }

    /// True for commands that block on the engine or the sensor tree and
    /// therefore run on a worker thread.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            Self::GetHardwareSensors
                | Self::RunSingleCoreBenchmark
                | Self::RunMultiCoreBenchmark { .. }
                | Self::GetHardwareMetrics
        )
    }
}

/// The first of `numProcesses`/`threads` that is present decides the count;
/// it must be a positive integer. Neither present means `default`.
fn thread_count(args: Option<&Map<String, Value>>, default: u32) -> Result<u32, CommandError> {
    for key in ["numProcesses", "threads"] {
        let Some(value) = args.and_then(|a| a.get(key)).filter(|v| !v.is_null()) else {
            continue;
        };
        return value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n > 0)
            .ok_or(CommandError::InvalidArgument(key));
    }
    Ok(default)
}

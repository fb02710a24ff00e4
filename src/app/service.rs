//! Application service: the hexagonal core.
//!
//! [`BridgeService`] owns the control facade, the benchmark runner and the
//! telemetry aggregator, and answers the auxiliary host queries itself.
//! All I/O flows through port traits injected once at construction, making
//! the service testable with mock adapters.
//!
//! ```text
//!  ControlEngine  ──▶ ┌──────────────────────────────┐
//!  SensorProvider ──▶ │         BridgeService         │ ──▶ ReplyPayload
//!  MemoryProbe    ──▶ │ Control · Benchmark · Telemetry│ ──▶ AppEvent
//!  HostEnvironment──▶ └──────────────────────────────┘
//! ```

use std::path::Path;
use std::sync::Arc;

use log::info;

use crate::config::BridgeConfig;
use crate::sensors;

use super::benchmark::BenchmarkRunner;
use super::commands::Command;
use super::control::ControlFacade;
use super::events::{AppEvent, BenchmarkProgress, CpuIdentity, ReplyPayload};
use super::ports::{ControlEngine, HostEnvironment, MemoryProbe, SensorProvider};
use super::telemetry::TelemetryAggregator;

/// Collaborators injected into [`BridgeService::new`].
pub struct Collaborators {
    pub engine: Arc<dyn ControlEngine>,
    pub sensors: Arc<dyn SensorProvider>,
    pub memory: Arc<dyn MemoryProbe>,
    pub host: Arc<dyn HostEnvironment>,
}

pub struct BridgeService {
    config: BridgeConfig,
    control: ControlFacade,
    benchmarks: BenchmarkRunner,
    telemetry: TelemetryAggregator,
    engine: Arc<dyn ControlEngine>,
    sensors: Arc<dyn SensorProvider>,
    host: Arc<dyn HostEnvironment>,
}

impl BridgeService {
    pub fn new(config: BridgeConfig, ports: Collaborators) -> Self {
        let Collaborators {
            engine,
            sensors,
            memory,
            host,
        } = ports;

        Self {
            control: ControlFacade::new(Arc::clone(&engine), &config),
            benchmarks: BenchmarkRunner::new(Arc::clone(&engine)),
            telemetry: TelemetryAggregator::new(Arc::clone(&engine), Arc::clone(&sensors), memory),
            config,
            engine,
            sensors,
            host,
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn control(&self) -> &ControlFacade {
        &self.control
    }

    pub fn benchmarks(&self) -> &BenchmarkRunner {
        &self.benchmarks
    }

    pub fn telemetry(&self) -> &TelemetryAggregator {
        &self.telemetry
    }

    // ── Command handling ──────────────────────────────────────

    /// Execute one command to completion.
    ///
    /// Blocks for as long as the underlying engine or provider call takes.
    /// `on_event` receives broadcasts emitted while the command runs, in
    /// emission order, before this returns.
    pub fn handle_command(
        &self,
        cmd: Command,
        on_event: &(dyn Fn(AppEvent) + Send + Sync),
    ) -> ReplyPayload {
        match cmd {
            Command::StartStress { threads } => ReplyPayload::Control(self.control.start(threads)),
            Command::StopStress => ReplyPayload::Control(self.control.stop()),
            Command::TogglePauseResume => ReplyPayload::Toggle(self.control.toggle_pause_resume()),
            Command::ResumeStress => ReplyPayload::Control(self.control.resume()),
            Command::GetStressStatus => ReplyPayload::Status(self.control.status()),

            Command::GetCpuInfo => ReplyPayload::CpuInfo(CpuIdentity::from(self.engine.cpu_info())),
            Command::GetAppDir => ReplyPayload::AppDir(self.app_dir()),
            Command::FileExists { path } => ReplyPayload::FileExists(self.host.file_exists(Path::new(&path))),

            Command::GetHardwareSensors => {
                let readings = sensors::sweep(self.sensors.as_ref());
                info!("SENSORS | dumped {} readings", readings.len());
                ReplyPayload::Sensors(readings)
            }

            Command::RunSingleCoreBenchmark => ReplyPayload::Benchmark(self.benchmarks.run_single_core()),
            Command::RunMultiCoreBenchmark { runs } => ReplyPayload::Benchmark(
                self.benchmarks
                    .run_multi_core(runs, &|progress: BenchmarkProgress| on_event(AppEvent::BenchmarkProgress(progress))),
            ),

            Command::GetHardwareMetrics => ReplyPayload::Metrics(self.telemetry.snapshot()),
        }
    }

    fn app_dir(&self) -> String {
        let dir = self
            .config
            .app_dir
            .clone()
            .unwrap_or_else(|| self.host.app_dir());
        dir.to_string_lossy().into_owned()
    }
}

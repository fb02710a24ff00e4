//! CPU bridge: host entry point.
//!
//! Speaks newline-delimited JSON envelopes on stdin/stdout.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SimulatedEngine   SimulatedSensorTree   ProcMemoryProbe       │
//! │  (ControlEngine)   (SensorProvider)      (MemoryProbe)         │
//! │  LocalHost         JsonConfigFile        LineTransport<Stdout> │
//! │  (HostEnvironment) (ConfigPort)          (Transport)           │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              BridgeService (pure logic)                │    │
//! │  │  Control · Benchmark · Telemetry                       │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Reader thread → mailbox → I/O loop (dispatch, single writer)  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::env;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};

use cpubridge::adapters::config_file::JsonConfigFile;
use cpubridge::adapters::host::{LocalHost, ProcMemoryProbe};
use cpubridge::adapters::sim_engine::SimulatedEngine;
use cpubridge::adapters::sim_sensors::SimulatedSensorTree;
use cpubridge::Error;
use cpubridge::app::ports::ConfigError;
use cpubridge::app::service::{BridgeService, Collaborators};
use cpubridge::config::BridgeConfig;
use cpubridge::rpc::channels;
use cpubridge::rpc::dispatcher::Dispatcher;
use cpubridge::rpc::io_task;
use cpubridge::rpc::transport::LineTransport;

/// Environment variable naming the config file when no argument is given.
const CONFIG_ENV: &str = "CPUBRIDGE_CONFIG";

fn main() -> Result<()> {
    // Config comes first so its log level can seed the logger.
    let config_path = env::args_os()
        .nth(1)
        .or_else(|| env::var_os(CONFIG_ENV))
        .map(PathBuf::from);
    let loaded = config_path
        .as_ref()
        .map(|path| BridgeConfig::load_from(&JsonConfigFile::new(path)));
    let level = match &loaded {
        Some(Ok(cfg)) => cfg.log_level.clone(),
        _ => BridgeConfig::default().log_level,
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();

    info!("CPU bridge v{} starting", env!("CARGO_PKG_VERSION"));
    let config = match loaded {
        Some(Ok(cfg)) => cfg,
        Some(Err(Error::Config(ConfigError::NotFound))) => {
            warn!("CONFIG | {:?} not found, using defaults", config_path);
            BridgeConfig::default()
        }
        Some(Err(e)) => {
            warn!("CONFIG | {}, using defaults", e);
            BridgeConfig::default()
        }
        None => BridgeConfig::default(),
    };

    // ── Adapters ──────────────────────────────────────────────
    let engine = Arc::new(SimulatedEngine::new());
    let sensors = Arc::new(SimulatedSensorTree::new(Arc::clone(&engine)));
    let service = Arc::new(BridgeService::new(
        config,
        Collaborators {
            engine,
            sensors,
            memory: Arc::new(ProcMemoryProbe::new()),
            host: Arc::new(LocalHost::discover()),
        },
    ));

    // ── Bridge I/O ────────────────────────────────────────────
    let (outbox, inbox) = channels::mailbox();
    let dispatcher = Dispatcher::new(service, outbox.clone());
    let reader = io_task::spawn_reader(io::stdin(), outbox).context("failed to spawn stdin reader")?;

    let mut transport = LineTransport::new(io::stdout());
    let stats = io_task::run(&inbox, &dispatcher, &mut transport);

    if reader.join().is_err() {
        warn!("IO: reader thread panicked");
    }
    info!(
        "CPU bridge exiting: {} replies, {} broadcasts, {} dropped, {} write errors",
        stats.replies, stats.broadcasts, stats.dropped, stats.write_errors
    );
    Ok(())
}

//! Mock collaborators for integration tests.
//!
//! Records every engine call so tests can assert on the full command
//! history without a real stress engine or sensor library, and wires a
//! complete bridge (service, dispatcher, mailbox) around them.

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use cpubridge::app::ports::{
    ControlEngine, EngineCpuInfo, EngineMetrics, HardwareDevice, HostEnvironment, MemoryError, MemoryProbe,
    ProgressFn, SensorError, SensorProvider,
};
use cpubridge::app::service::{BridgeService, Collaborators};
use cpubridge::config::BridgeConfig;
use cpubridge::rpc::channels::{self, BridgeMsg, Inbox, Outbox};
use cpubridge::rpc::dispatcher::{Dispatch, Dispatcher};
use cpubridge::rpc::envelope::Outbound;
use cpubridge::rpc::io_task;
use cpubridge::rpc::transport::LineTransport;
use cpubridge::sensors::memory::MemoryStatus;
use cpubridge::sensors::{DeviceKind, Sensor};
use serde_json::Value;

// ── Engine call record ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Start(u32),
    Stop,
    Pause,
    Resume,
    SingleCore,
    MultiCore(u32),
    Metrics,
    CpuInfo,
}

// ── MockEngine ────────────────────────────────────────────────

pub struct MockEngine {
    pub calls: Mutex<Vec<EngineCall>>,
    threads: AtomicU32,
    /// Score returned by both benchmarks.
    pub score: Mutex<f64>,
    /// When set, replaces the default `(run, n)` progress sequence.
    pub progress_script: Mutex<Option<Vec<(u32, u32)>>>,
    pub metrics: Mutex<EngineMetrics>,
    pub benchmark_delay: Mutex<Duration>,
    pub panic_on_metrics: AtomicBool,
    /// `stop()` fails and leaves the workers running.
    pub refuse_stop: AtomicBool,
    multi_in_flight: AtomicUsize,
    pub max_multi_in_flight: AtomicUsize,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            threads: AtomicU32::new(0),
            score: Mutex::new(812.5),
            progress_script: Mutex::new(None),
            metrics: Mutex::new(EngineMetrics {
                cpu_load: 37.5,
                cpu_freq_mhz: 4200,
                is_valid: true,
                ..EngineMetrics::default()
            }),
            benchmark_delay: Mutex::new(Duration::ZERO),
            panic_on_metrics: AtomicBool::new(false),
            refuse_stop: AtomicBool::new(false),
            multi_in_flight: AtomicUsize::new(0),
            max_multi_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &EngineCall) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    /// Simulate the engine changing state behind the bridge's back.
    pub fn set_threads(&self, n: u32) {
        self.threads.store(n, Ordering::SeqCst);
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn running(&self) -> bool {
        self.threads.load(Ordering::SeqCst) > 0
    }
}

impl ControlEngine for MockEngine {
    fn start(&self, thread_count: u32) -> bool {
        self.record(EngineCall::Start(thread_count));
        self.threads
            .compare_exchange(0, thread_count, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn stop(&self) -> bool {
        self.record(EngineCall::Stop);
        if self.refuse_stop.load(Ordering::SeqCst) {
            return false;
        }
        self.threads.swap(0, Ordering::SeqCst) > 0
    }

    fn pause(&self) -> bool {
        self.record(EngineCall::Pause);
        self.running()
    }

    fn resume(&self) -> bool {
        self.record(EngineCall::Resume);
        self.running()
    }

    fn active_thread_count(&self) -> u32 {
        self.threads.load(Ordering::SeqCst)
    }

    fn run_single_core_benchmark(&self) -> f64 {
        self.record(EngineCall::SingleCore);
        *self.score.lock().unwrap()
    }

    fn run_multi_core_benchmark(&self, num_runs: u32) -> f64 {
        self.run_multi_core_benchmark_with_progress(&|_: u32, _: u32| {}, num_runs)
    }

    fn run_multi_core_benchmark_with_progress(&self, progress: &ProgressFn<'_>, num_runs: u32) -> f64 {
        self.record(EngineCall::MultiCore(num_runs));
        let now = self.multi_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_multi_in_flight.fetch_max(now, Ordering::SeqCst);

        let script = self
            .progress_script
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| (1..=num_runs).map(|run| (run, num_runs)).collect());
        let delay = *self.benchmark_delay.lock().unwrap();
        for (current, total) in script {
            // Report from an engine-owned thread, like the native engine does.
            thread::scope(|s| {
                s.spawn(|| progress(current, total));
            });
            thread::sleep(delay);
        }

        self.multi_in_flight.fetch_sub(1, Ordering::SeqCst);
        *self.score.lock().unwrap()
    }

    fn hardware_metrics(&self) -> EngineMetrics {
        self.record(EngineCall::Metrics);
        if self.panic_on_metrics.load(Ordering::SeqCst) {
            panic!("engine metrics exploded");
        }
        *self.metrics.lock().unwrap()
    }

    fn cpu_info(&self) -> EngineCpuInfo {
        self.record(EngineCall::CpuInfo);
        EngineCpuInfo {
            model_name: " Mock CPU 9000 @ 4.20GHz ".into(),
            cores: 8,
            threads: 16,
            max_mhz: 4200,
            success: true,
        }
    }
}

// ── Scripted sensor provider ──────────────────────────────────

pub struct MockDevice {
    pub name: String,
    pub kind: DeviceKind,
    pub sensors: Vec<Sensor>,
    pub fail_refresh: bool,
    pub refreshes: AtomicUsize,
}

impl MockDevice {
    pub fn new(name: &str, kind: DeviceKind, sensors: Vec<Sensor>) -> Self {
        Self {
            name: name.into(),
            kind,
            sensors,
            fail_refresh: false,
            refreshes: AtomicUsize::new(0),
        }
    }

    pub fn failing(name: &str, kind: DeviceKind) -> Self {
        Self {
            fail_refresh: true,
            ..Self::new(name, kind, Vec::new())
        }
    }
}

impl HardwareDevice for MockDevice {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> DeviceKind {
        self.kind
    }

    fn refresh(&self) -> Result<(), SensorError> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        if self.fail_refresh {
            return Err(SensorError::Refresh {
                device: self.name.clone(),
                reason: "driver timeout".into(),
            });
        }
        Ok(())
    }

    fn sensors(&self) -> Result<Vec<Sensor>, SensorError> {
        Ok(self.sensors.clone())
    }
}

pub struct ScriptedSensors {
    pub devices: Mutex<Vec<Arc<MockDevice>>>,
    /// Every `devices()` call fails.
    pub fail_enumeration: AtomicBool,
}

impl ScriptedSensors {
    pub fn new(devices: Vec<MockDevice>) -> Self {
        Self {
            devices: Mutex::new(devices.into_iter().map(Arc::new).collect()),
            fail_enumeration: AtomicBool::new(false),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn broken() -> Self {
        let s = Self::empty();
        s.fail_enumeration.store(true, Ordering::SeqCst);
        s
    }
}

impl SensorProvider for ScriptedSensors {
    fn devices(&self) -> Result<Vec<Arc<dyn HardwareDevice>>, SensorError> {
        if self.fail_enumeration.load(Ordering::SeqCst) {
            return Err(SensorError::Enumeration("provider offline".into()));
        }
        Ok(self
            .devices
            .lock()
            .unwrap()
            .iter()
            .map(|d| Arc::clone(d) as Arc<dyn HardwareDevice>)
            .collect())
    }
}

// ── Memory / host ─────────────────────────────────────────────

pub struct MockMemory {
    pub status: Mutex<Result<MemoryStatus, MemoryError>>,
}

impl MockMemory {
    pub const GIB: u64 = 1024 * 1024 * 1024;

    /// 16 GiB total, 4 GiB available.
    pub fn new() -> Self {
        Self {
            status: Mutex::new(Ok(MemoryStatus {
                total_bytes: 16 * Self::GIB,
                available_bytes: 4 * Self::GIB,
            })),
        }
    }

    pub fn failing() -> Self {
        Self {
            status: Mutex::new(Err(MemoryError::Unavailable)),
        }
    }
}

impl MemoryProbe for MockMemory {
    fn memory_status(&self) -> Result<MemoryStatus, MemoryError> {
        self.status.lock().unwrap().clone()
    }
}

pub struct MockHost {
    pub dir: PathBuf,
    pub files: HashSet<PathBuf>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            dir: PathBuf::from("/opt/cpubridge/"),
            files: HashSet::from([PathBuf::from("/opt/cpubridge/engine.dll")]),
        }
    }
}

impl HostEnvironment for MockHost {
    fn app_dir(&self) -> PathBuf {
        self.dir.clone()
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.files.contains(path)
    }
}

// ── Wired bridge ──────────────────────────────────────────────

pub struct TestBridge {
    pub engine: Arc<MockEngine>,
    pub sensors: Arc<ScriptedSensors>,
    pub memory: Arc<MockMemory>,
    pub service: Arc<BridgeService>,
    pub dispatcher: Dispatcher,
    pub outbox: Outbox,
    pub inbox: Inbox,
}

impl TestBridge {
    pub fn new() -> Self {
        Self::with(BridgeConfig::default(), ScriptedSensors::empty(), MockMemory::new())
    }

    pub fn with_sensors(sensors: ScriptedSensors) -> Self {
        Self::with(BridgeConfig::default(), sensors, MockMemory::new())
    }

    pub fn with(config: BridgeConfig, sensors: ScriptedSensors, memory: MockMemory) -> Self {
        let engine = Arc::new(MockEngine::new());
        let sensors = Arc::new(sensors);
        let memory = Arc::new(memory);
        let service = Arc::new(BridgeService::new(
            config,
            Collaborators {
                engine: engine.clone(),
                sensors: sensors.clone(),
                memory: memory.clone(),
                host: Arc::new(MockHost::new()),
            },
        ));
        let (outbox, inbox) = channels::mailbox();
        let dispatcher = Dispatcher::new(Arc::clone(&service), outbox.clone());
        Self {
            engine,
            sensors,
            memory,
            service,
            dispatcher,
            outbox,
            inbox,
        }
    }

    /// Dispatch one envelope and wait for it to finish. Returns every
    /// envelope it produced, broadcasts first, as JSON values.
    pub fn send(&self, raw: &str) -> Vec<Value> {
        match self.dispatcher.dispatch(raw) {
            Dispatch::Replied(reply) => vec![to_json(&Outbound::Reply(reply))],
            Dispatch::Deferred(worker) => {
                worker.join().expect("worker thread must not panic");
                self.drain()
            }
            Dispatch::Dropped => Vec::new(),
        }
    }

    /// Dispatch one envelope and return its single reply.
    pub fn request(&self, raw: &str) -> Value {
        let mut out = self.send(raw);
        let reply = out.pop().expect("expected a reply");
        assert!(reply.get("replyTo").is_some(), "last envelope must be the reply: {reply}");
        reply
    }

    /// Everything currently queued in the mailbox.
    pub fn drain(&self) -> Vec<Value> {
        let mut out = Vec::new();
        while let Some(msg) = self.inbox.try_recv() {
            match msg {
                BridgeMsg::Broadcast(b) => out.push(to_json(&Outbound::Broadcast(b))),
                BridgeMsg::Completed(r) => out.push(to_json(&Outbound::Reply(r))),
                other => panic!("unexpected mailbox message {other:?}"),
            }
        }
        out
    }

    /// Feed `lines` through the full I/O loop and return the transport output.
    pub fn run_script(&self, lines: &[&str]) -> Vec<Value> {
        for line in lines {
            self.outbox.post(BridgeMsg::Inbound((*line).to_string()));
        }
        self.outbox.post(BridgeMsg::Shutdown);

        let mut transport = LineTransport::new(Vec::new());
        io_task::run(&self.inbox, &self.dispatcher, &mut transport);
        String::from_utf8(transport.into_inner())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }
}

fn to_json(msg: &Outbound) -> Value {
    serde_json::from_str(&msg.encode().unwrap()).unwrap()
}

pub fn envelope(id: &str, cmd: &str, args: Value) -> String {
    serde_json::json!({"id": id, "cmd": cmd, "args": args}).to_string()
}

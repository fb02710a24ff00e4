//! Telemetry aggregator: one snapshot from three independent sources.
//!
//! ```text
//!  ControlEngine ──▶ load, frequency ─────┐
//!  SensorProvider ─▶ temp, voltage, power ─┼──▶ HardwareMetricsSnapshot
//!  MemoryProbe ────▶ RAM used/total ───────┘        (+ UTC timestamp)
//! ```
//!
//! Each source degrades on its own: engine failure zeroes load/frequency,
//! sensor failure leaves temp/voltage/power `None`, memory failure zeroes
//! the RAM fields. The snapshot itself never fails.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use chrono::Utc;
use log::{debug, warn};

use crate::error::Error;
use crate::sensors::selection::{CpuSensorReadings, read_cpu_sensors};

use super::events::HardwareMetricsSnapshot;
use super::ports::{ControlEngine, MemoryProbe, SensorProvider};

pub struct TelemetryAggregator {
    engine: Arc<dyn ControlEngine>,
    sensors: Arc<dyn SensorProvider>,
    memory: Arc<dyn MemoryProbe>,
}

impl TelemetryAggregator {
    pub fn new(
        engine: Arc<dyn ControlEngine>,
        sensors: Arc<dyn SensorProvider>,
        memory: Arc<dyn MemoryProbe>,
    ) -> Self {
        Self {
            engine,
            sensors,
            memory,
        }
    }

    pub fn snapshot(&self) -> HardwareMetricsSnapshot {
        // 1. Engine: authoritative load and frequency
        let metrics = self.engine.hardware_metrics();
        let (cpu_load_percent, cpu_freq_mhz) = if metrics.is_valid {
            (metrics.cpu_load.max(0.0), metrics.cpu_freq_mhz)
        } else {
            warn!("TELEM | engine metrics invalid, reporting zero load/frequency");
            (0.0, 0)
        };

        // 2. Sensor tree: temperature, voltage, package power
        let sensors = panic::catch_unwind(AssertUnwindSafe(|| read_cpu_sensors(self.sensors.as_ref())))
            .unwrap_or_else(|_| {
                warn!("TELEM | sensor provider panicked, sensor fields unset");
                CpuSensorReadings::default()
            });

        // 3. Memory
        let memory = panic::catch_unwind(AssertUnwindSafe(|| self.memory.memory_status()));
        let (ram_used_gb, ram_total_gb, ram_usage_percent) = match memory {
            Ok(Ok(m)) => (m.used_gb(), m.total_gb(), m.usage_percent()),
            Ok(Err(e)) => {
                warn!("TELEM | {}", Error::from(e));
                (0.0, 0.0, 0.0)
            }
            Err(_) => {
                warn!("TELEM | memory probe panicked");
                (0.0, 0.0, 0.0)
            }
        };

        let snapshot = HardwareMetricsSnapshot {
            cpu_load_percent,
            cpu_freq_mhz,
            temp_c: sensors.temp_c,
            voltage_v: sensors.voltage_v,
            package_power_w: sensors.package_power_w,
            ram_used_gb,
            ram_total_gb,
            ram_usage_percent,
            timestamp: Utc::now(),
        };

        debug!(
            "TELEM | load={:.1}% freq={}MHz T={:?}C V={:?} P={:?}W ram={:.2}/{:.2}GB",
            snapshot.cpu_load_percent,
            snapshot.cpu_freq_mhz,
            snapshot.temp_c,
            snapshot.voltage_v,
            snapshot.package_power_w,
            snapshot.ram_used_gb,
            snapshot.ram_total_gb,
        );
        snapshot
    }
}

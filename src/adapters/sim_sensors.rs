//! Simulated sensor tree.
//!
//! Three devices whose readings follow the simulated engine's load:
//!
//! | Device             | Kind        | Sensors                                  |
//! |--------------------|-------------|------------------------------------------|
//! | `Simulated CPU`    | Cpu         | package/core temps, package/core power   |
//! | `Nuvoton NCT6798D` | Motherboard | Vcore, +12V, system temp, CPU fan        |
//! | `Generic Memory`   | Memory      | memory load                              |
//!
//! The CPU device carries no voltage sensor, so voltage selection falls back
//! to the board's `Vcore` rail.

use std::sync::{Arc, Mutex, PoisonError};

use crate::app::ports::{HardwareDevice, SensorError, SensorProvider};
use crate::sensors::{DeviceKind, Sensor, SensorKind};

use super::sim_engine::SimulatedEngine;

type Template = fn(load: f64) -> Vec<Sensor>;

struct SimulatedDevice {
    name: &'static str,
    kind: DeviceKind,
    engine: Arc<SimulatedEngine>,
    template: Template,
    sensors: Mutex<Vec<Sensor>>,
}

impl HardwareDevice for SimulatedDevice {
    fn name(&self) -> String {
        self.name.to_string()
    }

    fn kind(&self) -> DeviceKind {
        self.kind
    }

    fn refresh(&self) -> Result<(), SensorError> {
        let fresh = (self.template)(self.engine.load_percent());
        *self.sensors.lock().unwrap_or_else(PoisonError::into_inner) = fresh;
        Ok(())
    }

    fn sensors(&self) -> Result<Vec<Sensor>, SensorError> {
        Ok(self.sensors.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }
}

pub struct SimulatedSensorTree {
    devices: Vec<Arc<dyn HardwareDevice>>,
}

impl SimulatedSensorTree {
    pub fn new(engine: Arc<SimulatedEngine>) -> Self {
        let device = |name, kind, template: Template| -> Arc<dyn HardwareDevice> {
            Arc::new(SimulatedDevice {
                name,
                kind,
                engine: Arc::clone(&engine),
                template,
                sensors: Mutex::new(Vec::new()),
            })
        };
        Self {
            devices: vec![
                device("Simulated CPU", DeviceKind::Cpu, cpu_sensors),
                device("Nuvoton NCT6798D", DeviceKind::Motherboard, board_sensors),
                device("Generic Memory", DeviceKind::Memory, memory_sensors),
            ],
        }
    }
}

impl SensorProvider for SimulatedSensorTree {
    fn devices(&self) -> Result<Vec<Arc<dyn HardwareDevice>>, SensorError> {
        Ok(self.devices.clone())
    }
}

fn cpu_sensors(load: f64) -> Vec<Sensor> {
    vec![
        Sensor::new("CPU Core #1", SensorKind::Temperature, 36.0 + load * 0.42),
        Sensor::new("CPU Package", SensorKind::Temperature, 38.0 + load * 0.45),
        Sensor::new("CPU Package", SensorKind::Power, 12.0 + load * 1.1),
        Sensor::new("CPU Cores", SensorKind::Power, 8.0 + load * 1.0),
        Sensor::new("CPU Total", SensorKind::Load, load),
    ]
}

fn board_sensors(load: f64) -> Vec<Sensor> {
    vec![
        Sensor::new("Vcore", SensorKind::Voltage, 1.10 + load * 0.0015),
        Sensor::new("+12V", SensorKind::Voltage, 12.05),
        Sensor::new("System", SensorKind::Temperature, 33.0 + load * 0.05),
        Sensor::new("CPU Fan", SensorKind::Fan, 700.0 + load * 8.0),
    ]
}

fn memory_sensors(_load: f64) -> Vec<Sensor> {
    vec![Sensor::new("Memory", SensorKind::Load, 42.0)]
}

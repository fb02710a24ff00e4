//! Sensor subsystem: device/sensor model, flat sweeps, and the selection
//! rules that reduce a whole device tree to CPU temperature, voltage and
//! package power.
//!
//! The provider itself is external and reached through
//! [`SensorProvider`](crate::app::ports::SensorProvider).

pub mod memory;
pub mod selection;

use log::warn;
use serde::Serialize;

use crate::app::ports::SensorProvider;
use crate::error::Error;

/// Hardware category tag reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeviceKind {
    Cpu,
    Motherboard,
    SuperIo,
    Memory,
    Gpu,
    Storage,
    Network,
    Other,
}

/// Physical quantity measured by a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SensorKind {
    Temperature,
    Voltage,
    Power,
    Current,
    Clock,
    Load,
    Fan,
    Data,
    Other,
}

/// One sensor on a device. `value` is `None` when the provider has no
/// current sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Sensor {
    pub name: String,
    pub kind: SensorKind,
    pub value: Option<f64>,
}

impl Sensor {
    pub fn new(name: impl Into<String>, kind: SensorKind, value: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            value: Some(value),
        }
    }
}

/// Flattened device/sensor pair, as dumped by `getHardwareSensors`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorReading {
    #[serde(rename = "hardware")]
    pub source_device: String,
    #[serde(rename = "hardwareType")]
    pub device_kind: DeviceKind,
    #[serde(rename = "name")]
    pub sensor_name: String,
    #[serde(rename = "type")]
    pub sensor_kind: SensorKind,
    pub value: Option<f64>,
}

/// Refresh every device and return every sensor as a flat list.
///
/// A device that fails to refresh or read is skipped; an enumeration
/// failure yields an empty list. Nothing propagates.
pub fn sweep(provider: &dyn SensorProvider) -> Vec<SensorReading> {
    let devices = match provider.devices() {
        Ok(devices) => devices,
        Err(e) => {
            warn!("SENSORS | sweep aborted: {}", Error::from(e));
            return Vec::new();
        }
    };

    let mut readings = Vec::new();
    for device in devices {
        if let Err(e) = device.refresh() {
            warn!("SENSORS | skipping device: {}", Error::from(e));
            continue;
        }
        let sensors = match device.sensors() {
            Ok(sensors) => sensors,
            Err(e) => {
                warn!("SENSORS | skipping device: {}", Error::from(e));
                continue;
            }
        };
        let name = device.name();
        let kind = device.kind();
        readings.extend(sensors.into_iter().map(|s| SensorReading {
            source_device: name.clone(),
            device_kind: kind,
            sensor_name: s.name,
            sensor_kind: s.kind,
            value: s.value,
        }));
    }
    readings
}

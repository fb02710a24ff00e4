//! CPU sensor selection over a heterogeneous device tree.
//!
//! Rules, evaluated across every device in enumeration order:
//!
//! | Metric      | Devices            | Candidates                         | Winner                                   |
//! |-------------|--------------------|------------------------------------|------------------------------------------|
//! | temperature | all                | name contains `Package` or `CPU`   | first match, overridden by any `Package` |
//! | power       | CPU only           | name contains `Package` or `CPU`   | first match, overridden by any `Package` |
//! | voltage     | CPU                | any voltage sensor                 | first match                              |
//! |             | Motherboard        | name contains `CPU`/`VCore`/`Vcore`| first match, only if no CPU voltage      |
//!
//! Temperature, unlike power, is not limited to CPU devices. A later
//! non-CPU sensor whose name contains `Package` (a GPU package, say)
//! overrides the CPU package temperature. A CPU-only scan would not.

use log::{debug, warn};

use crate::app::ports::SensorProvider;
use crate::error::Error;

use super::{DeviceKind, Sensor, SensorKind};

const PACKAGE_TAG: &str = "Package";
const CPU_TAG: &str = "CPU";
const BOARD_VCORE_TAGS: [&str; 3] = ["CPU", "VCore", "Vcore"];

/// Temperature, voltage and power chosen from the sensor tree. `None`
/// means no qualifying sensor was found.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CpuSensorReadings {
    pub temp_c: Option<f64>,
    pub voltage_v: Option<f64>,
    pub package_power_w: Option<f64>,
}

/// Keeps the first `CPU`/`Package` candidate; a later `Package` candidate
/// always replaces it.
#[derive(Debug, Default)]
struct PackagePreferred(Option<f64>);

impl PackagePreferred {
    fn offer(&mut self, name: &str, value: f64) {
        let is_package = name.contains(PACKAGE_TAG);
        if !is_package && !name.contains(CPU_TAG) {
            return;
        }
        if self.0.is_none() || is_package {
            self.0 = Some(value);
        }
    }
}

/// Incremental accumulator: feed every `(device kind, sensor)` pair, then
/// call [`finish`](Self::finish).
#[derive(Debug, Default)]
pub struct CpuSensorSelector {
    temperature: PackagePreferred,
    power: PackagePreferred,
    cpu_voltage: Option<f64>,
    board_voltage: Option<f64>,
}

impl CpuSensorSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offer(&mut self, device: DeviceKind, sensor: &Sensor) {
        let Some(value) = sensor.value else {
            return;
        };

        match sensor.kind {
            SensorKind::Temperature => self.temperature.offer(&sensor.name, value),
            SensorKind::Power if device == DeviceKind::Cpu => self.power.offer(&sensor.name, value),
            SensorKind::Voltage => match device {
                DeviceKind::Cpu if self.cpu_voltage.is_none() => {
                    debug!("SENSORS | CPU voltage sensor: {} = {}V", sensor.name, value);
                    self.cpu_voltage = Some(value);
                }
                DeviceKind::Motherboard
                    if self.board_voltage.is_none()
                        && BOARD_VCORE_TAGS.iter().any(|tag| sensor.name.contains(tag)) =>
                {
                    debug!("SENSORS | motherboard voltage sensor: {} = {}V", sensor.name, value);
                    self.board_voltage = Some(value);
                }
                _ => {}
            },
            _ => {}
        }
    }

    pub fn finish(self) -> CpuSensorReadings {
        CpuSensorReadings {
            temp_c: self.temperature.0,
            voltage_v: self.cpu_voltage.or(self.board_voltage),
            package_power_w: self.power.0,
        }
    }
}

/// Refresh every device and select CPU temperature, voltage and power.
///
/// Never fails: a device that cannot refresh or be read contributes
/// nothing, and an enumeration failure leaves every field `None`.
pub fn read_cpu_sensors(provider: &dyn SensorProvider) -> CpuSensorReadings {
    let devices = match provider.devices() {
        Ok(devices) => devices,
        Err(e) => {
            warn!("SENSORS | error reading sensors: {}", Error::from(e));
            return CpuSensorReadings::default();
        }
    };

    let mut selector = CpuSensorSelector::new();
    for device in devices {
        let sensors = match device.refresh().and_then(|()| device.sensors()) {
            Ok(sensors) => sensors,
            Err(e) => {
                warn!("SENSORS | error reading sensors: {}", Error::from(e));
                continue;
            }
        };
        let kind = device.kind();
        for sensor in &sensors {
            selector.offer(kind, sensor);
        }
    }
    selector.finish()
}

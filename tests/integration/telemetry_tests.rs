//! Hardware metrics snapshot assembly and sensor selection over mock trees.

use serde_json::Value;

use crate::mock_hw::{EngineCall, MockDevice, MockMemory, ScriptedSensors, TestBridge, envelope};
use cpubridge::config::BridgeConfig;
use cpubridge::sensors::{DeviceKind, Sensor, SensorKind};

fn temp(name: &str, value: f64) -> Sensor {
    Sensor::new(name, SensorKind::Temperature, value)
}

fn volt(name: &str, value: f64) -> Sensor {
    Sensor::new(name, SensorKind::Voltage, value)
}

fn power(name: &str, value: f64) -> Sensor {
    Sensor::new(name, SensorKind::Power, value)
}

fn metrics(bridge: &TestBridge) -> Value {
    bridge.request(&envelope("m", "getHardwareMetrics", Value::Null))["result"].clone()
}

// ── Temperature ───────────────────────────────────────────────

#[test]
fn package_temperature_wins_over_cpu() {
    let bridge = TestBridge::with_sensors(ScriptedSensors::new(vec![MockDevice::new(
        "CPU",
        DeviceKind::Cpu,
        vec![temp("CPU Temp", 50.0), temp("Package Temp", 60.0)],
    )]));
    assert_eq!(metrics(&bridge)["tempC"], 60.0);
}

#[test]
fn cpu_temperature_used_when_no_package_sensor() {
    let bridge = TestBridge::with_sensors(ScriptedSensors::new(vec![MockDevice::new(
        "CPU",
        DeviceKind::Cpu,
        vec![temp("CPU Temp", 50.0)],
    )]));
    assert_eq!(metrics(&bridge)["tempC"], 50.0);
}

#[test]
fn temperature_is_selected_across_all_devices() {
    let bridge = TestBridge::with_sensors(ScriptedSensors::new(vec![
        MockDevice::new("Board", DeviceKind::Motherboard, vec![temp("CPU Socket", 41.0)]),
        MockDevice::new("GPU", DeviceKind::Gpu, vec![temp("GPU Core", 70.0)]),
    ]));
    assert_eq!(metrics(&bridge)["tempC"], 41.0);
}

// ── Voltage ───────────────────────────────────────────────────

#[test]
fn voltage_falls_back_to_motherboard_vcore() {
    let bridge = TestBridge::with_sensors(ScriptedSensors::new(vec![
        MockDevice::new("CPU", DeviceKind::Cpu, vec![temp("CPU Package", 55.0)]),
        MockDevice::new(
            "Board",
            DeviceKind::Motherboard,
            vec![volt("+12V", 12.1), volt("VCore", 1.25), volt("CPU VDD", 1.1)],
        ),
    ]));
    assert_eq!(metrics(&bridge)["voltageV"], 1.25);
}

#[test]
fn cpu_device_voltage_beats_motherboard() {
    let bridge = TestBridge::with_sensors(ScriptedSensors::new(vec![
        MockDevice::new("Board", DeviceKind::Motherboard, vec![volt("Vcore", 1.30)]),
        MockDevice::new("CPU", DeviceKind::Cpu, vec![volt("Core #1 VID", 1.05)]),
    ]));
    assert_eq!(metrics(&bridge)["voltageV"], 1.05);
}

// ── Power ─────────────────────────────────────────────────────

#[test]
fn package_power_only_from_cpu_devices() {
    let bridge = TestBridge::with_sensors(ScriptedSensors::new(vec![
        MockDevice::new("GPU", DeviceKind::Gpu, vec![power("Package", 200.0)]),
        MockDevice::new(
            "CPU",
            DeviceKind::Cpu,
            vec![power("CPU Cores", 40.0), power("CPU Package", 65.0)],
        ),
    ]));
    assert_eq!(metrics(&bridge)["packagePowerW"], 65.0);
}

// ── Degradation ───────────────────────────────────────────────

#[test]
fn provider_failure_never_fails_the_snapshot() {
    let bridge = TestBridge::with_sensors(ScriptedSensors::broken());
    let m = metrics(&bridge);

    assert!(m["tempC"].is_null());
    assert!(m["voltageV"].is_null());
    assert!(m["packagePowerW"].is_null());
    assert_eq!(m["cpuLoadPercent"], 37.5);
    assert_eq!(m["cpuFreqMHz"], 4200);
    assert_eq!(m["ramTotalGB"], 16.0);
    assert_eq!(m["ramUsedGB"], 12.0);
    assert_eq!(m["ramUsagePercent"], 75.0);
    assert!(m["timestamp"].as_str().unwrap().ends_with('Z') || m["timestamp"].as_str().unwrap().contains("+00:00"));
}

#[test]
fn failing_device_is_skipped_and_others_still_count() {
    let bridge = TestBridge::with_sensors(ScriptedSensors::new(vec![
        MockDevice::failing("Flaky CPU", DeviceKind::Cpu),
        MockDevice::new("CPU", DeviceKind::Cpu, vec![temp("CPU Package", 58.0)]),
    ]));
    assert_eq!(metrics(&bridge)["tempC"], 58.0);
}

#[test]
fn memory_failure_zeroes_ram_fields_only() {
    let bridge = TestBridge::with(
        BridgeConfig::default(),
        ScriptedSensors::new(vec![MockDevice::new(
            "CPU",
            DeviceKind::Cpu,
            vec![temp("CPU Package", 58.0)],
        )]),
        MockMemory::failing(),
    );
    let m = metrics(&bridge);
    assert_eq!(m["ramUsedGB"], 0.0);
    assert_eq!(m["ramTotalGB"], 0.0);
    assert_eq!(m["ramUsagePercent"], 0.0);
    assert_eq!(m["tempC"], 58.0);
    assert_eq!(m["cpuLoadPercent"], 37.5);
}

#[test]
fn invalid_engine_metrics_zero_load_and_frequency() {
    let bridge = TestBridge::new();
    bridge.engine.metrics.lock().unwrap().is_valid = false;
    let m = metrics(&bridge);
    assert_eq!(m["cpuLoadPercent"], 0.0);
    assert_eq!(m["cpuFreqMHz"], 0);
    assert_eq!(m["ramTotalGB"], 16.0);
    assert_eq!(bridge.engine.count(&EngineCall::Metrics), 1);
}

#[test]
fn every_device_is_refreshed_before_reading() {
    let bridge = TestBridge::with_sensors(ScriptedSensors::new(vec![
        MockDevice::new("CPU", DeviceKind::Cpu, vec![temp("CPU Package", 58.0)]),
        MockDevice::new("Board", DeviceKind::Motherboard, vec![volt("Vcore", 1.2)]),
    ]));
    metrics(&bridge);
    for device in bridge.sensors.devices.lock().unwrap().iter() {
        assert_eq!(device.refreshes.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}

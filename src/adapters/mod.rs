//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements      | Connects to                  |
//! |----------------|-----------------|------------------------------|
//! | `sim_engine`   | ControlEngine   | In-process simulated engine  |
//! | `sim_sensors`  | SensorProvider  | Simulated device tree        |
//! | `host`         | MemoryProbe     | `/proc/meminfo`              |
//! |                | HostEnvironment | Local filesystem             |
//! | `config_file`  | ConfigPort      | JSON file on disk            |
//!
//! The transport side lives in [`rpc::transport`](crate::rpc::transport).

pub mod config_file;
pub mod host;
pub mod sim_engine;
pub mod sim_sensors;

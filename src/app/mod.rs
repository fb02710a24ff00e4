//! Application core: domain logic with no direct I/O.
//!
//! This module holds the business rules of the bridge: command parsing,
//! the workload state machine, benchmark relay and telemetry assembly.
//! All interaction with the engine, the sensor tree and the host happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real hardware.

pub mod benchmark;
pub mod commands;
pub mod control;
pub mod events;
pub mod ports;
pub mod service;
pub mod telemetry;

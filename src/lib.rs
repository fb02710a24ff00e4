//! CPU bridge library.
//!
//! Command dispatch and telemetry aggregation between a presentation
//! surface speaking JSON envelopes and a native stress/benchmark engine.
//! Exposes every layer for integration testing; the host binary in
//! `main.rs` only wires adapters together.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod rpc;
pub mod sensors;

pub use error::{Error, Result};

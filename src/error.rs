//! Unified error types for the bridge.
//!
//! Every port error converts into [`Error`], keeping the binary edge's
//! handling uniform. Control-engine calls never produce errors: the engine
//! signals failure through booleans and validity flags, which the
//! components encode as `success: false` in replies.

use core::fmt;

use crate::app::ports::{ConfigError, MemoryError, SensorError};

// ---------------------------------------------------------------------------
// Top-level bridge error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The sensor provider failed to enumerate or refresh.
    Sensor(SensorError),
    /// Physical memory statistics could not be read.
    Memory(MemoryError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
    /// An envelope could not be encoded or decoded.
    Envelope(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Memory(e) => write!(f, "memory: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Envelope(msg) => write!(f, "envelope: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

impl From<MemoryError> for Error {
    fn from(e: MemoryError) -> Self {
        Self::Memory(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Envelope(e.to_string())
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

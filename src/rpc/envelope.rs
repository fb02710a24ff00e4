//! JSON envelope protocol.
//!
//! ```text
//!  inbound   {"id": "42", "cmd": "startStress", "args": {"numProcesses": 8}}
//!  reply     {"id": "42", "replyTo": "startStress", "result": {...}}
//!  broadcast {"broadcast": "benchmarkProgress", "result": {...}}
//! ```
//!
//! The correlation `id` is an opaque string chosen by the caller and echoed
//! verbatim. Decoding recovers the id before anything else so a reply can be
//! addressed even when the rest of the envelope is malformed.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::app::events::{AppEvent, ReplyPayload};
use crate::error::{Error, Result};

/// A decoded inbound command envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandEnvelope {
    pub id: String,
    pub cmd: String,
    /// `None` when `args` is absent or `null`.
    pub args: Option<Map<String, Value>>,
}

/// Why an inbound message did not decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Not JSON, not an object, or no string `id`. Nobody can be replied to.
    Unaddressable(String),
    /// The `id` is known but `cmd` or `args` is unusable.
    Malformed { id: String, reason: &'static str },
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unaddressable(reason) => write!(f, "unaddressable envelope: {}", reason),
            Self::Malformed { id, reason } => write!(f, "malformed envelope {}: {}", id, reason),
        }
    }
}

impl CommandEnvelope {
    pub fn decode(raw: &str) -> core::result::Result<Self, DecodeError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| DecodeError::Unaddressable(e.to_string()))?;

        let Some(id) = value.get("id").and_then(Value::as_str) else {
            return Err(DecodeError::Unaddressable("missing string id".into()));
        };
        let id = id.to_string();

        let Some(cmd) = value.get("cmd").and_then(Value::as_str) else {
            return Err(DecodeError::Malformed {
                id,
                reason: "missing string cmd",
            });
        };

        let args = match value.get("args") {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map.clone()),
            Some(_) => {
                return Err(DecodeError::Malformed {
                    id,
                    reason: "args is not an object",
                });
            }
        };

        Ok(Self {
            id,
            cmd: cmd.to_string(),
            args,
        })
    }
}

/// Exactly one per addressable inbound envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyEnvelope {
    pub id: String,
    #[serde(rename = "replyTo")]
    pub reply_to: String,
    pub result: ReplyPayload,
}

impl ReplyEnvelope {
    pub fn new(id: impl Into<String>, reply_to: impl Into<String>, result: ReplyPayload) -> Self {
        Self {
            id: id.into(),
            reply_to: reply_to.into(),
            result,
        }
    }
}

/// Unsolicited event; carries no id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BroadcastEnvelope {
    pub broadcast: &'static str,
    pub result: AppEvent,
}

impl BroadcastEnvelope {
    pub fn new(event: AppEvent) -> Self {
        Self {
            broadcast: event.name(),
            result: event,
        }
    }
}

/// Anything written to the transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outbound {
    Reply(ReplyEnvelope),
    Broadcast(BroadcastEnvelope),
}

impl Outbound {
    /// Serialize to a single JSON line (no trailing newline).
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::from)
    }
}

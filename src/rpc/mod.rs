//! Transport-agnostic bridge messaging.
//!
//! JSON envelopes over a newline-delimited stream.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      Bridge Stack                          │
//! │                                                            │
//! │  ┌──────────┐   ┌──────────┐   ┌───────────────────────┐  │
//! │  │  Reader   │──▶│  Codec   │──▶│ Dispatcher            │  │
//! │  │ (thread)  │   │ (lines)  │   │  → BridgeService      │  │
//! │  └──────────┘   └──────────┘   └───────────────────────┘  │
//! │                                    │ workers               │
//! │                     ┌──────────────┘                       │
//! │                     ▼                                      │
//! │  ┌──────────┐   ┌──────────┐                              │
//! │  │ Transport │◀──│ I/O loop │   (single writer)            │
//! │  │ (write)   │   │ mailbox  │                              │
//! │  └──────────┘   └──────────┘                              │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod channels;
pub mod codec;
pub mod dispatcher;
pub mod envelope;
pub mod io_task;
pub mod transport;

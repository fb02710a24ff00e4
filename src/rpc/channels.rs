//! Bridge mailbox.
//!
//! Uses an `embassy-sync` bounded channel to funnel every producer (the
//! inbound reader thread, blocking workers) into the single I/O loop that
//! owns the transport. Because the loop is the only writer, outbound
//! messages reach the transport in the order they were posted.
//!
//! ```text
//! ┌──────────────┐  Inbound     ┌──────────────┐
//! │ Reader thread│─────────────▶│              │
//! └──────────────┘              │   I/O loop   │──▶ Transport
//! ┌──────────────┐  Broadcast   │ (sole writer)│
//! │ Worker thread│─────────────▶│              │
//! │              │  Completed   │              │
//! └──────────────┘─────────────▶└──────────────┘
//! ```

use std::sync::Arc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use futures_lite::future;
use log::warn;

use super::envelope::{BroadcastEnvelope, ReplyEnvelope};

/// Everything the I/O loop reacts to.
#[derive(Debug)]
pub enum BridgeMsg {
    /// One raw envelope line from the inbound stream.
    Inbound(String),
    /// Event emitted by a running handler.
    Broadcast(BroadcastEnvelope),
    /// Final reply of a blocking handler. Always the worker's last message.
    Completed(ReplyEnvelope),
    /// The inbound stream closed.
    Shutdown,
}

/// Channel depth. Producers block when full.
pub const MAILBOX_DEPTH: usize = 64;

type Mailbox = Channel<CriticalSectionRawMutex, BridgeMsg, MAILBOX_DEPTH>;

/// Producer side; cheap to clone and share across threads.
#[derive(Clone)]
pub struct Outbox {
    mailbox: Arc<Mailbox>,
}

/// Consumer side; owned by the I/O loop.
pub struct Inbox {
    mailbox: Arc<Mailbox>,
}

/// Create a connected producer/consumer pair.
pub fn mailbox() -> (Outbox, Inbox) {
    let mailbox = Arc::new(Mailbox::new());
    (
        Outbox {
            mailbox: Arc::clone(&mailbox),
        },
        Inbox { mailbox },
    )
}

impl Outbox {
    /// Post a message, blocking while the mailbox is full.
    ///
    /// Must not be called from the I/O loop thread itself.
    pub fn post(&self, msg: BridgeMsg) {
        future::block_on(self.mailbox.send(msg));
    }

    /// Post without blocking. Returns `false` (and drops `msg`) when full.
    pub fn try_post(&self, msg: BridgeMsg) -> bool {
        match self.mailbox.try_send(msg) {
            Ok(()) => true,
            Err(_) => {
                warn!("MAILBOX: full, dropping message");
                false
            }
        }
    }
}

impl Inbox {
    /// Wait for the next message.
    pub fn recv(&self) -> BridgeMsg {
        future::block_on(self.mailbox.receive())
    }

    pub fn try_recv(&self) -> Option<BridgeMsg> {
        self.mailbox.try_receive().ok()
    }
}

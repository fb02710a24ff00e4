//! Bridge I/O: inbound reader thread and the single-writer loop.
//!
//! ```text
//!  ┌───────────────────┐   Inbound / Shutdown   ┌────────────────────────┐
//!  │ Reader thread      │──────────────────────▶│ run() loop             │
//!  │ Read ─▶ LineDecoder│                       │  dispatch / write      │
//!  └───────────────────┘                        │  track deferred work   │
//!  ┌───────────────────┐  Broadcast / Completed │                        │
//!  │ Worker threads     │──────────────────────▶│  ──▶ Transport         │
//!  └───────────────────┘                        └────────────────────────┘
//! ```
//!
//! After the inbound stream closes, the loop keeps running until every
//! deferred command has posted its reply.

use std::io::{ErrorKind, Read};
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};

use super::channels::{BridgeMsg, Inbox, Outbox};
use super::codec::LineDecoder;
use super::dispatcher::{Dispatch, Dispatcher};
use super::envelope::Outbound;
use super::transport::Transport;

const READ_BUF_SIZE: usize = 1024;

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub replies: u32,
    pub broadcasts: u32,
    pub dropped: u32,
    pub write_errors: u32,
}

/// Spawn the inbound reader. Posts one `Inbound` per line and a final
/// `Shutdown` at end of stream or on a read error.
pub fn spawn_reader<R>(mut reader: R, outbox: Outbox) -> std::io::Result<JoinHandle<()>>
where
    R: Read + Send + 'static,
{
    thread::Builder::new()
        .name("bridge-reader".into())
        .spawn(move || {
            let mut decoder = LineDecoder::new();
            let mut buf = [0u8; READ_BUF_SIZE];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => decoder.feed(&buf[..n], |line| outbox.post(BridgeMsg::Inbound(line.to_string()))),
                    Err(e) if e.kind() == ErrorKind::Interrupted => {}
                    Err(e) => {
                        warn!("IO: read error, closing inbound stream: {}", e);
                        break;
                    }
                }
            }
            decoder.finish(|line| outbox.post(BridgeMsg::Inbound(line.to_string())));
            info!("IO: inbound stream closed");
            outbox.post(BridgeMsg::Shutdown);
        })
}

/// Drive the bridge until `Shutdown` arrives and deferred work drains.
///
/// This is the only place that writes to `transport`.
pub fn run<T: Transport>(inbox: &Inbox, dispatcher: &Dispatcher, transport: &mut T) -> LoopStats {
    let mut stats = LoopStats::default();
    let mut outstanding = 0usize;
    let mut closing = false;

    while !(closing && outstanding == 0) {
        match inbox.recv() {
            BridgeMsg::Inbound(raw) => match dispatcher.dispatch(&raw) {
                Dispatch::Replied(reply) => {
                    write(transport, &Outbound::Reply(reply), &mut stats);
                    stats.replies += 1;
                }
                Dispatch::Deferred(_worker) => outstanding += 1,
                Dispatch::Dropped => stats.dropped += 1,
            },
            BridgeMsg::Broadcast(event) => {
                write(transport, &Outbound::Broadcast(event), &mut stats);
                stats.broadcasts += 1;
            }
            BridgeMsg::Completed(reply) => {
                outstanding = outstanding.saturating_sub(1);
                write(transport, &Outbound::Reply(reply), &mut stats);
                stats.replies += 1;
            }
            BridgeMsg::Shutdown => {
                info!("IO: shutdown requested, {} command(s) in flight", outstanding);
                closing = true;
            }
        }
    }

    if let Err(e) = transport.flush() {
        warn!("IO: final flush failed: {:?}", e);
    }
    info!("IO: loop exited {:?}", stats);
    stats
}

fn write<T: Transport>(transport: &mut T, msg: &Outbound, stats: &mut LoopStats) {
    let json = match msg.encode() {
        Ok(json) => json,
        Err(e) => {
            warn!("IO: failed to encode outbound message: {}", e);
            stats.write_errors += 1;
            return;
        }
    };
    match msg {
        Outbound::Reply(_) => debug!("[Reply] {}", json),
        Outbound::Broadcast(_) => debug!("[Broadcast] {}", json),
    }
    if let Err(e) = transport.send(&json) {
        warn!("IO: transport write failed: {:?}", e);
        stats.write_errors += 1;
    }
}

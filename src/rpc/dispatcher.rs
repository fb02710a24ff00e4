//! Envelope dispatcher.
//!
//! Decodes one inbound envelope, resolves its command and either answers it
//! in place (cheap commands) or hands it to a named worker thread (engine or
//! sensor-tree work). Every addressable envelope gets exactly one reply,
//! including unknown commands, bad arguments and handler panics.
//!
//! ```text
//!  raw line ─▶ decode ─┬─ no id ─────────────▶ Dropped
//!                      ├─ bad cmd/args ──────▶ Replied({error})
//!                      ├─ cheap command ─────▶ Replied(result)
//!                      └─ blocking command ──▶ Deferred(worker)
//!                                               │ Broadcast ...
//!                                               └ Completed(result)
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{error, info, warn};

use crate::app::commands::Command;
use crate::app::events::{AppEvent, ReplyPayload};
use crate::app::service::BridgeService;

use super::channels::{BridgeMsg, Outbox};
use super::envelope::{BroadcastEnvelope, CommandEnvelope, DecodeError, ReplyEnvelope};

/// Outcome of [`Dispatcher::dispatch`].
#[derive(Debug)]
pub enum Dispatch {
    /// Reply is ready; the caller writes it.
    Replied(ReplyEnvelope),
    /// A worker owns the command and will post `Completed` when done.
    Deferred(JoinHandle<()>),
    /// No id could be recovered; nothing will be sent.
    Dropped,
}

pub struct Dispatcher {
    service: Arc<BridgeService>,
    outbox: Outbox,
}

impl Dispatcher {
    pub fn new(service: Arc<BridgeService>, outbox: Outbox) -> Self {
        Self { service, outbox }
    }

    /// Handle one raw envelope. Never blocks on engine work.
    pub fn dispatch(&self, raw: &str) -> Dispatch {
        let envelope = match CommandEnvelope::decode(raw) {
            Ok(envelope) => envelope,
            Err(DecodeError::Unaddressable(reason)) => {
                warn!("BRIDGE: dropping envelope without id: {}", reason);
                return Dispatch::Dropped;
            }
            Err(DecodeError::Malformed { id, reason }) => {
                warn!("BRIDGE[{}]: malformed envelope: {}", id, reason);
                return Dispatch::Replied(ReplyEnvelope::new(id, "", ReplyPayload::error("Malformed envelope")));
            }
        };

        let CommandEnvelope { id, cmd, args } = envelope;
        info!("[Command] {} (id: {})", cmd, id);

        let command = match Command::parse(&cmd, args.as_ref(), self.service.config()) {
            Ok(command) => command,
            Err(e) => {
                warn!("BRIDGE[{}]: {} '{}'", id, e, cmd);
                return Dispatch::Replied(ReplyEnvelope::new(id, cmd, ReplyPayload::error(e.to_string())));
            }
        };

        if !command.is_blocking() {
            // Runs on the I/O loop thread: events must not block on the mailbox.
            let outbox = &self.outbox;
            let on_event = |event: AppEvent| {
                outbox.try_post(BridgeMsg::Broadcast(BroadcastEnvelope::new(event)));
            };
            return Dispatch::Replied(execute(&self.service, &id, &cmd, command, &on_event));
        }

        let service = Arc::clone(&self.service);
        let outbox = self.outbox.clone();
        let (worker_id, worker_cmd) = (id.clone(), cmd.clone());
        let spawned = thread::Builder::new()
            .name(format!("bridge-{}", cmd))
            .spawn(move || {
                let on_event = |event: AppEvent| outbox.post(BridgeMsg::Broadcast(BroadcastEnvelope::new(event)));
                let reply = execute(&service, &worker_id, &worker_cmd, command, &on_event);
                outbox.post(BridgeMsg::Completed(reply));
            });

        match spawned {
            Ok(handle) => Dispatch::Deferred(handle),
            Err(e) => {
                error!("BRIDGE[{}]: failed to spawn worker: {}", id, e);
                Dispatch::Replied(ReplyEnvelope::new(id, cmd, ReplyPayload::error("Internal error")))
            }
        }
    }
}

/// Run a command, converting a handler panic into an error reply.
fn execute(
    service: &BridgeService,
    id: &str,
    cmd: &str,
    command: Command,
    on_event: &(dyn Fn(AppEvent) + Send + Sync),
) -> ReplyEnvelope {
    let payload = panic::catch_unwind(AssertUnwindSafe(|| service.handle_command(command, on_event)))
        .unwrap_or_else(|_| {
            error!("BRIDGE[{}]: handler for '{}' panicked", id, cmd);
            ReplyPayload::error("Internal error")
        });
    ReplyEnvelope::new(id, cmd, payload)
}

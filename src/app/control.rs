//! Control facade: sole owner of the workload run/pause state.
//!
//! ```text
//!            start            pause
//!   Idle ───────────▶ Running ──────▶ Paused
//!     ▲                 │  ▲            │
//!     │      stop       │  └── resume ──┘
//!     └─────────────────┴───────────────┘
//! ```
//!
//! The state sits behind a mutex that every operation holds for the whole
//! engine round-trip, so start/stop/pause/resume/status are serialized even
//! when envelopes are dispatched concurrently.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{info, warn};

use crate::config::BridgeConfig;

use super::events::{ControlAck, StressStatus, ToggleAck};
use super::ports::ControlEngine;

/// Run state of the stress workload as tracked by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadState {
    Idle,
    Running,
    Paused,
}

impl WorkloadState {
    /// Transitions the facade is allowed to perform. Staying put is always
    /// allowed.
    pub fn can_transition_to(self, next: WorkloadState) -> bool {
        use WorkloadState::{Idle, Paused, Running};
        self == next
            || matches!(
                (self, next),
                (Idle, Running) | (Running, Paused) | (Paused, Running) | (Running | Paused, Idle)
            )
    }
}

pub struct ControlFacade {
    engine: Arc<dyn ControlEngine>,
    state: Mutex<WorkloadState>,
    reject_start_while_running: bool,
}

impl ControlFacade {
    pub fn new(engine: Arc<dyn ControlEngine>, config: &BridgeConfig) -> Self {
        Self {
            engine,
            state: Mutex::new(WorkloadState::Idle),
            reject_start_while_running: config.reject_start_while_running,
        }
    }

    /// Current tracked state (without consulting the engine).
    pub fn state(&self) -> WorkloadState {
        *self.lock()
    }

    // ── Commands ──────────────────────────────────────────────

    pub fn start(&self, threads: u32) -> ControlAck {
        let mut state = self.lock();
        self.reconcile(&mut state);

        if *state != WorkloadState::Idle && self.reject_start_while_running {
            warn!("CTRL | start rejected, workload already {:?}", *state);
            return ControlAck {
                success: false,
                message: "Stress test already running",
            };
        }

        let success = self.engine.start(threads);
        if success {
            transition(&mut state, WorkloadState::Running);
        }
        info!("CTRL | start threads={} success={}", threads, success);
        ControlAck {
            success,
            message: if success { "Stress test started" } else { "Failed to start" },
        }
    }

    /// Forward a stop. The pause flag is cleared whether or not the engine
    /// accepted it.
    pub fn stop(&self) -> ControlAck {
        let mut state = self.lock();
        let success = self.engine.stop();
        if success {
            transition(&mut state, WorkloadState::Idle);
        } else if *state == WorkloadState::Paused {
            transition(&mut state, WorkloadState::Running);
        }
        info!("CTRL | stop success={}", success);
        ControlAck {
            success,
            message: if success { "Stress test stopped" } else { "Failed to stop" },
        }
    }

    /// Resume when paused, otherwise pause. `is_paused` in the reply is the
    /// state after the attempt, so a failed attempt reports the unchanged flag.
    pub fn toggle_pause_resume(&self) -> ToggleAck {
        let mut state = self.lock();
        self.reconcile(&mut state);

        let (success, message) = if *state == WorkloadState::Paused {
            let ok = self.engine.resume();
            if ok {
                transition(&mut state, WorkloadState::Running);
            }
            (ok, if ok { "Resumed" } else { "Failed to resume" })
        } else {
            let ok = self.engine.pause() && transition(&mut state, WorkloadState::Paused);
            (ok, if ok { "Paused" } else { "Failed to pause" })
        };

        info!("CTRL | toggle -> {:?} success={}", *state, success);
        ToggleAck {
            success,
            message,
            is_paused: *state == WorkloadState::Paused,
        }
    }

    pub fn resume(&self) -> ControlAck {
        let mut state = self.lock();
        self.reconcile(&mut state);

        let success = self.engine.resume();
        if success {
            transition(&mut state, WorkloadState::Running);
        }
        info!("CTRL | resume success={}", success);
        ControlAck {
            success,
            message: if success { "Resumed" } else { "Failed to resume" },
        }
    }

    /// `running` and `thread_count` come from the engine; `paused` from the
    /// tracked state after reconciling it with the engine.
    pub fn status(&self) -> StressStatus {
        let mut state = self.lock();
        let thread_count = self.reconcile(&mut state);
        StressStatus {
            running: thread_count > 0,
            paused: *state == WorkloadState::Paused,
            thread_count,
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, WorkloadState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Align the tracked state with the engine's live worker count and
    /// return that count. The engine is authoritative for liveness.
    fn reconcile(&self, state: &mut WorkloadState) -> u32 {
        let live = self.engine.active_thread_count();
        match (*state, live) {
            (WorkloadState::Running | WorkloadState::Paused, 0) => {
                warn!("CTRL | engine reports no workers while {:?}; resetting to Idle", *state);
                *state = WorkloadState::Idle;
            }
            (WorkloadState::Idle, n) if n > 0 => {
                warn!("CTRL | engine reports {} workers while Idle; adopting Running", n);
                *state = WorkloadState::Running;
            }
            _ => {}
        }
        live
    }
}

/// Apply `next` if the transition is legal. Returns whether it was applied.
fn transition(state: &mut WorkloadState, next: WorkloadState) -> bool {
    if state.can_transition_to(next) {
        *state = next;
        true
    } else {
        warn!("CTRL | refusing transition {:?} -> {:?}", *state, next);
        false
    }
}

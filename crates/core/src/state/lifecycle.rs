//! Lifecycle state machine implementation.
//!
//! This module provides the transition table of the wrapped server and the
//! [`LifecycleMachine`] that holds the current state.
//!
//! | From     | Event          | To       |
//! |----------|----------------|----------|
//! | Offline  | StartRequested | Starting |
//! | Starting | Started        | Online   |
//! | Online   | StopRequested  | Stopping |
//! | Stopping | Stopped        | Offline  |

use crate::state::notify::Notifier;
use mcb_protocol::ipc::WrapperEvent;
use mcb_protocol::lifecycle_models::{LifecycleState, ServerEvent};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

/// An event arrived for which the current state has no transition.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Event '{event}' is not valid in state '{from}'")]
    InvalidTransition {
        from: LifecycleState,
        event: ServerEvent,
    },
}

/// Look up the destination of `event` from `from`.
pub fn next_state(
    from: LifecycleState,
    event: ServerEvent,
) -> Result<LifecycleState, TransitionError> {
    match (from, event) {
        (LifecycleState::Offline, ServerEvent::StartRequested) => Ok(LifecycleState::Starting),
        (LifecycleState::Starting, ServerEvent::Started) => Ok(LifecycleState::Online),
        (LifecycleState::Online, ServerEvent::StopRequested) => Ok(LifecycleState::Stopping),
        (LifecycleState::Stopping, ServerEvent::Stopped) => Ok(LifecycleState::Offline),
        _ => Err(TransitionError::InvalidTransition { from, event }),
    }
}

/// Holds the current lifecycle state.
///
/// The state is published through a `watch` channel, so any number of
/// observers can read it or wait for a particular state while the read loop
/// remains its only writer.
#[derive(Debug)]
pub struct LifecycleMachine {
    state_tx: watch::Sender<LifecycleState>,
}

impl LifecycleMachine {
    /// Create a machine in the `Offline` state.
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(LifecycleState::Offline);
        Self { state_tx }
    }

    /// The current state.
    pub fn current(&self) -> LifecycleState {
        *self.state_tx.borrow()
    }

    /// Observe state changes.
    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state_tx.subscribe()
    }

    /// Apply `event` atomically.
    ///
    /// On success the new state is returned; on rejection the state is left
    /// unchanged.
    pub fn fire(&self, event: ServerEvent) -> Result<LifecycleState, TransitionError> {
        let mut outcome = Err(TransitionError::InvalidTransition {
            from: self.current(),
            event,
        });
        self.state_tx.send_if_modified(|state| match next_state(*state, event) {
            Ok(to) => {
                *state = to;
                outcome = Ok(to);
                true
            }
            Err(err) => {
                outcome = Err(err);
                false
            }
        });
        outcome
    }

    /// Set the state unconditionally, returning the previous one.
    ///
    /// Only used when the console goes away without the server announcing
    /// its shutdown.
    pub fn force(&self, state: LifecycleState) -> LifecycleState {
        self.state_tx.send_replace(state)
    }
}

impl Default for LifecycleMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply `event` to the machine, log the outcome and notify observers.
///
/// A rejected event is not fatal: it is logged, reported as
/// [`WrapperEvent::TransitionRejected`], and the state is left as it was.
pub fn apply_event(
    machine: &LifecycleMachine,
    event: ServerEvent,
    notifier: &Notifier,
) -> Result<LifecycleState, TransitionError> {
    let from = machine.current();
    match machine.fire(event) {
        Ok(to) => {
            info!(%from, %to, %event, "server lifecycle transition");
            notifier.publish(WrapperEvent::StateChanged { from, to, event });
            Ok(to)
        }
        Err(err) => {
            warn!(state = %from, %event, "ignoring lifecycle event: {err}");
            notifier.publish(WrapperEvent::TransitionRejected { state: from, event });
            Err(err)
        }
    }
}

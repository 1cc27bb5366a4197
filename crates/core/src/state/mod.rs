//! Lifecycle state management for the wrapped server.
//!
//! This module provides:
//! - The lifecycle transition table and state machine
//! - Notification delivery for observers of the wrapper

pub mod lifecycle;
pub mod notify;

pub use lifecycle::{apply_event, next_state, LifecycleMachine, TransitionError};
pub use notify::Notifier;

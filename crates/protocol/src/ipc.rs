//! Notifications published by the server wrapper.
//!
//! The wrapper's background read loop reports what it observes through a
//! channel of [`WrapperEvent`]s. Consumers (the binary, tests) can follow
//! the server's output and lifecycle without touching the wrapper's
//! internal state.
//!
//! Uses tagged enum serialization:
//! ```json
//! {
//!   "type": "stateChanged",
//!   "payload": { "from": "starting", "to": "online", "event": "started" }
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lifecycle_models::{LifecycleState, ServerEvent};

/// Events sent from the wrapper's read loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum WrapperEvent {
    /// The server wrote a line to its console.
    Line {
        content: String,
        received_at: DateTime<Utc>,
    },

    /// A classified event moved the lifecycle to a new state.
    StateChanged {
        from: LifecycleState,
        to: LifecycleState,
        event: ServerEvent,
    },

    /// A classified event had no transition from the current state.
    ///
    /// The state is left unchanged and the read loop keeps running.
    TransitionRejected {
        state: LifecycleState,
        event: ServerEvent,
    },

    /// The read loop finished and will deliver no further lines.
    ReadLoopExited { reason: ReadLoopExit },
}

/// Why the read loop stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReadLoopExit {
    /// The console output stream reached end-of-stream.
    EndOfStream,

    /// Reading from the console failed.
    ReadError { message: String },
}

impl ReadLoopExit {
    /// True when the stream ended normally.
    pub fn is_clean(&self) -> bool {
        matches!(self, ReadLoopExit::EndOfStream)
    }
}

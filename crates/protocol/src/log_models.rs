//! Parsed server console output.
//!
//! The server writes log lines shaped like
//! `[12:00:01] [Server thread/INFO]: Done (3.2s)! For help, type "help"`.
//! Each such line is split into a [`LogRecord`]. Lines that do not follow
//! that shape (plain command replies, stack traces) produce an empty record.

use serde::{Deserialize, Serialize};

/// One parsed console line.
///
/// All fields are stored without their surrounding brackets. A record with
/// every field empty is the "unclassifiable" record: it is a valid value,
/// not a failure.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LogRecord {
    /// Wall-clock time as printed by the server (e.g. `12:00:01`).
    pub timestamp: String,

    /// Name of the server thread that produced the line.
    pub thread: String,

    /// Severity level (e.g. `INFO`, `WARN`).
    pub level: String,

    /// Message body following `]: `.
    pub message: String,
}

impl LogRecord {
    /// Create a record from its four parts.
    pub fn new(
        timestamp: impl Into<String>,
        thread: impl Into<String>,
        level: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            thread: thread.into(),
            level: level.into(),
            message: message.into(),
        }
    }

    /// True for the record produced by a line that did not match the grammar.
    pub fn is_empty(&self) -> bool {
        self.timestamp.is_empty()
            && self.thread.is_empty()
            && self.level.is_empty()
            && self.message.is_empty()
    }

    /// Rebuild the canonical `[<timestamp>] [<thread>/<level>]: <message>` text.
    pub fn to_line(&self) -> String {
        format!(
            "[{}] [{}/{}]: {}",
            self.timestamp, self.thread, self.level, self.message
        )
    }
}

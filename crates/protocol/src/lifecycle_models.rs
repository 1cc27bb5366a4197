//! Lifecycle vocabulary of the wrapped server.
//!
//! The server's operational phase is tracked as a [`LifecycleState`].
//! Console lines are classified into [`ServerEvent`]s, which drive the
//! transitions between states:
//!
//! ```text
//! Offline --StartRequested--> Starting --Started--> Online
//!    ^                                                 |
//!    +------Stopped------ Stopping <--StopRequested----+
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operational phase of the wrapped server.
///
/// Commands are only accepted while the server is `Online`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// No server is running. Initial state.
    #[default]
    Offline,

    /// The server announced its version and is loading the world.
    Starting,

    /// The server finished loading and accepts console commands.
    Online,

    /// The server is saving and shutting down.
    Stopping,
}

impl LifecycleState {
    /// Get a short string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Offline => "offline",
            LifecycleState::Starting => "starting",
            LifecycleState::Online => "online",
            LifecycleState::Stopping => "stopping",
        }
    }

    /// Check if console commands can be issued in this state
    pub fn accepts_commands(&self) -> bool {
        matches!(self, LifecycleState::Online)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle trigger derived from the server's output.
///
/// `None` means the line carried no lifecycle information; it is never
/// submitted to the state machine.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServerEvent {
    /// The line carried no lifecycle information.
    #[default]
    None,

    /// `Starting minecraft server version <v>`
    StartRequested,

    /// `Done (<elapsed>)! For help, type "help"`
    Started,

    /// `Stopping <name> server`
    StopRequested,

    /// The console output stream ended.
    Stopped,
}

impl ServerEvent {
    /// Get a short string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerEvent::None => "none",
            ServerEvent::StartRequested => "start_requested",
            ServerEvent::Started => "started",
            ServerEvent::StopRequested => "stop_requested",
            ServerEvent::Stopped => "stopped",
        }
    }

    /// True for every event except `None`.
    pub fn is_trigger(&self) -> bool {
        !matches!(self, ServerEvent::None)
    }
}

impl fmt::Display for ServerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Error types for the server wrapper.

use crate::console::ConsoleError;
use mcb_protocol::lifecycle_models::LifecycleState;
use std::time::Duration;
use thiserror::Error;

/// Errors returned by [`Wrapper`](crate::wrapper::Wrapper) operations.
///
/// A command issued while the server is not online is not an error; see
/// [`SERVER_NOT_ONLINE`](crate::wrapper::SERVER_NOT_ONLINE).
#[derive(Error, Debug)]
pub enum WrapperError {
    /// The server process could not be started.
    #[error("Failed to launch server: {0}")]
    Launch(#[source] ConsoleError),

    /// `start` was called twice.
    #[error("Server wrapper already started")]
    AlreadyStarted,

    /// The operation needs a running console.
    #[error("Server wrapper not started")]
    NotStarted,

    /// Writing to the server console failed.
    #[error("Failed to write to server console: {0}")]
    Io(#[source] ConsoleError),

    /// No output line arrived within the response timeout.
    #[error("Command '{command}' not acknowledged within {timeout:?}")]
    NotAcknowledged { command: String, timeout: Duration },

    /// The console closed while a command was waiting for its reply.
    #[error("Server console closed before a reply arrived")]
    ReadLoopClosed,

    /// The server did not reach the awaited state in time.
    #[error("Server did not become {state} within {timeout:?}")]
    StateTimeout {
        state: LifecycleState,
        timeout: Duration,
    },
}

/// Type alias for Result with WrapperError.
pub type WrapperResult<T> = Result<T, WrapperError>;

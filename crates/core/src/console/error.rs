//! Error types for console access.

use thiserror::Error;

/// Errors that can occur while launching or talking to the server process.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// The executable could not be located on `PATH`.
    #[error("Executable '{program}' not found: {source}")]
    ExecutableNotFound {
        program: String,
        source: which::Error,
    },

    /// The OS refused to start the process.
    #[error("Failed to spawn command '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// A standard stream was not piped.
    #[error("Failed to capture {stream} of the server process")]
    MissingPipe { stream: &'static str },

    /// Reading from or writing to the console failed.
    #[error("Console I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Result with ConsoleError.
pub type ConsoleResult<T> = Result<T, ConsoleError>;

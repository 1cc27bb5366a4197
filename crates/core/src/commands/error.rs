//! Error types for console command formatters.

use crate::wrapper::WrapperError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Wrapper(#[from] WrapperError),

    /// The reply to a query could not be interpreted.
    #[error("Unexpected reply to '{command}': {response}")]
    UnparsableResponse { command: String, response: String },
}

/// Type alias for Result with CommandError.
pub type CommandResult<T> = Result<T, CommandError>;

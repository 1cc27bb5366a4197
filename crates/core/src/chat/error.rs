//! Error types for chat sources.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Missing environment variable: {0}")]
    MissingCredential(&'static str),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] Box<tungstenite::Error>),

    #[error("Malformed chat frame: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Failed to read chat input: {0}")]
    Io(#[from] std::io::Error),

    /// The connection closed before the session welcome arrived.
    #[error("Chat connection closed during handshake")]
    HandshakeClosed,

    #[error("Twitch user '{0}' not found")]
    UnknownUser(String),

    #[error("Subscription rejected ({status}): {body}")]
    SubscriptionRejected { status: u16, body: String },
}

impl From<tungstenite::Error> for ChatError {
    fn from(e: tungstenite::Error) -> Self {
        ChatError::WebSocket(Box::new(e))
    }
}

/// Type alias for Result with ChatError.
pub type ChatResult<T> = Result<T, ChatError>;

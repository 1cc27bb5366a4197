//! Sources of chat messages.
//!
//! - [`TwitchChatSource`]: channel chat over a Twitch EventSub WebSocket
//! - [`LineChatSource`]: one message per line of any async reader, used
//!   with standard input for local play
//!
//! The bridge only sees the [`ChatSource`] trait.

pub mod error;
pub mod frame;
pub mod stdin;
pub mod twitch;

pub use error::{ChatError, ChatResult};
pub use frame::{decode_frame, Frame};
pub use stdin::{LineChatSource, StdinChatSource};
pub use twitch::{TwitchChatSource, TwitchClient, TwitchCredentials};

use async_stream::stream;
use async_trait::async_trait;
use mcb_protocol::chat_models::ChatMessage;
use tokio_stream::Stream;

/// A stream of chat messages.
#[async_trait]
pub trait ChatSource: Send {
    /// Wait for the next message. `None` means the chat has ended.
    async fn next_message(&mut self) -> ChatResult<Option<ChatMessage>>;
}

/// Adapt a source into a stream that ends after the first error.
pub fn messages(mut source: Box<dyn ChatSource>) -> impl Stream<Item = ChatResult<ChatMessage>> + Send {
    stream! {
        loop {
            match source.next_message().await {
                Ok(Some(message)) => yield Ok(message),
                Ok(None) => break,
                Err(e) => {
                    yield Err(e);
                    break;
                }
            }
        }
    }
}

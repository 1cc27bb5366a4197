//! Line-oriented chat input.

use crate::chat::{ChatResult, ChatSource};
use async_trait::async_trait;
use mcb_protocol::chat_models::ChatMessage;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, BufReader, Stdin};
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;

/// Chat read from standard input.
pub type StdinChatSource = LineChatSource<BufReader<Stdin>>;

/// Treats every non-empty line of a reader as a chat message.
pub struct LineChatSource<R> {
    lines: LinesStream<R>,
}

impl<R: AsyncBufRead + Send + Unpin> LineChatSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: LinesStream::new(reader.lines()),
        }
    }
}

impl StdinChatSource {
    pub fn stdin() -> Self {
        Self::from_reader(tokio::io::stdin())
    }
}

impl<R: AsyncRead + Send + Unpin> LineChatSource<BufReader<R>> {
    pub fn from_reader(reader: R) -> Self {
        Self::new(BufReader::new(reader))
    }
}

#[async_trait]
impl<R: AsyncBufRead + Send + Unpin> ChatSource for LineChatSource<R> {
    async fn next_message(&mut self) -> ChatResult<Option<ChatMessage>> {
        while let Some(line) = self.lines.next().await {
            let line = line?;
            if !line.is_empty() {
                return Ok(Some(ChatMessage::anonymous(line)));
            }
        }
        Ok(None)
    }
}

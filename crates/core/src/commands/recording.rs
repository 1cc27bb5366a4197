//! Command sink that records commands instead of sending them.

use crate::commands::CommandSink;
use crate::wrapper::WrapperResult;
use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::Mutex;

/// Records every command and answers with scripted replies.
///
/// Replies are handed out in order; once they run out every command is
/// answered with an empty line.
#[derive(Default)]
pub struct RecordingSink {
    commands: Mutex<Vec<String>>,
    replies: Mutex<VecDeque<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            commands: Mutex::new(Vec::new()),
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
        }
    }

    /// Commands received so far.
    pub async fn commands(&self) -> Vec<String> {
        self.commands.lock().await.clone()
    }
}

#[async_trait]
impl CommandSink for RecordingSink {
    async fn send_command(&self, command: &str) -> WrapperResult<String> {
        self.commands.lock().await.push(command.to_string());
        Ok(self.replies.lock().await.pop_front().unwrap_or_default())
    }
}

//! The chat-to-server bridge.
//!
//! [`Bridge`] drives one server session: start the server, wait until it is
//! online, feed chat messages through the [`Dispatcher`] and finally shut
//! the server down, killing it if it does not exit in time.

use crate::chat::{self, ChatSource};
use crate::commands::CommandSink;
use crate::console::{JavaCommand, Launcher};
use crate::dispatch::{DispatchOutcome, Dispatcher};
use crate::wrapper::{Wrapper, WrapperOptions};
use anyhow::{Context, Result};
use mcb_protocol::config_models::BridgeConfig;
use mcb_protocol::ipc::{ReadLoopExit, WrapperEvent};
use mcb_protocol::lifecycle_models::LifecycleState;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tracing::{info, warn};

/// Why the chat loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatLoopEnd {
    /// A chatter sent `quit`.
    Quit,
    /// The chat source ran out of messages.
    ChatClosed,
}

/// Dispatch every message from `source` until `quit` or end of chat.
pub async fn run_chat_loop(
    sink: &dyn CommandSink,
    dispatcher: &Dispatcher,
    source: Box<dyn ChatSource>,
) -> Result<ChatLoopEnd> {
    let messages = chat::messages(source);
    tokio::pin!(messages);

    while let Some(message) = messages.next().await {
        let message = message.context("Failed to read chat")?;
        info!(sender = message.sender.as_deref().unwrap_or("-"), text = %message.text, "chat message");

        if dispatcher.handle(sink, &message.text).await == DispatchOutcome::Quit {
            return Ok(ChatLoopEnd::Quit);
        }
    }
    Ok(ChatLoopEnd::ChatClosed)
}

/// One server session driven by chat.
pub struct Bridge {
    wrapper: Wrapper,
    dispatcher: Dispatcher,
    startup_timeout: Duration,
    shutdown_timeout: Duration,
}

impl Bridge {
    /// Bridge for the server described by `config`.
    pub fn from_config(config: &BridgeConfig, events_tx: Option<mpsc::Sender<WrapperEvent>>) -> Self {
        let launcher = JavaCommand::from_config(&config.server).launcher();
        let mut options =
            WrapperOptions::default().with_response_timeout(config.server.response_timeout());
        options.events_tx = events_tx;

        Self::new(
            Wrapper::new(launcher, options),
            Dispatcher::new(config.chat.player.clone()),
            config.server.startup_timeout(),
            config.server.shutdown_timeout(),
        )
    }

    pub fn new(
        wrapper: Wrapper,
        dispatcher: Dispatcher,
        startup_timeout: Duration,
        shutdown_timeout: Duration,
    ) -> Self {
        Self {
            wrapper,
            dispatcher,
            startup_timeout,
            shutdown_timeout,
        }
    }

    /// Bridge over an arbitrary launcher, with default timeouts.
    pub fn with_launcher(launcher: impl Launcher + 'static, player: impl Into<String>) -> Self {
        let defaults = BridgeConfig::default();
        Self::new(
            Wrapper::new(launcher, WrapperOptions::default()),
            Dispatcher::new(player),
            defaults.server.startup_timeout(),
            defaults.server.shutdown_timeout(),
        )
    }

    pub fn wrapper(&self) -> &Wrapper {
        &self.wrapper
    }

    /// Launch the server and wait until it is online.
    pub async fn start(&self) -> Result<()> {
        self.wrapper
            .start()
            .await
            .context("Failed to start the server")?;

        info!(timeout = ?self.startup_timeout, "waiting for server to come online");
        self.wrapper
            .wait_for_state(LifecycleState::Online, self.startup_timeout)
            .await
            .context("Server did not come online")?;

        info!("server is online");
        Ok(())
    }

    pub async fn run_chat(&self, source: Box<dyn ChatSource>) -> Result<ChatLoopEnd> {
        run_chat_loop(&self.wrapper, &self.dispatcher, source).await
    }

    /// Start, run the chat loop, then shut down.
    ///
    /// The server is shut down even when starting or reading chat fails.
    pub async fn run(&self, source: Box<dyn ChatSource>) -> Result<ChatLoopEnd> {
        let result = match self.start().await {
            Ok(()) => self.run_chat(source).await,
            Err(e) => Err(e),
        };

        let shutdown = self.shutdown().await;
        let end = result?;
        shutdown?;
        Ok(end)
    }

    /// Stop the server and wait for its console to close.
    ///
    /// Kills the process when it has not exited within the shutdown timeout.
    pub async fn shutdown(&self) -> Result<ReadLoopExit> {
        if self.wrapper.state() != LifecycleState::Offline {
            if let Err(e) = self.wrapper.stop().await {
                warn!(error = %e, "failed to send stop command");
            }
        }

        match tokio::time::timeout(self.shutdown_timeout, self.wrapper.join()).await {
            Ok(exit) => {
                let exit = exit.context("Server read loop ended abnormally")?;
                info!(?exit, "server shut down");
                Ok(exit)
            }
            Err(_) => {
                warn!(timeout = ?self.shutdown_timeout, "server did not stop in time, killing it");
                self.wrapper.kill().await.context("Failed to kill the server")?;
                let exit = self
                    .wrapper
                    .join()
                    .await
                    .context("Server read loop ended abnormally")?;
                Ok(exit)
            }
        }
    }
}

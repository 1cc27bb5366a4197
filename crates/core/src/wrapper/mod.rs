//! Server wrapper: lifecycle tracking and synchronous console commands.
//!
//! The [`Wrapper`] launches the server, runs a background task that reads
//! its console, and lets callers issue a command and get back "its" reply.
//!
//! # Reply correlation
//!
//! The server console has no request ids. A reply is simply the next line
//! the server prints after the command was written. This holds only while a
//! single command is in flight, so [`Wrapper::send_command`] serializes its
//! callers: the mutex guarding the console writer is held from arming the
//! reply slot until the reply (or a timeout) arrives. Unrelated log lines
//! printed in that window are still taken as the reply; that is inherent to
//! the protocol.

mod error;
mod read_loop;

pub use error::{WrapperError, WrapperResult};

use crate::console::{ConsoleWriter, Launcher, ServerProcess};
use crate::state::{LifecycleMachine, Notifier};
use mcb_protocol::ipc::{ReadLoopExit, WrapperEvent};
use mcb_protocol::lifecycle_models::LifecycleState;
use std::process::ExitStatus;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Reply returned by [`Wrapper::send_command`] when the server is not online.
pub const SERVER_NOT_ONLINE: &str = "Server not online";

/// Console command for a graceful shutdown.
pub const STOP_COMMAND: &str = "stop";

/// Options for constructing a [`Wrapper`].
#[derive(Debug, Clone, Default)]
pub struct WrapperOptions {
    /// Upper bound on the wait for a command's reply. `None` waits forever.
    pub response_timeout: Option<Duration>,

    /// Channel receiving [`WrapperEvent`]s from the read loop.
    pub events_tx: Option<mpsc::Sender<WrapperEvent>>,
}

impl WrapperOptions {
    pub fn with_response_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.response_timeout = timeout;
        self
    }

    pub fn with_events(mut self, events_tx: mpsc::Sender<WrapperEvent>) -> Self {
        self.events_tx = Some(events_tx);
        self
    }
}

/// State shared between the wrapper and its read loop.
pub(crate) struct Shared {
    pub(crate) machine: LifecycleMachine,
    /// Reply slot of the command currently in flight.
    pub(crate) pending: Mutex<Option<oneshot::Sender<String>>>,
    pub(crate) last_line: Mutex<Option<String>>,
    pub(crate) notifier: Notifier,
}

/// Wraps a server process.
pub struct Wrapper {
    launcher: Box<dyn Launcher>,
    response_timeout: Option<Duration>,
    shared: Arc<Shared>,
    /// Held for the whole request/response exchange; see the module docs.
    writer: Mutex<Option<ConsoleWriter>>,
    process: Mutex<Option<ServerProcess>>,
    read_loop: Mutex<Option<JoinHandle<ReadLoopExit>>>,
    started: AtomicBool,
}

impl Wrapper {
    /// Create a wrapper. Nothing is launched until [`Wrapper::start`].
    pub fn new(launcher: impl Launcher + 'static, options: WrapperOptions) -> Self {
        Self {
            launcher: Box::new(launcher),
            response_timeout: options.response_timeout,
            shared: Arc::new(Shared {
                machine: LifecycleMachine::new(),
                pending: Mutex::new(None),
                last_line: Mutex::new(None),
                notifier: Notifier::new(options.events_tx),
            }),
            writer: Mutex::new(None),
            process: Mutex::new(None),
            read_loop: Mutex::new(None),
            started: AtomicBool::new(false),
        }
    }

    /// Launch the server and start the background read loop.
    ///
    /// Returns as soon as the process is running; it does not wait for the
    /// server to come online (see [`Wrapper::wait_for_state`]).
    ///
    /// # Errors
    ///
    /// - `Launch` if the process could not be started
    /// - `AlreadyStarted` on a second call
    pub async fn start(&self) -> WrapperResult<()> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(WrapperError::AlreadyStarted);
        }

        let console = match self.launcher.launch().await {
            Ok(console) => console,
            Err(e) => {
                self.started.store(false, Ordering::SeqCst);
                return Err(WrapperError::Launch(e));
            }
        };

        *self.writer.lock().await = Some(console.writer);
        *self.process.lock().await = console.process;

        let handle = tokio::spawn(read_loop::run(console.reader, Arc::clone(&self.shared)));
        *self.read_loop.lock().await = Some(handle);

        info!("server wrapper started");
        Ok(())
    }

    /// Ask the server to shut down gracefully.
    ///
    /// Writes `stop` and returns; the lifecycle reaches `Offline` once the
    /// server has saved and exited. Waits for an in-flight command first.
    pub async fn stop(&self) -> WrapperResult<()> {
        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or(WrapperError::NotStarted)?;
        writer
            .write_line(STOP_COMMAND)
            .await
            .map_err(WrapperError::Io)?;
        info!("stop command sent to server");
        Ok(())
    }

    /// Forcefully terminate the server process.
    ///
    /// Returns `None` when there is no OS process (in-memory consoles).
    pub async fn kill(&self) -> WrapperResult<Option<ExitStatus>> {
        let mut process = self.process.lock().await;
        match process.as_mut() {
            Some(process) => {
                let status = process.terminate().await.map_err(WrapperError::Io)?;
                info!(?status, "server process terminated");
                Ok(Some(status))
            }
            None => Ok(None),
        }
    }

    /// Issue a console command and return the line the server prints next.
    ///
    /// When the server is not `Online`, nothing is written and
    /// [`SERVER_NOT_ONLINE`] is returned as the reply. Concurrent callers
    /// are served one at a time.
    ///
    /// # Errors
    ///
    /// - `Io` if the command could not be written
    /// - `NotAcknowledged` if the response timeout elapsed
    /// - `ReadLoopClosed` if the console closed before a reply arrived
    pub async fn send_command(&self, command: &str) -> WrapperResult<String> {
        let mut guard = self.writer.lock().await;

        let state = self.state();
        let Some(writer) = guard.as_mut().filter(|_| state.accepts_commands()) else {
            debug!(%command, %state, "server not online, command not sent");
            return Ok(SERVER_NOT_ONLINE.to_string());
        };

        let (reply_tx, reply_rx) = oneshot::channel();
        *self.shared.pending.lock().await = Some(reply_tx);
        let _slot = ArmedSlot {
            pending: &self.shared.pending,
        };

        writer.write_line(command).await.map_err(WrapperError::Io)?;
        debug!(%command, "command written to server console");

        let reply = match self.response_timeout {
            Some(limit) => tokio::time::timeout(limit, reply_rx).await.map_err(|_| {
                WrapperError::NotAcknowledged {
                    command: command.to_string(),
                    timeout: limit,
                }
            })?,
            None => reply_rx.await,
        };

        let reply = reply.map_err(|_| WrapperError::ReadLoopClosed)?;
        debug!(%command, %reply, "command reply received");
        Ok(reply)
    }

    /// OS process id of the server, when it runs as a real process.
    pub async fn process_id(&self) -> Option<u32> {
        self.process.lock().await.as_ref().and_then(ServerProcess::id)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.shared.machine.current()
    }

    /// Observe lifecycle state changes.
    pub fn subscribe_state(&self) -> watch::Receiver<LifecycleState> {
        self.shared.machine.subscribe()
    }

    /// Wait until the lifecycle reaches `state`.
    pub async fn wait_for_state(&self, state: LifecycleState, timeout: Duration) -> WrapperResult<()> {
        let mut rx = self.subscribe_state();
        let outcome = tokio::time::timeout(timeout, rx.wait_for(|current| *current == state))
            .await
            .map(|reached| reached.map(|_| ()));
        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(WrapperError::ReadLoopClosed),
            Err(_) => Err(WrapperError::StateTimeout { state, timeout }),
        }
    }

    /// The most recent line printed by the server.
    pub async fn last_line(&self) -> Option<String> {
        self.shared.last_line.lock().await.clone()
    }

    /// Number of lines written to the server console so far.
    pub async fn lines_written(&self) -> u64 {
        self.writer
            .lock()
            .await
            .as_ref()
            .map_or(0, ConsoleWriter::lines_written)
    }

    /// Wait for the read loop to finish and report why it stopped.
    ///
    /// # Errors
    ///
    /// - `NotStarted` if the wrapper was never started or was already joined
    /// - `ReadLoopClosed` if the read loop task panicked or was cancelled
    ///
    /// Dropping the returned future (a timed-out join, say) keeps the read
    /// loop joinable.
    pub async fn join(&self) -> WrapperResult<ReadLoopExit> {
        let mut slot = self.read_loop.lock().await;
        let handle = slot.as_mut().ok_or(WrapperError::NotStarted)?;
        let result = handle.await;
        slot.take();
        result.map_err(|_| WrapperError::ReadLoopClosed)
    }
}

/// Disarms the reply slot when a command call ends, including when the
/// caller drops it mid-wait.
struct ArmedSlot<'a> {
    pending: &'a Mutex<Option<oneshot::Sender<String>>>,
}

impl Drop for ArmedSlot<'_> {
    fn drop(&mut self) {
        // Only the read loop contends for the slot, and it clears it too.
        if let Ok(mut slot) = self.pending.try_lock() {
            slot.take();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::mock::MockLauncher;
    use mcb_protocol::lifecycle_models::ServerEvent;

    const WAIT: Duration = Duration::from_secs(5);

    async fn online_wrapper() -> (Arc<Wrapper>, crate::console::mock::MockServer) {
        let (launcher, mut server) = MockLauncher::pair();
        let wrapper = Arc::new(Wrapper::new(launcher, WrapperOptions::default()));
        wrapper.start().await.unwrap();
        server.boot().await.unwrap();
        wrapper
            .wait_for_state(LifecycleState::Online, WAIT)
            .await
            .unwrap();
        (wrapper, server)
    }

    async fn wait_for_last_line(wrapper: &Wrapper, line: &str) {
        for _ in 0..100 {
            if wrapper.last_line().await.as_deref() == Some(line) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("server never printed {line:?}");
    }

    #[tokio::test]
    async fn test_boot_sequence_reaches_online() {
        let (launcher, mut server) = MockLauncher::pair();
        let wrapper = Wrapper::new(launcher, WrapperOptions::default());
        assert_eq!(wrapper.state(), LifecycleState::Offline);

        wrapper.start().await.unwrap();
        server
            .emit_log("Starting minecraft server version 1.20.4")
            .await
            .unwrap();
        wrapper
            .wait_for_state(LifecycleState::Starting, WAIT)
            .await
            .unwrap();

        server
            .emit_log("Done (3.2s)! For help, type \"help\"")
            .await
            .unwrap();
        wrapper
            .wait_for_state(LifecycleState::Online, WAIT)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_send_command_returns_next_line() {
        let (wrapper, mut server) = online_wrapper().await;

        let sender = Arc::clone(&wrapper);
        let reply = tokio::spawn(async move { sender.send_command("/kill tibretS").await });

        assert_eq!(
            server.next_raw_command().await.unwrap(),
            Some("/kill tibretS\r\n".to_string())
        );
        server.emit("Killed tibretS").await.unwrap();

        assert_eq!(reply.await.unwrap().unwrap(), "Killed tibretS");
        assert_eq!(wrapper.last_line().await.as_deref(), Some("Killed tibretS"));
        assert_eq!(wrapper.lines_written().await, 1);
    }

    #[tokio::test]
    async fn test_send_command_when_stopping_writes_nothing() {
        let (wrapper, mut server) = online_wrapper().await;

        server.emit_log("Stopping the server").await.unwrap();
        wrapper
            .wait_for_state(LifecycleState::Stopping, WAIT)
            .await
            .unwrap();

        let reply = wrapper.send_command("/weather clear").await.unwrap();
        assert_eq!(reply, SERVER_NOT_ONLINE);
        assert_eq!(wrapper.lines_written().await, 0);
    }

    #[tokio::test]
    async fn test_send_command_before_start() {
        let (launcher, _server) = MockLauncher::pair();
        let wrapper = Wrapper::new(launcher, WrapperOptions::default());

        let reply = wrapper.send_command("/list").await.unwrap();
        assert_eq!(reply, SERVER_NOT_ONLINE);
    }

    #[tokio::test]
    async fn test_end_of_stream_after_stop_goes_offline() {
        let (launcher, mut server) = MockLauncher::pair();
        let (events_tx, mut events_rx) = mpsc::channel(64);
        let wrapper = Wrapper::new(launcher, WrapperOptions::default().with_events(events_tx));
        wrapper.start().await.unwrap();
        server.boot().await.unwrap();
        server.emit_log("Stopping the server").await.unwrap();
        server.close_output();

        assert_eq!(wrapper.join().await.unwrap(), ReadLoopExit::EndOfStream);
        assert_eq!(wrapper.state(), LifecycleState::Offline);

        let mut transitions = Vec::new();
        while let Ok(event) = events_rx.try_recv() {
            if let WrapperEvent::StateChanged { to, event, .. } = event {
                transitions.push((event, to));
            }
        }
        assert_eq!(
            transitions,
            vec![
                (ServerEvent::StartRequested, LifecycleState::Starting),
                (ServerEvent::Started, LifecycleState::Online),
                (ServerEvent::StopRequested, LifecycleState::Stopping),
                (ServerEvent::Stopped, LifecycleState::Offline),
            ]
        );
    }

    #[tokio::test]
    async fn test_crash_while_online_forces_offline() {
        let (wrapper, mut server) = online_wrapper().await;

        server.close_output();

        assert_eq!(wrapper.join().await.unwrap(), ReadLoopExit::EndOfStream);
        assert_eq!(wrapper.state(), LifecycleState::Offline);
    }

    #[tokio::test]
    async fn test_pending_command_fails_when_console_closes() {
        let (wrapper, mut server) = online_wrapper().await;

        let sender = Arc::clone(&wrapper);
        let reply = tokio::spawn(async move { sender.send_command("/list").await });
        server.next_command().await.unwrap();
        server.close_output();

        assert!(matches!(
            reply.await.unwrap(),
            Err(WrapperError::ReadLoopClosed)
        ));
    }

    #[tokio::test]
    async fn test_send_command_times_out() {
        let (launcher, mut server) = MockLauncher::pair();
        let options = WrapperOptions::default().with_response_timeout(Some(Duration::from_millis(50)));
        let wrapper = Wrapper::new(launcher, options);
        wrapper.start().await.unwrap();
        server.boot().await.unwrap();
        wrapper
            .wait_for_state(LifecycleState::Online, WAIT)
            .await
            .unwrap();

        let result = wrapper.send_command("/list").await;
        assert!(matches!(result, Err(WrapperError::NotAcknowledged { .. })));
        assert!(wrapper.shared.pending.lock().await.is_none());

        let late = "There are 0 of a max of 20 players online";
        server.next_command().await.unwrap();
        server.emit(late).await.unwrap();
        wait_for_last_line(&wrapper, late).await;

        // The late line was not kept for the next caller.
        let wrapper = Arc::new(wrapper);
        let sender = Arc::clone(&wrapper);
        let reply = tokio::spawn(async move { sender.send_command("/seed").await });
        assert_eq!(server.next_command().await.unwrap(), Some("/seed".to_string()));
        server.emit("Seed: [42]").await.unwrap();

        assert_eq!(reply.await.unwrap().unwrap(), "Seed: [42]");
        assert_eq!(wrapper.lines_written().await, 2);
    }

    #[tokio::test]
    async fn test_cancelled_command_disarms_reply_slot() {
        let (wrapper, mut server) = online_wrapper().await;

        let abandoned =
            tokio::time::timeout(Duration::from_millis(50), wrapper.send_command("/list")).await;
        assert!(abandoned.is_err());
        assert!(wrapper.shared.pending.lock().await.is_none());

        server.next_command().await.unwrap();
        let sender = Arc::clone(&wrapper);
        let reply = tokio::spawn(async move { sender.send_command("/seed").await });
        assert_eq!(server.next_command().await.unwrap(), Some("/seed".to_string()));
        server.emit("Seed: [42]").await.unwrap();

        assert_eq!(reply.await.unwrap().unwrap(), "Seed: [42]");
    }

    #[tokio::test]
    async fn test_join_survives_a_timed_out_join() {
        let (wrapper, mut server) = online_wrapper().await;

        let early = tokio::time::timeout(Duration::from_millis(20), wrapper.join()).await;
        assert!(early.is_err());

        server.close_output();
        assert_eq!(wrapper.join().await.unwrap(), ReadLoopExit::EndOfStream);
        assert!(matches!(wrapper.join().await, Err(WrapperError::NotStarted)));
    }

    #[tokio::test]
    async fn test_concurrent_commands_get_their_own_replies() {
        let (wrapper, mut server) = online_wrapper().await;

        let first = {
            let wrapper = Arc::clone(&wrapper);
            tokio::spawn(async move { wrapper.send_command("/time query day").await })
        };
        let second = {
            let wrapper = Arc::clone(&wrapper);
            tokio::spawn(async move { wrapper.send_command("/seed").await })
        };

        for _ in 0..2 {
            let command = server.next_command().await.unwrap().unwrap();
            server.emit(&format!("reply to {command}")).await.unwrap();
        }

        assert_eq!(first.await.unwrap().unwrap(), "reply to /time query day");
        assert_eq!(second.await.unwrap().unwrap(), "reply to /seed");
    }

    #[tokio::test]
    async fn test_start_twice_fails() {
        let (wrapper, _server) = online_wrapper().await;

        assert!(matches!(
            wrapper.start().await,
            Err(WrapperError::AlreadyStarted)
        ));
    }

    #[tokio::test]
    async fn test_start_failure_is_reported() {
        let wrapper = Wrapper::new(MockLauncher::failing(), WrapperOptions::default());

        assert!(matches!(wrapper.start().await, Err(WrapperError::Launch(_))));
        assert!(matches!(wrapper.join().await, Err(WrapperError::NotStarted)));
    }

    #[tokio::test]
    async fn test_stop_writes_stop_command() {
        let (wrapper, mut server) = online_wrapper().await;

        wrapper.stop().await.unwrap();

        assert_eq!(server.next_command().await.unwrap(), Some("stop".to_string()));
        assert_eq!(wrapper.kill().await.unwrap(), None);
    }
}

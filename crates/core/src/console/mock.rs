//! In-memory server console for testing.
//!
//! [`mock_console`] returns a [`Console`] whose streams are connected to a
//! [`MockServer`]. The test plays the server: it emits output lines and
//! reads the commands the wrapper wrote, without any OS process.

use crate::console::error::{ConsoleError, ConsoleResult};
use crate::console::launcher::Launcher;
use crate::console::process::Console;
use async_trait::async_trait;
use std::io;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};
use tokio::sync::Mutex;

const PIPE_CAPACITY: usize = 64 * 1024;

/// Server side of an in-memory console.
pub struct MockServer {
    output: Option<DuplexStream>,
    input: BufReader<DuplexStream>,
}

/// Create a connected console / server pair.
pub fn mock_console() -> (Console, MockServer) {
    let (output_server, output_client) = tokio::io::duplex(PIPE_CAPACITY);
    let (input_client, input_server) = tokio::io::duplex(PIPE_CAPACITY);

    let console = Console::new(output_client, input_client, None);
    let server = MockServer {
        output: Some(output_server),
        input: BufReader::new(input_server),
    };
    (console, server)
}

impl MockServer {
    /// Print a raw line on the server console.
    pub async fn emit(&mut self, line: &str) -> io::Result<()> {
        let output = self
            .output
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "output closed"))?;
        output.write_all(format!("{line}\n").as_bytes()).await?;
        output.flush().await
    }

    /// Print a log line in the server's `[time] [thread/level]: message` format.
    pub async fn emit_log(&mut self, message: &str) -> io::Result<()> {
        self.emit(&format!("[12:00:00] [Server thread/INFO]: {message}"))
            .await
    }

    /// Emit the lines a vanilla server prints while starting up.
    pub async fn boot(&mut self) -> io::Result<()> {
        self.emit_log("Starting minecraft server version 1.20.4")
            .await?;
        self.emit_log("Preparing level \"world\"").await?;
        self.emit_log("Done (3.2s)! For help, type \"help\"").await
    }

    /// Read the next command the wrapper wrote, including its terminator.
    ///
    /// Returns `None` once the wrapper side is dropped.
    pub async fn next_raw_command(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).await?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    /// Read the next command the wrapper wrote, without its terminator.
    pub async fn next_command(&mut self) -> io::Result<Option<String>> {
        Ok(self
            .next_raw_command()
            .await?
            .map(|line| line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Close the server's output, as if the process exited.
    pub fn close_output(&mut self) {
        self.output = None;
    }
}

/// Launcher that hands out a pre-built console exactly once.
pub struct MockLauncher {
    console: Mutex<Option<Console>>,
}

impl MockLauncher {
    pub fn new(console: Console) -> Self {
        Self {
            console: Mutex::new(Some(console)),
        }
    }

    /// A launcher and the server it will connect to.
    pub fn pair() -> (Self, MockServer) {
        let (console, server) = mock_console();
        (Self::new(console), server)
    }

    /// A launcher whose launch always fails.
    pub fn failing() -> Self {
        Self {
            console: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Launcher for MockLauncher {
    async fn launch(&self) -> ConsoleResult<Console> {
        self.console
            .lock()
            .await
            .take()
            .ok_or_else(|| ConsoleError::Spawn {
                program: "mock-server".to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "mock console unavailable"),
            })
    }
}

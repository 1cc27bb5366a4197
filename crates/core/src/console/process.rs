//! Line-oriented halves of the server console and the OS process handle.
//!
//! The server's stdout is read one line at a time by a single reader; its
//! stdin is written one command at a time by a single writer. The two halves
//! are separate values so the read side can move into a background task
//! while the write side stays with the callers.

use crate::console::error::ConsoleResult;
use std::process::ExitStatus;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::Child;

/// Line terminator the server console expects after each command.
pub const COMMAND_TERMINATOR: &str = "\r\n";

/// A launched server: its output, its input and, for real processes, the
/// OS child.
pub struct Console {
    pub reader: ConsoleReader,
    pub writer: ConsoleWriter,
    pub process: Option<ServerProcess>,
}

impl Console {
    /// Assemble a console from raw streams.
    pub fn new(
        output: impl AsyncRead + Send + Unpin + 'static,
        input: impl AsyncWrite + Send + Unpin + 'static,
        process: Option<ServerProcess>,
    ) -> Self {
        Self {
            reader: ConsoleReader::new(output),
            writer: ConsoleWriter::new(input),
            process,
        }
    }
}

/// Reads the server's output one line at a time.
pub struct ConsoleReader {
    inner: BufReader<Box<dyn AsyncRead + Send + Unpin>>,
    buf: Vec<u8>,
}

impl ConsoleReader {
    pub fn new(stream: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self {
            inner: BufReader::new(Box::new(stream)),
            buf: Vec::with_capacity(1024),
        }
    }

    /// Wait for the next line.
    ///
    /// Returns `Ok(None)` at end-of-stream. The trailing `\n` or `\r\n` is
    /// stripped; invalid UTF-8 is replaced rather than treated as an error,
    /// since the server happily prints whatever bytes a plugin hands it.
    pub async fn read_line(&mut self) -> ConsoleResult<Option<String>> {
        self.buf.clear();
        let read = self.inner.read_until(b'\n', &mut self.buf).await?;
        if read == 0 {
            return Ok(None);
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }

        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}

/// Writes commands to the server's input.
pub struct ConsoleWriter {
    inner: Box<dyn AsyncWrite + Send + Unpin>,
    lines_written: u64,
}

impl ConsoleWriter {
    pub fn new(stream: impl AsyncWrite + Send + Unpin + 'static) -> Self {
        Self {
            inner: Box::new(stream),
            lines_written: 0,
        }
    }

    /// Write `text` followed by `\r\n` and flush.
    pub async fn write_line(&mut self, text: &str) -> ConsoleResult<()> {
        let line = format!("{text}{COMMAND_TERMINATOR}");
        self.inner.write_all(line.as_bytes()).await?;
        self.inner.flush().await?;
        self.lines_written += 1;
        Ok(())
    }

    /// Number of lines successfully written so far.
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }
}

/// Handle on the OS child process.
#[derive(Debug)]
pub struct ServerProcess {
    child: Child,
}

impl ServerProcess {
    pub fn new(child: Child) -> Self {
        Self { child }
    }

    /// OS process id, if the process has not been reaped yet.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Forcefully stop the process and reap it.
    ///
    /// This is cancellation, not a graceful shutdown: the world is not saved.
    /// Write `stop` to the console for a graceful shutdown.
    pub async fn terminate(&mut self) -> ConsoleResult<ExitStatus> {
        if let Some(status) = self.child.try_wait()? {
            return Ok(status);
        }
        self.child.kill().await?;
        Ok(self.child.wait().await?)
    }
}

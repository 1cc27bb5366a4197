//! Launching the server process.

use crate::console::error::{ConsoleError, ConsoleResult};
use crate::console::process::{Console, ServerProcess};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Anything that can start a server and hand back its console.
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(&self) -> ConsoleResult<Console>;
}

/// Launches an OS process with piped stdin/stdout.
///
/// The process's stderr is forwarded to the log at `warn` level, since a
/// server only writes there when something is wrong (JVM errors, crashes).
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl ProcessLauncher {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            working_dir: None,
        }
    }

    /// Run the process in `dir` instead of the current directory.
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = Some(dir);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

#[async_trait]
impl Launcher for ProcessLauncher {
    async fn launch(&self) -> ConsoleResult<Console> {
        let executable =
            which::which(&self.program).map_err(|source| ConsoleError::ExecutableNotFound {
                program: self.program.clone(),
                source,
            })?;

        let mut cmd = Command::new(&executable);
        cmd.args(&self.args);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|source| ConsoleError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let stdout = child
            .stdout
            .take()
            .ok_or(ConsoleError::MissingPipe { stream: "stdout" })?;
        let stdin = child
            .stdin
            .take()
            .ok_or(ConsoleError::MissingPipe { stream: "stdin" })?;

        if let Some(stderr) = child.stderr.take() {
            let program = self.program.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    warn!(%program, "stderr: {line}");
                }
                debug!(%program, "stderr reader task exiting");
            });
        }

        info!(
            program = %executable.display(),
            args = ?self.args,
            pid = ?child.id(),
            "server process spawned"
        );

        Ok(Console::new(stdout, stdin, Some(ServerProcess::new(child))))
    }
}

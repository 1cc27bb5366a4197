//! Launch command for a Java server.

use crate::console::launcher::ProcessLauncher;
use mcb_protocol::config_models::ServerConfig;
use std::path::PathBuf;

/// Arguments for `<java> -Xms<N>M -Xmx<N>M -jar <jar> nogui`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaCommand {
    /// Java runtime executable.
    pub java: String,
    /// Server jar, relative to `working_dir`.
    pub jar: PathBuf,
    /// Initial heap in megabytes.
    pub min_heap_mb: u32,
    /// Maximum heap in megabytes.
    pub max_heap_mb: u32,
    /// Directory the server runs in.
    pub working_dir: PathBuf,
}

impl JavaCommand {
    /// Launch `jar` with `java` from `PATH` in the current directory.
    pub fn new(jar: impl Into<PathBuf>, min_heap_mb: u32, max_heap_mb: u32) -> Self {
        Self {
            java: "java".to_string(),
            jar: jar.into(),
            min_heap_mb,
            max_heap_mb,
            working_dir: PathBuf::from("."),
        }
    }

    /// Build the command from the `[server]` section of `bridge.toml`.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            java: config.java.clone(),
            jar: config.jar.clone(),
            min_heap_mb: config.min_heap_mb,
            max_heap_mb: config.max_heap_mb,
            working_dir: config.working_dir.clone(),
        }
    }

    /// Arguments passed to the runtime, in order.
    pub fn args(&self) -> Vec<String> {
        vec![
            format!("-Xms{}M", self.min_heap_mb),
            format!("-Xmx{}M", self.max_heap_mb),
            "-jar".to_string(),
            self.jar.display().to_string(),
            "nogui".to_string(),
        ]
    }

    /// The full command line, for display.
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.java.clone()];
        parts.extend(self.args());
        parts.join(" ")
    }

    /// A launcher that spawns this command.
    pub fn launcher(&self) -> ProcessLauncher {
        ProcessLauncher::new(self.java.clone(), self.args()).with_working_dir(self.working_dir.clone())
    }
}

//! Configuration models for `bridge.toml`.
//!
//! Every field has a default, so an empty or missing file describes a
//! 1 GiB vanilla server started from `server.jar` in the current directory.
//!
//! # Example
//!
//! ```toml
//! [server]
//! java = "java"
//! jar = "server.jar"
//! min_heap_mb = 1024
//! max_heap_mb = 2048
//! response_timeout_ms = 5000
//! startup_timeout_secs = 300
//! shutdown_timeout_secs = 60
//!
//! [chat]
//! player = "tibretS"
//! broadcaster_login = "tibrets"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration loaded from `bridge.toml`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeConfig {
    /// How to launch and talk to the server.
    #[serde(default)]
    pub server: ServerConfig,

    /// Which chat to read and which player it acts upon.
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Server launch settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Java runtime executable, looked up on `PATH` when not absolute.
    #[serde(default = "default_java")]
    pub java: String,

    /// Path to the server jar, relative to `working_dir`.
    #[serde(default = "default_jar")]
    pub jar: PathBuf,

    /// Directory the server process runs in.
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    /// Initial heap size in megabytes (`-Xms<N>M`).
    #[serde(default = "default_heap_mb")]
    pub min_heap_mb: u32,

    /// Maximum heap size in megabytes (`-Xmx<N>M`).
    #[serde(default = "default_heap_mb")]
    pub max_heap_mb: u32,

    /// How long a console command may wait for its reply.
    ///
    /// `0` waits forever.
    #[serde(default = "default_response_timeout_ms")]
    pub response_timeout_ms: u64,

    /// How long `run` waits for the server to come online.
    #[serde(default = "default_startup_timeout_secs")]
    pub startup_timeout_secs: u64,

    /// How long `run` waits for the server to exit after `stop`
    /// before killing it.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl ServerConfig {
    /// The configured reply timeout, or `None` when waiting is unbounded.
    pub fn response_timeout(&self) -> Option<Duration> {
        if self.response_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.response_timeout_ms))
        }
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            java: default_java(),
            jar: default_jar(),
            working_dir: default_working_dir(),
            min_heap_mb: default_heap_mb(),
            max_heap_mb: default_heap_mb(),
            response_timeout_ms: default_response_timeout_ms(),
            startup_timeout_secs: default_startup_timeout_secs(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

/// Chat bridge settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// In-game player the chat commands act upon.
    #[serde(default = "default_player")]
    pub player: String,

    /// Twitch login of the channel whose chat is read.
    #[serde(default = "default_broadcaster_login")]
    pub broadcaster_login: String,

    /// OAuth redirect URI registered for the Twitch application.
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            player: default_player(),
            broadcaster_login: default_broadcaster_login(),
            redirect_uri: default_redirect_uri(),
        }
    }
}

fn default_java() -> String {
    "java".to_string()
}

fn default_jar() -> PathBuf {
    PathBuf::from("server.jar")
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_heap_mb() -> u32 {
    1024
}

fn default_response_timeout_ms() -> u64 {
    5000
}

fn default_startup_timeout_secs() -> u64 {
    300
}

fn default_shutdown_timeout_secs() -> u64 {
    60
}

fn default_player() -> String {
    "tibretS".to_string()
}

fn default_broadcaster_login() -> String {
    "tibrets".to_string()
}

fn default_redirect_uri() -> String {
    "http://localhost:3000/startGame".to_string()
}

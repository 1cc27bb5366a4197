//! Test fixtures: scripted servers and configuration files.

use mcb_core::console::ProcessLauncher;
use tempfile::TempDir;

/// Shell script that behaves like a tiny server.
///
/// It prints the vanilla boot lines, answers every command with
/// `Unknown command: <cmd>` and shuts down on `stop`.
#[allow(dead_code)]
pub const SCRIPTED_SERVER: &str = r#"
log() { echo "[12:00:00] [Server thread/INFO]: $1"; }
log "Starting minecraft server version 1.20.4"
log "Preparing level \"world\""
log "Done (0.1s)! For help, type \"help\""
while IFS= read -r line; do
    line=$(printf '%s' "$line" | tr -d '\r')
    case "$line" in
        stop)
            log "Stopping the server"
            exit 0
            ;;
        *)
            log "Unknown command: $line"
            ;;
    esac
done
"#;

/// Launcher running [`SCRIPTED_SERVER`] through `sh`.
#[allow(dead_code)]
pub fn scripted_server() -> ProcessLauncher {
    ProcessLauncher::new("sh", vec!["-c".to_string(), SCRIPTED_SERVER.to_string()])
}

/// Temporary directory holding a `bridge.toml` with the given content.
///
/// Returns a TempDir that must be kept alive for the test duration.
#[allow(dead_code)]
pub fn create_config_dir(content: &str) -> std::io::Result<TempDir> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("bridge.toml"), content)?;
    Ok(dir)
}

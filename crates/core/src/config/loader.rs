//! Loader for `bridge.toml`.

use crate::config::error::{ConfigError, ConfigResult};
use mcb_protocol::config_models::BridgeConfig;
use std::io::ErrorKind;
use std::path::Path;

/// File name looked up when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "bridge.toml";

/// Loads and validates the configuration at `path`.
///
/// # Returns
///
/// The parsed configuration. If the file does not exist, the default
/// configuration is returned rather than an error.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - The file exists but cannot be read
/// - The file is not valid TOML or has fields of the wrong type
/// - A value fails validation (see [`validate`])
///
/// # Example
///
/// ```rust,no_run
/// use mcb_core::config::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("bridge.toml")).await?;
/// println!("Acting on player {}", config.chat.player);
/// # Ok(())
/// # }
/// ```
pub async fn load_config(path: &Path) -> ConfigResult<BridgeConfig> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(BridgeConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::FileRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config: BridgeConfig =
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source,
        })?;

    validate(&config).map_err(|reason| ConfigError::InvalidConfig {
        path: path.to_path_buf(),
        reason,
    })?;

    Ok(config)
}

/// Checks values that parse but cannot launch a server.
pub fn validate(config: &BridgeConfig) -> Result<(), String> {
    let server = &config.server;

    if server.min_heap_mb == 0 || server.max_heap_mb == 0 {
        return Err("heap sizes must be greater than zero".to_string());
    }
    if server.min_heap_mb > server.max_heap_mb {
        return Err(format!(
            "min_heap_mb ({}) exceeds max_heap_mb ({})",
            server.min_heap_mb, server.max_heap_mb
        ));
    }
    if server.jar.as_os_str().is_empty() {
        return Err("jar must not be empty".to_string());
    }
    if server.java.trim().is_empty() {
        return Err("java must not be empty".to_string());
    }
    if server.startup_timeout_secs == 0 {
        return Err("startup_timeout_secs must be greater than zero".to_string());
    }
    if config.chat.player.trim().is_empty() {
        return Err("chat.player must not be empty".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_config_full() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("bridge.toml");

        let toml = r#"
[server]
java = "/usr/lib/jvm/java-21/bin/java"
jar = "paper.jar"
working_dir = "/srv/minecraft"
min_heap_mb = 2048
max_heap_mb = 4096
response_timeout_ms = 250

[chat]
player = "Steve"
broadcaster_login = "somestreamer"
"#;
        fs::write(&path, toml).expect("Failed to write bridge.toml");

        let config = load_config(&path).await.expect("Failed to load config");

        assert_eq!(config.server.java, "/usr/lib/jvm/java-21/bin/java");
        assert_eq!(config.server.jar, PathBuf::from("paper.jar"));
        assert_eq!(config.server.working_dir, PathBuf::from("/srv/minecraft"));
        assert_eq!(config.server.min_heap_mb, 2048);
        assert_eq!(config.server.max_heap_mb, 4096);
        assert_eq!(config.server.response_timeout_ms, 250);
        assert_eq!(config.chat.player, "Steve");
        assert_eq!(config.chat.broadcaster_login, "somestreamer");
        // Unset fields keep their defaults.
        assert_eq!(config.chat.redirect_uri, "http://localhost:3000/startGame");
        assert_eq!(config.server.startup_timeout_secs, 300);
    }

    #[tokio::test]
    async fn test_load_config_missing_file() {
        let dir = tempdir().expect("Failed to create temp dir");

        let config = load_config(&dir.path().join("bridge.toml"))
            .await
            .expect("Should handle missing bridge.toml");

        assert_eq!(config, BridgeConfig::default());
    }

    #[tokio::test]
    async fn test_load_config_invalid_toml() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("bridge.toml");
        fs::write(&path, "[server\nmin_heap_mb = ").expect("Failed to write bridge.toml");

        let result = load_config(&path).await;

        if let Err(ConfigError::TomlParse { path, .. }) = result {
            assert!(path.ends_with("bridge.toml"));
        } else {
            panic!("Expected TomlParse error");
        }
    }

    #[tokio::test]
    async fn test_load_config_wrong_type() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("bridge.toml");
        fs::write(&path, "[server]\nmin_heap_mb = \"lots\"").expect("Failed to write bridge.toml");

        assert!(matches!(
            load_config(&path).await,
            Err(ConfigError::TomlParse { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_config_rejects_inverted_heap() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("bridge.toml");
        fs::write(&path, "[server]\nmin_heap_mb = 4096\nmax_heap_mb = 1024")
            .expect("Failed to write bridge.toml");

        match load_config(&path).await {
            Err(ConfigError::InvalidConfig { reason, .. }) => {
                assert!(reason.contains("min_heap_mb"));
            }
            other => panic!("Expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_validate() {
        assert!(validate(&BridgeConfig::default()).is_ok());

        let mut config = BridgeConfig::default();
        config.server.max_heap_mb = 0;
        assert!(validate(&config).is_err());

        let mut config = BridgeConfig::default();
        config.server.jar = PathBuf::new();
        assert!(validate(&config).is_err());

        let mut config = BridgeConfig::default();
        config.chat.player = "  ".to_string();
        assert!(validate(&config).is_err());

        let mut config = BridgeConfig::default();
        config.server.startup_timeout_secs = 0;
        assert!(validate(&config).is_err());
    }
}

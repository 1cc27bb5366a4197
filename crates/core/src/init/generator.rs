//! Config file generation for `mc-bridge init`.

use super::error::{InitError, InitResult};
use super::templates::get_template;
use crate::config::DEFAULT_CONFIG_FILE;
use std::fs;
use std::path::PathBuf;

/// Options for initializing a bridge directory.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Directory that receives `bridge.toml`.
    pub target_dir: PathBuf,

    /// Overwrite an existing `bridge.toml`.
    pub force: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            force: false,
        }
    }
}

/// Write the default `bridge.toml` into the target directory.
///
/// The directory is created if needed.
///
/// # Returns
/// The path of the written file, or an `InitError` if:
/// - `bridge.toml` already exists (without force flag)
/// - The template is missing from the embedded assets
/// - File system operations fail
pub async fn generate_config(options: InitOptions) -> InitResult<PathBuf> {
    let target_path = options.target_dir.join(DEFAULT_CONFIG_FILE);

    if target_path.exists() && !options.force {
        return Err(InitError::FileExists(target_path));
    }

    let content = get_template(DEFAULT_CONFIG_FILE)
        .ok_or_else(|| InitError::TemplateNotFound(DEFAULT_CONFIG_FILE.to_string()))?;

    fs::create_dir_all(&options.target_dir).map_err(|source| InitError::DirectoryCreate {
        path: options.target_dir.clone(),
        source,
    })?;

    fs::write(&target_path, content).map_err(|source| InitError::FileWrite {
        path: target_path.clone(),
        source,
    })?;

    tracing::info!(path = %target_path.display(), "wrote default configuration");
    Ok(target_path)
}

//! Embedded template files for `mc-bridge init`.
//!
//! Files under the crate's `templates/` directory are embedded into the
//! binary at compile time, so `init` works without any files installed
//! next to it.

use rust_embed::RustEmbed;

/// Embedded template files from `crates/core/templates/`.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/templates"]
pub struct TemplateAssets;

/// Get template file content by path, relative to the templates root.
///
/// # Example
/// ```
/// use mcb_core::init::templates::get_template;
///
/// let config = get_template("bridge.toml").expect("bridge.toml should exist");
/// assert!(config.contains("[server]"));
/// ```
pub fn get_template(path: &str) -> Option<String> {
    TemplateAssets::get(path).map(|file| String::from_utf8_lossy(file.data.as_ref()).to_string())
}

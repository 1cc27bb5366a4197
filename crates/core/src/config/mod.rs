//! Configuration loading and validation.
//!
//! The bridge reads a single `bridge.toml`. A missing file is not an error;
//! every setting has a default (see [`mcb_protocol::config_models`]).

pub mod error;
pub mod loader;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, validate, DEFAULT_CONFIG_FILE};

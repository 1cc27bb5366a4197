//! Initialization of a new bridge directory.
//!
//! Writes a commented `bridge.toml` holding every setting with its default
//! value, ready to be edited.
//!
//! # Example
//!
//! ```no_run
//! use mcb_core::init::{generate_config, InitOptions};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = InitOptions {
//!     target_dir: PathBuf::from("."),
//!     force: false,
//! };
//!
//! let path = generate_config(options).await?;
//! println!("Wrote {}", path.display());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generator;
pub mod templates;

// Re-export commonly used types for convenience
pub use error::{InitError, InitResult};
pub use generator::{generate_config, InitOptions};
pub use templates::get_template;

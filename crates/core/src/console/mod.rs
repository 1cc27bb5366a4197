//! Server console access.
//!
//! This module owns the child process and its standard streams:
//! - [`JavaCommand`]: argument template for launching a Java server
//! - [`Launcher`]: trait for anything that can produce a [`Console`]
//! - [`ProcessLauncher`]: launches a real OS process
//! - [`ConsoleReader`] / [`ConsoleWriter`]: line-oriented stream halves
//! - [`mock`]: in-memory server used by tests

pub mod command;
pub mod error;
pub mod launcher;
pub mod mock;
pub mod process;

pub use command::JavaCommand;
pub use error::{ConsoleError, ConsoleResult};
pub use launcher::{Launcher, ProcessLauncher};
pub use process::{Console, ConsoleReader, ConsoleWriter, ServerProcess};

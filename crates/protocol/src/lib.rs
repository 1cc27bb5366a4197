//! # mcb-protocol
//!
//! Shared data models for mc-bridge.
//!
//! This crate defines the structures exchanged between the server wrapper,
//! the chat bridge and the binary:
//! - Parsed console output and the lifecycle vocabulary derived from it
//! - Notifications published by the wrapper while it runs
//! - Configuration file models (`bridge.toml`)
//! - Chat (Twitch EventSub) wire messages
//!
//! ## Modules
//!
//! - [`log_models`]: Parsed server console lines
//! - [`lifecycle_models`]: Lifecycle states and classified server events
//! - [`ipc`]: Notifications emitted by the wrapper
//! - [`config_models`]: Configuration from `bridge.toml`
//! - [`chat_models`]: Chat platform wire formats
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde and chrono
//! - Independent compilation: No dependencies on other mc-bridge crates

pub mod chat_models;
pub mod config_models;
pub mod ipc;
pub mod lifecycle_models;
pub mod log_models;

// Re-export all public types for convenience
pub use chat_models::*;
pub use config_models::*;
pub use ipc::*;
pub use lifecycle_models::*;
pub use log_models::*;

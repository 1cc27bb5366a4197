//! # mcb-core
//!
//! Server process wrapper and chat bridge for mc-bridge.
//!
//! This crate provides:
//! - Launching a Java game server and talking to its console
//! - Parsing console output and tracking the server lifecycle from it
//! - Synchronous request/response commands over the console
//! - Chat sources (Twitch EventSub, standard input) and the dispatcher that
//!   turns chat messages into game commands
//!
//! ## Modules
//!
//! - [`console`]: Process handle and console streams
//! - [`log`]: Log line parser and event classifier
//! - [`state`]: Lifecycle state machine and notifications
//! - [`wrapper`]: Orchestrator issuing commands and reading output
//! - [`commands`]: Typed console command formatters
//! - [`dispatch`]: Chat keyword to game action mapping
//! - [`chat`]: Chat message sources
//! - [`bridge`]: One chat-driven server session
//! - [`config`]: Configuration loading
//! - [`init`]: Default configuration generation

pub mod bridge;
pub mod chat;
pub mod commands;
pub mod config;
pub mod console;
pub mod dispatch;
pub mod init;
pub mod log;
pub mod state;
pub mod wrapper;

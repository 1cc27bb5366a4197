//! Common test utilities and helpers for integration tests.
//!
//! This module provides shared functionality across the integration tests:
//! - Fixtures (scripted servers, config files)
//! - Event collection and assertions

pub mod assertions;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

//! Typed builders for server console commands.
//!
//! Every formatter renders one or more console commands, sends them through
//! a [`CommandSink`] and returns the server's reply. Formatters that need
//! the player's position query it first with `/data get entity`.

pub mod error;
pub mod formatters;
pub mod position;
pub mod recording;
pub mod types;

pub use error::{CommandError, CommandResult};
pub use formatters::*;
pub use position::{parse_position, scatter, Vec3};
pub use recording::RecordingSink;
pub use types::{Attribute, AttributeOperation, Difficulty, Effect, Enchantment, Mob, Weather};

use crate::wrapper::{Wrapper, WrapperResult};
use async_trait::async_trait;

/// Anything that accepts a console command and answers with the server's reply.
#[async_trait]
pub trait CommandSink: Send + Sync {
    async fn send_command(&self, command: &str) -> WrapperResult<String>;
}

#[async_trait]
impl CommandSink for Wrapper {
    async fn send_command(&self, command: &str) -> WrapperResult<String> {
        Wrapper::send_command(self, command).await
    }
}

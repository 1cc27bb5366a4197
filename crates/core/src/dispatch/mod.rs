//! Turns chat messages into game actions.

use crate::commands::{self, CommandResult, CommandSink, Vec3};
use crate::commands::{Attribute, AttributeOperation, Effect, Enchantment, Mob, Weather};
use tracing::{info, warn};
use uuid::Uuid;

/// Items handed out by [`ChatAction::SuitUp`].
pub const DIAMOND_KIT: [&str; 8] = [
    "minecraft:diamond_pickaxe",
    "minecraft:diamond_boots",
    "minecraft:diamond_helmet",
    "minecraft:diamond_shovel",
    "minecraft:diamond_axe",
    "minecraft:diamond_sword",
    "minecraft:diamond_chestplate",
    "minecraft:diamond_leggings",
];

const TELEPORT_RANGE: Vec3 = Vec3::new(50.0, 10.0, 50.0);

/// A chat keyword and the effect it has on the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatAction {
    Skeleton,
    Teleport,
    ClearSkies,
    Rain,
    Damage,
    GoFast,
    SlowDown,
    LevelUp,
    Glow,
    SilkTouch,
    Kill,
    SuitUp,
    Quit,
}

impl ChatAction {
    /// Match a chat message against the known keywords.
    ///
    /// Only exact matches count; `Skeleton` or `skeleton!` do nothing.
    pub fn from_message(text: &str) -> Option<Self> {
        let action = match text {
            "skeleton" => Self::Skeleton,
            "teleport" => Self::Teleport,
            "clearskies" => Self::ClearSkies,
            "rain" => Self::Rain,
            "damage" => Self::Damage,
            "gofast" => Self::GoFast,
            "slowdown" => Self::SlowDown,
            "levelup" => Self::LevelUp,
            "glow" => Self::Glow,
            "silktouch" => Self::SilkTouch,
            "kill" => Self::Kill,
            "suitup" => Self::SuitUp,
            "quit" => Self::Quit,
            _ => return None,
        };
        Some(action)
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Skeleton => "skeleton",
            Self::Teleport => "teleport",
            Self::ClearSkies => "clearskies",
            Self::Rain => "rain",
            Self::Damage => "damage",
            Self::GoFast => "gofast",
            Self::SlowDown => "slowdown",
            Self::LevelUp => "levelup",
            Self::Glow => "glow",
            Self::SilkTouch => "silktouch",
            Self::Kill => "kill",
            Self::SuitUp => "suitup",
            Self::Quit => "quit",
        }
    }
}

/// Whether the chat loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Continue,
    Quit,
}

/// Applies chat messages to one player.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    player: String,
}

impl Dispatcher {
    pub fn new(player: impl Into<String>) -> Self {
        Self {
            player: player.into(),
        }
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    /// Echo `text` to the player and run the action it names, if any.
    ///
    /// Command failures are logged and do not end the chat loop.
    pub async fn handle(&self, sink: &dyn CommandSink, text: &str) -> DispatchOutcome {
        if let Err(e) = commands::tell(sink, &self.player, text).await {
            warn!(error = %e, "failed to echo chat message");
        }

        let Some(action) = ChatAction::from_message(text) else {
            return DispatchOutcome::Continue;
        };
        if action == ChatAction::Quit {
            info!("quit requested from chat");
            return DispatchOutcome::Quit;
        }

        info!(action = action.keyword(), player = %self.player, "running chat action");
        if let Err(e) = self.apply(sink, action).await {
            warn!(action = action.keyword(), error = %e, "chat action failed");
        }
        DispatchOutcome::Continue
    }

    async fn apply(&self, sink: &dyn CommandSink, action: ChatAction) -> CommandResult<()> {
        let player = self.player.as_str();
        match action {
            ChatAction::Skeleton => {
                commands::summon_mob(sink, player, Mob::Skeleton).await?;
            }
            ChatAction::Teleport => {
                commands::teleport_random(sink, player, TELEPORT_RANGE).await?;
            }
            ChatAction::ClearSkies => {
                commands::set_weather(sink, Weather::Clear).await?;
            }
            ChatAction::Rain => {
                commands::set_weather(sink, Weather::Rain).await?;
            }
            ChatAction::Damage => {
                commands::damage(sink, player, 10).await?;
            }
            ChatAction::GoFast => self.speed_modifier(sink, "gofast", 2.0).await?,
            ChatAction::SlowDown => self.speed_modifier(sink, "slowdown", 0.5).await?,
            ChatAction::LevelUp => {
                commands::add_levels(sink, player, 10).await?;
            }
            ChatAction::Glow => {
                commands::set_effect(sink, player, Effect::Glowing, 10, 1, false).await?;
            }
            ChatAction::SilkTouch => {
                commands::enchant(sink, player, Enchantment::SilkTouch, 1).await?;
            }
            ChatAction::Kill => {
                commands::kill(sink, player).await?;
            }
            ChatAction::SuitUp => {
                commands::give(sink, player, &DIAMOND_KIT).await?;
            }
            ChatAction::Quit => {}
        }
        Ok(())
    }

    async fn speed_modifier(&self, sink: &dyn CommandSink, name: &str, value: f64) -> CommandResult<()> {
        let id = Uuid::new_v4().to_string();
        commands::add_attribute_modifier(
            sink,
            &self.player,
            Attribute::MovementSpeed,
            &id,
            name,
            value,
            AttributeOperation::Multiply,
        )
        .await?;
        Ok(())
    }
}

//! One function per console command.

use crate::commands::position::{parse_position, scatter, Vec3};
use crate::commands::types::{
    Attribute, AttributeOperation, Difficulty, Effect, Enchantment, Mob, Weather,
};
use crate::commands::{CommandError, CommandResult, CommandSink};
use tracing::{debug, info};

async fn run(sink: &dyn CommandSink, command: String) -> CommandResult<String> {
    info!(%command, "running command");
    let reply = sink.send_command(&command).await?;
    debug!(%command, %reply, "command reply");
    Ok(reply)
}

/// Send a private message to a player.
///
/// Line breaks are replaced with spaces so the text cannot end the command
/// early and smuggle in a second one. Backslashes and quotes are escaped to
/// keep the message a single quoted argument.
pub async fn tell(sink: &dyn CommandSink, player: &str, message: &str) -> CommandResult<String> {
    let message = message
        .replace(['\r', '\n'], " ")
        .replace('\\', "\\\\")
        .replace('"', "\\\"");
    run(sink, format!("/tell {player} \"{message}\"")).await
}

pub async fn set_weather(sink: &dyn CommandSink, weather: Weather) -> CommandResult<String> {
    run(sink, format!("/weather {weather}")).await
}

pub async fn set_difficulty(sink: &dyn CommandSink, difficulty: Difficulty) -> CommandResult<String> {
    run(sink, format!("/difficulty {difficulty}")).await
}

/// Damage a player as if hit by their own fireball.
pub async fn damage(sink: &dyn CommandSink, player: &str, amount: u32) -> CommandResult<String> {
    run(
        sink,
        format!("/damage {player} {amount} minecraft:fireball by {player}"),
    )
    .await
}

pub async fn add_attribute_modifier(
    sink: &dyn CommandSink,
    player: &str,
    attribute: Attribute,
    id: &str,
    name: &str,
    value: f64,
    operation: AttributeOperation,
) -> CommandResult<String> {
    run(
        sink,
        format!("/attribute {player} {attribute} modifier add {id} {name} {value:.2} {operation}"),
    )
    .await
}

pub async fn set_effect(
    sink: &dyn CommandSink,
    player: &str,
    effect: Effect,
    seconds: u32,
    amplifier: u8,
    hide_particles: bool,
) -> CommandResult<String> {
    run(
        sink,
        format!("/effect give {player} {effect} {seconds} {amplifier} {hide_particles}"),
    )
    .await
}

pub async fn enchant(
    sink: &dyn CommandSink,
    player: &str,
    enchantment: Enchantment,
    level: u8,
) -> CommandResult<String> {
    run(sink, format!("/enchant {player} {enchantment} {level}")).await
}

pub async fn add_levels(sink: &dyn CommandSink, player: &str, amount: i32) -> CommandResult<String> {
    run(sink, format!("/experience add {player} {amount} levels")).await
}

pub async fn kill(sink: &dyn CommandSink, player: &str) -> CommandResult<String> {
    run(sink, format!("/kill {player}")).await
}

/// Give each item to the player, one command per item.
///
/// Returns the replies in item order. Stops at the first failure.
pub async fn give<S: AsRef<str>>(
    sink: &dyn CommandSink,
    player: &str,
    items: &[S],
) -> CommandResult<Vec<String>> {
    let mut replies = Vec::with_capacity(items.len());
    for item in items {
        replies.push(run(sink, format!("/give {player} {}", item.as_ref())).await?);
    }
    Ok(replies)
}

/// Query the player's current position.
pub async fn player_position(sink: &dyn CommandSink, player: &str) -> CommandResult<Vec3> {
    let command = format!("/data get entity {player} Pos");
    let reply = run(sink, command.clone()).await?;
    parse_position(&reply).ok_or(CommandError::UnparsableResponse {
        command,
        response: reply,
    })
}

/// Summon a mob at the player's position.
pub async fn summon_mob(sink: &dyn CommandSink, player: &str, mob: Mob) -> CommandResult<String> {
    let pos = player_position(sink, player).await?;
    run(sink, format!("/summon {mob} {} {} {}", pos.x, pos.y, pos.z)).await
}

/// Teleport the player to a random point within `max_offset` of where they stand.
pub async fn teleport_random(
    sink: &dyn CommandSink,
    player: &str,
    max_offset: Vec3,
) -> CommandResult<String> {
    let origin = player_position(sink, player).await?;
    let target = scatter(origin, max_offset, &mut rand::rng());
    run(
        sink,
        format!(
            "/teleport {player} {:.6} {:.6} {:.6}",
            target.x, target.y, target.z
        ),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::RecordingSink;

    const POS_REPLY: &str = "tibretS has the following entity data: [-12.5d, 64.0d, 33.25d]";

    #[tokio::test]
    async fn test_tell_quotes_message() {
        let sink = RecordingSink::new();
        tell(&sink, "tibretS", "hello there").await.unwrap();

        assert_eq!(sink.commands().await, vec!["/tell tibretS \"hello there\""]);
    }

    #[tokio::test]
    async fn test_tell_strips_line_breaks() {
        let sink = RecordingSink::new();
        tell(&sink, "tibretS", "hi\r\n/op everyone").await.unwrap();

        assert_eq!(
            sink.commands().await,
            vec!["/tell tibretS \"hi  /op everyone\""]
        );
    }

    #[tokio::test]
    async fn test_tell_escapes_quotes() {
        let sink = RecordingSink::new();
        tell(&sink, "tibretS", r#"say "hi" \o/"#).await.unwrap();

        assert_eq!(
            sink.commands().await,
            vec![r#"/tell tibretS "say \"hi\" \\o/""#]
        );
    }

    #[tokio::test]
    async fn test_simple_commands() {
        let sink = RecordingSink::new();
        set_weather(&sink, Weather::Clear).await.unwrap();
        set_difficulty(&sink, Difficulty::Hard).await.unwrap();
        damage(&sink, "tibretS", 10).await.unwrap();
        set_effect(&sink, "tibretS", Effect::Glowing, 10, 1, false)
            .await
            .unwrap();
        enchant(&sink, "tibretS", Enchantment::SilkTouch, 1)
            .await
            .unwrap();
        add_levels(&sink, "tibretS", 10).await.unwrap();
        kill(&sink, "tibretS").await.unwrap();

        assert_eq!(
            sink.commands().await,
            vec![
                "/weather clear",
                "/difficulty hard",
                "/damage tibretS 10 minecraft:fireball by tibretS",
                "/effect give tibretS minecraft:glowing 10 1 false",
                "/enchant tibretS minecraft:silk_touch 1",
                "/experience add tibretS 10 levels",
                "/kill tibretS",
            ]
        );
    }

    #[tokio::test]
    async fn test_attribute_modifier() {
        let sink = RecordingSink::new();
        add_attribute_modifier(
            &sink,
            "tibretS",
            Attribute::MovementSpeed,
            "3f1c2b4e-0000-4000-8000-000000000001",
            "gofast",
            2.0,
            AttributeOperation::Multiply,
        )
        .await
        .unwrap();

        assert_eq!(
            sink.commands().await,
            vec!["/attribute tibretS minecraft:generic.movement_speed modifier add 3f1c2b4e-0000-4000-8000-000000000001 gofast 2.00 multiply"]
        );
    }

    #[tokio::test]
    async fn test_give_sends_one_command_per_item() {
        let sink = RecordingSink::with_replies(["Gave 1 [Diamond Sword]", "Gave 1 [Diamond Axe]"]);
        let replies = give(&sink, "tibretS", &["minecraft:diamond_sword", "minecraft:diamond_axe"])
            .await
            .unwrap();

        assert_eq!(replies, vec!["Gave 1 [Diamond Sword]", "Gave 1 [Diamond Axe]"]);
        assert_eq!(
            sink.commands().await,
            vec![
                "/give tibretS minecraft:diamond_sword",
                "/give tibretS minecraft:diamond_axe",
            ]
        );
    }

    #[tokio::test]
    async fn test_summon_mob_at_player_position() {
        let sink = RecordingSink::with_replies([POS_REPLY, "Summoned new Skeleton"]);
        let reply = summon_mob(&sink, "tibretS", Mob::Skeleton).await.unwrap();

        assert_eq!(reply, "Summoned new Skeleton");
        assert_eq!(
            sink.commands().await,
            vec![
                "/data get entity tibretS Pos",
                "/summon minecraft:skeleton -12.5 64 33.25",
            ]
        );
    }

    #[tokio::test]
    async fn test_summon_mob_aborts_on_bad_position() {
        let sink = RecordingSink::with_replies(["No entity was found"]);
        let result = summon_mob(&sink, "tibretS", Mob::Zombie).await;

        assert!(matches!(
            result,
            Err(CommandError::UnparsableResponse { .. })
        ));
        assert_eq!(sink.commands().await.len(), 1);
    }

    #[tokio::test]
    async fn test_teleport_random_stays_near_player() {
        let sink = RecordingSink::with_replies([POS_REPLY]);
        teleport_random(&sink, "tibretS", Vec3::new(50.0, 10.0, 50.0))
            .await
            .unwrap();

        let commands = sink.commands().await;
        assert_eq!(commands.len(), 2);

        let parts: Vec<&str> = commands[1].split(' ').collect();
        assert_eq!(&parts[..2], &["/teleport", "tibretS"]);
        let coords: Vec<f64> = parts[2..].iter().map(|p| p.parse().unwrap()).collect();
        assert!((coords[0] + 12.5).abs() < 50.0);
        assert!((coords[1] - 64.0).abs() < 10.0);
        assert!((coords[2] - 33.25).abs() < 50.0);
    }
}

//! Game identifiers used as command arguments.
//!
//! Each type renders as the identifier the server expects, so values can be
//! interpolated directly into a command string.

use std::fmt;

macro_rules! identifiers {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $id:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn id(&self) -> &'static str {
                match self {
                    $(Self::$variant => $id),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.id())
            }
        }
    };
}

identifiers! {
    /// A summonable hostile mob.
    Mob {
        Skeleton => "minecraft:skeleton",
        Zombie => "minecraft:zombie",
        Creeper => "minecraft:creeper",
        Spider => "minecraft:spider",
        Enderman => "minecraft:enderman",
    }
}

identifiers! {
    Weather {
        Clear => "clear",
        Rain => "rain",
        Thunder => "thunder",
    }
}

identifiers! {
    Difficulty {
        Peaceful => "peaceful",
        Easy => "easy",
        Normal => "normal",
        Hard => "hard",
    }
}

identifiers! {
    /// A status effect for `/effect give`.
    Effect {
        Glowing => "minecraft:glowing",
        Speed => "minecraft:speed",
        Slowness => "minecraft:slowness",
        Levitation => "minecraft:levitation",
        NightVision => "minecraft:night_vision",
        JumpBoost => "minecraft:jump_boost",
        Blindness => "minecraft:blindness",
    }
}

identifiers! {
    Enchantment {
        SilkTouch => "minecraft:silk_touch",
        Fortune => "minecraft:fortune",
        Mending => "minecraft:mending",
        Unbreaking => "minecraft:unbreaking",
        Efficiency => "minecraft:efficiency",
    }
}

identifiers! {
    /// A player attribute that modifiers can be attached to.
    Attribute {
        MovementSpeed => "minecraft:generic.movement_speed",
        MaxHealth => "minecraft:generic.max_health",
        AttackDamage => "minecraft:generic.attack_damage",
        JumpStrength => "minecraft:generic.jump_strength",
        Scale => "minecraft:generic.scale",
    }
}

identifiers! {
    /// How an attribute modifier combines with the base value.
    AttributeOperation {
        Add => "add",
        Multiply => "multiply",
        MultiplyBase => "multiply_base",
    }
}

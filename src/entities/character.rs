use std::{fmt, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    arcade::anims::{generate_frame_names, generate_frame_numbers, AnimationDef, FrameRef},
    assets::AssetManifest,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

/// An animation to play on the player, and how to play it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cycle {
    pub key: &'static str,
    /// Some(flip) if the cycle sets the sprite's horizontal flip
    pub flip_x: Option<bool>,
    pub ignore_if_playing: bool,
}

// ---------------------------------------------------------------------------------------------------------------------

/// The two player character asset variants. `Bones` is a packed atlas with a single running
/// cycle mirrored for leftward motion; `Dude` is a 32x48 spritesheet with distinct left and right cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterSet {
    Bones,
    Dude,
}

impl Default for CharacterSet {
    fn default() -> Self {
        CharacterSet::Bones
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unrecognized character \"{0}\", expected \"bones\" or \"dude\"")]
pub struct ParseCharacterSetError(String);

impl FromStr for CharacterSet {
    type Err = ParseCharacterSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bones" => Ok(CharacterSet::Bones),
            "dude" => Ok(CharacterSet::Dude),
            _ => Err(ParseCharacterSetError(s.to_string())),
        }
    }
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharacterSet::Bones => write!(f, "bones"),
            CharacterSet::Dude => write!(f, "dude"),
        }
    }
}

impl CharacterSet {
    pub fn texture_key(&self) -> &'static str {
        match self {
            CharacterSet::Bones => "bones",
            CharacterSet::Dude => "dude",
        }
    }

    pub fn declare_assets(&self, manifest: &mut AssetManifest) {
        match self {
            CharacterSet::Bones => {
                manifest.atlas("bones", "assets/bones.png", "assets/bones.json", (40, 48))
            }
            CharacterSet::Dude => manifest.spritesheet("dude", "assets/dude.png", 32, 48),
        }
    }

    pub fn initial_frame(&self) -> FrameRef {
        match self {
            CharacterSet::Bones => FrameRef::Name("idle_0001".to_string()),
            CharacterSet::Dude => FrameRef::Index(4),
        }
    }

    pub fn animations(&self) -> Vec<AnimationDef> {
        let key = self.texture_key();
        match self {
            CharacterSet::Bones => vec![
                AnimationDef::new("idle", key, generate_frame_names("idle_", 0, 1, 4)),
                AnimationDef::new("running", key, generate_frame_names("running_", 0, 3, 4))
                    .with_frame_rate(11.0)
                    .with_repeat(-1),
            ],
            CharacterSet::Dude => vec![
                AnimationDef::new("left", key, generate_frame_numbers(0, 3))
                    .with_frame_rate(10.0)
                    .with_repeat(-1),
                AnimationDef::new("turn", key, vec![FrameRef::Index(4)]).with_frame_rate(20.0),
                AnimationDef::new("right", key, generate_frame_numbers(5, 8))
                    .with_frame_rate(10.0)
                    .with_repeat(-1),
            ],
        }
    }

    /// Horizontal speed while a direction key is held
    pub fn run_speed(&self) -> f32 {
        match self {
            CharacterSet::Bones => 180.0,
            CharacterSet::Dude => 160.0,
        }
    }

    pub fn running_cycle(&self, facing: Facing) -> Cycle {
        match (self, facing) {
            (CharacterSet::Bones, facing) => Cycle {
                key: "running",
                flip_x: Some(facing == Facing::Left),
                ignore_if_playing: true,
            },
            (CharacterSet::Dude, Facing::Left) => Cycle {
                key: "left",
                flip_x: None,
                ignore_if_playing: true,
            },
            (CharacterSet::Dude, Facing::Right) => Cycle {
                key: "right",
                flip_x: None,
                ignore_if_playing: true,
            },
        }
    }

    /// Played every frame no direction key is held; restarts each time.
    pub fn idle_cycle(&self) -> Cycle {
        Cycle {
            key: self.rest_animation(),
            flip_x: None,
            ignore_if_playing: false,
        }
    }

    pub fn defeated_cycle(&self) -> Cycle {
        Cycle {
            key: self.rest_animation(),
            flip_x: None,
            ignore_if_playing: false,
        }
    }

    fn rest_animation(&self) -> &'static str {
        match self {
            CharacterSet::Bones => "idle",
            CharacterSet::Dude => "turn",
        }
    }
}

#[cfg(test)]
mod character_tests {
    use super::*;

    #[test]
    fn parses_and_displays() {
        assert_eq!("bones".parse::<CharacterSet>(), Ok(CharacterSet::Bones));
        assert_eq!("Dude".parse::<CharacterSet>(), Ok(CharacterSet::Dude));
        assert!("skeleton".parse::<CharacterSet>().is_err());
        assert_eq!(CharacterSet::Dude.to_string(), "dude");
    }

    #[test]
    fn every_cycle_names_a_declared_animation() {
        for character in [CharacterSet::Bones, CharacterSet::Dude].iter() {
            let keys = character
                .animations()
                .into_iter()
                .map(|a| a.key)
                .collect::<Vec<_>>();
            let cycles = [
                character.running_cycle(Facing::Left),
                character.running_cycle(Facing::Right),
                character.idle_cycle(),
                character.defeated_cycle(),
            ];
            for cycle in cycles.iter() {
                assert!(
                    keys.iter().any(|k| k == cycle.key),
                    "{} has no animation \"{}\"",
                    character,
                    cycle.key
                );
            }
        }
    }

    #[test]
    fn bones_mirrors_running_for_left() {
        let left = CharacterSet::Bones.running_cycle(Facing::Left);
        let right = CharacterSet::Bones.running_cycle(Facing::Right);
        assert_eq!(left.key, right.key);
        assert_eq!(left.flip_x, Some(true));
        assert_eq!(right.flip_x, Some(false));
        assert_eq!(CharacterSet::Dude.running_cycle(Facing::Left).key, "left");
    }
}

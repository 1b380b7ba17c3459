use std::collections::HashMap;

use log::warn;
use thiserror::Error;

use crate::assets::Texture;

/// Frame rate used when an animation doesn't specify one
pub const DEFAULT_FRAME_RATE: f32 = 24.0;

/// A frame within a texture; grid spritesheets address frames by index, atlases by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FrameRef {
    Index(u32),
    Name(String),
}

/// Builds `prefix + zero padded number` frame names for the inclusive range [start, end],
/// e.g. `running_0000` through `running_0003`.
pub fn generate_frame_names(prefix: &str, start: u32, end: u32, zero_pad: usize) -> Vec<FrameRef> {
    (start..=end)
        .map(|i| FrameRef::Name(format!("{}{:0width$}", prefix, i, width = zero_pad)))
        .collect()
}

/// Builds index frames for the inclusive range [start, end]
pub fn generate_frame_numbers(start: u32, end: u32) -> Vec<FrameRef> {
    (start..=end).map(FrameRef::Index).collect()
}

// ---------------------------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationDef {
    pub key: String,
    pub texture: String,
    pub frames: Vec<FrameRef>,
    pub frame_rate: f32,
    /// Number of times to repeat after the first play; -1 repeats forever.
    pub repeat: i32,
}

impl AnimationDef {
    pub fn new(key: &str, texture: &str, frames: Vec<FrameRef>) -> Self {
        Self {
            key: key.to_string(),
            texture: texture.to_string(),
            frames,
            frame_rate: DEFAULT_FRAME_RATE,
            repeat: 0,
        }
    }

    pub fn with_frame_rate(mut self, frame_rate: f32) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    pub fn with_repeat(mut self, repeat: i32) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn is_looping(&self) -> bool {
        self.repeat < 0
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum AnimationError {
    #[error("animation \"{0}\" already exists")]
    DuplicateKey(String),
    #[error("animation \"{key}\" has no frames present in texture \"{texture}\"")]
    NoFrames { key: String, texture: String },
    #[error("animation \"{key}\" has a non-positive frame rate")]
    BadFrameRate { key: String },
}

/// Scene-wide registry of named animations.
#[derive(Debug, Default)]
pub struct AnimationManager {
    animations: HashMap<String, AnimationDef>,
}

impl AnimationManager {
    /// Registers an animation. Frames the texture doesn't have are dropped with a warning;
    /// an animation left with no frames at all is an error.
    pub fn create(&mut self, mut def: AnimationDef, texture: &Texture) -> Result<(), AnimationError> {
        if self.animations.contains_key(&def.key) {
            return Err(AnimationError::DuplicateKey(def.key));
        }
        if def.frame_rate <= 0.0 {
            return Err(AnimationError::BadFrameRate { key: def.key });
        }

        let key = def.key.clone();
        def.frames.retain(|frame| {
            let present = texture.has_frame(frame);
            if !present {
                warn!(
                    "Animation \"{}\" skipping frame {:?} missing from texture \"{}\"",
                    key, frame, texture.key
                );
            }
            present
        });

        if def.frames.is_empty() {
            return Err(AnimationError::NoFrames {
                key,
                texture: texture.key.clone(),
            });
        }

        self.animations.insert(key, def);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&AnimationDef> {
        self.animations.get(key)
    }
}

// ---------------------------------------------------------------------------------------------------------------------

/// Per-sprite playback state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationState {
    key: Option<String>,
    frame_index: usize,
    elapsed: f32,
    repeats_done: u32,
    playing: bool,
}

impl AnimationState {
    /// Starts `def` from its first frame. If `ignore_if_playing` is set and `def` is already
    /// playing, playback continues undisturbed.
    pub fn play(&mut self, def: &AnimationDef, ignore_if_playing: bool) {
        if ignore_if_playing && self.playing && self.key.as_deref() == Some(def.key.as_str()) {
            return;
        }
        self.key = Some(def.key.clone());
        self.frame_index = 0;
        self.elapsed = 0.0;
        self.repeats_done = 0;
        self.playing = true;
    }

    /// Steps playback by `dt` seconds. A non-looping animation stops on its last frame.
    pub fn advance(&mut self, dt: f32, def: &AnimationDef) {
        if !self.playing || def.frames.is_empty() {
            return;
        }

        let frame_duration = 1.0 / def.frame_rate;
        self.elapsed += dt;
        while self.elapsed >= frame_duration {
            self.elapsed -= frame_duration;
            if self.frame_index + 1 < def.frames.len() {
                self.frame_index += 1;
            } else if def.is_looping() || (self.repeats_done as i32) < def.repeat {
                self.frame_index = 0;
                self.repeats_done += 1;
            } else {
                self.playing = false;
                break;
            }
        }
    }

    pub fn current_key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current_frame<'a>(&self, def: &'a AnimationDef) -> Option<&'a FrameRef> {
        def.frames.get(self.frame_index)
    }
}

#[cfg(test)]
mod anims_tests {
    use super::*;
    use crate::assets::{Frames, Texture};
    use cgmath::vec2;
    use std::collections::BTreeMap;

    fn atlas_texture(names: &[&str]) -> Texture {
        let frames = names
            .iter()
            .map(|n| (n.to_string(), vec2(40.0, 48.0)))
            .collect::<BTreeMap<_, _>>();
        Texture::new("bones", vec2(40.0, 48.0), Frames::Named(frames))
    }

    #[test]
    fn frame_names_are_zero_padded_and_inclusive() {
        assert_eq!(
            generate_frame_names("running_", 0, 3, 4),
            vec![
                FrameRef::Name("running_0000".into()),
                FrameRef::Name("running_0001".into()),
                FrameRef::Name("running_0002".into()),
                FrameRef::Name("running_0003".into()),
            ]
        );
        assert_eq!(
            generate_frame_numbers(5, 8),
            vec![
                FrameRef::Index(5),
                FrameRef::Index(6),
                FrameRef::Index(7),
                FrameRef::Index(8)
            ]
        );
    }

    #[test]
    fn create_drops_missing_frames_and_rejects_duplicates() {
        let texture = atlas_texture(&["idle_0000", "idle_0001"]);
        let mut manager = AnimationManager::default();

        let idle = AnimationDef::new("idle", "bones", generate_frame_names("idle_", 0, 2, 4));
        assert!(manager.create(idle.clone(), &texture).is_ok());
        assert_eq!(manager.get("idle").map(|d| d.frames.len()), Some(2));

        assert_eq!(
            manager.create(idle, &texture),
            Err(AnimationError::DuplicateKey("idle".into()))
        );

        let running = AnimationDef::new("running", "bones", generate_frame_names("running_", 0, 3, 4));
        assert!(matches!(
            manager.create(running, &texture),
            Err(AnimationError::NoFrames { .. })
        ));
        assert!(manager.get("running").is_none());
    }

    #[test]
    fn looping_animation_wraps() {
        let def = AnimationDef::new("left", "dude", generate_frame_numbers(0, 3))
            .with_frame_rate(10.0)
            .with_repeat(-1);
        let mut state = AnimationState::default();
        state.play(&def, true);
        state.advance(0.45, &def);
        assert_eq!(state.current_frame(&def), Some(&FrameRef::Index(0)));
        assert!(state.is_playing());
    }

    #[test]
    fn one_shot_animation_stops_on_last_frame() {
        let def = AnimationDef::new("idle", "bones", generate_frame_names("idle_", 0, 1, 4));
        let mut state = AnimationState::default();
        state.play(&def, false);
        state.advance(1.0, &def);
        assert!(!state.is_playing());
        assert_eq!(state.frame_index(), 1);
    }

    #[test]
    fn ignore_if_playing_keeps_progress() {
        let def = AnimationDef::new("right", "dude", generate_frame_numbers(5, 8))
            .with_frame_rate(10.0)
            .with_repeat(-1);
        let mut state = AnimationState::default();
        state.play(&def, true);
        state.advance(0.25, &def);
        assert_eq!(state.frame_index(), 2);

        state.play(&def, true);
        assert_eq!(state.frame_index(), 2);

        state.play(&def, false);
        assert_eq!(state.frame_index(), 0);
    }
}

use cgmath::*;

use crate::{
    arcade::World,
    input::{InputState, Key},
    state::game_state::Handles,
};

/// Horizontal distance within which the autopilot considers itself lined up with a star
const ARRIVAL_SLOP: f32 = 8.0;

/// How far above the player's center a star must be before the autopilot jumps for it
const JUMP_THRESHOLD: f32 = 24.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Steering {
    pub left: bool,
    pub right: bool,
    pub up: bool,
}

impl Steering {
    /// Holds the steering's keys on `input`, releasing the rest.
    pub fn apply(&self, input: &mut InputState) {
        input.hold(Key::Left, self.left);
        input.hold(Key::Right, self.right);
        input.hold(Key::Up, self.up);
    }
}

/// Picks keys for a headless run: walk toward the nearest active star, and jump
/// when it's above the player and the player is standing on something.
pub fn steer(world: &World, handles: &Handles) -> Steering {
    let player = match world.sprite(handles.player) {
        Some(p) => p,
        None => return Steering::default(),
    };
    let position = player.position;

    let target = world
        .group_members(handles.stars)
        .iter()
        .filter(|id| world.is_active(**id))
        .filter_map(|id| world.sprite(*id))
        .map(|s| s.position)
        .min_by(|a, b| {
            let da = a.distance2(position);
            let db = b.distance2(position);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });

    let target = match target {
        Some(t) => t,
        None => return Steering::default(),
    };

    let dx = target.x - position.x;
    let grounded = world.body(handles.player).map(|b| b.on_ground()).unwrap_or(false);
    Steering {
        left: dx < -ARRIVAL_SLOP,
        right: dx > ARRIVAL_SLOP,
        up: grounded && target.y < position.y - JUMP_THRESHOLD,
    }
}

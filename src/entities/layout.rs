use cgmath::*;
use rand::Rng;

use crate::state::constants::*;

/// Spawn positions of the star row, left to right
pub fn star_row() -> Vec<Point2<f32>> {
    (0..STAR_COUNT)
        .map(|i| point2(STAR_START_X + STAR_STEP_X * i as f32, STAR_START_Y))
        .collect()
}

/// Vertical bounce for a single star, in [0.4, 0.8)
pub fn star_bounce<R: Rng>(rng: &mut R) -> f32 {
    rng.gen_range(STAR_BOUNCE_MIN..STAR_BOUNCE_MAX)
}

/// Horizontal spawn position for a new bomb: on the opposite half of the canvas from the player.
pub fn hazard_spawn_x<R: Rng>(rng: &mut R, player_x: f32, width: u32) -> f32 {
    let half = width / 2;
    if player_x < half as f32 {
        rng.gen_range(half..width) as f32
    } else {
        rng.gen_range(0..half) as f32
    }
}

pub fn hazard_velocity<R: Rng>(rng: &mut R) -> Vector2<f32> {
    let vx = rng.gen_range(-BOMB_MAX_VELOCITY_X..=BOMB_MAX_VELOCITY_X);
    vec2(vx as f32, BOMB_VELOCITY_Y)
}

// Gameplay constants. Units are pixels, seconds & pixels-per-second unless otherwise specified.
// Screen space has +y pointing down, and sprite positions are sprite centers.

pub mod textures {
    pub const SKY: &str = "sky";
    pub const GROUND: &str = "ground";
    pub const STAR: &str = "star";
    pub const BOMB: &str = "bomb";
}

// The layout below is authored for this canvas, so it is not configurable
pub const CANVAS_WIDTH: u32 = 800;
pub const CANVAS_HEIGHT: u32 = 600;
pub const DEFAULT_GRAVITY_Y: f32 = 300.0;
pub const DEFAULT_FRAME_RATE: u32 = 60;

// Largest step the runner will simulate in one update
pub const MAX_TIMESTEP_MILLIS: u64 = 32;

pub const BACKGROUND_POSITION: (f32, f32) = (400.0, 300.0);

/// (x, y, scale) for each platform tile. The ground tile is authored at half the canvas width.
pub const PLATFORM_LAYOUT: [(f32, f32, f32); 4] = [
    (400.0, 568.0, 2.0),
    (600.0, 400.0, 1.0),
    (50.0, 250.0, 1.0),
    (750.0, 220.0, 1.0),
];

pub const PLAYER_START: (f32, f32) = (100.0, 450.0);
pub const PLAYER_BOUNCE: f32 = 0.2;
pub const JUMP_VELOCITY: f32 = -330.0;

pub const STAR_COUNT: usize = 12;
pub const STAR_START_X: f32 = 12.0;
pub const STAR_STEP_X: f32 = 70.0;
pub const STAR_START_Y: f32 = 0.0;
pub const STAR_BOUNCE_MIN: f32 = 0.4;
pub const STAR_BOUNCE_MAX: f32 = 0.8;
pub const STAR_SCORE: u32 = 10;

pub const BOMB_SPAWN_Y: f32 = 16.0;
pub const BOMB_BOUNCE: f32 = 1.0;
pub const BOMB_VELOCITY_Y: f32 = 20.0;
pub const BOMB_MAX_VELOCITY_X: i32 = 200;

pub const SCORE_TEXT_POSITION: (f32, f32) = (16.0, 16.0);
pub const SCORE_FONT_SIZE_PX: u32 = 32;
pub const SCORE_FILL: &str = "#000";

pub const DEFEAT_TINT: u32 = 0xff0000;

pub fn score_label(score: u32) -> String {
    format!("Score: {}", score)
}

use std::time::Duration;

use anyhow::{Context, Result};
use cgmath::*;
use log::{debug, info};
use rand::Rng;

use crate::{
    arcade::{Target, TextStyle, World, WorldError},
    assets::{AssetCache, AssetManifest},
    config::GameConfig,
    entities::{layout, CharacterSet, Cycle, Facing},
    event_dispatch::{Dispatcher, Message},
    input::{CursorKeys, Key},
    state::{
        constants::{self, textures},
        events::{Callback, Event},
        scene::Scene,
    },
    util::rel_eq,
};

/// Mutable game state, separate from the world's sprites.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub score: u32,
    pub game_over: bool,
    pub facing: Facing,
    pub bombs_spawned: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            score: 0,
            game_over: false,
            facing: Facing::Right,
            bombs_spawned: 0,
        }
    }
}

/// Ids of the world objects the session creates during setup.
#[derive(Clone, Debug)]
pub struct Handles {
    pub player: u32,
    pub platforms: u32,
    pub stars: u32,
    pub bombs: u32,
    pub score_text: u32,
    /// Each star's id and the x position it respawns at
    pub star_columns: Vec<(u32, f32)>,
    bomb_size: Vector2<f32>,
}

// ---------------------------------------------------------------------------------------------------------------------

/// The star collecting game: the player runs and jumps across four platforms collecting a row
/// of twelve stars. Each time the row is exhausted it respawns along with one new bouncing bomb.
/// Touching a bomb ends the game.
pub struct GameSession<R: Rng> {
    character: CharacterSet,
    rng: R,
    state: SessionState,
    handles: Option<Handles>,
    notifications: Dispatcher,
}

impl<R: Rng> GameSession<R> {
    pub fn new(config: &GameConfig, rng: R) -> Self {
        Self {
            character: config.character,
            rng,
            state: SessionState::default(),
            handles: None,
            notifications: Dispatcher::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Ids of the scene's objects; None until the scene has been created.
    pub fn handles(&self) -> Option<&Handles> {
        self.handles.as_ref()
    }

    /// Returns the session's pending notifications (score changes, replenishes, spawns, game over).
    pub fn drain_notifications(&mut self) -> Vec<Message> {
        self.notifications.drain()
    }

    fn play_cycle(world: &mut World, sprite: u32, cycle: Cycle) {
        if let Some(flip) = cycle.flip_x {
            world.set_flip_x(sprite, flip);
        }
        world.play_animation(sprite, cycle.key, cycle.ignore_if_playing);
    }

    /// Player touched a star. Collects it, and when it was the last active star,
    /// replenishes the row and spawns a bomb.
    pub fn on_star_overlap(
        &mut self,
        world: &mut World,
        _player: u32,
        star: u32,
    ) -> Result<(), WorldError> {
        if self.state.game_over || !world.is_active(star) {
            return Ok(());
        }
        let (stars, score_text) = match self.handles.as_ref() {
            Some(h) => (h.stars, h.score_text),
            None => return Ok(()),
        };

        world.disable_body(star, true, true);
        self.state.score += constants::STAR_SCORE;
        world.set_text(score_text, &constants::score_label(self.state.score));
        debug!("Collected star {}, score is now {}", star, self.state.score);
        self.notifications.entity_to_global(
            star,
            Event::ScoreChanged {
                score: self.state.score,
            },
        );

        if world.count_active(stars) == 0 {
            self.replenish_stars(world);
            self.spawn_hazard(world)?;
        }
        Ok(())
    }

    /// Player touched a bomb. Freezes the world and ends the game; there is no restart.
    pub fn on_hazard_overlap(&mut self, world: &mut World, player: u32, _hazard: u32) {
        if self.state.game_over {
            return;
        }

        world.pause();
        world.set_tint(player, constants::DEFEAT_TINT);
        Self::play_cycle(world, player, self.character.defeated_cycle());
        self.state.game_over = true;

        info!("Game over, final score {}", self.state.score);
        self.notifications.broadcast(Event::GameOver {
            score: self.state.score,
        });
    }

    /// Reactivates every star at its original column, at the top of the canvas.
    fn replenish_stars(&mut self, world: &mut World) {
        let handles = match self.handles.as_ref() {
            Some(h) => h,
            None => return,
        };
        for (star, x) in handles.star_columns.iter() {
            world.enable_body(
                *star,
                true,
                point2(*x, constants::STAR_START_Y),
                true,
                true,
            );
        }

        let count = world.count_active(handles.stars);
        info!("Replenished {} stars", count);
        self.notifications
            .broadcast(Event::StarsReplenished { count });
    }

    /// Adds a bomb on the opposite half of the canvas from the player.
    fn spawn_hazard(&mut self, world: &mut World) -> Result<(), WorldError> {
        let handles = match self.handles.as_ref() {
            Some(h) => h,
            None => return Ok(()),
        };
        let player_x = world
            .sprite(handles.player)
            .map(|s| s.position.x)
            .unwrap_or(0.0);

        let x = layout::hazard_spawn_x(&mut self.rng, player_x, constants::CANVAS_WIDTH);
        let position = point2(x, constants::BOMB_SPAWN_Y);
        let bomb = world.create_in_group(handles.bombs, position, textures::BOMB, handles.bomb_size)?;
        world.set_bounce(bomb, vec2(constants::BOMB_BOUNCE, constants::BOMB_BOUNCE));
        world.set_collide_world_bounds(bomb, true);
        let velocity = layout::hazard_velocity(&mut self.rng);
        world.set_velocity(bomb, velocity);
        self.state.bombs_spawned += 1;

        info!(
            "Spawned bomb {} at {:?} with velocity {:?} (player at x: {})",
            bomb, position, velocity, player_x
        );
        self.notifications.broadcast(Event::HazardSpawned {
            entity_id: bomb,
            position,
            velocity,
        });
        Ok(())
    }
}

impl<R: Rng> Scene for GameSession<R> {
    fn preload(&mut self, manifest: &mut AssetManifest) {
        manifest.image(textures::SKY, "assets/sky.png", (800, 600));
        manifest.image(textures::GROUND, "assets/platform.png", (400, 32));
        manifest.image(textures::STAR, "assets/star.png", (24, 22));
        manifest.image(textures::BOMB, "assets/bomb.png", (14, 14));
        self.character.declare_assets(manifest);
    }

    fn create(&mut self, world: &mut World, assets: &AssetCache) -> Result<()> {
        let (bx, by) = constants::BACKGROUND_POSITION;
        world.add_image(
            point2(bx, by),
            textures::SKY,
            assets.texture(textures::SKY)?.frame_size(None),
        );

        //
        //  Platforms
        //

        let ground_size = assets.texture(textures::GROUND)?.frame_size(None);
        let platforms = world.add_static_group();
        for (x, y, scale) in constants::PLATFORM_LAYOUT.iter() {
            let platform =
                world.create_in_group(platforms, point2(*x, *y), textures::GROUND, ground_size)?;
            if !rel_eq(*scale, 1.0) {
                world.set_scale(platform, vec2(*scale, *scale));
            }
        }

        //
        //  Player
        //

        let character_texture = assets
            .texture(self.character.texture_key())
            .with_context(|| format!("Missing texture for character \"{}\"", self.character))?;
        let initial_frame = self.character.initial_frame();
        let player_size = character_texture.frame_size(Some(&initial_frame));
        let (px, py) = constants::PLAYER_START;
        let player = world.add_sprite(
            point2(px, py),
            self.character.texture_key(),
            Some(initial_frame),
            player_size,
        );
        world.set_bounce(
            player,
            vec2(constants::PLAYER_BOUNCE, constants::PLAYER_BOUNCE),
        );
        world.set_collide_world_bounds(player, true);

        for def in self.character.animations() {
            let key = def.key.clone();
            world
                .create_animation(def, character_texture)
                .with_context(|| format!("Unable to create animation \"{}\"", key))?;
        }

        //
        //  Stars & bombs
        //

        let star_size = assets.texture(textures::STAR)?.frame_size(None);
        let stars = world.add_group();
        let mut star_columns = Vec::with_capacity(constants::STAR_COUNT);
        for position in layout::star_row() {
            let star = world.create_in_group(stars, position, textures::STAR, star_size)?;
            world.set_bounce_y(star, layout::star_bounce(&mut self.rng));
            star_columns.push((star, position.x));
        }

        let bomb_size = assets.texture(textures::BOMB)?.frame_size(None);
        let bombs = world.add_group();

        world.add_collider(Target::Sprite(player), Target::Group(platforms));
        world.add_collider(Target::Group(stars), Target::Group(platforms));
        world.add_collider(Target::Group(bombs), Target::Group(platforms));
        world.add_overlap(
            Target::Sprite(player),
            Target::Group(stars),
            Callback::CollectStar,
        );
        world.add_overlap(
            Target::Sprite(player),
            Target::Group(bombs),
            Callback::HitBomb,
        );

        let (tx, ty) = constants::SCORE_TEXT_POSITION;
        let score_text = world.add_text(
            point2(tx, ty),
            &constants::score_label(0),
            TextStyle {
                font_size_px: constants::SCORE_FONT_SIZE_PX,
                fill: constants::SCORE_FILL.to_string(),
            },
        );

        info!(
            "Created scene with character \"{}\", {} stars",
            self.character,
            star_columns.len()
        );

        self.handles = Some(Handles {
            player,
            platforms,
            stars,
            bombs,
            score_text,
            star_columns,
            bomb_size,
        });
        Ok(())
    }

    fn update(&mut self, world: &mut World, keys: &CursorKeys, _dt: Duration) {
        if self.state.game_over {
            return;
        }
        let player = match self.handles.as_ref() {
            Some(h) => h.player,
            None => return,
        };

        let speed = self.character.run_speed();
        if keys.is_down(Key::Left) {
            world.set_velocity_x(player, -speed);
            self.state.facing = Facing::Left;
            Self::play_cycle(world, player, self.character.running_cycle(Facing::Left));
        } else if keys.is_down(Key::Right) {
            world.set_velocity_x(player, speed);
            self.state.facing = Facing::Right;
            Self::play_cycle(world, player, self.character.running_cycle(Facing::Right));
        } else {
            world.set_velocity_x(player, 0.0);
            Self::play_cycle(world, player, self.character.idle_cycle());
        }

        let grounded = world.body(player).map(|b| b.on_ground()).unwrap_or(false);
        if keys.is_down(Key::Up) && grounded {
            world.set_velocity_y(player, constants::JUMP_VELOCITY);
        }
    }

    fn handle_message(&mut self, world: &mut World, message: &Message) -> Result<()> {
        if let Event::Overlap { callback, a, b } = message.event {
            match callback {
                Callback::CollectStar => self.on_star_overlap(world, a, b)?,
                Callback::HitBomb => self.on_hazard_overlap(world, a, b),
            }
        }
        Ok(())
    }
}

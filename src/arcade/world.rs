use std::{collections::BTreeMap, time::Duration};

use cgmath::*;
use log::{debug, warn};
use thiserror::Error;

use super::{
    anims::{AnimationDef, AnimationError, AnimationManager, FrameRef},
    body::Body,
    collision::{self, Collider, Overlap, Target},
    sprite::Sprite,
};
use crate::{
    assets::Texture,
    config::GameConfig,
    event_dispatch::Dispatcher,
    state::{
        constants,
        events::{Callback, Event},
    },
    util::Bounds,
};

// ---------------------------------------------------------------------------------------------------------------------

/// IdVendor vends a new unique id for each sprite, group and text in the world.
pub struct IdVendor {
    current_id: u32,
}

impl Default for IdVendor {
    fn default() -> Self {
        IdVendor {
            current_id: 1000u32,
        }
    }
}

impl IdVendor {
    pub fn next_id(&mut self) -> u32 {
        let r = self.current_id;
        self.current_id += 1;
        r
    }
}

// ---------------------------------------------------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum WorldError {
    #[error("no group with id {0}")]
    UnknownGroup(u32),
}

/// A collection of sprites. Static groups create immovable, gravity-exempt bodies.
#[derive(Debug, Clone)]
pub struct Group {
    pub entity_id: u32,
    pub is_static: bool,
    pub members: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_size_px: u32,
    pub fill: String,
}

/// An on-screen text label. Position is the label's top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub entity_id: u32,
    pub position: Point2<f32>,
    pub content: String,
    pub style: TextStyle,
}

// ---------------------------------------------------------------------------------------------------------------------

/// World hosts a scene: its sprites, groups, labels, registered colliders/overlaps and animations.
/// Stepping it integrates bodies, resolves collisions and reports overlaps as `Event::Overlap`.
pub struct World {
    bounds: Bounds,
    gravity: Vector2<f32>,
    debug: bool,
    paused: bool,
    id_vendor: IdVendor,
    sprites: BTreeMap<u32, Sprite>,
    groups: BTreeMap<u32, Group>,
    texts: BTreeMap<u32, Text>,
    colliders: Vec<Collider>,
    overlaps: Vec<Overlap>,
    anims: AnimationManager,
}

impl World {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            bounds: Bounds::new(
                point2(0.0, 0.0),
                vec2(constants::CANVAS_WIDTH as f32, constants::CANVAS_HEIGHT as f32),
            ),
            gravity: vec2(0.0, config.physics.gravity_y),
            debug: config.physics.debug,
            paused: false,
            id_vendor: IdVendor::default(),
            sprites: BTreeMap::new(),
            groups: BTreeMap::new(),
            texts: BTreeMap::new(),
            colliders: Vec::new(),
            overlaps: Vec::new(),
            anims: AnimationManager::default(),
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

    /// Adds a sprite with no physics body
    pub fn add_image(&mut self, position: Point2<f32>, texture: &str, size: Vector2<f32>) -> u32 {
        let id = self.id_vendor.next_id();
        self.sprites
            .insert(id, Sprite::new(id, position, texture, None, size, None));
        id
    }

    /// Adds a sprite with a dynamic physics body
    pub fn add_sprite(
        &mut self,
        position: Point2<f32>,
        texture: &str,
        frame: Option<FrameRef>,
        size: Vector2<f32>,
    ) -> u32 {
        let id = self.id_vendor.next_id();
        self.sprites.insert(
            id,
            Sprite::new(id, position, texture, frame, size, Some(Body::new_dynamic())),
        );
        id
    }

    pub fn add_group(&mut self) -> u32 {
        self.insert_group(false)
    }

    pub fn add_static_group(&mut self) -> u32 {
        self.insert_group(true)
    }

    fn insert_group(&mut self, is_static: bool) -> u32 {
        let id = self.id_vendor.next_id();
        self.groups.insert(
            id,
            Group {
                entity_id: id,
                is_static,
                members: Vec::new(),
            },
        );
        id
    }

    /// Creates a physics sprite as a member of `group`, with a body matching the group's kind.
    pub fn create_in_group(
        &mut self,
        group: u32,
        position: Point2<f32>,
        texture: &str,
        size: Vector2<f32>,
    ) -> Result<u32, WorldError> {
        let is_static = self
            .groups
            .get(&group)
            .map(|g| g.is_static)
            .ok_or(WorldError::UnknownGroup(group))?;

        let id = self.id_vendor.next_id();
        let body = if is_static {
            Body::new_static()
        } else {
            Body::new_dynamic()
        };
        self.sprites
            .insert(id, Sprite::new(id, position, texture, None, size, Some(body)));
        if let Some(g) = self.groups.get_mut(&group) {
            g.members.push(id);
        }
        Ok(id)
    }

    pub fn add_text(&mut self, position: Point2<f32>, content: &str, style: TextStyle) -> u32 {
        let id = self.id_vendor.next_id();
        self.texts.insert(
            id,
            Text {
                entity_id: id,
                position,
                content: content.to_string(),
                style,
            },
        );
        id
    }

    pub fn set_text(&mut self, text_id: u32, content: &str) {
        if let Some(t) = self.texts.get_mut(&text_id) {
            t.content = content.to_string();
        }
    }

    ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

    pub fn sprite(&self, id: u32) -> Option<&Sprite> {
        self.sprites.get(&id)
    }

    pub fn body(&self, id: u32) -> Option<&Body> {
        self.sprites.get(&id).and_then(|s| s.body.as_ref())
    }

    pub fn text(&self, id: u32) -> Option<&Text> {
        self.texts.get(&id)
    }

    pub fn group_members(&self, group: u32) -> &[u32] {
        self.groups
            .get(&group)
            .map(|g| g.members.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_active(&self, id: u32) -> bool {
        self.sprites.get(&id).map(|s| s.active).unwrap_or(false)
    }

    /// Number of active members of `group`
    pub fn count_active(&self, group: u32) -> usize {
        self.group_members(group)
            .iter()
            .filter(|id| self.is_active(**id))
            .count()
    }

    ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

    fn body_mut(&mut self, id: u32) -> Option<&mut Body> {
        self.sprites.get_mut(&id).and_then(|s| s.body.as_mut())
    }

    pub fn set_position(&mut self, id: u32, position: Point2<f32>) {
        if let Some(s) = self.sprites.get_mut(&id) {
            s.position = position;
        }
    }

    /// Scales the sprite; its body is resized to match.
    pub fn set_scale(&mut self, id: u32, scale: Vector2<f32>) {
        if let Some(s) = self.sprites.get_mut(&id) {
            s.scale = scale;
        }
    }

    pub fn set_velocity(&mut self, id: u32, velocity: Vector2<f32>) {
        if let Some(b) = self.body_mut(id) {
            b.velocity = velocity;
        }
    }

    pub fn set_velocity_x(&mut self, id: u32, vx: f32) {
        if let Some(b) = self.body_mut(id) {
            b.velocity.x = vx;
        }
    }

    pub fn set_velocity_y(&mut self, id: u32, vy: f32) {
        if let Some(b) = self.body_mut(id) {
            b.velocity.y = vy;
        }
    }

    pub fn set_bounce(&mut self, id: u32, bounce: Vector2<f32>) {
        if let Some(b) = self.body_mut(id) {
            b.bounce = bounce;
        }
    }

    pub fn set_bounce_y(&mut self, id: u32, bounce_y: f32) {
        if let Some(b) = self.body_mut(id) {
            b.bounce.y = bounce_y;
        }
    }

    pub fn set_collide_world_bounds(&mut self, id: u32, collide: bool) {
        if let Some(b) = self.body_mut(id) {
            b.collide_world_bounds = collide;
        }
    }

    pub fn set_tint(&mut self, id: u32, tint: u32) {
        if let Some(s) = self.sprites.get_mut(&id) {
            s.tint = Some(tint);
        }
    }

    pub fn set_flip_x(&mut self, id: u32, flip_x: bool) {
        if let Some(s) = self.sprites.get_mut(&id) {
            s.flip_x = flip_x;
        }
    }

    /// Removes a sprite's body from simulation. Optionally deactivates and hides the sprite too.
    pub fn disable_body(&mut self, id: u32, disable_game_object: bool, hide: bool) {
        if let Some(s) = self.sprites.get_mut(&id) {
            if let Some(b) = s.body.as_mut() {
                b.enabled = false;
            }
            if disable_game_object {
                s.active = false;
            }
            if hide {
                s.visible = false;
            }
        }
    }

    /// Returns a sprite's body to simulation. With `reset`, the sprite is moved to `position`
    /// and its velocity and contact state are cleared.
    pub fn enable_body(
        &mut self,
        id: u32,
        reset: bool,
        position: Point2<f32>,
        enable_game_object: bool,
        show: bool,
    ) {
        if let Some(s) = self.sprites.get_mut(&id) {
            if reset {
                s.position = position;
                if let Some(b) = s.body.as_mut() {
                    b.reset();
                }
            }
            if let Some(b) = s.body.as_mut() {
                b.enabled = true;
            }
            if enable_game_object {
                s.active = true;
            }
            if show {
                s.visible = true;
            }
        }
    }

    ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

    pub fn add_collider(&mut self, a: Target, b: Target) {
        self.colliders.push(Collider { a, b });
    }

    pub fn add_overlap(&mut self, a: Target, b: Target, callback: Callback) {
        self.overlaps.push(Overlap { a, b, callback });
    }

    /// Halts simulation for good; every body freezes.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

    pub fn create_animation(
        &mut self,
        def: AnimationDef,
        texture: &Texture,
    ) -> Result<(), AnimationError> {
        self.anims.create(def, texture)
    }

    /// Plays a registered animation on a sprite. Returns false if no such animation exists.
    pub fn play_animation(&mut self, id: u32, key: &str, ignore_if_playing: bool) -> bool {
        let def = match self.anims.get(key) {
            Some(def) => def,
            None => {
                warn!("Sprite {} asked to play unknown animation \"{}\"", id, key);
                return false;
            }
        };
        match self.sprites.get_mut(&id) {
            Some(s) => {
                s.anims.play(def, ignore_if_playing);
                s.frame = s.anims.current_frame(def).cloned();
                true
            }
            None => false,
        }
    }

    ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

    fn resolve(&self, target: Target) -> Vec<u32> {
        match target {
            Target::Sprite(id) => vec![id],
            Target::Group(id) => self.group_members(id).to_vec(),
        }
    }

    /// Advances the simulation by `dt`. Overlaps found are queued on `dispatcher`.
    /// Does nothing while paused.
    pub fn step(&mut self, dt: Duration, dispatcher: &mut Dispatcher) {
        if self.paused {
            return;
        }
        let dt = dt.as_secs_f32();

        let gravity = self.gravity;
        let bounds = self.bounds;
        for sprite in self.sprites.values_mut() {
            if let Some(body) = sprite.body.as_mut() {
                body.touching.clear();
                body.blocked.clear();
            }
            sprite.integrate(dt, gravity);
            sprite.clamp_to_world(&bounds);
        }

        for collider in self.colliders.clone() {
            let a = self.resolve(collider.a);
            let b = self.resolve(collider.b);
            self.collide_one_way(&a, &b);
            self.collide_one_way(&b, &a);
        }

        for overlap in self.overlaps.clone() {
            let a_ids = self.resolve(overlap.a);
            let b_ids = self.resolve(overlap.b);
            for a in a_ids.iter() {
                for b in b_ids.iter() {
                    if a == b {
                        continue;
                    }
                    if let (Some(sa), Some(sb)) = (self.sprites.get(a), self.sprites.get(b)) {
                        if collision::overlaps(sa, sb) {
                            dispatcher.entity_to_entity(
                                *a,
                                *b,
                                Event::Overlap {
                                    callback: overlap.callback,
                                    a: *a,
                                    b: *b,
                                },
                            );
                        }
                    }
                }
            }
        }

        let anims = &self.anims;
        for sprite in self.sprites.values_mut() {
            let def = match sprite.anims.current_key().and_then(|k| anims.get(k)) {
                Some(def) => def,
                None => continue,
            };
            sprite.anims.advance(dt, def);
            sprite.frame = sprite.anims.current_frame(def).cloned();
        }
    }

    /// Pushes each simulated movable sprite in `movers` out of each simulated immovable sprite in `solids`.
    fn collide_one_way(&mut self, movers: &[u32], solids: &[u32]) {
        let solid_bounds = solids
            .iter()
            .filter_map(|id| self.sprites.get(id))
            .filter(|s| s.is_simulated() && s.is_immovable())
            .map(|s| (s.entity_id, s.bounds()))
            .collect::<Vec<_>>();
        if solid_bounds.is_empty() {
            return;
        }

        let debug = self.debug;
        for id in movers {
            let sprite = match self.sprites.get_mut(id) {
                Some(s) if s.is_simulated() && !s.is_immovable() => s,
                _ => continue,
            };
            for (solid_id, solid) in solid_bounds.iter() {
                if let Some(side) = collision::separate(sprite, solid) {
                    if debug {
                        debug!(
                            "Separated sprite {} from {} on its {:?} side, now at {:?}",
                            id, solid_id, side, sprite.position
                        );
                    }
                }
            }
        }
    }
}

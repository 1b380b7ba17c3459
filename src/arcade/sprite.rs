use cgmath::*;

use super::{anims::AnimationState, anims::FrameRef, body::Body};
use crate::util::Bounds;

/// Sprite is a game object in the scene: a textured rect, and optionally a physics body.
/// Images (e.g. the sky) are sprites with no body.
#[derive(Clone, Debug)]
pub struct Sprite {
    pub entity_id: u32,
    pub texture: String,
    pub frame: Option<FrameRef>,
    /// Center of the sprite
    pub position: Point2<f32>,
    /// Unscaled size of the sprite's frame
    pub size: Vector2<f32>,
    pub scale: Vector2<f32>,
    pub body: Option<Body>,
    pub active: bool,
    pub visible: bool,
    pub tint: Option<u32>,
    pub flip_x: bool,
    pub anims: AnimationState,
}

impl Sprite {
    pub fn new(
        entity_id: u32,
        position: Point2<f32>,
        texture: &str,
        frame: Option<FrameRef>,
        size: Vector2<f32>,
        body: Option<Body>,
    ) -> Self {
        Self {
            entity_id,
            texture: texture.to_string(),
            frame,
            position,
            size,
            scale: vec2(1.0, 1.0),
            body,
            active: true,
            visible: true,
            tint: None,
            flip_x: false,
            anims: AnimationState::default(),
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_center(
            self.position,
            vec2(self.size.x * self.scale.x, self.size.y * self.scale.y),
        )
    }

    /// True if this sprite takes part in simulation, collision and overlap tests.
    pub fn is_simulated(&self) -> bool {
        self.active && self.body.map(|b| b.enabled).unwrap_or(false)
    }

    pub fn is_immovable(&self) -> bool {
        self.body.map(|b| b.immovable).unwrap_or(false)
    }

    pub fn velocity(&self) -> Vector2<f32> {
        self.body.map(|b| b.velocity).unwrap_or_else(|| vec2(0.0, 0.0))
    }

    /// Advance position by velocity, applying gravity first.
    pub(crate) fn integrate(&mut self, dt: f32, gravity: Vector2<f32>) {
        if !self.is_simulated() {
            return;
        }
        if let Some(body) = self.body.as_mut() {
            if body.immovable {
                return;
            }
            if body.allow_gravity {
                body.velocity += gravity * dt;
            }
            self.position += body.velocity * dt;
        }
    }

    /// Clamp to the world rect, reflecting velocity by bounce, if world bound collision is enabled.
    pub(crate) fn clamp_to_world(&mut self, world: &Bounds) {
        if !self.is_simulated() {
            return;
        }
        let bounds = self.bounds();
        let half = bounds.extent * 0.5;
        let body = match self.body.as_mut() {
            Some(body) if body.collide_world_bounds && !body.immovable => body,
            _ => return,
        };

        if bounds.left() < world.left() {
            self.position.x = world.left() + half.x;
            if body.velocity.x < 0.0 {
                body.reflect_x();
            }
            body.blocked.left = true;
        } else if bounds.right() > world.right() {
            self.position.x = world.right() - half.x;
            if body.velocity.x > 0.0 {
                body.reflect_x();
            }
            body.blocked.right = true;
        }

        if bounds.top() < world.top() {
            self.position.y = world.top() + half.y;
            if body.velocity.y < 0.0 {
                body.reflect_y();
            }
            body.blocked.up = true;
        } else if bounds.bottom() > world.bottom() {
            self.position.y = world.bottom() - half.y;
            if body.velocity.y > 0.0 {
                body.reflect_y();
            }
            body.blocked.down = true;
        }
    }
}

#[cfg(test)]
mod sprite_tests {
    use super::*;

    fn falling_sprite() -> Sprite {
        Sprite::new(
            1,
            point2(100.0, 100.0),
            "star",
            None,
            vec2(24.0, 22.0),
            Some(Body::new_dynamic()),
        )
    }

    #[test]
    fn gravity_accelerates_then_moves() {
        let mut sprite = falling_sprite();
        sprite.integrate(0.5, vec2(0.0, 300.0));
        assert_eq!(sprite.velocity(), vec2(0.0, 150.0));
        assert_eq!(sprite.position, point2(100.0, 175.0));
    }

    #[test]
    fn inactive_and_static_sprites_do_not_move() {
        let mut sprite = falling_sprite();
        sprite.active = false;
        sprite.integrate(1.0, vec2(0.0, 300.0));
        assert_eq!(sprite.position, point2(100.0, 100.0));

        let mut platform = Sprite::new(
            2,
            point2(0.0, 0.0),
            "ground",
            None,
            vec2(400.0, 32.0),
            Some(Body::new_static()),
        );
        platform.integrate(1.0, vec2(0.0, 300.0));
        assert_eq!(platform.position, point2(0.0, 0.0));
    }

    #[test]
    fn world_bounds_clamp_and_bounce() {
        let world = Bounds::new(point2(0.0, 0.0), vec2(800.0, 600.0));
        let mut sprite = falling_sprite();
        if let Some(body) = sprite.body.as_mut() {
            body.collide_world_bounds = true;
            body.bounce = vec2(1.0, 1.0);
            body.velocity = vec2(-200.0, 20.0);
        }
        sprite.position = point2(-5.0, 300.0);
        sprite.clamp_to_world(&world);

        assert_eq!(sprite.position.x, 12.0);
        assert_eq!(sprite.velocity().x, 200.0);
        assert!(sprite.body.map(|b| b.blocked.left).unwrap_or(false));
    }

    #[test]
    fn scale_affects_bounds() {
        let mut sprite = falling_sprite();
        sprite.size = vec2(400.0, 32.0);
        sprite.position = point2(400.0, 568.0);
        sprite.scale = vec2(2.0, 2.0);
        let b = sprite.bounds();
        assert_eq!(b.left(), 0.0);
        assert_eq!(b.right(), 800.0);
        assert_eq!(b.top(), 536.0);
    }
}

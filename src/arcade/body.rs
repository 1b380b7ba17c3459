use cgmath::*;

/// Per-side contact flags. `touching` flags are set by body-vs-body separation,
/// `blocked` flags by the world bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Contacts {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Contacts {
    pub fn none(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }

    pub fn clear(&mut self) {
        *self = Contacts::default();
    }
}

// ---------------------------------------------------------------------------------------------------------------------

/// Reflected vertical speeds below this are treated as coming to rest, so a body sitting on a
/// platform reports ground contact on every step rather than micro-bouncing.
pub const REST_SPEED: f32 = 15.0;

/// Physics state for a sprite. Position and size live on the owning Sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub velocity: Vector2<f32>,
    pub bounce: Vector2<f32>,
    pub allow_gravity: bool,
    pub immovable: bool,
    pub collide_world_bounds: bool,
    pub enabled: bool,
    pub touching: Contacts,
    pub blocked: Contacts,
}

impl Body {
    pub fn new_dynamic() -> Self {
        Self {
            velocity: vec2(0.0, 0.0),
            bounce: vec2(0.0, 0.0),
            allow_gravity: true,
            immovable: false,
            collide_world_bounds: false,
            enabled: true,
            touching: Contacts::default(),
            blocked: Contacts::default(),
        }
    }

    pub fn new_static() -> Self {
        Self {
            allow_gravity: false,
            immovable: true,
            ..Self::new_dynamic()
        }
    }

    /// The ground-contact flag: true when the most recent step separated this body
    /// from a solid surface beneath it.
    pub fn on_ground(&self) -> bool {
        self.touching.down
    }

    /// Zeroes velocity and contact state, as when a body is re-enabled at a new position.
    pub fn reset(&mut self) {
        self.velocity = vec2(0.0, 0.0);
        self.touching.clear();
        self.blocked.clear();
    }

    pub(crate) fn reflect_x(&mut self) {
        self.velocity.x = -self.velocity.x * self.bounce.x;
    }

    pub(crate) fn reflect_y(&mut self) {
        self.velocity.y = -self.velocity.y * self.bounce.y;
        if self.velocity.y.abs() < REST_SPEED {
            self.velocity.y = 0.0;
        }
    }
}

#[cfg(test)]
mod body_tests {
    use super::*;

    #[test]
    fn reflection_scales_by_bounce() {
        let mut body = Body::new_dynamic();
        body.bounce = vec2(1.0, 0.5);
        body.velocity = vec2(100.0, 200.0);
        body.reflect_x();
        body.reflect_y();
        assert_eq!(body.velocity, vec2(-100.0, -100.0));
    }

    #[test]
    fn slow_reflection_comes_to_rest() {
        let mut body = Body::new_dynamic();
        body.bounce = vec2(0.2, 0.2);
        body.velocity = vec2(0.0, 50.0);
        body.reflect_y();
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn slow_horizontal_reflection_keeps_its_speed() {
        let mut body = Body::new_dynamic();
        body.bounce = vec2(1.0, 1.0);
        body.velocity = vec2(10.0, 0.0);
        body.reflect_x();
        assert_eq!(body.velocity.x, -10.0);
    }

    #[test]
    fn reset_clears_motion_and_contacts() {
        let mut body = Body::new_dynamic();
        body.velocity = vec2(3.0, 4.0);
        body.touching.down = true;
        body.blocked.left = true;
        body.reset();
        assert_eq!(body.velocity, vec2(0.0, 0.0));
        assert!(body.touching.none());
        assert!(body.blocked.none());
        assert!(!body.on_ground());
    }
}

use crate::{state::events::Callback, util::Bounds};

use super::sprite::Sprite;

/// One side of a collider or overlap registration: a single sprite, or every member of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Sprite(u32),
    Group(u32),
}

/// A registered solid interaction: movable bodies in one target are pushed out of
/// immovable bodies in the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collider {
    pub a: Target,
    pub b: Target,
}

/// A registered overlap test. Intersections are reported, not resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    pub a: Target,
    pub b: Target,
    pub callback: Callback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// Pushes a movable sprite out of an immovable rect along the axis of least penetration.
/// Returns the side of the sprite which made contact, or None if they don't overlap.
/// The contacted side's `touching` flag is set and velocity into the surface is reflected by bounce.
pub fn separate(sprite: &mut Sprite, solid: &Bounds) -> Option<Side> {
    let bounds = sprite.bounds();
    if !bounds.intersects(solid, false) {
        return None;
    }

    let overlap_x = (bounds.right() - solid.left()).min(solid.right() - bounds.left());
    let overlap_y = (bounds.bottom() - solid.top()).min(solid.bottom() - bounds.top());
    let center = bounds.center();
    let solid_center = solid.center();
    let body = sprite.body.as_mut()?;

    let side = if overlap_y <= overlap_x {
        if center.y < solid_center.y {
            sprite.position.y -= bounds.bottom() - solid.top();
            body.touching.down = true;
            if body.velocity.y > 0.0 {
                body.reflect_y();
            }
            Side::Bottom
        } else {
            sprite.position.y += solid.bottom() - bounds.top();
            body.touching.up = true;
            if body.velocity.y < 0.0 {
                body.reflect_y();
            }
            Side::Top
        }
    } else if center.x < solid_center.x {
        sprite.position.x -= bounds.right() - solid.left();
        body.touching.right = true;
        if body.velocity.x > 0.0 {
            body.reflect_x();
        }
        Side::Right
    } else {
        sprite.position.x += solid.right() - bounds.left();
        body.touching.left = true;
        if body.velocity.x < 0.0 {
            body.reflect_x();
        }
        Side::Left
    };

    Some(side)
}

/// True if two simulated sprites strictly overlap.
pub fn overlaps(a: &Sprite, b: &Sprite) -> bool {
    a.is_simulated() && b.is_simulated() && a.bounds().intersects(&b.bounds(), false)
}

#[cfg(test)]
mod collision_tests {
    use super::*;
    use crate::arcade::body::Body;
    use cgmath::*;

    fn ground() -> Bounds {
        Bounds::from_center(point2(400.0, 568.0), vec2(800.0, 64.0))
    }

    fn player_at(x: f32, y: f32, velocity: Vector2<f32>) -> Sprite {
        let mut body = Body::new_dynamic();
        body.velocity = velocity;
        body.bounce = vec2(0.2, 0.2);
        Sprite::new(1, point2(x, y), "dude", None, vec2(32.0, 48.0), Some(body))
    }

    #[test]
    fn landing_sets_ground_contact() {
        // bottom edge at 540, 4px into the ground
        let mut player = player_at(100.0, 516.0, vec2(0.0, 200.0));
        assert_eq!(separate(&mut player, &ground()), Some(Side::Bottom));
        assert_eq!(player.position.y, 512.0);
        let body = player.body.unwrap();
        assert!(body.on_ground());
        assert_eq!(body.velocity.y, -40.0);
    }

    #[test]
    fn resting_contact_zeroes_small_bounce() {
        let mut player = player_at(100.0, 512.1, vec2(0.0, 5.0));
        assert_eq!(separate(&mut player, &ground()), Some(Side::Bottom));
        let body = player.body.unwrap();
        assert!(body.on_ground());
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn side_hit_resolves_horizontally() {
        let ledge = Bounds::from_center(point2(600.0, 400.0), vec2(400.0, 32.0));
        // right edge 2px into the ledge's left side, vertically centered on it
        let mut player = player_at(386.0, 400.0, vec2(160.0, 0.0));
        assert_eq!(separate(&mut player, &ledge), Some(Side::Right));
        assert_eq!(player.position.x, 384.0);
        assert!(player.body.unwrap().touching.right);
        assert!(!player.body.unwrap().on_ground());
    }

    #[test]
    fn head_bump_resolves_downward() {
        let ledge = Bounds::from_center(point2(600.0, 400.0), vec2(400.0, 32.0));
        // top edge at 414, 2px into the ledge's underside
        let mut player = player_at(600.0, 438.0, vec2(0.0, -300.0));
        assert_eq!(separate(&mut player, &ledge), Some(Side::Top));
        assert_eq!(player.position.y, 440.0);
        assert!(player.body.unwrap().touching.up);
    }

    #[test]
    fn disjoint_rects_are_untouched() {
        let mut player = player_at(100.0, 100.0, vec2(0.0, 100.0));
        assert_eq!(separate(&mut player, &ground()), None);
        assert_eq!(player.position, point2(100.0, 100.0));
    }

    #[test]
    fn overlap_requires_both_simulated() {
        let a = player_at(100.0, 100.0, vec2(0.0, 0.0));
        let mut b = player_at(110.0, 110.0, vec2(0.0, 0.0));
        assert!(overlaps(&a, &b));
        b.active = false;
        assert!(!overlaps(&a, &b));
    }
}

use cgmath::*;

pub fn rel_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < f32::EPSILON
}

// ---------------------------------------------------------------------------------------------------------------------

/// An axis-aligned rect in screen space. Y grows downward, so `origin` is the top-left corner
/// and `bottom()` is numerically larger than `top()`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub origin: Point2<f32>,
    pub extent: Vector2<f32>,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            origin: point2(0.0, 0.0),
            extent: vec2(0.0, 0.0),
        }
    }
}

impl Bounds {
    pub fn new(origin: Point2<f32>, extent: Vector2<f32>) -> Self {
        Self { origin, extent }
    }

    /// Creates a Bounds of `extent` size centered on `center`
    pub fn from_center(center: Point2<f32>, extent: Vector2<f32>) -> Self {
        Self {
            origin: point2(center.x - extent.x * 0.5, center.y - extent.y * 0.5),
            extent,
        }
    }

    pub fn left(&self) -> f32 {
        self.origin.x
    }
    pub fn right(&self) -> f32 {
        self.origin.x + self.extent.x
    }
    pub fn top(&self) -> f32 {
        self.origin.y
    }
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.extent.y
    }
    pub fn width(&self) -> f32 {
        self.extent.x
    }
    pub fn height(&self) -> f32 {
        self.extent.y
    }
    pub fn center(&self) -> Point2<f32> {
        point2(
            self.origin.x + self.extent.x * 0.5,
            self.origin.y + self.extent.y * 0.5,
        )
    }

    /// Returns true if this rect overlaps `other`.
    /// contact: If true, rects with touching edges count as intersecting, not just overlapping ones.
    pub fn intersects(&self, other: &Bounds, contact: bool) -> bool {
        let (x_overlap, y_overlap) = if contact {
            (
                self.left() <= other.right() && self.right() >= other.left(),
                self.top() <= other.bottom() && self.bottom() >= other.top(),
            )
        } else {
            (
                self.left() < other.right() && self.right() > other.left(),
                self.top() < other.bottom() && self.bottom() > other.top(),
            )
        };
        x_overlap && y_overlap
    }
}

#[cfg(test)]
mod bounds_tests {
    use super::*;

    #[test]
    fn from_center_works() {
        let b = Bounds::from_center(point2(400.0, 568.0), vec2(800.0, 64.0));
        assert!(rel_eq(b.left(), 0.0));
        assert!(rel_eq(b.right(), 800.0));
        assert!(rel_eq(b.top(), 536.0));
        assert!(rel_eq(b.bottom(), 600.0));
        assert_eq!(b.center(), point2(400.0, 568.0));
    }

    #[test]
    fn intersection_respects_contact_flag() {
        let a = Bounds::new(point2(0.0, 0.0), vec2(10.0, 10.0));
        let touching = Bounds::new(point2(10.0, 0.0), vec2(10.0, 10.0));
        let overlapping = Bounds::new(point2(5.0, 5.0), vec2(10.0, 10.0));
        let apart = Bounds::new(point2(20.0, 20.0), vec2(1.0, 1.0));

        assert!(!a.intersects(&touching, false));
        assert!(a.intersects(&touching, true));
        assert!(a.intersects(&overlapping, false));
        assert!(!a.intersects(&apart, true));
    }
}

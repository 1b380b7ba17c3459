use cgmath::*;

/// Identifies which scene handler an overlap pair was registered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Callback {
    /// Player touched a star
    CollectStar,
    /// Player touched a bomb
    HitBomb,
}

/// An Event payload for Message
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Raised by the physics step when two sprites registered for overlap intersect.
    /// `a` and `b` are given in the order the overlap was registered.
    Overlap { callback: Callback, a: u32, b: u32 },

    /// Sent by the session each time the score changes
    ScoreChanged { score: u32 },

    /// Sent by the session when the last active star was collected and the row was reactivated
    StarsReplenished { count: usize },

    /// Sent by the session when a new bomb enters play
    HazardSpawned {
        entity_id: u32,
        position: Point2<f32>,
        velocity: Vector2<f32>,
    },

    /// Sent by the session when the player hits a bomb. Terminal.
    GameOver { score: u32 },
}

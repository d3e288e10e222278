//! Arena edges and what happens to entities that cross them
//!
//! World coordinates put the playfield at x in [0, width] and y in [-height, 0]:
//! y grows upward, so the top edge is y = 0 and the screen row is -y.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How an entity reacts to crossing an arena edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EdgePolicy {
    /// Pass through; the entity handles going off-screen itself (or never does)
    #[default]
    None,
    /// Clamp to the edge and reflect the perpendicular velocity component
    Bounce,
    /// Destroy the entity
    Kill,
    /// Reappear at the opposite edge
    Warp,
}

/// One of the four arena edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Left,
    Top,
    Right,
    Bottom,
}

/// Arena bounds, injected by the session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Check if a point is inside the playfield (edges included)
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y <= 0.0 && point.y >= -self.height
    }
}

/// Result of running the edge checks for one entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeOutcome {
    /// Entity survives with (possibly corrected) position and velocity
    Stay { position: Vec2, velocity: Vec2 },
    /// Entity must be destroyed
    Killed {
        /// The bottom edge was one of the crossed edges
        fell_off_bottom: bool,
    },
}

/// Apply an edge policy to a position/velocity pair
///
/// The four edges are checked independently, left, top, right, bottom, each
/// against the position produced by the previous checks. `lower_edge` replaces
/// the arena height as the bottom distance when set.
pub fn apply_edges(
    mut position: Vec2,
    mut velocity: Vec2,
    policy: EdgePolicy,
    lower_edge: Option<f32>,
    arena: &Arena,
) -> EdgeOutcome {
    let bottom = lower_edge.unwrap_or(arena.height);
    let mut killed = false;
    let mut fell_off_bottom = false;

    if position.x < 0.0 {
        match policy {
            EdgePolicy::Kill => killed = true,
            EdgePolicy::Bounce => {
                position.x = 0.0;
                velocity.x = -velocity.x;
            }
            EdgePolicy::Warp => position.x = arena.width,
            EdgePolicy::None => {}
        }
    }

    if position.y > 0.0 {
        match policy {
            EdgePolicy::Kill => killed = true,
            EdgePolicy::Bounce => {
                position.y = 0.0;
                velocity.y = -velocity.y;
            }
            EdgePolicy::Warp => position.y = -arena.height,
            EdgePolicy::None => {}
        }
    }

    if position.x > arena.width {
        match policy {
            EdgePolicy::Kill => killed = true,
            EdgePolicy::Bounce => {
                position.x = arena.width;
                velocity.x = -velocity.x;
            }
            EdgePolicy::Warp => position.x = 0.0,
            EdgePolicy::None => {}
        }
    }

    if position.y < -bottom {
        match policy {
            EdgePolicy::Kill => {
                killed = true;
                fell_off_bottom = true;
            }
            EdgePolicy::Bounce => {
                position.y = -bottom;
                velocity.y = -velocity.y;
            }
            EdgePolicy::Warp => position.y = 0.0,
            EdgePolicy::None => {}
        }
    }

    if killed {
        EdgeOutcome::Killed { fell_off_bottom }
    } else {
        EdgeOutcome::Stay { position, velocity }
    }
}

/// Which edges a point lies beyond (for diagnostics)
pub fn crossed_edges(position: Vec2, lower_edge: Option<f32>, arena: &Arena) -> Vec<Edge> {
    let bottom = lower_edge.unwrap_or(arena.height);
    let mut edges = Vec::new();
    if position.x < 0.0 {
        edges.push(Edge::Left);
    }
    if position.y > 0.0 {
        edges.push(Edge::Top);
    }
    if position.x > arena.width {
        edges.push(Edge::Right);
    }
    if position.y < -bottom {
        edges.push(Edge::Bottom);
    }
    edges
}

//! Entity presets: fluffballs, food, car wheels, cats, attachments, particles
//!
//! Variants are data, not types. Each preset returns an [`EntityConfig`]
//! that callers can tweak before spawning.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::behavior::{Behavior, CompanionBrain};
use super::boundary::EdgePolicy;
use super::entity::{EntityConfig, EntityId};
use crate::consts::*;

/// Fluffball fur colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FluffColor {
    Red,
    Yellow,
    Green,
    Turquoise,
    Blue,
    Purple,
}

impl FluffColor {
    pub const ALL: [FluffColor; 6] = [
        FluffColor::Red,
        FluffColor::Yellow,
        FluffColor::Green,
        FluffColor::Turquoise,
        FluffColor::Blue,
        FluffColor::Purple,
    ];

    /// Colours a fluffball gets when none was chosen
    pub const RANDOM_POOL: [FluffColor; 4] = [
        FluffColor::Blue,
        FluffColor::Purple,
        FluffColor::Turquoise,
        FluffColor::Red,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FluffColor::Red => "red",
            FluffColor::Yellow => "yellow",
            FluffColor::Green => "green",
            FluffColor::Turquoise => "turquoise",
            FluffColor::Blue => "blue",
            FluffColor::Purple => "purple",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(FluffColor::Red),
            "yellow" => Some(FluffColor::Yellow),
            "green" => Some(FluffColor::Green),
            "turquoise" => Some(FluffColor::Turquoise),
            "blue" => Some(FluffColor::Blue),
            "purple" => Some(FluffColor::Purple),
            _ => None,
        }
    }
}

/// Opaque visual identity handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visual {
    /// Filled square in a flat colour
    Plain { color: [u8; 3] },
    Fluffball(FluffColor),
    Donut,
    Cookie,
    CarWheel,
    Cat,
    /// Streak particle
    Spark { color: [u8; 3] },
    /// Round particle
    Crumb { color: [u8; 3] },
    /// Halo around a happy cat
    Glow,
    /// "Zzz" bubble over a sleeping cat
    Snooze,
}

impl Default for Visual {
    fn default() -> Self {
        Visual::Plain {
            color: [255, 0, 255],
        }
    }
}

/// The two foods a fluffball can eat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoodKind {
    Donut,
    Cookie,
}

impl FoodKind {
    pub fn radius(&self) -> f32 {
        match self {
            FoodKind::Donut => DONUT_RADIUS,
            FoodKind::Cookie => COOKIE_RADIUS,
        }
    }

    /// Colour of the crumbs left when eaten
    pub fn crumb_color(&self) -> [u8; 3] {
        match self {
            FoodKind::Donut => [210, 110, 210],
            FoodKind::Cookie => [220, 160, 40],
        }
    }

    pub fn visual(&self) -> Visual {
        match self {
            FoodKind::Donut => Visual::Donut,
            FoodKind::Cookie => Visual::Cookie,
        }
    }

    /// Food kind of a visual tag, if it is food
    pub fn of(visual: Visual) -> Option<Self> {
        match visual {
            Visual::Donut => Some(FoodKind::Donut),
            Visual::Cookie => Some(FoodKind::Cookie),
            _ => None,
        }
    }
}

/// Particle look; physics is identical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Spark,
    Crumb,
}

impl ParticleKind {
    pub fn visual(&self, color: [u8; 3]) -> Visual {
        match self {
            ParticleKind::Spark => Visual::Spark { color },
            ParticleKind::Crumb => Visual::Crumb { color },
        }
    }

    /// Per-channel colour jitter
    pub fn color_jitter(&self) -> i16 {
        match self {
            ParticleKind::Spark => 50,
            ParticleKind::Crumb => 20,
        }
    }
}

/// Player-controlled fluffball; bounces off every edge
pub fn fluffball(position: Vec2, color: FluffColor) -> EntityConfig {
    EntityConfig {
        position,
        radius: FLUFFBALL_RADIUS,
        edge_policy: EdgePolicy::Bounce,
        layer: 2,
        visual: Visual::Fluffball(color),
        ..Default::default()
    }
}

pub fn food(kind: FoodKind, position: Vec2) -> EntityConfig {
    EntityConfig {
        position,
        radius: kind.radius(),
        is_static: true,
        visual: kind.visual(),
        ..Default::default()
    }
}

pub fn car_wheel(position: Vec2) -> EntityConfig {
    EntityConfig {
        position,
        radius: CAR_WHEEL_RADIUS,
        is_static: true,
        visual: Visual::CarWheel,
        ..Default::default()
    }
}

/// Wandering cat that wraps around the screen
pub fn cat(position: Vec2) -> EntityConfig {
    EntityConfig {
        position,
        radius: CAT_RADIUS,
        edge_policy: EdgePolicy::Warp,
        layer: 1,
        visual: Visual::Cat,
        behavior: Behavior::Companion(CompanionBrain::new()),
        ..Default::default()
    }
}

/// Decoration glued to `boss` for `duration` seconds
pub fn attachment(boss: EntityId, position: Vec2, visual: Visual, duration: f32) -> EntityConfig {
    EntityConfig {
        position,
        boss: Some(boss),
        kill_with_boss: true,
        sticky_with_boss: true,
        max_age: Some(duration),
        layer: 3,
        visual,
        ..Default::default()
    }
}

pub fn glow(boss: EntityId, position: Vec2, duration: f32) -> EntityConfig {
    attachment(boss, position, Visual::Glow, duration)
}

pub fn snooze(boss: EntityId, position: Vec2, duration: f32) -> EntityConfig {
    attachment(boss, position, Visual::Snooze, duration)
}

/// Short-lived particle, killed at any edge
#[allow(clippy::too_many_arguments)]
pub fn particle(
    kind: ParticleKind,
    position: Vec2,
    velocity: Vec2,
    angle: f32,
    color: [u8; 3],
    max_age: f32,
    gravity: Vec2,
    damping: f32,
) -> EntityConfig {
    EntityConfig {
        position,
        velocity,
        angle,
        radius: PARTICLE_RADIUS,
        max_age: Some(max_age),
        edge_policy: EdgePolicy::Kill,
        layer: 2,
        visual: kind.visual(color),
        behavior: Behavior::Ballistic { gravity, damping },
        ..Default::default()
    }
}

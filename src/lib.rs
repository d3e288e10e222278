//! Fluffball - a small arcade game about a very hungry ball of fluff
//!
//! Core modules:
//! - `sim`: Entity simulation (integration, edges, bosses, collisions, explosions)
//! - `settings`: Difficulty, arena size and player setup

pub mod settings;
pub mod sim;

pub use settings::{Difficulty, Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default frame rate the simulation is tuned for
    pub const DEFAULT_FPS: u32 = 30;
    /// Max simulation steps per rendered frame (avoid spiral of death)
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Entity defaults (used when a preset does not override them)
    pub const DEFAULT_MASS: f32 = 15.0;
    pub const DEFAULT_RADIUS: f32 = 5.0;
    pub const DEFAULT_DAMAGE: f32 = 10.0;
    pub const DEFAULT_HITPOINTS: i32 = 100;
    pub const DEFAULT_LAYER: u8 = 4;

    /// Sprite radii (half the sprite size)
    pub const FLUFFBALL_RADIUS: f32 = 50.0;
    pub const DONUT_RADIUS: f32 = 50.0;
    pub const COOKIE_RADIUS: f32 = 40.0;
    pub const CAR_WHEEL_RADIUS: f32 = 50.0;
    pub const CAT_RADIUS: f32 = 62.0;
    pub const PARTICLE_RADIUS: f32 = 5.0;

    /// Velocity added per frame for one held direction
    pub const PLAYER_IMPULSE: f32 = 10.0;
    /// Autopilot stops accelerating toward food above this closing speed
    pub const IDLE_CRUISE_SPEED: f32 = 180.0;

    /// Car wheel rebound: velocity multiplier and push-out distance
    pub const HAZARD_REBOUND: f32 = -0.8;
    pub const HAZARD_PUSH: f32 = 25.0;
    /// Car wheel bumps allowed before the game is lost
    pub const MAX_COLLISIONS: u32 = 50;

    /// Cat fling speed range
    pub const FLING_MIN_SPEED: f32 = 150.0;
    pub const FLING_MAX_SPEED: f32 = 350.0;

    /// Donuts and cookies placed per session (each)
    pub const FOOD_PER_KIND: usize = 10;
    /// Seconds between winning/losing and the session ending
    pub const EXIT_DELAY: f32 = 3.0;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(degrees: f32) -> f32 {
    degrees.rem_euclid(360.0)
}

/// Unit vector pointing at `degrees` (0° = right, counter-clockwise)
#[inline]
pub fn from_degrees(degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians())
}

/// Rotate a vector counter-clockwise by `degrees`
#[inline]
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    from_degrees(degrees).rotate(v)
}

/// Heading in degrees of the line from `from` to `to`, in [0, 360)
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    normalize_degrees(d.y.atan2(d.x).to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert!((normalize_degrees(370.0) - 10.0).abs() < 1e-4);
        assert!((normalize_degrees(-90.0) - 270.0).abs() < 1e-4);
        assert_eq!(normalize_degrees(0.0), 0.0);
    }

    #[test]
    fn test_rotate_degrees() {
        let v = rotate_degrees(Vec2::new(1.0, 0.0), 90.0);
        assert!(v.x.abs() < 1e-5);
        assert!((v.y - 1.0).abs() < 1e-5);

        let v = rotate_degrees(Vec2::new(3.0, 0.0), 180.0);
        assert!((v.x + 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_angle_to() {
        let a = angle_to(Vec2::ZERO, Vec2::new(0.0, 5.0));
        assert!((a - 90.0).abs() < 1e-4);
        let a = angle_to(Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0));
        assert!((a - 180.0).abs() < 1e-4);
    }
}

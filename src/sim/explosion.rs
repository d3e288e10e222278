//! Particle bursts (sparks and crumbs)

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{EntityConfig, EntityError, EntityId};
use super::kinds::{self, ParticleKind};
use super::registry::Registry;
use crate::from_degrees;

/// Parameters for one burst of particles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub origin: Vec2,
    pub kind: ParticleKind,
    /// Particle count range (inclusive)
    pub min_count: u32,
    pub max_count: u32,
    /// Launch speed range in pixels per second
    pub min_speed: f32,
    pub max_speed: f32,
    /// Launch direction range in degrees
    pub min_angle: f32,
    pub max_angle: f32,
    /// Base colour, jittered per particle
    pub color: [u8; 3],
    /// Particles live for a random time in [0, max_duration)
    pub max_duration: f32,
    /// Downward velocity added every frame
    pub gravity: f32,
    /// Velocity multiplier applied every frame after gravity
    pub damping: f32,
}

impl Default for Explosion {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            kind: ParticleKind::Spark,
            min_count: 5,
            max_count: 20,
            min_speed: 20.0,
            max_speed: 150.0,
            min_angle: 0.0,
            max_angle: 360.0,
            color: [255, 255, 0],
            max_duration: 2.5,
            gravity: 3.7,
            damping: 1.0,
        }
    }
}

impl Explosion {
    pub fn new(origin: Vec2, kind: ParticleKind) -> Self {
        Self {
            origin,
            kind,
            ..Default::default()
        }
    }

    /// Roll the particle configs for this burst without spawning them
    pub fn particles(&self, rng: &mut Pcg32) -> Vec<EntityConfig> {
        let count = rng.random_range(
            self.min_count.min(self.max_count)..=self.min_count.max(self.max_count),
        );
        let gravity = Vec2::new(0.0, -self.gravity);
        let jitter = self.kind.color_jitter();

        (0..count)
            .map(|_| {
                let angle = random_between(rng, self.min_angle, self.max_angle);
                let speed = random_between(rng, self.min_speed, self.max_speed);
                let max_age = rng.random::<f32>() * self.max_duration;
                let color = self.color.map(|c| jitter_channel(rng, c, jitter));
                kinds::particle(
                    self.kind,
                    self.origin,
                    from_degrees(angle) * speed,
                    angle,
                    color,
                    max_age,
                    gravity,
                    self.damping,
                )
            })
            .collect()
    }

    /// Spawn the burst into the registry; returns the new ids
    pub fn detonate(
        &self,
        registry: &mut Registry,
        rng: &mut Pcg32,
    ) -> Result<Vec<EntityId>, EntityError> {
        let ids = self
            .particles(rng)
            .into_iter()
            .map(|config| registry.spawn(config))
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "{:?} burst at ({:.0}, {:.0}): {} particles",
            self.kind,
            self.origin.x,
            self.origin.y,
            ids.len()
        );
        Ok(ids)
    }
}

fn random_between(rng: &mut Pcg32, a: f32, b: f32) -> f32 {
    if a == b {
        return a;
    }
    rng.random_range(a.min(b)..=a.max(b))
}

fn jitter_channel(rng: &mut Pcg32, channel: u8, delta: i16) -> u8 {
    let shifted = channel as i16 + rng.random_range(-delta..=delta);
    shifted.clamp(0, 255) as u8
}

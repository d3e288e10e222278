//! The simulated entity and its per-frame update
//!
//! Every moving thing in the game (fluffballs, food, car wheels, cats, crumbs
//! and sparks) is an [`Entity`]. Variants differ only in their
//! [`EntityConfig`] preset: visual tag, behavior, edge policy and boss flags.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::behavior::Behavior;
use super::boundary::{Arena, EdgeOutcome, EdgePolicy, apply_edges, crossed_edges};
use super::kinds::Visual;
use crate::consts::*;

/// Unique, monotonically assigned entity identifier
pub type EntityId = u32;

/// Construction-time configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum EntityError {
    #[error("entity mass must be positive, got {0}")]
    NonPositiveMass(f32),
    #[error("entity radius must be a non-negative number, got {0}")]
    NegativeRadius(f32),
}

/// Why an entity was destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Hitpoints reached zero
    Hitpoints,
    /// Lived past `max_age`
    Age,
    /// Traveled past `max_distance`
    Distance,
    /// Boss vanished and `kill_with_boss` is set
    BossGone,
    /// Crossed an edge with the Kill policy
    Edge { fell_off_bottom: bool },
    /// Removed by the session (eaten, reset, ...)
    Killed,
}

/// What the registry knows about an entity's boss this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BossStatus {
    /// No boss configured
    Unbound,
    /// Boss id is set but no longer in the registry
    Missing,
    /// Boss is alive at this position
    Present(Vec2),
}

/// Registry changes requested during an update pass, applied after it
#[derive(Debug, Default)]
pub struct Deferred {
    /// New entities, inserted after the pass
    pub spawns: Vec<EntityConfig>,
    /// Attachments to remove: those following the boss id that carry the visual
    pub dismissals: Vec<(EntityId, Visual)>,
}

/// Everything an entity may touch while advancing, besides itself
pub struct StepContext<'a> {
    pub arena: Arena,
    pub boss: BossStatus,
    pub rng: &'a mut Pcg32,
    pub deferred: &'a mut Deferred,
}

impl<'a> StepContext<'a> {
    pub fn new(arena: Arena, rng: &'a mut Pcg32, deferred: &'a mut Deferred) -> Self {
        Self {
            arena,
            boss: BossStatus::Unbound,
            rng,
            deferred,
        }
    }

    pub fn with_boss(mut self, boss: BossStatus) -> Self {
        self.boss = boss;
        self
    }
}

/// Immutable parameter set an entity is created from
///
/// Build with struct update syntax over [`EntityConfig::default`] or start
/// from one of the presets in [`super::kinds`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityConfig {
    /// Start position (world coordinates, playfield y is negative)
    pub position: Vec2,
    /// Start velocity in pixels per second
    pub velocity: Vec2,
    /// Must be positive (default 15)
    pub mass: f32,
    /// Disc radius for collisions (default 5)
    pub radius: f32,
    /// Damage dealt on contact (default 10)
    pub damage: f32,
    /// Starting and maximum hitpoints (default 100)
    pub hitpoints: i32,
    /// Seconds before the entity expires
    pub max_age: Option<f32>,
    /// Distance before the entity expires
    pub max_distance: Option<f32>,
    pub edge_policy: EdgePolicy,
    /// Custom bottom edge distance (defaults to the arena height)
    pub lower_edge: Option<f32>,
    /// Never pushed around by collisions
    pub is_static: bool,
    pub boss: Option<EntityId>,
    pub kill_with_boss: bool,
    pub sticky_with_boss: bool,
    /// Facing in degrees
    pub angle: f32,
    /// Draw order hint (higher draws on top)
    pub layer: u8,
    pub visual: Visual,
    pub behavior: Behavior,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            mass: DEFAULT_MASS,
            radius: DEFAULT_RADIUS,
            damage: DEFAULT_DAMAGE,
            hitpoints: DEFAULT_HITPOINTS,
            max_age: None,
            max_distance: None,
            edge_policy: EdgePolicy::None,
            lower_edge: None,
            is_static: false,
            boss: None,
            kill_with_boss: false,
            sticky_with_boss: false,
            angle: 0.0,
            layer: DEFAULT_LAYER,
            visual: Visual::default(),
            behavior: Behavior::Inert,
        }
    }
}

/// A live simulated object
///
/// Only [`Entity::new`] creates one, so mass and radius are always valid.
/// Serializable for inspection, never deserialized.
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    id: EntityId,
    pub position: Vec2,
    pub velocity: Vec2,
    mass: f32,
    radius: f32,
    pub damage: f32,
    pub hitpoints: i32,
    pub hitpoints_max: i32,
    /// Seconds since creation
    pub age: f32,
    pub max_age: Option<f32>,
    pub distance_traveled: f32,
    pub max_distance: Option<f32>,
    pub edge_policy: EdgePolicy,
    pub lower_edge: Option<f32>,
    pub is_static: bool,
    pub boss: Option<EntityId>,
    pub kill_with_boss: bool,
    pub sticky_with_boss: bool,
    pub angle: f32,
    pub layer: u8,
    pub visual: Visual,
    pub behavior: Behavior,
    death: Option<DeathCause>,
}

impl Entity {
    /// Create an entity, rejecting configurations that would break the physics
    pub fn new(id: EntityId, config: EntityConfig) -> Result<Self, EntityError> {
        // Written so that NaN fails too
        if !(config.mass > 0.0) || !config.mass.is_finite() {
            return Err(EntityError::NonPositiveMass(config.mass));
        }
        if !(config.radius >= 0.0) || !config.radius.is_finite() {
            return Err(EntityError::NegativeRadius(config.radius));
        }

        Ok(Self {
            id,
            position: config.position,
            velocity: config.velocity,
            mass: config.mass,
            radius: config.radius,
            damage: config.damage,
            hitpoints: config.hitpoints,
            hitpoints_max: config.hitpoints,
            age: 0.0,
            max_age: config.max_age,
            distance_traveled: 0.0,
            max_distance: config.max_distance,
            edge_policy: config.edge_policy,
            lower_edge: config.lower_edge,
            is_static: config.is_static,
            boss: config.boss,
            kill_with_boss: config.kill_with_boss,
            sticky_with_boss: config.sticky_with_boss,
            angle: config.angle,
            layer: config.layer,
            visual: config.visual,
            behavior: config.behavior,
            death: None,
        })
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.death.is_none()
    }

    /// Why the entity died, if it did
    pub fn death(&self) -> Option<DeathCause> {
        self.death
    }

    /// Destroy the entity (first cause wins)
    pub fn kill(&mut self, cause: DeathCause) {
        if self.death.is_none() {
            self.death = Some(cause);
        }
    }

    /// Rotate the facing by `degrees`
    pub fn rotate(&mut self, degrees: f32) {
        self.angle = crate::normalize_degrees(self.angle + degrees);
    }

    /// Advance the entity by `dt` seconds
    ///
    /// Order: behavior hook, destruction checks, boss coupling, integration,
    /// aging, edge policy. A dead entity is left untouched.
    pub fn advance(&mut self, dt: f32, ctx: &mut StepContext<'_>) {
        if !self.is_alive() {
            return;
        }

        self.behavior.think(
            self.id,
            self.position,
            &mut self.velocity,
            dt,
            ctx.rng,
            ctx.deferred,
        );

        if self.hitpoints <= 0 {
            self.kill(DeathCause::Hitpoints);
            return;
        }
        if self.max_age.is_some_and(|max| self.age > max) {
            self.kill(DeathCause::Age);
            return;
        }
        if self
            .max_distance
            .is_some_and(|max| self.distance_traveled > max)
        {
            self.kill(DeathCause::Distance);
            return;
        }

        let mut pinned = false;
        if let Some(boss) = self.boss {
            match ctx.boss {
                BossStatus::Missing => {
                    if self.kill_with_boss {
                        log::trace!("entity {} lost boss {}", self.id, boss);
                        self.kill(DeathCause::BossGone);
                        return;
                    }
                }
                BossStatus::Present(boss_pos) => {
                    if self.sticky_with_boss {
                        self.position = boss_pos;
                        pinned = true;
                    }
                }
                BossStatus::Unbound => {}
            }
        }

        if !pinned {
            self.position += self.velocity * dt;
            self.distance_traveled += self.velocity.length() * dt;
        }
        self.age += dt;

        match apply_edges(
            self.position,
            self.velocity,
            self.edge_policy,
            self.lower_edge,
            &ctx.arena,
        ) {
            EdgeOutcome::Stay { position, velocity } => {
                self.position = position;
                self.velocity = velocity;
            }
            EdgeOutcome::Killed { fell_off_bottom } => {
                if fell_off_bottom {
                    // Distinguishes "fell off" from "ran out of hitpoints"
                    self.hitpoints = 0;
                }
                log::trace!(
                    "entity {} left the arena via {:?}",
                    self.id,
                    crossed_edges(self.position, self.lower_edge, &ctx.arena)
                );
                self.kill(DeathCause::Edge { fell_off_bottom });
            }
        }
    }
}

//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod behavior;
pub mod boundary;
pub mod collision;
pub mod entity;
pub mod explosion;
pub mod kinds;
pub mod registry;
pub mod state;
pub mod tick;

pub use behavior::{Behavior, CompanionBrain, CompanionState};
pub use boundary::{Arena, Edge, EdgeOutcome, EdgePolicy, apply_edges, crossed_edges};
pub use collision::{discs_overlap, rebound, resolve_collision};
pub use entity::{
    BossStatus, DeathCause, Deferred, Entity, EntityConfig, EntityError, EntityId, StepContext,
};
pub use explosion::Explosion;
pub use kinds::{FluffColor, FoodKind, ParticleKind, Visual};
pub use registry::{Registry, Sprite};
pub use state::{GameEvent, GamePhase, GameState, Groups};
pub use tick::{TickInput, tick};

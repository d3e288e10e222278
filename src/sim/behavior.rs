//! Per-frame AI hooks
//!
//! Most entities are [`Behavior::Inert`]. Cats wander and doze, particles fall.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Deferred, EntityId};
use super::kinds::{self, Visual};

/// Chance per frame that a wandering cat picks a new heading
pub const WANDER_CHANCE: f64 = 0.01;
/// Max speed per axis of a new wander heading
pub const WANDER_SPEED: i32 = 50;

/// Chance per frame that an awake cat falls asleep
pub const NAP_CHANCE: f64 = 0.002;
/// Nap length range in seconds
pub const NAP_MIN: f32 = 3.0;
pub const NAP_MAX: f32 = 6.0;
/// How long a cat glows after playing with a fluffball
pub const GLOW_DURATION: f32 = 1.5;

/// The AI hook run at the start of every frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Behavior {
    /// Does nothing
    #[default]
    Inert,
    /// Constant per-frame acceleration, then damping (1.0 = none)
    Ballistic { gravity: Vec2, damping: f32 },
    /// Cat state machine
    Companion(CompanionBrain),
}

impl Behavior {
    /// Run the hook, possibly changing velocity or queueing registry changes
    pub fn think(
        &mut self,
        id: EntityId,
        position: Vec2,
        velocity: &mut Vec2,
        dt: f32,
        rng: &mut Pcg32,
        deferred: &mut Deferred,
    ) {
        match self {
            Behavior::Inert => {}
            Behavior::Ballistic { gravity, damping } => {
                *velocity += *gravity;
                *velocity *= *damping;
            }
            Behavior::Companion(brain) => brain.think(id, position, velocity, dt, rng, deferred),
        }
    }

    /// The companion brain, if this is a cat
    pub fn companion_mut(&mut self) -> Option<&mut CompanionBrain> {
        match self {
            Behavior::Companion(brain) => Some(brain),
            _ => None,
        }
    }
}

/// Occasionally pick a random heading with whole-pixel components
fn wander(velocity: &mut Vec2, rng: &mut Pcg32) {
    if rng.random_bool(WANDER_CHANCE) {
        *velocity = Vec2::new(
            rng.random_range(-WANDER_SPEED..=WANDER_SPEED) as f32,
            rng.random_range(-WANDER_SPEED..=WANDER_SPEED) as f32,
        );
    }
}

/// What a cat is currently up to
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum CompanionState {
    /// Roaming around
    #[default]
    Awake,
    /// Curled up, not moving
    Sleeping { remaining: f32 },
    /// Happy after playing; still roaming
    Glowing { remaining: f32 },
}

/// Sleep/glow state machine for cats
///
/// Entering a state with a visual (snooze bubble, glow halo) queues an
/// attachment that sticks to the cat and dies with it. Leaving `Sleeping`
/// dismisses the snooze bubble, however the nap ended.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompanionBrain {
    pub state: CompanionState,
    /// Set by `excite`, consumed on the next think
    pub(crate) halo_pending: bool,
    /// Woken by `excite`; the bubble goes on the next think
    pub(crate) snooze_stale: bool,
}

impl CompanionBrain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_sleeping(&self) -> bool {
        matches!(self.state, CompanionState::Sleeping { .. })
    }

    pub fn is_glowing(&self) -> bool {
        matches!(self.state, CompanionState::Glowing { .. })
    }

    /// The cat touched a fluffball: wake up and glow for a while
    ///
    /// Ignored while already glowing.
    pub fn excite(&mut self) {
        if self.is_glowing() {
            return;
        }
        if self.is_sleeping() {
            self.snooze_stale = true;
        }
        self.state = CompanionState::Glowing {
            remaining: GLOW_DURATION,
        };
        self.halo_pending = true;
    }

    fn think(
        &mut self,
        id: EntityId,
        position: Vec2,
        velocity: &mut Vec2,
        dt: f32,
        rng: &mut Pcg32,
        deferred: &mut Deferred,
    ) {
        if self.snooze_stale {
            self.snooze_stale = false;
            deferred.dismissals.push((id, Visual::Snooze));
        }
        if self.halo_pending {
            self.halo_pending = false;
            deferred.spawns.push(kinds::glow(id, position, GLOW_DURATION));
        }

        match &mut self.state {
            CompanionState::Awake => {
                wander(velocity, rng);
                if rng.random_bool(NAP_CHANCE) {
                    let nap = rng.random_range(NAP_MIN..=NAP_MAX);
                    log::debug!("cat {} dozes off for {:.1}s", id, nap);
                    self.state = CompanionState::Sleeping { remaining: nap };
                    *velocity = Vec2::ZERO;
                    deferred.spawns.push(kinds::snooze(id, position, nap));
                }
            }
            CompanionState::Sleeping { remaining } => {
                *velocity = Vec2::ZERO;
                *remaining -= dt;
                if *remaining <= 0.0 {
                    self.state = CompanionState::Awake;
                    deferred.dismissals.push((id, Visual::Snooze));
                }
            }
            CompanionState::Glowing { remaining } => {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    self.state = CompanionState::Awake;
                } else {
                    wander(velocity, rng);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_ballistic_adds_gravity_every_frame() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut deferred = Deferred::default();
        let mut behavior = Behavior::Ballistic {
            gravity: Vec2::new(0.0, -3.7),
            damping: 1.0,
        };
        let mut vel = Vec2::new(10.0, 0.0);
        for _ in 0..10 {
            behavior.think(1, Vec2::ZERO, &mut vel, 0.1, &mut rng, &mut deferred);
        }
        assert!((vel.y + 37.0).abs() < 1e-3);
        assert_eq!(vel.x, 10.0);
        assert!(deferred.spawns.is_empty());
    }

    #[test]
    fn test_ballistic_damping() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut deferred = Deferred::default();
        let mut behavior = Behavior::Ballistic {
            gravity: Vec2::ZERO,
            damping: 0.5,
        };
        let mut vel = Vec2::new(8.0, -4.0);
        behavior.think(1, Vec2::ZERO, &mut vel, 0.1, &mut rng, &mut deferred);
        assert_eq!(vel, Vec2::new(4.0, -2.0));
    }

    #[test]
    fn test_wander_stays_in_range() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut changed = 0;
        for _ in 0..2000 {
            let mut vel = Vec2::new(1000.0, 1000.0);
            wander(&mut vel, &mut rng);
            if vel != Vec2::new(1000.0, 1000.0) {
                changed += 1;
                assert!(vel.x.abs() <= 50.0 && vel.y.abs() <= 50.0);
                assert_eq!(vel.x, vel.x.round());
            }
        }
        // About 1% of frames
        assert!((1..100).contains(&changed));
    }

    #[test]
    fn test_excite_spawns_one_halo() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut deferred = Deferred::default();
        let mut brain = CompanionBrain::new();
        brain.excite();
        brain.excite(); // second call is ignored
        assert!(brain.is_glowing());

        let mut vel = Vec2::ZERO;
        let pos = Vec2::new(5.0, -5.0);
        brain.think(9, pos, &mut vel, 0.1, &mut rng, &mut deferred);
        brain.think(9, pos, &mut vel, 0.1, &mut rng, &mut deferred);

        assert_eq!(deferred.spawns.len(), 1);
        let halo = &deferred.spawns[0];
        assert_eq!(halo.boss, Some(9));
        assert!(halo.sticky_with_boss && halo.kill_with_boss);
        assert_eq!(halo.visual, Visual::Glow);
        assert_eq!(halo.position, pos);
        assert!(deferred.dismissals.is_empty());
    }

    #[test]
    fn test_glow_wears_off() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut deferred = Deferred::default();
        let mut brain = CompanionBrain::new();
        brain.excite();
        let mut vel = Vec2::ZERO;
        for _ in 0..20 {
            brain.think(1, Vec2::ZERO, &mut vel, 0.1, &mut rng, &mut deferred);
        }
        assert!(!brain.is_glowing());
    }

    #[test]
    fn test_sleeping_cat_holds_still_then_wakes() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut deferred = Deferred::default();
        let mut brain = CompanionBrain {
            state: CompanionState::Sleeping { remaining: 0.25 },
            ..Default::default()
        };
        let mut vel = Vec2::new(30.0, 30.0);
        brain.think(1, Vec2::ZERO, &mut vel, 0.1, &mut rng, &mut deferred);
        assert_eq!(vel, Vec2::ZERO);
        assert!(brain.is_sleeping());
        assert!(deferred.dismissals.is_empty());

        brain.think(1, Vec2::ZERO, &mut vel, 0.1, &mut rng, &mut deferred);
        brain.think(1, Vec2::ZERO, &mut vel, 0.1, &mut rng, &mut deferred);
        assert_eq!(brain.state, CompanionState::Awake);
        assert_eq!(deferred.dismissals, vec![(1, Visual::Snooze)]);
    }

    #[test]
    fn test_excite_wakes_sleeper_and_drops_bubble() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut deferred = Deferred::default();
        let mut brain = CompanionBrain {
            state: CompanionState::Sleeping { remaining: 5.0 },
            ..Default::default()
        };
        brain.excite();
        assert!(brain.is_glowing());

        let mut vel = Vec2::ZERO;
        brain.think(6, Vec2::ZERO, &mut vel, 0.1, &mut rng, &mut deferred);
        assert_eq!(deferred.dismissals, vec![(6, Visual::Snooze)]);
        assert_eq!(deferred.spawns[0].visual, Visual::Glow);

        // Only once
        brain.think(6, Vec2::ZERO, &mut vel, 0.1, &mut rng, &mut deferred);
        assert_eq!(deferred.dismissals.len(), 1);
    }

    #[test]
    fn test_cat_eventually_naps_with_snooze_bubble() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut deferred = Deferred::default();
        let mut brain = CompanionBrain::new();
        let mut vel = Vec2::ZERO;
        for _ in 0..20_000 {
            brain.think(4, Vec2::ZERO, &mut vel, 1.0 / 30.0, &mut rng, &mut deferred);
            if brain.is_sleeping() {
                break;
            }
        }
        assert!(brain.is_sleeping());
        let bubble = deferred.spawns.last().expect("snooze bubble queued");
        assert_eq!(bubble.visual, Visual::Snooze);
        let nap = bubble.max_age.expect("bubble expires");
        assert!((NAP_MIN..=NAP_MAX).contains(&nap));
    }
}

//! Session state and setup
//!
//! A session owns the registry, the RNG, and the collision groups. Group
//! membership lives here, not on the entities.

use glam::Vec2;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::boundary::Arena;
use super::entity::{EntityError, EntityId};
use super::kinds::{self, FluffColor, FoodKind};
use super::registry::Registry;
use crate::Settings;
use crate::consts::*;

/// Placement attempts per entity before giving up on it
const MAX_PLACEMENT_TRIES: usize = 1000;
/// Car wheels keep this far from fluffball spawn points
const HAZARD_CLEAR_OF_PLAYERS: f32 = 100.0;
/// Car wheels keep this far from each other
const HAZARD_SPACING: f32 = 200.0;
/// Food keeps this far from car wheels
const FOOD_CLEAR_OF_HAZARDS: f32 = 50.0;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Everything eaten; the session ends after the timer
    Won { exit_in: f32 },
    /// Too many car wheel bumps; the session ends after the timer
    Lost { exit_in: f32 },
    /// Session finished
    Over,
}

/// Something a text/audio collaborator may want to react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A fluffball ate something
    Ate {
        fluffball: EntityId,
        food: FoodKind,
        at: Vec2,
    },
    /// A fluffball bumped into a car wheel
    Bumped {
        fluffball: EntityId,
        hazard: EntityId,
        collisions: u32,
    },
    /// A cat flung a fluffball away
    Flung {
        fluffball: EntityId,
        companion: EntityId,
    },
    /// Last food eaten
    AllEaten,
    /// Collision limit reached
    GameOver,
}

/// Collision groups, supplied to the collision pass
#[derive(Debug, Clone, Default)]
pub struct Groups {
    pub fluffballs: Vec<EntityId>,
    pub food: Vec<EntityId>,
    pub hazards: Vec<EntityId>,
    pub companions: Vec<EntityId>,
}

impl Groups {
    /// Forget ids that are no longer in the registry
    pub fn prune(&mut self, registry: &Registry) {
        for group in [
            &mut self.fluffballs,
            &mut self.food,
            &mut self.hazards,
            &mut self.companions,
        ] {
            group.retain(|id| registry.contains(*id));
        }
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub settings: Settings,
    pub arena: Arena,
    pub registry: Registry,
    pub rng: Pcg32,
    pub groups: Groups,
    pub phase: GamePhase,
    /// Car wheel bumps while food remained
    pub collisions: u32,
    /// Seconds of simulated play
    pub playtime: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session and populate the arena
    pub fn new(settings: Settings, seed: u64) -> Result<Self, EntityError> {
        let arena = settings.arena();
        let mut state = Self {
            seed,
            settings,
            arena,
            registry: Registry::new(),
            rng: Pcg32::seed_from_u64(seed),
            groups: Groups::default(),
            phase: GamePhase::Playing,
            collisions: 0,
            playtime: 0.0,
            time_ticks: 0,
            events: Vec::new(),
        };
        state.populate()?;
        log::info!(
            "New {} session (seed {}): {} fluffballs, {} food, {} car wheels, {} cats",
            state.settings.difficulty.as_str(),
            seed,
            state.groups.fluffballs.len(),
            state.groups.food.len(),
            state.groups.hazards.len(),
            state.groups.companions.len(),
        );
        Ok(state)
    }

    /// Clear everything and set the arena up again with the same settings
    pub fn reset(&mut self) -> Result<(), EntityError> {
        self.registry.reset();
        self.groups = Groups::default();
        self.phase = GamePhase::Playing;
        self.collisions = 0;
        self.playtime = 0.0;
        self.time_ticks = 0;
        self.events.clear();
        self.populate()
    }

    /// Spawn points of the (up to four) fluffballs
    pub fn player_spawns(&self) -> [Vec2; 4] {
        let (w, h) = (self.arena.width, self.arena.height);
        [
            Vec2::new(w / 4.0, -h / 4.0),
            Vec2::new(w / 1.33, -h / 4.0),
            Vec2::new(w / 4.0, -h / 1.33),
            Vec2::new(w / 1.33, -h / 1.33),
        ]
    }

    /// Take the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Food left to eat
    pub fn food_left(&self) -> usize {
        self.groups.food.len()
    }

    fn populate(&mut self) -> Result<(), EntityError> {
        let spawns = self.player_spawns();

        for (player, &pos) in spawns.iter().take(self.settings.player_count()).enumerate() {
            let color = self.settings.colors[player].unwrap_or_else(|| {
                *FluffColor::RANDOM_POOL
                    .choose(&mut self.rng)
                    .unwrap_or(&FluffColor::Blue)
            });
            let id = self.registry.spawn(kinds::fluffball(pos, color))?;
            self.groups.fluffballs.push(id);
        }

        for _ in 0..self.settings.difficulty.hazard_count() {
            let taken: Vec<Vec2> = self.positions(&self.groups.hazards);
            let spot = self.find_spot(|p| {
                spawns.iter().all(|s| p.distance(*s) >= HAZARD_CLEAR_OF_PLAYERS)
                    && taken.iter().all(|t| p.distance(*t) >= HAZARD_SPACING)
            });
            match spot {
                Some(pos) => {
                    let id = self.registry.spawn(kinds::car_wheel(pos))?;
                    self.groups.hazards.push(id);
                }
                None => log::warn!("no room left for another car wheel"),
            }
        }

        let wheels = self.positions(&self.groups.hazards);
        for kind in [FoodKind::Donut, FoodKind::Cookie] {
            for _ in 0..FOOD_PER_KIND {
                let spot = self.find_spot(|p| {
                    wheels.iter().all(|w| p.distance(*w) >= FOOD_CLEAR_OF_HAZARDS)
                });
                match spot {
                    Some(pos) => {
                        let id = self.registry.spawn(kinds::food(kind, pos))?;
                        self.groups.food.push(id);
                    }
                    None => log::warn!("no room left for a {:?}", kind),
                }
            }
        }

        for _ in 0..self.settings.difficulty.companion_count() {
            let pos = self.random_point();
            let id = self.registry.spawn(kinds::cat(pos))?;
            self.groups.companions.push(id);
        }

        Ok(())
    }

    fn positions(&self, ids: &[EntityId]) -> Vec<Vec2> {
        ids.iter()
            .filter_map(|id| self.registry.get(*id))
            .map(|e| e.position)
            .collect()
    }

    /// Random whole-pixel point inside the arena
    fn random_point(&mut self) -> Vec2 {
        let x = self.rng.random_range(0..=self.arena.width as i32);
        let y = self.rng.random_range(0..=self.arena.height as i32);
        Vec2::new(x as f32, -(y as f32))
    }

    fn find_spot(&mut self, fits: impl Fn(Vec2) -> bool) -> Option<Vec2> {
        (0..MAX_PLACEMENT_TRIES)
            .map(|_| self.random_point())
            .find(|p| fits(*p))
    }
}

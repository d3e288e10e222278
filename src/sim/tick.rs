//! Fixed timestep simulation tick
//!
//! One call advances the whole session by one frame: input, entity update,
//! group collisions, queued effects, then phase timers.

use glam::Vec2;
use rand::Rng;

use super::collision::{discs_overlap, rebound, resolve_collision};
use super::entity::EntityId;
use super::explosion::Explosion;
use super::kinds::{FoodKind, ParticleKind};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::{angle_to, from_degrees, rotate_degrees};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Steering direction per player, each axis in [-1, 1]
    pub impulses: Vec<Vec2>,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - player one steers itself toward food
    pub idle_mode: bool,
}

impl TickInput {
    /// Set the steering direction of one player
    pub fn steer(&mut self, player: usize, direction: Vec2) {
        if self.impulses.len() <= player {
            self.impulses.resize(player + 1, Vec2::ZERO);
        }
        self.impulses[player] = direction.clamp(Vec2::NEG_ONE, Vec2::ONE);
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::debug!("Paused");
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::debug!("Resumed");
            }
            _ => {}
        }
    }

    if matches!(state.phase, GamePhase::Paused | GamePhase::Over) {
        return;
    }

    apply_impulses(state, input);
    if input.idle_mode {
        steer_toward_food(state);
    }

    state.registry.advance_all(dt, &state.arena, &mut state.rng);
    state.groups.prune(&state.registry);

    let mut effects = Vec::new();
    eat_food(state, &mut effects);
    bump_hazards(state, &mut effects);
    bounce_fluffballs(state);
    companion_play(state);

    for effect in effects {
        if let Err(err) = effect.detonate(&mut state.registry, &mut state.rng) {
            log::warn!("explosion dropped: {}", err);
        }
    }

    state.groups.prune(&state.registry);
    state.playtime += dt;
    state.time_ticks += 1;

    let expired = match &mut state.phase {
        GamePhase::Won { exit_in } | GamePhase::Lost { exit_in } => {
            *exit_in -= dt;
            *exit_in <= 0.0
        }
        _ => false,
    };
    if expired {
        log::info!(
            "Session over after {:.1}s with {} collisions",
            state.playtime,
            state.collisions
        );
        state.phase = GamePhase::Over;
    }
}

fn apply_impulses(state: &mut GameState, input: &TickInput) {
    for (&id, &direction) in state.groups.fluffballs.iter().zip(&input.impulses) {
        if let Some(fluff) = state.registry.get_mut(id) {
            fluff.velocity += direction * PLAYER_IMPULSE;
        }
    }
}

/// Demo AI: push player one toward the closest food until it cruises
fn steer_toward_food(state: &mut GameState) {
    let Some(&player) = state.groups.fluffballs.first() else {
        return;
    };
    let Some(pos) = state.registry.get(player).map(|e| e.position) else {
        return;
    };
    let target = state
        .groups
        .food
        .iter()
        .filter_map(|id| state.registry.get(*id))
        .map(|food| food.position)
        .min_by(|a, b| a.distance_squared(pos).total_cmp(&b.distance_squared(pos)));

    let Some(target) = target else {
        return;
    };
    let dir = from_degrees(angle_to(pos, target));
    if let Some(fluff) = state.registry.get_mut(player)
        && fluff.velocity.dot(dir) < IDLE_CRUISE_SPEED
    {
        fluff.velocity += dir * PLAYER_IMPULSE;
    }
}

fn overlapping(state: &GameState, a: EntityId, b: EntityId) -> bool {
    match (state.registry.get(a), state.registry.get(b)) {
        (Some(a), Some(b)) => discs_overlap(a, b),
        _ => false,
    }
}

fn eat_food(state: &mut GameState, effects: &mut Vec<Explosion>) {
    for fluff in state.groups.fluffballs.clone() {
        for food in state.groups.food.clone() {
            if !overlapping(state, fluff, food) {
                continue;
            }
            let Some(eaten) = state.registry.kill(food) else {
                continue;
            };
            state.groups.food.retain(|id| *id != food);
            let Some(kind) = FoodKind::of(eaten.visual) else {
                continue;
            };

            effects.push(Explosion {
                min_speed: 50.0,
                max_speed: 150.0,
                color: kind.crumb_color(),
                max_duration: 1.5,
                gravity: 0.0,
                min_count: 100,
                max_count: 300,
                ..Explosion::new(eaten.position, ParticleKind::Crumb)
            });
            state.events.push(GameEvent::Ate {
                fluffball: fluff,
                food: kind,
                at: eaten.position,
            });
            log::debug!("fluffball {} ate {:?} {}", fluff, kind, food);

            if state.groups.food.is_empty() && state.phase == GamePhase::Playing {
                log::info!("All food eaten after {:.1}s", state.playtime);
                state.phase = GamePhase::Won { exit_in: EXIT_DELAY };
                state.events.push(GameEvent::AllEaten);
            }
        }
    }
}

fn bump_hazards(state: &mut GameState, effects: &mut Vec<Explosion>) {
    for fluff in state.groups.fluffballs.clone() {
        for hazard in state.groups.hazards.clone() {
            if !overlapping(state, fluff, hazard) {
                continue;
            }
            let Some(wheel_pos) = state.registry.get(hazard).map(|e| e.position) else {
                continue;
            };
            let Some(f) = state.registry.get_mut(fluff) else {
                continue;
            };
            rebound(f, HAZARD_REBOUND, HAZARD_PUSH);
            let midpoint = wheel_pos + (f.position - wheel_pos) * 0.5;

            if !state.groups.food.is_empty() {
                state.collisions += 1;
            }
            if state.collisions == MAX_COLLISIONS && state.phase == GamePhase::Playing {
                log::info!("Collision limit reached, game over");
                state.phase = GamePhase::Lost { exit_in: EXIT_DELAY };
                state.events.push(GameEvent::GameOver);
            }

            effects.push(Explosion {
                min_speed: 50.0,
                max_speed: 100.0,
                color: [0, 0, 0],
                max_duration: 1.5,
                gravity: 0.0,
                min_count: 20,
                max_count: 50,
                ..Explosion::new(midpoint, ParticleKind::Spark)
            });
            state.events.push(GameEvent::Bumped {
                fluffball: fluff,
                hazard,
                collisions: state.collisions,
            });
        }
    }
}

fn bounce_fluffballs(state: &mut GameState) {
    let fluffballs = state.groups.fluffballs.clone();
    for &a in &fluffballs {
        for &b in &fluffballs {
            // Each unordered pair once
            if a <= b || !overlapping(state, a, b) {
                continue;
            }
            if let Some((fa, fb)) = state.registry.pair_mut(a, b) {
                resolve_collision(fa, fb, &mut state.rng);
            }
        }
    }
}

fn companion_play(state: &mut GameState) {
    for cat in state.groups.companions.clone() {
        for fluff in state.groups.fluffballs.clone() {
            if !overlapping(state, cat, fluff) {
                continue;
            }
            let speed = state
                .rng
                .random_range(FLING_MIN_SPEED as i32..=FLING_MAX_SPEED as i32)
                as f32;
            let angle = state.rng.random_range(0..=360) as f32;
            if let Some(f) = state.registry.get_mut(fluff) {
                f.velocity = rotate_degrees(Vec2::new(speed, 0.0), angle);
            }
            if let Some(brain) = state
                .registry
                .get_mut(cat)
                .and_then(|c| c.behavior.companion_mut())
            {
                brain.excite();
            }
            state.events.push(GameEvent::Flung {
                fluffball: fluff,
                companion: cat,
            });
        }
    }
}

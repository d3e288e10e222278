//! Collision detection and response for circular bodies
//!
//! Overlap is a plain disc test on the current frame. Response is a 2D elastic
//! collision between discs of unequal mass; positions are never corrected.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::Entity;

/// Check whether two entities' discs overlap
#[inline]
pub fn discs_overlap(a: &Entity, b: &Entity) -> bool {
    let reach = a.radius() + b.radius();
    a.position.distance_squared(b.position) < reach * reach
}

/// Random separation used when two discs sit exactly on top of each other
///
/// Components are in {-5.5, -4.5, ..., 5.5}, so the vector is never zero.
fn fallback_separation(rng: &mut Pcg32) -> Vec2 {
    Vec2::new(
        rng.random_range(0..=11) as f32 - 5.5,
        rng.random_range(0..=11) as f32 - 5.5,
    )
}

/// Elastic collision between two discs, updating both velocities in place
///
/// With `d = a.pos - b.pos` and the center-of-mass velocity `s`, each deviation
/// from `s` is projected onto `d` (divided by |d|² to skip the square root).
/// If `b` is moving toward `a` along `d`, both velocities are reflected about
/// the normal plane; static entities keep their velocity.
///
/// Returns true when velocities were updated.
pub fn resolve_collision(a: &mut Entity, b: &mut Entity, rng: &mut Pcg32) -> bool {
    if a.is_static && b.is_static {
        return false;
    }

    let mut dir = a.position - b.position;
    let mut dist_sq = dir.length_squared();
    if dist_sq == 0.0 {
        dir = fallback_separation(rng);
        dist_sq = dir.length_squared();
        log::trace!("entities {} and {} overlap exactly", a.id(), b.id());
    }

    let total_mass = a.mass() + b.mass();
    let s = (a.velocity * a.mass() + b.velocity * b.mass()) / total_mass;

    let dp_b = (b.velocity - s).dot(dir) / dist_sq;
    let dp_a = (a.velocity - s).dot(dir) / dist_sq;

    if dp_b <= 0.0 {
        return false;
    }
    if !b.is_static {
        b.velocity -= 2.0 * dir * dp_b;
    }
    if !a.is_static {
        a.velocity -= 2.0 * dir * dp_a;
    }
    true
}

/// Bounce a fluffball off a car wheel: reverse and damp, then hop clear
pub fn rebound(entity: &mut Entity, factor: f32, push: f32) {
    entity.velocity *= factor;
    entity.position += entity.velocity.normalize_or_zero() * push;
}

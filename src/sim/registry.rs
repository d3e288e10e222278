//! Entity registry: id → live entity
//!
//! Owned by the session (no globals). Ids are handed out in increasing order
//! and never reused, so iterating the map by key gives a stable update order.

use std::collections::BTreeMap;

use glam::Vec2;
use rand_pcg::Pcg32;

use super::boundary::Arena;
use super::entity::{
    BossStatus, DeathCause, Deferred, Entity, EntityConfig, EntityError, EntityId, StepContext,
};
use super::kinds::Visual;

/// What the renderer needs to draw one entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub id: EntityId,
    /// World position
    pub position: Vec2,
    /// Facing in degrees
    pub angle: f32,
    pub layer: u8,
    pub visual: Visual,
}

impl Sprite {
    /// Screen-space center (y flipped, rounded to whole pixels)
    pub fn screen_center(&self) -> (i32, i32) {
        (self.position.x.round() as i32, -self.position.y.round() as i32)
    }
}

/// All live entities of a session
#[derive(Debug, Clone)]
pub struct Registry {
    entities: BTreeMap<EntityId, Entity>,
    next_id: EntityId,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Create an entity from a config and return its id
    ///
    /// A rejected config consumes no id.
    pub fn spawn(&mut self, config: EntityConfig) -> Result<EntityId, EntityError> {
        let id = self.next_id;
        let entity = Entity::new(id, config)?;
        self.next_id += 1;
        self.entities.insert(id, entity);
        Ok(id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Live entities in id order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Destroy an entity and remove it in one step
    pub fn kill(&mut self, id: EntityId) -> Option<Entity> {
        let mut entity = self.entities.remove(&id)?;
        entity.kill(DeathCause::Killed);
        Some(entity)
    }

    /// Drop every entity and restart numbering (new session)
    pub fn reset(&mut self) {
        self.entities.clear();
        self.next_id = 1;
    }

    /// Resolve an entity's boss reference against the live set
    pub fn boss_status(&self, entity: &Entity) -> BossStatus {
        match entity.boss {
            None => BossStatus::Unbound,
            Some(boss) => match self.entities.get(&boss) {
                Some(b) => BossStatus::Present(b.position),
                None => BossStatus::Missing,
            },
        }
    }

    /// Two distinct entities borrowed mutably at once
    pub fn pair_mut(&mut self, a: EntityId, b: EntityId) -> Option<(&mut Entity, &mut Entity)> {
        if a == b {
            return None;
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let mut range = self.entities.range_mut(lo..=hi);
        let first = range.next().filter(|(id, _)| **id == lo)?.1;
        let last = range.next_back().filter(|(id, _)| **id == hi)?.1;
        if a < b { Some((first, last)) } else { Some((last, first)) }
    }

    /// Advance every live entity by `dt`
    ///
    /// Entities are visited in id order over a snapshot of the ids. An entity
    /// that dies is removed right away, so later entities see its boss slot as
    /// empty in the same frame. Dismissed attachments are removed after the
    /// pass; entities spawned during it are inserted last and first move next
    /// frame. Returns the ids removed.
    pub fn advance_all(&mut self, dt: f32, arena: &Arena, rng: &mut Pcg32) -> Vec<EntityId> {
        let ids: Vec<EntityId> = self.entities.keys().copied().collect();
        let mut deferred = Deferred::default();
        let mut removed = Vec::new();

        for id in ids {
            let boss = match self.entities.get(&id) {
                Some(entity) => self.boss_status(entity),
                None => continue,
            };
            let Some(entity) = self.entities.get_mut(&id) else {
                continue;
            };

            let mut ctx = StepContext::new(*arena, rng, &mut deferred).with_boss(boss);
            entity.advance(dt, &mut ctx);

            if !entity.is_alive() {
                log::trace!("entity {} removed: {:?}", id, entity.death());
                self.entities.remove(&id);
                removed.push(id);
            }
        }

        for (boss, visual) in deferred.dismissals {
            let dismissed: Vec<EntityId> = self
                .entities
                .values()
                .filter(|e| e.boss == Some(boss) && e.visual == visual)
                .map(|e| e.id())
                .collect();
            for id in dismissed {
                log::trace!("attachment {} of {} dismissed", id, boss);
                self.kill(id);
                removed.push(id);
            }
        }

        for config in deferred.spawns {
            if let Err(err) = self.spawn(config) {
                log::warn!("dropping spawned entity: {}", err);
            }
        }

        removed
    }

    /// Sprites for every live entity, bottom layer first
    pub fn sprites(&self) -> Vec<Sprite> {
        let mut sprites: Vec<Sprite> = self
            .entities
            .values()
            .map(|e| Sprite {
                id: e.id(),
                position: e.position,
                angle: e.angle,
                layer: e.layer,
                visual: e.visual,
            })
            .collect();
        sprites.sort_by_key(|s| (s.layer, s.id));
        sprites
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::behavior::{Behavior, CompanionBrain, CompanionState};
    use crate::sim::boundary::EdgePolicy;
    use crate::sim::kinds;
    use rand::SeedableRng;

    const ARENA: Arena = Arena {
        width: 800.0,
        height: 600.0,
    };

    fn at(x: f32, y: f32) -> EntityConfig {
        EntityConfig {
            position: Vec2::new(x, y),
            ..Default::default()
        }
    }

    #[test]
    fn test_ids_are_monotonic_and_unique() {
        let mut reg = Registry::new();
        let a = reg.spawn(at(1.0, -1.0)).unwrap();
        let b = reg.spawn(at(2.0, -2.0)).unwrap();
        reg.kill(a);
        let c = reg.spawn(at(3.0, -3.0)).unwrap();
        assert!(a < b && b < c);
        assert_eq!(reg.len(), 2);
        assert!(!reg.contains(a));
    }

    #[test]
    fn test_rejected_spawn_consumes_no_id() {
        let mut reg = Registry::new();
        let bad = reg.spawn(EntityConfig {
            mass: 0.0,
            ..Default::default()
        });
        assert!(bad.is_err());
        assert!(reg.is_empty());
        assert_eq!(reg.spawn(at(0.0, 0.0)).unwrap(), 1);
    }

    #[test]
    fn test_kill_with_boss() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut reg = Registry::new();
        let boss = reg.spawn(at(100.0, -100.0)).unwrap();
        let minion = reg
            .spawn(EntityConfig {
                boss: Some(boss),
                kill_with_boss: true,
                ..at(120.0, -100.0)
            })
            .unwrap();

        reg.advance_all(0.1, &ARENA, &mut rng);
        assert!(reg.contains(minion));

        reg.kill(boss);
        let removed = reg.advance_all(0.1, &ARENA, &mut rng);
        assert_eq!(removed, vec![minion]);
        assert!(reg.is_empty());
    }

    #[test]
    fn test_boss_dying_earlier_in_same_frame() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut reg = Registry::new();
        let boss = reg
            .spawn(EntityConfig {
                edge_policy: EdgePolicy::Kill,
                velocity: Vec2::new(-100.0, 0.0),
                ..at(1.0, -100.0)
            })
            .unwrap();
        let minion = reg
            .spawn(EntityConfig {
                boss: Some(boss),
                kill_with_boss: true,
                ..at(50.0, -100.0)
            })
            .unwrap();

        let removed = reg.advance_all(0.1, &ARENA, &mut rng);
        assert_eq!(removed, vec![boss, minion]);
    }

    #[test]
    fn test_sticky_tracks_boss() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut reg = Registry::new();
        let boss = reg.spawn(at(100.0, -100.0)).unwrap();
        let minion = reg
            .spawn(EntityConfig {
                boss: Some(boss),
                sticky_with_boss: true,
                ..at(0.0, -5.0)
            })
            .unwrap();

        reg.get_mut(boss).unwrap().position = Vec2::new(432.1, -234.5);
        reg.advance_all(0.1, &ARENA, &mut rng);
        assert_eq!(
            reg.get(minion).unwrap().position,
            reg.get(boss).unwrap().position
        );
    }

    #[test]
    fn test_spawns_join_after_pass() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut reg = Registry::new();
        let cat = reg.spawn(kinds::cat(Vec2::new(300.0, -300.0))).unwrap();
        reg.get_mut(cat)
            .unwrap()
            .behavior
            .companion_mut()
            .unwrap()
            .excite();

        reg.advance_all(0.1, &ARENA, &mut rng);
        assert_eq!(reg.len(), 2);
        let halo = reg.iter().find(|e| e.id() != cat).unwrap();
        assert_eq!(halo.age, 0.0);
        assert_eq!(halo.boss, Some(cat));
    }

    #[test]
    fn test_woken_cat_loses_snooze_bubble() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut reg = Registry::new();
        let cat = reg.spawn(kinds::cat(Vec2::new(300.0, -300.0))).unwrap();
        reg.get_mut(cat).unwrap().behavior = Behavior::Companion(CompanionBrain {
            state: CompanionState::Sleeping { remaining: 5.0 },
            ..Default::default()
        });
        let bubble = reg
            .spawn(kinds::snooze(cat, Vec2::new(300.0, -300.0), 5.0))
            .unwrap();

        reg.get_mut(cat)
            .unwrap()
            .behavior
            .companion_mut()
            .unwrap()
            .excite();
        let removed = reg.advance_all(1.0 / 30.0, &ARENA, &mut rng);
        assert_eq!(removed, vec![bubble]);

        // Still inside the glow, so no new nap can start
        for _ in 0..40 {
            reg.advance_all(1.0 / 30.0, &ARENA, &mut rng);
        }
        assert!(!reg.iter().any(|e| e.visual == Visual::Snooze));
        assert!(matches!(
            &reg.get(cat).unwrap().behavior,
            Behavior::Companion(brain) if brain.is_glowing()
        ));
    }

    #[test]
    fn test_pair_mut() {
        let mut reg = Registry::new();
        let a = reg.spawn(at(1.0, -1.0)).unwrap();
        let b = reg.spawn(at(2.0, -2.0)).unwrap();
        let c = reg.spawn(at(3.0, -3.0)).unwrap();

        let (x, y) = reg.pair_mut(c, a).unwrap();
        assert_eq!((x.id(), y.id()), (c, a));
        let (x, y) = reg.pair_mut(a, b).unwrap();
        assert_eq!((x.id(), y.id()), (a, b));

        assert!(reg.pair_mut(a, a).is_none());
        reg.kill(b);
        assert!(reg.pair_mut(a, b).is_none());
        assert!(reg.pair_mut(b, c).is_none());
    }

    #[test]
    fn test_sprites_sorted_by_layer() {
        let mut reg = Registry::new();
        reg.spawn(at(1.0, -1.0)).unwrap(); // layer 4
        reg.spawn(kinds::cat(Vec2::new(5.0, -5.0))).unwrap(); // layer 1
        let sprites = reg.sprites();
        assert_eq!(sprites[0].visual, Visual::Cat);
        assert_eq!(sprites[1].screen_center(), (1, 1));
    }

    #[test]
    fn test_reset() {
        let mut reg = Registry::new();
        reg.spawn(at(1.0, -1.0)).unwrap();
        reg.reset();
        assert!(reg.is_empty());
        assert_eq!(reg.spawn(at(1.0, -1.0)).unwrap(), 1);
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for a skirmish: creeps, towers and the objective
//! they fight over.

use bastion_core::{Enemy, EnemyId, Playfield, TowerId};
use glam::Vec2;
use tracing::debug;

mod creeps;
mod towers;

pub use creeps::{Creep, CreepSpec};
pub use towers::{Tower, TowerSpec};

use towers::TowerRegistry;

/// Simulation frames per second; `dt` of 1.0 is one frame.
pub const FRAMES_PER_SECOND: f32 = 60.0;

const DEFAULT_PLAYFIELD: Playfield = Playfield::new(800.0, 600.0);

/// Notable changes produced while ticking the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorldEvent {
    /// A creep ran out of hit points and was removed.
    CreepKilled {
        /// Removed creep.
        enemy: EnemyId,
    },
    /// A creep reached the objective and was removed.
    CreepLeaked {
        /// Removed creep.
        enemy: EnemyId,
    },
}

/// Represents the authoritative skirmish state.
#[derive(Debug)]
pub struct World {
    playfield: Playfield,
    objective: Vec2,
    creeps: Vec<Creep>,
    towers: TowerRegistry,
    next_creep_id: u32,
    tick_index: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new(
            DEFAULT_PLAYFIELD,
            Vec2::new(DEFAULT_PLAYFIELD.width(), DEFAULT_PLAYFIELD.height() * 0.5),
        )
    }
}

impl World {
    /// Creates an empty world over `playfield` defending `objective`.
    #[must_use]
    pub fn new(playfield: Playfield, objective: Vec2) -> Self {
        Self {
            playfield,
            objective,
            creeps: Vec::new(),
            towers: TowerRegistry::new(),
            next_creep_id: 0,
            tick_index: 0,
        }
    }

    /// Adds a creep and returns its identifier.
    pub fn spawn_creep(&mut self, spec: CreepSpec) -> EnemyId {
        let id = EnemyId::new(self.next_creep_id);
        self.next_creep_id = self.next_creep_id.wrapping_add(1);
        self.creeps.push(Creep::new(id, spec));
        id
    }

    /// Places a tower and returns its identifier.
    pub fn place_tower(&mut self, spec: TowerSpec) -> TowerId {
        self.towers.place(spec)
    }

    /// Live creeps in spawn order.
    #[must_use]
    pub fn creeps(&self) -> &[Creep] {
        &self.creeps
    }

    /// Mutable live creeps in spawn order.
    pub fn creeps_mut(&mut self) -> &mut [Creep] {
        &mut self.creeps
    }

    /// Looks up a live creep.
    #[must_use]
    pub fn creep(&self, id: EnemyId) -> Option<&Creep> {
        self.creeps.iter().find(|creep| creep.id() == id)
    }

    /// Towers in placement order.
    #[must_use]
    pub fn towers(&self) -> &[Tower] {
        self.towers.as_slice()
    }

    /// Borrows towers mutably alongside the creeps they shoot at.
    pub fn split_mut(&mut self) -> (&mut [Tower], &mut [Creep]) {
        (self.towers.as_mut_slice(), &mut self.creeps)
    }

    /// Advances creeps and tower cooldowns by `dt` frames.
    ///
    /// Creeps killed by effects or earlier hits, and creeps that reach the
    /// objective, are removed in spawn order and reported through `out_events`.
    pub fn tick(&mut self, dt: f32, out_events: &mut Vec<WorldEvent>) {
        self.tick_index = self.tick_index.saturating_add(1);

        for tower in self.towers.as_mut_slice() {
            tower.tick(dt);
        }

        let objective = self.objective;
        self.creeps.retain_mut(|creep| {
            if creep.is_dead() {
                out_events.push(WorldEvent::CreepKilled { enemy: creep.id() });
                return false;
            }
            let arrived = creep.advance(dt, objective);
            if creep.is_dead() {
                out_events.push(WorldEvent::CreepKilled { enemy: creep.id() });
                return false;
            }
            if arrived {
                debug!(enemy = creep.id().get(), "creep reached the objective");
                out_events.push(WorldEvent::CreepLeaked { enemy: creep.id() });
                return false;
            }
            true
        });
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use bastion_core::Playfield;
    use glam::Vec2;

    use super::World;

    /// Playable area of the skirmish.
    #[must_use]
    pub fn playfield(world: &World) -> Playfield {
        world.playfield
    }

    /// Position the creeps walk toward.
    #[must_use]
    pub fn objective(world: &World) -> Vec2 {
        world.objective
    }

    /// Number of ticks applied so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Total hit points of every live creep.
    #[must_use]
    pub fn remaining_hp(world: &World) -> f64 {
        use bastion_core::Enemy;
        world.creeps.iter().map(Enemy::hp).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_core::{Damageable, SourceId};

    fn world() -> World {
        World::new(Playfield::new(200.0, 100.0), Vec2::new(200.0, 50.0))
    }

    #[test]
    fn spawned_creeps_receive_sequential_ids() {
        let mut world = world();
        let first = world.spawn_creep(CreepSpec::default());
        let second = world.spawn_creep(CreepSpec::default());
        assert_eq!(first, EnemyId::new(0));
        assert_eq!(second, EnemyId::new(1));
        assert_eq!(world.creeps().len(), 2);
        assert!(world.creep(second).is_some());
    }

    #[test]
    fn killed_creeps_are_removed_and_reported() {
        let mut world = world();
        let doomed = world.spawn_creep(CreepSpec {
            position: Vec2::new(0.0, 50.0),
            ..CreepSpec::default()
        });
        let survivor = world.spawn_creep(CreepSpec {
            position: Vec2::new(10.0, 50.0),
            ..CreepSpec::default()
        });
        world.creeps_mut()[0].take_damage(500.0, SourceId::Tower(TowerId::new(0)));

        let mut events = Vec::new();
        world.tick(1.0, &mut events);
        assert_eq!(events, vec![WorldEvent::CreepKilled { enemy: doomed }]);
        assert_eq!(world.creeps().len(), 1);
        assert_eq!(world.creeps()[0].id(), survivor);
        assert_eq!(query::tick_index(&world), 1);
    }

    #[test]
    fn creeps_reaching_objective_leak() {
        let mut world = world();
        let runner = world.spawn_creep(CreepSpec {
            position: Vec2::new(195.0, 50.0),
            speed: 10.0,
            ..CreepSpec::default()
        });
        let mut events = Vec::new();
        world.tick(1.0, &mut events);
        assert_eq!(events, vec![WorldEvent::CreepLeaked { enemy: runner }]);
        assert!(world.creeps().is_empty());
    }

    #[test]
    fn split_borrow_exposes_towers_and_creeps() {
        let mut world = world();
        let tower = world.place_tower(TowerSpec::default());
        let _ = world.spawn_creep(CreepSpec::default());
        let (towers, creeps) = world.split_mut();
        towers[0].reload();
        assert_eq!(towers[0].id(), tower);
        assert_eq!(creeps.len(), 1);
        assert!(!world.towers()[0].is_ready());
    }

    #[test]
    fn remaining_hp_sums_live_creeps() {
        let mut world = world();
        let _ = world.spawn_creep(CreepSpec {
            max_hp: 40.0,
            ..CreepSpec::default()
        });
        let _ = world.spawn_creep(CreepSpec {
            max_hp: 60.0,
            ..CreepSpec::default()
        });
        assert!((query::remaining_hp(&world) - 100.0).abs() < f64::EPSILON);
    }
}

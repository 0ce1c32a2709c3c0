#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Projectile system that owns every live projectile and resolves their hits.

use std::collections::VecDeque;

use bastion_core::{
    Attacker, Canvas, CombatEvent, DamageResolver, Enemy, Playfield, ProjectileId,
    ProjectileTuning, Turret,
};
use glam::Vec2;
use tracing::debug;

mod projectile;
mod trail;

pub use projectile::{Projectile, ProjectileOptions};
pub use trail::Trail;

/// Host state a frame of projectile simulation reads and mutates.
pub struct Battlefield<'a, E> {
    /// Live enemies in insertion order.
    pub enemies: &'a mut [E],
    /// Playable area used for expiry checks.
    pub playfield: Playfield,
    /// Resolver applied to primary hits.
    pub resolver: &'a mut dyn DamageResolver,
    /// Sink for visual and audit events.
    pub events: &'a mut Vec<CombatEvent>,
}

/// Owns the bounded collection of live projectiles.
#[derive(Debug)]
pub struct ProjectileSystem {
    tuning: ProjectileTuning,
    projectiles: VecDeque<Projectile>,
    next_id: u32,
    evicted: u64,
}

impl Default for ProjectileSystem {
    fn default() -> Self {
        Self::new(ProjectileTuning::default())
    }
}

impl ProjectileSystem {
    /// Creates an empty projectile system using `tuning`.
    #[must_use]
    pub fn new(tuning: ProjectileTuning) -> Self {
        Self {
            projectiles: VecDeque::with_capacity(tuning.capacity),
            tuning,
            next_id: 0,
            evicted: 0,
        }
    }

    /// Tuning the system was created with.
    #[must_use]
    pub fn tuning(&self) -> &ProjectileTuning {
        &self.tuning
    }

    /// Spawns a projectile, evicting the oldest live one when the pool is full.
    pub fn create(&mut self, options: ProjectileOptions) -> ProjectileId {
        while self.projectiles.len() >= self.tuning.capacity {
            let Some(oldest) = self.projectiles.pop_front() else {
                break;
            };
            self.evicted = self.evicted.saturating_add(1);
            debug!(
                projectile = oldest.id().get(),
                capacity = self.tuning.capacity,
                "projectile pool full, evicted oldest"
            );
        }

        let id = ProjectileId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.projectiles
            .push_back(Projectile::new(id, options, &self.tuning));
        id
    }

    /// Fires the turret's projectile kind at `target`.
    pub fn fire_at<T, E>(&mut self, turret: &T, target: &E) -> ProjectileId
    where
        T: Turret + ?Sized,
        E: Enemy + ?Sized,
    {
        self.fire_at_with(turret, target, |_| {})
    }

    /// Fires at `target`, letting `customize` adjust the options before spawning.
    pub fn fire_at_with<T, E>(
        &mut self,
        turret: &T,
        target: &E,
        customize: impl FnOnce(&mut ProjectileOptions),
    ) -> ProjectileId
    where
        T: Turret + ?Sized,
        E: Enemy + ?Sized,
    {
        let mut options = ProjectileOptions::new(
            turret.projectile_kind(),
            turret.position(),
            target.position(),
            turret.damage(),
            Attacker::of(turret),
        );
        options.target = Some(target.id());
        customize(&mut options);
        self.create(options)
    }

    /// Advances every projectile by `dt` frames and resolves collisions.
    ///
    /// Each projectile tests the enemies in insertion order and keeps hitting
    /// overlapping ones until a hit exhausts its pierce. Dead projectiles are
    /// compacted out in a single forward pass that preserves the order of
    /// survivors.
    pub fn update<E: Enemy>(&mut self, dt: f32, field: &mut Battlefield<'_, E>) {
        let tuning = &self.tuning;

        for projectile in &mut self.projectiles {
            projectile.update(dt, &*field.enemies, tuning);
            if !projectile.is_alive() {
                continue;
            }

            if projectile.is_out_of_bounds(field.playfield, tuning.bounds_margin) {
                projectile.expire();
                field.events.push(CombatEvent::Expired {
                    projectile: projectile.id(),
                });
                debug!(projectile = projectile.id().get(), "projectile left the playfield");
                continue;
            }

            for index in 0..field.enemies.len() {
                if projectile.check_collision(&field.enemies[index], tuning.default_enemy_radius) {
                    projectile.on_hit(index, field, tuning);
                    if !projectile.is_alive() {
                        break;
                    }
                }
            }
        }

        self.projectiles.retain(Projectile::is_alive);
    }

    /// Draws every live projectile onto `canvas`.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        let mut scratch: Vec<Vec2> = Vec::with_capacity(self.tuning.trail_capacity + 1);
        for projectile in &self.projectiles {
            projectile.render(canvas, &mut scratch);
        }
    }

    /// Discards every projectile, as on a restart.
    pub fn clear(&mut self) {
        self.projectiles.clear();
    }

    /// Number of live projectiles.
    #[must_use]
    pub fn count(&self) -> usize {
        self.projectiles.len()
    }

    /// Number of projectiles evicted under pool pressure since creation.
    #[must_use]
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Live projectiles from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }

    /// Looks up a live projectile.
    #[must_use]
    pub fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.projectiles.iter().find(|projectile| projectile.id() == id)
    }
}

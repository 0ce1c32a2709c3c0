#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects turret targets from the live enemy collection.
//!
//! Every selection compares squared distances so that no square root is taken
//! while choosing. Ties are broken by iteration order: the first enemy that
//! reaches the best score wins, which keeps selections reproducible as long as
//! the host preserves insertion order.

use bastion_core::{Enemy, TargetingMode};
use glam::Vec2;
use tracing::trace;

/// Speed assumed for enemies that do not report one.
const DEFAULT_SPEED: f32 = 1.0;

/// Targeting system that reuses a scratch buffer of candidate indices.
#[derive(Debug, Default)]
pub struct TargetingSystem {
    objective: Vec2,
    candidates: Vec<usize>,
}

impl TargetingSystem {
    /// Creates a targeting system that defends `objective`.
    #[must_use]
    pub fn new(objective: Vec2) -> Self {
        Self {
            objective,
            candidates: Vec::new(),
        }
    }

    /// Position enemies are trying to reach.
    #[must_use]
    pub fn objective(&self) -> Vec2 {
        self.objective
    }

    /// Moves the defended objective.
    pub fn set_objective(&mut self, objective: Vec2) {
        self.objective = objective;
    }

    /// Picks a target for a turret at `origin` according to `mode`.
    ///
    /// Returns `None` when no living enemy lies within `range`.
    pub fn find_target<'a, E: Enemy>(
        &mut self,
        enemies: &'a [E],
        origin: Vec2,
        mode: TargetingMode,
        range: f32,
    ) -> Option<&'a E> {
        self.collect_candidates(enemies, origin, range);
        if self.candidates.is_empty() {
            return None;
        }

        let candidates = &self.candidates;
        let index = match mode {
            TargetingMode::Nearest => nearest_to(enemies, candidates, origin),
            TargetingMode::Furthest => nearest_to(enemies, candidates, self.objective),
            TargetingMode::Strongest => {
                best_by(enemies, candidates, |enemy| enemy.hp(), Preference::Highest)
            }
            TargetingMode::Weakest => {
                best_by(enemies, candidates, |enemy| enemy.hp(), Preference::Lowest)
            }
            TargetingMode::Fastest => best_by(
                enemies,
                candidates,
                |enemy| f64::from(enemy.speed().unwrap_or(DEFAULT_SPEED)),
                Preference::Highest,
            ),
            TargetingMode::Cluster => {
                let centroid = centroid(enemies, candidates);
                nearest_to(enemies, candidates, centroid)
            }
            TargetingMode::Boss => first_matching(enemies, candidates, |enemy| enemy.is_boss())
                .or_else(|| nearest_to(enemies, candidates, origin)),
            TargetingMode::Flying => {
                first_matching(enemies, candidates, |enemy| enemy.is_flying())
                    .or_else(|| nearest_to(enemies, candidates, origin))
            }
        };

        let target = index.map(|index| &enemies[index]);
        if let Some(enemy) = target {
            trace!(?mode, enemy = enemy.id().get(), "target selected");
        }
        target
    }

    /// Living enemies whose centres lie within `range` of `center`, in iteration order.
    #[must_use]
    pub fn enemies_in_range<'a, E: Enemy>(
        &self,
        enemies: &'a [E],
        center: Vec2,
        range: f32,
    ) -> Vec<&'a E> {
        let range_sq = range * range;
        enemies
            .iter()
            .filter(|enemy| {
                !enemy.is_dead() && enemy.position().distance_squared(center) <= range_sq
            })
            .collect()
    }

    /// Living enemies caught by a blast of `radius` centred on `center`.
    #[must_use]
    pub fn enemies_in_splash<'a, E: Enemy>(
        &self,
        enemies: &'a [E],
        center: Vec2,
        radius: f32,
    ) -> Vec<&'a E> {
        self.enemies_in_range(enemies, center, radius)
    }

    /// Walks up to `count` jumps from `start`, each time choosing the nearest
    /// living enemy within `range` of the current anchor that has not been
    /// visited yet.
    ///
    /// The walk stops early once no candidate remains. `start` itself is never
    /// part of the result.
    #[must_use]
    pub fn find_chain_targets<'a, E: Enemy>(
        &self,
        enemies: &'a [E],
        start: &E,
        count: usize,
        range: f32,
    ) -> Vec<&'a E> {
        let range_sq = range * range;
        let mut anchor = start.position();
        let mut chain: Vec<&'a E> = Vec::with_capacity(count);

        for _ in 0..count {
            let mut best: Option<(f32, &'a E)> = None;
            for enemy in enemies {
                if enemy.is_dead() || enemy.id() == start.id() {
                    continue;
                }
                if chain.iter().any(|visited| visited.id() == enemy.id()) {
                    continue;
                }

                let distance_sq = enemy.position().distance_squared(anchor);
                if distance_sq > range_sq {
                    continue;
                }

                match best {
                    Some((best_sq, _)) if best_sq <= distance_sq => {}
                    _ => best = Some((distance_sq, enemy)),
                }
            }

            let Some((_, next)) = best else {
                break;
            };
            anchor = next.position();
            chain.push(next);
        }

        chain
    }

    /// Estimates where `target` will be when a projectile fired from `source`
    /// at `projectile_speed` arrives.
    ///
    /// Targets without a velocity, or a non-positive projectile speed, yield the
    /// target's current position.
    #[must_use]
    pub fn predict_position<E: Enemy>(
        &self,
        target: &E,
        source: Vec2,
        projectile_speed: f32,
    ) -> Vec2 {
        let position = target.position();
        let Some(velocity) = target.velocity() else {
            return position;
        };
        if projectile_speed <= 0.0 {
            return position;
        }

        let travel_time = position.distance(source) / projectile_speed;
        position + velocity * travel_time
    }

    /// Straight-line distance between two points, for display purposes.
    #[must_use]
    pub fn distance(a: Vec2, b: Vec2) -> f32 {
        a.distance(b)
    }

    fn collect_candidates<E: Enemy>(&mut self, enemies: &[E], origin: Vec2, range: f32) {
        self.candidates.clear();
        let range_sq = range * range;

        for (index, enemy) in enemies.iter().enumerate() {
            if enemy.is_dead() {
                continue;
            }
            if enemy.position().distance_squared(origin) <= range_sq {
                self.candidates.push(index);
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Preference {
    Lowest,
    Highest,
}

impl Preference {
    fn improves(self, candidate: f64, best: f64) -> bool {
        match self {
            Self::Lowest => candidate < best,
            Self::Highest => candidate > best,
        }
    }
}

fn best_by<E: Enemy>(
    enemies: &[E],
    candidates: &[usize],
    score: impl Fn(&E) -> f64,
    preference: Preference,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for &index in candidates {
        let value = score(&enemies[index]);
        match best {
            Some((_, best_value)) if !preference.improves(value, best_value) => {}
            _ => best = Some((index, value)),
        }
    }

    best.map(|(index, _)| index)
}

fn nearest_to<E: Enemy>(enemies: &[E], candidates: &[usize], point: Vec2) -> Option<usize> {
    best_by(
        enemies,
        candidates,
        |enemy| f64::from(enemy.position().distance_squared(point)),
        Preference::Lowest,
    )
}

fn first_matching<E: Enemy>(
    enemies: &[E],
    candidates: &[usize],
    predicate: impl Fn(&E) -> bool,
) -> Option<usize> {
    candidates
        .iter()
        .copied()
        .find(|&index| predicate(&enemies[index]))
}

fn centroid<E: Enemy>(enemies: &[E], candidates: &[usize]) -> Vec2 {
    let sum = candidates
        .iter()
        .fold(Vec2::ZERO, |sum, &index| sum + enemies[index].position());
    sum / candidates.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_core::EnemyId;

    #[derive(Clone, Debug)]
    struct Probe {
        id: u32,
        position: Vec2,
        hp: f64,
        speed: Option<f32>,
        velocity: Option<Vec2>,
        boss: bool,
        flying: bool,
        dead: bool,
    }

    impl Probe {
        fn at(id: u32, x: f32, y: f32) -> Self {
            Self {
                id,
                position: Vec2::new(x, y),
                hp: 100.0,
                speed: None,
                velocity: None,
                boss: false,
                flying: false,
                dead: false,
            }
        }
    }

    impl Enemy for Probe {
        fn id(&self) -> EnemyId {
            EnemyId::new(self.id)
        }

        fn position(&self) -> Vec2 {
            self.position
        }

        fn hp(&self) -> f64 {
            self.hp
        }

        fn max_hp(&self) -> f64 {
            100.0
        }

        fn is_dead(&self) -> bool {
            self.dead
        }

        fn speed(&self) -> Option<f32> {
            self.speed
        }

        fn velocity(&self) -> Option<Vec2> {
            self.velocity
        }

        fn is_boss(&self) -> bool {
            self.boss
        }

        fn is_flying(&self) -> bool {
            self.flying
        }
    }

    fn ids(enemies: &[&Probe]) -> Vec<u32> {
        enemies.iter().map(|enemy| enemy.id).collect()
    }

    #[test]
    fn nearest_prefers_smallest_distance_within_range() {
        let mut system = TargetingSystem::new(Vec2::ZERO);
        let enemies = vec![
            Probe::at(1, 50.0, 0.0),
            Probe::at(2, 20.0, 0.0),
            Probe::at(3, 5.0, 0.0),
        ];
        let mut dead = Probe::at(4, 1.0, 0.0);
        dead.dead = true;
        let mut enemies = enemies;
        enemies.push(dead);

        let target = system
            .find_target(&enemies, Vec2::ZERO, TargetingMode::Nearest, 100.0)
            .expect("target in range");
        assert_eq!(target.id, 3);
    }

    #[test]
    fn enemies_outside_range_are_never_selected() {
        let mut system = TargetingSystem::new(Vec2::ZERO);
        let enemies = vec![Probe::at(1, 101.0, 0.0), Probe::at(2, 0.0, -150.0)];

        for mode in [
            TargetingMode::Nearest,
            TargetingMode::Furthest,
            TargetingMode::Strongest,
            TargetingMode::Cluster,
            TargetingMode::Boss,
        ] {
            assert!(system
                .find_target(&enemies, Vec2::ZERO, mode, 100.0)
                .is_none());
        }
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let mut system = TargetingSystem::new(Vec2::ZERO);
        let enemies = vec![Probe::at(1, 30.0, 40.0)];
        let target = system.find_target(&enemies, Vec2::ZERO, TargetingMode::Nearest, 50.0);
        assert_eq!(target.map(|enemy| enemy.id), Some(1));
    }

    #[test]
    fn furthest_picks_enemy_closest_to_objective() {
        let mut system = TargetingSystem::new(Vec2::new(200.0, 0.0));
        let enemies = vec![Probe::at(1, 10.0, 0.0), Probe::at(2, 90.0, 0.0)];
        let target = system
            .find_target(&enemies, Vec2::ZERO, TargetingMode::Furthest, 100.0)
            .expect("target");
        assert_eq!(target.id, 2);
    }

    #[test]
    fn strongest_and_weakest_break_ties_by_iteration_order() {
        let mut system = TargetingSystem::new(Vec2::ZERO);
        let mut enemies = vec![
            Probe::at(1, 10.0, 0.0),
            Probe::at(2, 20.0, 0.0),
            Probe::at(3, 30.0, 0.0),
        ];
        enemies[0].hp = 50.0;
        enemies[1].hp = 80.0;
        enemies[2].hp = 80.0;

        let strongest = system
            .find_target(&enemies, Vec2::ZERO, TargetingMode::Strongest, 100.0)
            .expect("strongest");
        assert_eq!(strongest.id, 2);

        enemies[1].hp = 50.0;
        let weakest = system
            .find_target(&enemies, Vec2::ZERO, TargetingMode::Weakest, 100.0)
            .expect("weakest");
        assert_eq!(weakest.id, 1);
    }

    #[test]
    fn fastest_defaults_missing_speed_to_one() {
        let mut system = TargetingSystem::new(Vec2::ZERO);
        let mut enemies = vec![Probe::at(1, 10.0, 0.0), Probe::at(2, 20.0, 0.0)];
        enemies[1].speed = Some(0.5);
        let target = system
            .find_target(&enemies, Vec2::ZERO, TargetingMode::Fastest, 100.0)
            .expect("fastest");
        assert_eq!(target.id, 1);

        enemies[1].speed = Some(2.5);
        let target = system
            .find_target(&enemies, Vec2::ZERO, TargetingMode::Fastest, 100.0)
            .expect("fastest");
        assert_eq!(target.id, 2);
    }

    #[test]
    fn cluster_returns_enemy_nearest_centroid() {
        let mut system = TargetingSystem::new(Vec2::ZERO);
        let enemies = vec![
            Probe::at(1, -60.0, 0.0),
            Probe::at(2, 40.0, 0.0),
            Probe::at(3, 50.0, 0.0),
            Probe::at(4, 60.0, 10.0),
        ];
        // Centroid sits at (22.5, 2.5).
        let target = system
            .find_target(&enemies, Vec2::ZERO, TargetingMode::Cluster, 100.0)
            .expect("cluster");
        assert_eq!(target.id, 2);
    }

    #[test]
    fn boss_and_flying_fall_back_to_nearest() {
        let mut system = TargetingSystem::new(Vec2::ZERO);
        let mut enemies = vec![Probe::at(1, 40.0, 0.0), Probe::at(2, 10.0, 0.0)];

        let fallback = system
            .find_target(&enemies, Vec2::ZERO, TargetingMode::Boss, 100.0)
            .expect("fallback");
        assert_eq!(fallback.id, 2);
        let fallback = system
            .find_target(&enemies, Vec2::ZERO, TargetingMode::Flying, 100.0)
            .expect("fallback");
        assert_eq!(fallback.id, 2);

        enemies[0].boss = true;
        enemies[0].flying = true;
        let boss = system
            .find_target(&enemies, Vec2::ZERO, TargetingMode::Boss, 100.0)
            .expect("boss");
        assert_eq!(boss.id, 1);
        let flyer = system
            .find_target(&enemies, Vec2::ZERO, TargetingMode::Flying, 100.0)
            .expect("flyer");
        assert_eq!(flyer.id, 1);
    }

    #[test]
    fn splash_query_matches_range_query() {
        let system = TargetingSystem::new(Vec2::ZERO);
        let enemies = vec![
            Probe::at(1, 5.0, 0.0),
            Probe::at(2, 25.0, 0.0),
            Probe::at(3, 0.0, 9.0),
        ];
        let in_range = system.enemies_in_range(&enemies, Vec2::ZERO, 10.0);
        let in_splash = system.enemies_in_splash(&enemies, Vec2::ZERO, 10.0);
        assert_eq!(ids(&in_range), vec![1, 3]);
        assert_eq!(ids(&in_range), ids(&in_splash));
    }

    #[test]
    fn chain_walks_greedily_and_stops_early() {
        let system = TargetingSystem::new(Vec2::ZERO);
        let enemies = vec![
            Probe::at(1, 0.0, 0.0),
            Probe::at(2, 30.0, 0.0),
            Probe::at(3, 55.0, 0.0),
            Probe::at(4, 500.0, 0.0),
        ];

        let chain = system.find_chain_targets(&enemies, &enemies[0], 5, 40.0);
        assert_eq!(ids(&chain), vec![2, 3]);
    }

    #[test]
    fn chain_respects_count_and_never_revisits() {
        let system = TargetingSystem::new(Vec2::ZERO);
        let enemies = vec![
            Probe::at(1, 0.0, 0.0),
            Probe::at(2, 10.0, 0.0),
            Probe::at(3, -10.0, 0.0),
            Probe::at(4, 20.0, 0.0),
        ];

        let chain = system.find_chain_targets(&enemies, &enemies[0], 2, 15.0);
        assert_eq!(chain.len(), 2);
        assert_eq!(ids(&chain), vec![2, 4]);
    }

    #[test]
    fn prediction_leads_moving_targets() {
        let system = TargetingSystem::new(Vec2::ZERO);
        let mut target = Probe::at(1, 100.0, 0.0);
        assert_eq!(
            system.predict_position(&target, Vec2::ZERO, 10.0),
            Vec2::new(100.0, 0.0)
        );

        target.velocity = Some(Vec2::new(0.0, 2.0));
        let predicted = system.predict_position(&target, Vec2::ZERO, 10.0);
        assert!((predicted - Vec2::new(100.0, 20.0)).length() < 1e-4);
    }
}

//! Headless skirmish that wires targeting, projectiles and damage together.

use bastion_core::{Attacker, Canvas, Color, CombatEvent, Playfield, Turret};
use bastion_system_damage::{DamageSystem, DpsBreakdown};
use bastion_system_projectiles::{Battlefield, ProjectileSystem};
use bastion_system_targeting::TargetingSystem;
use bastion_world::{query, CreepSpec, World, WorldEvent};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::scenario::{CreepSettings, Scenario};

const FRAME: f32 = 1.0;
const BOSS_HP_FACTOR: f64 = 5.0;
const BOSS_RADIUS: f32 = 22.0;

/// Totals gathered while a skirmish runs.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct SkirmishReport {
    pub(crate) ticks: u64,
    pub(crate) spawned: u32,
    pub(crate) shots: u64,
    pub(crate) hits: u64,
    pub(crate) splash_hits: u64,
    pub(crate) chain_arcs: u64,
    pub(crate) expired: u64,
    pub(crate) kills: u64,
    pub(crate) leaks: u64,
    pub(crate) damage_dealt: f64,
    pub(crate) live_projectiles: usize,
    pub(crate) evicted: u64,
    pub(crate) draw_calls: usize,
    pub(crate) remaining_hp: f64,
}

/// Counts the primitives a frame would draw.
#[derive(Debug, Default)]
struct DrawCounter {
    polylines: usize,
    circles: usize,
}

impl Canvas for DrawCounter {
    fn stroke_polyline(&mut self, _points: &[Vec2], _width: f32, _color: Color) {
        self.polylines += 1;
    }

    fn fill_circle(&mut self, _center: Vec2, _radius: f32, _color: Color) {
        self.circles += 1;
    }
}

/// Owns every system taking part in a skirmish.
pub(crate) struct Skirmish {
    world: World,
    playfield: Playfield,
    creeps: CreepSettings,
    targeting: TargetingSystem,
    projectiles: ProjectileSystem,
    damage: DamageSystem,
    spawn_rng: ChaCha8Rng,
    events: Vec<CombatEvent>,
    world_events: Vec<WorldEvent>,
    report: SkirmishReport,
}

impl Skirmish {
    /// Builds a skirmish from `scenario`, seeding every random source from `seed`.
    pub(crate) fn new(scenario: &Scenario, seed: u64) -> Self {
        let playfield = Playfield::new(scenario.map.width, scenario.map.height);
        let objective = Vec2::new(playfield.width(), playfield.height() * 0.5);
        let mut world = World::new(playfield, objective);
        for spec in scenario.tower_specs() {
            let _ = world.place_tower(spec);
        }

        let tuning = scenario.combat_tuning();
        Self {
            world,
            playfield,
            creeps: scenario.creeps,
            targeting: TargetingSystem::new(objective),
            projectiles: ProjectileSystem::new(tuning.projectiles),
            damage: DamageSystem::seeded(tuning.damage, scenario.modifiers, seed),
            spawn_rng: ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)),
            events: Vec::new(),
            world_events: Vec::new(),
            report: SkirmishReport::default(),
        }
    }

    /// Runs `ticks` frames and returns the accumulated report.
    pub(crate) fn run(mut self, ticks: u64) -> SkirmishReport {
        for _ in 0..ticks {
            self.step();
        }

        let mut canvas = DrawCounter::default();
        self.projectiles.render(&mut canvas);
        self.report.draw_calls = canvas.polylines + canvas.circles;
        self.report.live_projectiles = self.projectiles.count();
        self.report.evicted = self.projectiles.evicted();
        self.report.remaining_hp = query::remaining_hp(&self.world);
        self.report
    }

    /// Steady-state damage estimates for every tower.
    pub(crate) fn dps_breakdowns(&self) -> Vec<(u32, DpsBreakdown)> {
        self.world
            .towers()
            .iter()
            .map(|tower| {
                let attacker = Attacker::of(tower);
                let breakdown =
                    self.damage
                        .dps_breakdown(tower.damage(), &attacker, tower.fire_rate());
                (tower.id().get(), breakdown)
            })
            .collect()
    }

    fn step(&mut self) {
        self.report.ticks += 1;
        self.spawn_due_creep();
        self.fire_ready_towers();

        self.events.clear();
        {
            let (_, creeps) = self.world.split_mut();
            let mut field = Battlefield {
                enemies: creeps,
                playfield: self.playfield,
                resolver: &mut self.damage,
                events: &mut self.events,
            };
            self.projectiles.update(FRAME, &mut field);
        }
        self.record_combat_events();

        self.world_events.clear();
        self.world.tick(FRAME, &mut self.world_events);
        for event in &self.world_events {
            match event {
                WorldEvent::CreepKilled { enemy } => {
                    self.report.kills += 1;
                    debug!(enemy = enemy.get(), "creep killed");
                }
                WorldEvent::CreepLeaked { .. } => self.report.leaks += 1,
            }
        }
    }

    fn spawn_due_creep(&mut self) {
        let settings = self.creeps;
        if self.report.spawned >= settings.count {
            return;
        }
        let interval = u64::from(settings.spawn_interval.max(1));
        if (self.report.ticks - 1) % interval != 0 {
            return;
        }

        let ordinal = self.report.spawned + 1;
        let boss = settings.boss_every > 0 && ordinal % settings.boss_every == 0;
        let flying = settings.flying_every > 0 && ordinal % settings.flying_every == 0;
        let jitter: f64 = self.spawn_rng.gen_range(0.8..1.2);
        let lane: f32 = self.spawn_rng.gen_range(0.2..0.8);

        let spec = CreepSpec {
            position: Vec2::new(0.0, self.playfield.height() * lane),
            max_hp: settings.hp * jitter * if boss { BOSS_HP_FACTOR } else { 1.0 },
            speed: settings.speed,
            armor: settings.armor,
            radius: boss.then_some(BOSS_RADIUS),
            boss,
            flying,
        };
        let _ = self.world.spawn_creep(spec);
        self.report.spawned = ordinal;
    }

    fn fire_ready_towers(&mut self) {
        let (towers, creeps) = self.world.split_mut();
        let creeps = &*creeps;

        for tower in towers.iter_mut() {
            if !tower.is_ready() {
                continue;
            }
            let origin = tower.position();
            let Some(target) = self
                .targeting
                .find_target(creeps, origin, tower.mode(), tower.range())
            else {
                continue;
            };

            let speed = self
                .projectiles
                .tuning()
                .profile(tower.projectile_kind())
                .speed;
            let aim = self.targeting.predict_position(target, origin, speed);
            let _ = self
                .projectiles
                .fire_at_with(&*tower, target, |options| options.target_position = aim);
            tower.reload();
            self.report.shots += 1;
        }
    }

    fn record_combat_events(&mut self) {
        for event in &self.events {
            match event {
                CombatEvent::Hit { amount, .. } => {
                    self.report.hits += 1;
                    self.report.damage_dealt += amount;
                }
                CombatEvent::SplashHit { amount, .. } => {
                    self.report.splash_hits += 1;
                    self.report.damage_dealt += amount;
                }
                CombatEvent::ChainArc { amount, .. } => {
                    self.report.chain_arcs += 1;
                    self.report.damage_dealt += amount;
                }
                CombatEvent::Expired { .. } => self.report.expired += 1,
            }
        }
    }
}

/// Logs a finished report.
pub(crate) fn log_report(report: &SkirmishReport) {
    info!(
        ticks = report.ticks,
        spawned = report.spawned,
        kills = report.kills,
        leaks = report.leaks,
        remaining_hp = report.remaining_hp,
        "skirmish finished"
    );
    info!(
        shots = report.shots,
        hits = report.hits,
        splash_hits = report.splash_hits,
        chain_arcs = report.chain_arcs,
        expired = report.expired,
        damage_dealt = report.damage_dealt,
        "combat events"
    );
    info!(
        live = report.live_projectiles,
        evicted = report.evicted,
        draw_calls = report.draw_calls,
        "projectile pool"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_replays_identically() {
        let scenario = Scenario::default();
        let first = Skirmish::new(&scenario, 11).run(600);
        let second = Skirmish::new(&scenario, 11).run(600);
        assert_eq!(first, second);
    }

    #[test]
    fn towers_engage_spawned_creeps() {
        let scenario = Scenario::default();
        let report = Skirmish::new(&scenario, 3).run(900);
        assert!(report.spawned > 0);
        assert!(report.shots > 0);
        assert!(report.hits > 0);
        assert!(report.damage_dealt > 0.0);
    }

    #[test]
    fn spawning_stops_at_configured_count() {
        let mut scenario = Scenario::default();
        scenario.creeps.count = 3;
        scenario.creeps.spawn_interval = 1;
        scenario.towers = Vec::new();
        let report = Skirmish::new(&scenario, 5).run(10);
        assert_eq!(report.spawned, 3);
    }

    #[test]
    fn breakdown_covers_every_tower() {
        let scenario = Scenario::default();
        let skirmish = Skirmish::new(&scenario, 1);
        let breakdowns = skirmish.dps_breakdowns();
        assert_eq!(breakdowns.len(), scenario.tower_specs().len());
        assert!(breakdowns.iter().all(|(_, breakdown)| breakdown.dps > 0.0));
    }
}

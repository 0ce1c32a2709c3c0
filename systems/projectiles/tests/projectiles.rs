use std::collections::BTreeMap;

use bastion_core::{
    Attacker, CombatEvent, Enemy, EnemyId, PassThrough, Playfield, ProjectileKind, SourceId,
    TowerId,
};
use bastion_system_projectiles::{Battlefield, ProjectileOptions, ProjectileSystem};
use bastion_world::{CreepSpec, World};
use glam::Vec2;

const PLAYFIELD: Playfield = Playfield::new(1_000.0, 1_000.0);

fn world_with(positions: &[(f32, f32)]) -> World {
    let mut world = World::new(PLAYFIELD, Vec2::new(1_000.0, 1_000.0));
    for &(x, y) in positions {
        let _ = world.spawn_creep(CreepSpec {
            position: Vec2::new(x, y),
            max_hp: 1_000.0,
            ..CreepSpec::default()
        });
    }
    world
}

fn shot(kind: ProjectileKind, target: Vec2, damage: f64) -> ProjectileOptions {
    ProjectileOptions::new(
        kind,
        Vec2::ZERO,
        target,
        damage,
        Attacker::new(SourceId::Tower(TowerId::new(0))),
    )
}

/// Runs `ticks` frames and returns every event tagged with the frame it happened on.
fn simulate(system: &mut ProjectileSystem, world: &mut World, ticks: u32) -> Vec<(u32, CombatEvent)> {
    let mut resolver = PassThrough;
    let mut log = Vec::new();
    for tick in 1..=ticks {
        let mut events = Vec::new();
        let mut field = Battlefield {
            enemies: world.creeps_mut(),
            playfield: PLAYFIELD,
            resolver: &mut resolver,
            events: &mut events,
        };
        system.update(1.0, &mut field);
        log.extend(events.into_iter().map(|event| (tick, event)));
    }
    log
}

fn touched_enemies(log: &[(u32, CombatEvent)]) -> BTreeMap<EnemyId, usize> {
    let mut touched = BTreeMap::new();
    for (_, event) in log {
        let enemy = match event {
            CombatEvent::Hit { enemy, .. }
            | CombatEvent::SplashHit { enemy, .. }
            | CombatEvent::ChainArc { enemy, .. } => *enemy,
            CombatEvent::Expired { .. } => continue,
        };
        *touched.entry(enemy).or_insert(0) += 1;
    }
    touched
}

#[test]
fn bullet_reaches_enemy_within_nine_ticks_and_hits_once() {
    let mut world = world_with(&[(100.0, 0.0)]);
    let mut system = ProjectileSystem::default();
    let _ = system.create(shot(ProjectileKind::Bullet, Vec2::new(100.0, 0.0), 10.0));

    let log = simulate(&mut system, &mut world, 30);
    let hits: Vec<u32> = log
        .iter()
        .filter(|(_, event)| matches!(event, CombatEvent::Hit { .. }))
        .map(|(tick, _)| *tick)
        .collect();

    // Reach is 4 + 15 = 19, first met at x = 84 on the seventh frame.
    assert_eq!(hits, vec![7]);
    assert!(hits[0] <= 9);
    assert_eq!(system.count(), 0);
    assert!((world.creeps()[0].hp() - 990.0).abs() < f64::EPSILON);
}

#[test]
fn pierce_n_dies_after_n_plus_one_primary_hits() {
    for pierce in 0..=3u32 {
        let mut world = world_with(&[
            (40.0, 0.0),
            (80.0, 0.0),
            (120.0, 0.0),
            (160.0, 0.0),
            (200.0, 0.0),
            (240.0, 0.0),
        ]);
        let mut system = ProjectileSystem::default();
        let mut options = shot(ProjectileKind::Laser, Vec2::new(500.0, 0.0), 5.0);
        options.pierce = Some(pierce);
        let _ = system.create(options);

        let log = simulate(&mut system, &mut world, 20);
        let hits = log
            .iter()
            .filter(|(_, event)| matches!(event, CombatEvent::Hit { .. }))
            .count();
        assert_eq!(hits, pierce as usize + 1, "pierce {pierce}");
        assert_eq!(system.count(), 0, "pierce {pierce}");
    }
}

#[test]
fn piercing_shot_passes_through_stacked_enemies_in_one_frame() {
    let mut world = world_with(&[(100.0, 0.0), (100.0, 0.0), (100.0, 0.0)]);
    let mut system = ProjectileSystem::default();
    let mut options = shot(ProjectileKind::Laser, Vec2::new(100.0, 0.0), 10.0);
    options.speed = Some(30.0);
    let _ = system.create(options);

    let log = simulate(&mut system, &mut world, 30);
    let hits: Vec<(u32, EnemyId)> = log
        .iter()
        .filter_map(|(tick, event)| match event {
            CombatEvent::Hit { enemy, .. } => Some((*tick, *enemy)),
            _ => None,
        })
        .collect();

    // Third frame reaches x = 90, inside the 3 + 15 reach of every creep.
    assert_eq!(
        hits,
        vec![(3, EnemyId::new(0)), (3, EnemyId::new(1)), (3, EnemyId::new(2))]
    );
    assert_eq!(system.count(), 0, "pierce 2 is spent after three hits");
    assert!(world
        .creeps()
        .iter()
        .all(|creep| (creep.hp() - 990.0).abs() < f64::EPSILON));
}

#[test]
fn splash_never_double_counts_an_enemy() {
    let mut world = world_with(&[(100.0, 0.0), (110.0, 10.0), (95.0, -20.0), (200.0, 0.0)]);
    let mut system = ProjectileSystem::default();
    let mut options = shot(ProjectileKind::Missile, Vec2::new(300.0, 0.0), 20.0);
    options.pierce = Some(1);
    let _ = system.create(options);

    let log = simulate(&mut system, &mut world, 40);
    let touched = touched_enemies(&log);
    assert_eq!(touched.len(), 4);
    assert!(touched.values().all(|&count| count == 1), "{touched:?}");

    let hp: Vec<f64> = world.creeps().iter().map(Enemy::hp).collect();
    assert_eq!(hp, vec![980.0, 990.0, 990.0, 980.0]);
    assert_eq!(system.count(), 0);
}

#[test]
fn chain_stops_when_no_enemy_remains_in_range() {
    let mut world = world_with(&[(100.0, 0.0), (150.0, 0.0), (600.0, 0.0)]);
    let mut system = ProjectileSystem::default();
    let _ = system.create(shot(ProjectileKind::Tesla, Vec2::new(100.0, 0.0), 10.0));

    let log = simulate(&mut system, &mut world, 12);
    let arcs: Vec<(EnemyId, f64)> = log
        .iter()
        .filter_map(|(_, event)| match event {
            CombatEvent::ChainArc { enemy, amount, .. } => Some((*enemy, *amount)),
            _ => None,
        })
        .collect();

    assert_eq!(arcs, vec![(EnemyId::new(1), 7.0)]);
    assert!((world.creeps()[2].hp() - 1_000.0).abs() < f64::EPSILON);
}

#[test]
fn ice_and_poison_apply_their_effects_to_the_primary_target() {
    let mut world = world_with(&[(60.0, 0.0), (0.0, 60.0)]);
    let mut system = ProjectileSystem::default();
    let _ = system.create(shot(ProjectileKind::Ice, Vec2::new(60.0, 0.0), 10.0));
    let _ = system.create(shot(ProjectileKind::Poison, Vec2::new(0.0, 60.0), 10.0));

    let _ = simulate(&mut system, &mut world, 10);
    let creeps = world.creeps();
    assert!((creeps[0].slow_amount() - 0.5).abs() < f32::EPSILON);
    assert_eq!(creeps[0].active_dots(), 0);
    assert_eq!(creeps[1].active_dots(), 1);
    assert!((creeps[1].slow_amount()).abs() < f32::EPSILON);
}

#[test]
fn poison_deals_a_share_of_shot_damage_over_time() {
    let mut world = world_with(&[(0.0, 60.0)]);
    let mut system = ProjectileSystem::default();
    let _ = system.create(shot(ProjectileKind::Poison, Vec2::new(0.0, 60.0), 10.0));

    let _ = simulate(&mut system, &mut world, 10);
    assert!((world.creeps()[0].hp() - 990.0).abs() < f64::EPSILON);

    let mut events = Vec::new();
    for _ in 0..200 {
        world.tick(1.0, &mut events);
    }

    // 0.3 of a 10 damage shot, spread over 180 frames.
    let creep = &world.creeps()[0];
    assert_eq!(creep.active_dots(), 0);
    assert!((creep.hp() - 987.0).abs() < 1e-6, "hp {}", creep.hp());
    assert!(events.is_empty());
}

#[test]
fn dead_enemies_are_passed_over() {
    use bastion_core::Damageable;

    let mut world = world_with(&[(60.0, 0.0), (120.0, 0.0)]);
    world.creeps_mut()[0].take_damage(5_000.0, SourceId::Tower(TowerId::new(1)));
    let mut system = ProjectileSystem::default();
    let _ = system.create(shot(ProjectileKind::Bullet, Vec2::new(200.0, 0.0), 10.0));

    let log = simulate(&mut system, &mut world, 20);
    let touched = touched_enemies(&log);
    assert_eq!(touched.keys().copied().collect::<Vec<_>>(), vec![EnemyId::new(1)]);
}

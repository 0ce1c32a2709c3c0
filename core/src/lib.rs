#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Bastion combat engine.
//!
//! This crate defines the vocabulary that connects the host game, the
//! targeting, projectile and damage systems. Hosts expose their enemies
//! through the [`Enemy`] trait and their turrets through [`Turret`]. Effects an
//! enemy may or may not support are modelled as optional capabilities that the
//! systems look up before invoking, so an enemy lacking one is skipped
//! silently. Systems report what happened during a frame as [`CombatEvent`]
//! values written into caller-owned buffers.

use glam::Vec2;
use serde::{Deserialize, Serialize};

mod profile;
mod render;
pub mod tuning;

pub use profile::{DotEffect, ProjectileKind, ProjectileProfile, SlowEffect};
pub use render::{Canvas, Color};
pub use tuning::{CombatTuning, DamageTuning, ProjectileTuning, TuningError};

/// Radius assumed for enemies that do not report one.
pub const DEFAULT_ENEMY_RADIUS: f32 = 15.0;

/// Unique identifier assigned to an enemy by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a turret by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an active skill by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SkillId(u32);

impl SkillId {
    /// Creates a new skill identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the skill identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier allocated to a projectile by the projectile system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the projectile identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Owner of a damage-carrying effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceId {
    /// Damage originating from a placed turret.
    Tower(TowerId),
    /// Damage originating from an activated skill.
    Skill(SkillId),
}

/// Strategy a turret uses to pick among in-range candidates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetingMode {
    /// Closest enemy to the turret.
    #[default]
    Nearest,
    /// Enemy closest to the defended objective.
    Furthest,
    /// Enemy with the most current hit points.
    Strongest,
    /// Enemy with the fewest current hit points.
    Weakest,
    /// Enemy with the highest speed stat.
    Fastest,
    /// Enemy nearest the centroid of all candidates.
    Cluster,
    /// First boss-type enemy, otherwise the nearest one.
    Boss,
    /// First flying enemy, otherwise the nearest one.
    Flying,
}

/// Axis-aligned playable area measured from the origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    width: f32,
    height: f32,
}

impl Playfield {
    /// Creates a playfield spanning `width` by `height` world units.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal extent of the playfield.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent of the playfield.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Reports whether `point` lies within the playfield grown by `margin` on every side.
    #[must_use]
    pub fn contains_with_margin(&self, point: Vec2, margin: f32) -> bool {
        point.x >= -margin
            && point.x <= self.width + margin
            && point.y >= -margin
            && point.y <= self.height + margin
    }
}

/// Read access every enemy must provide to the combat systems.
///
/// Optional stats default to "absent". The capability accessors return `None`
/// by default, which the systems treat as "this enemy ignores the effect".
pub trait Enemy {
    /// Stable identifier of the enemy.
    fn id(&self) -> EnemyId;

    /// Centre of the enemy in world units.
    fn position(&self) -> Vec2;

    /// Current hit points.
    fn hp(&self) -> f64;

    /// Hit points at full health.
    fn max_hp(&self) -> f64;

    /// Reports whether the enemy has been removed from play.
    fn is_dead(&self) -> bool;

    /// Collision radius, if the enemy specifies one.
    fn radius(&self) -> Option<f32> {
        None
    }

    /// Fraction of incoming damage absorbed by armor.
    fn armor(&self) -> Option<f64> {
        None
    }

    /// Movement speed stat.
    fn speed(&self) -> Option<f32> {
        None
    }

    /// Current velocity in world units per frame.
    fn velocity(&self) -> Option<Vec2> {
        None
    }

    /// Reports whether the enemy is a boss.
    fn is_boss(&self) -> bool {
        false
    }

    /// Reports whether the enemy flies.
    fn is_flying(&self) -> bool {
        false
    }

    /// Capability to receive direct damage.
    fn damageable(&mut self) -> Option<&mut dyn Damageable> {
        None
    }

    /// Capability to be slowed.
    fn slowable(&mut self) -> Option<&mut dyn Slowable> {
        None
    }

    /// Capability to suffer damage over time.
    fn dot_receiver(&mut self) -> Option<&mut dyn DotReceiver> {
        None
    }
}

/// Enemy capability that accepts direct damage.
pub trait Damageable {
    /// Subtracts `amount` hit points attributed to `source`.
    fn take_damage(&mut self, amount: f64, source: SourceId);
}

/// Enemy capability that accepts movement slows.
pub trait Slowable {
    /// Reduces speed by the `amount` fraction for `duration` frames.
    fn apply_slow(&mut self, amount: f32, duration: f32);
}

/// Enemy capability that accepts damage over time.
pub trait DotReceiver {
    /// Deals `amount` total damage spread across `duration` frames.
    fn apply_dot(&mut self, amount: f64, duration: f32);
}

/// Damage-dealing structure placed by the player.
pub trait Turret {
    /// Identifier used to attribute damage.
    fn source(&self) -> SourceId;

    /// Muzzle position in world units.
    fn position(&self) -> Vec2;

    /// Base damage carried by every projectile fired.
    fn damage(&self) -> f64;

    /// Kind of projectile the turret fires.
    fn projectile_kind(&self) -> ProjectileKind;

    /// Evolution tier, starting at 1.
    fn tier(&self) -> u32 {
        1
    }

    /// Turret-specific base crit chance in percent.
    fn crit_chance(&self) -> Option<f64> {
        None
    }

    /// Turret-specific base crit multiplier.
    fn crit_multiplier(&self) -> Option<f64> {
        None
    }

    /// Bonus damage per point of target armor.
    fn armor_penetration(&self) -> f64 {
        0.0
    }
}

/// Attacker-side stats that the damage pipeline consumes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attacker {
    /// Identifier used to attribute damage and look up per-source bonuses.
    pub source: SourceId,
    /// Evolution tier, starting at 1.
    pub tier: u32,
    /// Base crit chance override in percent.
    pub crit_chance: Option<f64>,
    /// Base crit multiplier override.
    pub crit_multiplier: Option<f64>,
    /// Bonus damage per point of target armor.
    pub armor_penetration: f64,
}

impl Attacker {
    /// Creates a tier-one attacker without overrides.
    #[must_use]
    pub const fn new(source: SourceId) -> Self {
        Self {
            source,
            tier: 1,
            crit_chance: None,
            crit_multiplier: None,
            armor_penetration: 0.0,
        }
    }

    /// Captures the attacker stats exposed by a turret.
    #[must_use]
    pub fn of<T: Turret + ?Sized>(turret: &T) -> Self {
        Self {
            source: turret.source(),
            tier: turret.tier(),
            crit_chance: turret.crit_chance(),
            crit_multiplier: turret.crit_multiplier(),
            armor_penetration: turret.armor_penetration(),
        }
    }
}

/// Input to a damage calculation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageRequest {
    /// Damage before any multiplier is applied. Must not be negative.
    pub base_damage: f64,
    /// Stats of the dealer.
    pub attacker: Attacker,
    /// Armor reported by the receiving enemy, if any.
    pub target_armor: Option<f64>,
    /// Whether the hit may roll a critical strike.
    pub can_crit: bool,
}

/// Turns a pre-multiplier damage amount into the amount an enemy receives.
pub trait DamageResolver {
    /// Resolves the final damage for `request`.
    fn resolve(&mut self, request: DamageRequest) -> f64;
}

/// Resolver that forwards the base damage unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassThrough;

impl DamageResolver for PassThrough {
    fn resolve(&mut self, request: DamageRequest) -> f64 {
        request.base_damage
    }
}

/// Outcomes reported by the projectile system during a frame.
#[derive(Clone, Debug, PartialEq)]
pub enum CombatEvent {
    /// A projectile struck an enemy directly.
    Hit {
        /// Projectile that collided.
        projectile: ProjectileId,
        /// Enemy that was struck.
        enemy: EnemyId,
        /// Damage handed to the enemy after resolution.
        amount: f64,
    },
    /// An enemy took splash damage from a nearby impact.
    SplashHit {
        /// Projectile whose impact splashed.
        projectile: ProjectileId,
        /// Enemy caught in the blast.
        enemy: EnemyId,
        /// Damage handed to the enemy.
        amount: f64,
    },
    /// Lightning jumped between two enemies.
    ChainArc {
        /// Projectile whose hit started the chain.
        projectile: ProjectileId,
        /// Enemy the arc landed on.
        enemy: EnemyId,
        /// Position the arc left from.
        from: Vec2,
        /// Position the arc arrived at.
        to: Vec2,
        /// Damage handed to the enemy.
        amount: f64,
    },
    /// A projectile left the playfield and was discarded.
    Expired {
        /// Projectile that expired.
        projectile: ProjectileId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy;

    impl Enemy for Dummy {
        fn id(&self) -> EnemyId {
            EnemyId::new(3)
        }

        fn position(&self) -> Vec2 {
            Vec2::ZERO
        }

        fn hp(&self) -> f64 {
            10.0
        }

        fn max_hp(&self) -> f64 {
            10.0
        }

        fn is_dead(&self) -> bool {
            false
        }
    }

    struct Cannon;

    impl Turret for Cannon {
        fn source(&self) -> SourceId {
            SourceId::Tower(TowerId::new(9))
        }

        fn position(&self) -> Vec2 {
            Vec2::new(1.0, 2.0)
        }

        fn damage(&self) -> f64 {
            25.0
        }

        fn projectile_kind(&self) -> ProjectileKind {
            ProjectileKind::Artillery
        }

        fn tier(&self) -> u32 {
            3
        }
    }

    #[test]
    fn enemy_capabilities_default_to_absent() {
        let mut enemy = Dummy;
        assert!(enemy.damageable().is_none());
        assert!(enemy.slowable().is_none());
        assert!(enemy.dot_receiver().is_none());
        assert!(enemy.radius().is_none());
        assert!(!enemy.is_boss());
        assert!(!enemy.is_flying());
    }

    #[test]
    fn attacker_captures_turret_stats() {
        let attacker = Attacker::of(&Cannon);
        assert_eq!(attacker.source, SourceId::Tower(TowerId::new(9)));
        assert_eq!(attacker.tier, 3);
        assert!(attacker.crit_chance.is_none());
        assert!(attacker.armor_penetration.abs() < f64::EPSILON);
    }

    #[test]
    fn pass_through_resolver_keeps_base_damage() {
        let mut resolver = PassThrough;
        let amount = resolver.resolve(DamageRequest {
            base_damage: 17.5,
            attacker: Attacker::new(SourceId::Skill(SkillId::new(1))),
            target_armor: Some(0.5),
            can_crit: true,
        });
        assert!((amount - 17.5).abs() < f64::EPSILON);
    }

    #[test]
    fn playfield_margin_extends_bounds() {
        let field = Playfield::new(100.0, 50.0);
        assert!(field.contains_with_margin(Vec2::new(-10.0, 60.0), 10.0));
        assert!(!field.contains_with_margin(Vec2::new(-10.1, 0.0), 10.0));
        assert!(!field.contains_with_margin(Vec2::new(50.0, 61.0), 10.0));
    }

    #[test]
    fn targeting_mode_round_trips_through_bincode() {
        let bytes = bincode::serialize(&TargetingMode::Cluster).expect("serialize");
        let restored: TargetingMode = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, TargetingMode::Cluster);
    }
}

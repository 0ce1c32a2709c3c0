//! Designer-facing tuning knobs for the combat systems.
//!
//! Every field carries a default, so a TOML document only needs to mention the
//! values it changes:
//!
//! ```toml
//! [projectiles]
//! capacity = 250
//!
//! [projectiles.profiles.tesla]
//! chain = 5
//!
//! [damage]
//! base_crit_chance = 10.0
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Color, DotEffect, ProjectileKind, ProjectileProfile, SlowEffect, DEFAULT_ENEMY_RADIUS};

/// Errors raised while loading or validating tuning.
#[derive(Debug, Error)]
pub enum TuningError {
    /// The TOML document could not be parsed into tuning values.
    #[error("failed to parse combat tuning: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value parsed but lies outside its permitted range.
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Constraint the value violated.
        reason: &'static str,
    },
}

/// Aggregated tuning for every combat system.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Projectile pool, flight and hit behaviour.
    pub projectiles: ProjectileTuning,
    /// Damage pipeline constants.
    pub damage: DamageTuning,
}

impl CombatTuning {
    /// Parses and validates tuning from a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, TuningError> {
        let tuning: Self = toml::from_str(contents)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Checks every value against its permitted range.
    pub fn validate(&self) -> Result<(), TuningError> {
        self.projectiles.validate()?;
        self.damage.validate()
    }
}

/// Projectile pool, flight and hit behaviour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// Maximum number of live projectiles before the oldest is evicted.
    pub capacity: usize,
    /// Distance beyond the playfield edge at which projectiles expire.
    pub bounds_margin: f32,
    /// Largest heading change, in radians per frame, a homing projectile may make.
    pub homing_turn_rate: f32,
    /// Scales the visible height of lobbed flights.
    pub arc_damping: f32,
    /// Share of projectile damage dealt to enemies caught in a splash.
    pub splash_fraction: f64,
    /// Share of projectile damage dealt to every chained enemy.
    pub chain_fraction: f64,
    /// Radius assumed for enemies that do not report one.
    pub default_enemy_radius: f32,
    /// Number of positions remembered for trails.
    pub trail_capacity: usize,
    /// Per-kind overrides of the default behaviour profiles.
    pub profiles: ProfileOverrides,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            capacity: 500,
            bounds_margin: 50.0,
            homing_turn_rate: 0.15,
            arc_damping: 0.5,
            splash_fraction: 0.5,
            chain_fraction: 0.7,
            default_enemy_radius: DEFAULT_ENEMY_RADIUS,
            trail_capacity: 8,
            profiles: ProfileOverrides::default(),
        }
    }
}

impl ProjectileTuning {
    /// Resolves the behaviour profile for `kind` with overrides applied.
    #[must_use]
    pub fn profile(&self, kind: ProjectileKind) -> ProjectileProfile {
        let base = kind.default_profile();
        match self.profiles.get(kind) {
            Some(overrides) => overrides.apply(base),
            None => base,
        }
    }

    fn validate(&self) -> Result<(), TuningError> {
        if self.capacity == 0 {
            return Err(invalid("projectiles.capacity", "must be at least one"));
        }
        non_negative("projectiles.bounds_margin", f64::from(self.bounds_margin))?;
        if !(self.homing_turn_rate.is_finite() && self.homing_turn_rate > 0.0) {
            return Err(invalid("projectiles.homing_turn_rate", "must be positive"));
        }
        non_negative("projectiles.arc_damping", f64::from(self.arc_damping))?;
        non_negative("projectiles.splash_fraction", self.splash_fraction)?;
        non_negative("projectiles.chain_fraction", self.chain_fraction)?;
        non_negative(
            "projectiles.default_enemy_radius",
            f64::from(self.default_enemy_radius),
        )?;
        if self.trail_capacity == 0 {
            return Err(invalid("projectiles.trail_capacity", "must be at least one"));
        }

        for kind in ProjectileKind::ALL {
            let profile = self.profile(kind);
            if !(profile.speed.is_finite() && profile.speed > 0.0) {
                return Err(invalid("projectiles.profiles.speed", "must be positive"));
            }
            non_negative("projectiles.profiles.size", f64::from(profile.size))?;
            non_negative(
                "projectiles.profiles.splash_radius",
                f64::from(profile.splash_radius),
            )?;
            non_negative(
                "projectiles.profiles.chain_range",
                f64::from(profile.chain_range),
            )?;
        }
        Ok(())
    }
}

/// Optional per-kind profile overrides.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileOverrides {
    /// Overrides for [`ProjectileKind::Bullet`].
    pub bullet: Option<ProfileOverride>,
    /// Overrides for [`ProjectileKind::Laser`].
    pub laser: Option<ProfileOverride>,
    /// Overrides for [`ProjectileKind::Missile`].
    pub missile: Option<ProfileOverride>,
    /// Overrides for [`ProjectileKind::Artillery`].
    pub artillery: Option<ProfileOverride>,
    /// Overrides for [`ProjectileKind::Tesla`].
    pub tesla: Option<ProfileOverride>,
    /// Overrides for [`ProjectileKind::Ice`].
    pub ice: Option<ProfileOverride>,
    /// Overrides for [`ProjectileKind::Poison`].
    pub poison: Option<ProfileOverride>,
}

impl ProfileOverrides {
    /// Overrides registered for `kind`, if any.
    #[must_use]
    pub fn get(&self, kind: ProjectileKind) -> Option<&ProfileOverride> {
        match kind {
            ProjectileKind::Bullet => self.bullet.as_ref(),
            ProjectileKind::Laser => self.laser.as_ref(),
            ProjectileKind::Missile => self.missile.as_ref(),
            ProjectileKind::Artillery => self.artillery.as_ref(),
            ProjectileKind::Tesla => self.tesla.as_ref(),
            ProjectileKind::Ice => self.ice.as_ref(),
            ProjectileKind::Poison => self.poison.as_ref(),
        }
    }
}

/// Partial profile; unset fields keep the kind's default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileOverride {
    /// Replacement speed.
    pub speed: Option<f32>,
    /// Replacement size.
    pub size: Option<f32>,
    /// Replacement color.
    pub color: Option<Color>,
    /// Replacement pierce count.
    pub pierce: Option<u32>,
    /// Replacement splash radius.
    pub splash_radius: Option<f32>,
    /// Replacement chain count.
    pub chain: Option<u32>,
    /// Replacement chain range.
    pub chain_range: Option<f32>,
    /// Replacement slow.
    pub slow: Option<SlowEffect>,
    /// Replacement damage over time.
    pub dot: Option<DotEffect>,
    /// Replacement homing flag.
    pub homing: Option<bool>,
    /// Replacement arc height.
    pub arc_height: Option<f32>,
    /// Replacement trail flag.
    pub trail: Option<bool>,
}

impl ProfileOverride {
    /// Layers the set fields over `base`.
    #[must_use]
    pub fn apply(&self, base: ProjectileProfile) -> ProjectileProfile {
        ProjectileProfile {
            speed: self.speed.unwrap_or(base.speed),
            size: self.size.unwrap_or(base.size),
            color: self.color.unwrap_or(base.color),
            pierce: self.pierce.unwrap_or(base.pierce),
            splash_radius: self.splash_radius.unwrap_or(base.splash_radius),
            chain: self.chain.unwrap_or(base.chain),
            chain_range: self.chain_range.unwrap_or(base.chain_range),
            slow: self.slow.or(base.slow),
            dot: self.dot.or(base.dot),
            homing: self.homing.unwrap_or(base.homing),
            arc_height: self.arc_height.or(base.arc_height),
            trail: self.trail.unwrap_or(base.trail),
        }
    }
}

/// Damage pipeline constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageTuning {
    /// Growth factor applied per evolution tier above the first.
    pub tier_multiplier: f64,
    /// Crit chance in percent for attackers without their own.
    pub base_crit_chance: f64,
    /// Crit multiplier for attackers without their own.
    pub base_crit_multiplier: f64,
    /// Share of the crit chance that rolls a super-crit instead.
    pub super_crit_share: f64,
    /// Factor applied on top of the crit multiplier for super-crits.
    pub super_crit_factor: f64,
    /// Crit chance gained per mastery level, in percent.
    pub mastery_crit_chance_per_level: f64,
    /// Crit multiplier gained per mastery level.
    pub mastery_crit_multiplier_per_level: f64,
    /// Multiplier while a rage rune is active.
    pub rage_rune_multiplier: f64,
    /// Multiplier under the glass cannon challenge.
    pub glass_cannon_multiplier: f64,
    /// Damage bonus per berserk tech level in dread mode.
    pub dread_bonus_per_level: f64,
}

impl Default for DamageTuning {
    fn default() -> Self {
        Self {
            tier_multiplier: 1.5,
            base_crit_chance: 5.0,
            base_crit_multiplier: 1.5,
            super_crit_share: 0.1,
            super_crit_factor: 2.0,
            mastery_crit_chance_per_level: 0.5,
            mastery_crit_multiplier_per_level: 0.02,
            rage_rune_multiplier: 2.0,
            glass_cannon_multiplier: 2.0,
            dread_bonus_per_level: 0.1,
        }
    }
}

impl DamageTuning {
    fn validate(&self) -> Result<(), TuningError> {
        if !(self.tier_multiplier.is_finite() && self.tier_multiplier > 0.0) {
            return Err(invalid("damage.tier_multiplier", "must be positive"));
        }
        if !(0.0..=100.0).contains(&self.base_crit_chance) {
            return Err(invalid("damage.base_crit_chance", "must lie in 0..=100"));
        }
        non_negative("damage.base_crit_multiplier", self.base_crit_multiplier)?;
        if !(0.0..=1.0).contains(&self.super_crit_share) {
            return Err(invalid("damage.super_crit_share", "must lie in 0..=1"));
        }
        non_negative("damage.super_crit_factor", self.super_crit_factor)?;
        non_negative(
            "damage.mastery_crit_chance_per_level",
            self.mastery_crit_chance_per_level,
        )?;
        non_negative(
            "damage.mastery_crit_multiplier_per_level",
            self.mastery_crit_multiplier_per_level,
        )?;
        non_negative("damage.rage_rune_multiplier", self.rage_rune_multiplier)?;
        non_negative("damage.glass_cannon_multiplier", self.glass_cannon_multiplier)?;
        non_negative("damage.dread_bonus_per_level", self.dread_bonus_per_level)
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be a finite, non-negative number"))
    }
}

fn invalid(field: &'static str, reason: &'static str) -> TuningError {
    TuningError::Invalid { field, reason }
}

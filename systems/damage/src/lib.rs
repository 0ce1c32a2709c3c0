#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Damage system that turns a base hit into final damage through an ordered
//! multiplier pipeline, a single-draw crit roll and target armor.

use bastion_core::{Attacker, DamageRequest, DamageResolver, DamageTuning};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

mod crit;
mod modifiers;

pub use crit::{CritOutcome, CritTable};
pub use modifiers::{ModifierSnapshot, ModifierSources};

/// Contributor of a multiplier in a damage breakdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiplierSource {
    /// Evolution tier of the attacker.
    Tier,
    /// Meta-upgrade global multiplier.
    Meta,
    /// Relic damage bonus.
    Relic,
    /// Research damage bonus.
    Research,
    /// Passive-tree damage bonus.
    Passive,
    /// Prestige multiplier.
    Prestige,
    /// Aura emitters covering the attacker.
    Aura,
    /// Chips equipped on the attacker.
    Chip,
    /// Dread-mode berserk bonus.
    Dread,
    /// Active rage rune.
    RageRune,
    /// Glass cannon challenge.
    GlassCannon,
    /// Critical hit.
    Crit,
    /// Super-critical hit.
    SuperCrit,
    /// Target armor reduction.
    Armor,
    /// Attacker armor penetration.
    ArmorPenetration,
}

impl MultiplierSource {
    /// Human-readable name shown in breakdowns.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tier => "Evolution tier",
            Self::Meta => "Meta upgrades",
            Self::Relic => "Relics",
            Self::Research => "Research",
            Self::Passive => "Passive tree",
            Self::Prestige => "Prestige",
            Self::Aura => "Aura",
            Self::Chip => "Chips",
            Self::Dread => "Dread berserk",
            Self::RageRune => "Rage rune",
            Self::GlassCannon => "Glass cannon",
            Self::Crit => "Critical hit",
            Self::SuperCrit => "Super critical",
            Self::Armor => "Armor",
            Self::ArmorPenetration => "Armor penetration",
        }
    }
}

/// One multiplier that changed the damage of a hit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppliedMultiplier {
    /// Contributor of the multiplier.
    pub source: MultiplierSource,
    /// Factor the damage was scaled by.
    pub multiplier: f64,
    /// Display label.
    pub label: String,
}

/// Flat amount added to a hit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlatBonus {
    /// Display label.
    pub label: String,
    /// Amount added.
    pub amount: f64,
}

/// Outcome of a damage calculation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DamageResult {
    /// Damage dealt after every step, rounded down.
    pub final_damage: u64,
    /// Damage the calculation started from.
    pub base_damage: f64,
    /// Whether the hit was a crit, super-crits included.
    pub is_crit: bool,
    /// Whether the hit was a super-crit.
    pub is_super_crit: bool,
    /// Non-neutral multipliers in the order they were applied.
    pub multipliers: Vec<AppliedMultiplier>,
    /// Flat bonuses added to the hit.
    pub flat_bonuses: Vec<FlatBonus>,
}

/// Steady-state damage estimate for display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DpsBreakdown {
    /// Damage before any multiplier.
    pub base_damage: f64,
    /// Damage of a non-crit hit against an unarmored target.
    pub modified_damage: f64,
    /// Multipliers behind `modified_damage`.
    pub multipliers: Vec<AppliedMultiplier>,
    /// Shots per second.
    pub fire_rate: f64,
    /// Total crit chance in percent.
    pub crit_chance: f64,
    /// Super-crit chance in percent.
    pub super_crit_chance: f64,
    /// Multiplier of a regular crit.
    pub crit_multiplier: f64,
    /// Damage per second ignoring crits.
    pub dps: f64,
    /// Damage per second weighted by crit odds.
    pub crit_adjusted_dps: f64,
}

/// Computes final damage from every bonus source.
#[derive(Debug)]
pub struct DamageSystem<M = ModifierSnapshot, R = ChaCha8Rng> {
    tuning: DamageTuning,
    modifiers: M,
    rng: R,
}

impl<M: ModifierSources> DamageSystem<M, ChaCha8Rng> {
    /// Creates a damage system whose crit rolls replay from `seed`.
    #[must_use]
    pub fn seeded(tuning: DamageTuning, modifiers: M, seed: u64) -> Self {
        Self::new(tuning, modifiers, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<M: ModifierSources, R: Rng> DamageSystem<M, R> {
    /// Creates a damage system drawing crit rolls from `rng`.
    #[must_use]
    pub fn new(tuning: DamageTuning, modifiers: M, rng: R) -> Self {
        Self {
            tuning,
            modifiers,
            rng,
        }
    }

    /// Constants driving the pipeline.
    #[must_use]
    pub fn tuning(&self) -> &DamageTuning {
        &self.tuning
    }

    /// Bonus sources consulted on every calculation.
    #[must_use]
    pub fn modifiers(&self) -> &M {
        &self.modifiers
    }

    /// Mutable access to the bonus sources, for hosts that update them in place.
    pub fn modifiers_mut(&mut self) -> &mut M {
        &mut self.modifiers
    }

    /// Computes the damage of a single hit.
    ///
    /// Exactly one random draw is taken when the request may crit, none otherwise.
    pub fn calculate(&mut self, request: DamageRequest) -> DamageResult {
        let (mut damage, mut multipliers) = self.scaled(request.base_damage, &request.attacker);

        let mut outcome = CritOutcome::Normal;
        if request.can_crit {
            let table = self.crit_table(&request.attacker);
            let draw: f64 = self.rng.gen_range(0.0..100.0);
            outcome = table.resolve(draw);
            match outcome {
                CritOutcome::Normal => {}
                CritOutcome::Crit | CritOutcome::SuperCrit => {
                    let source = if outcome == CritOutcome::SuperCrit {
                        MultiplierSource::SuperCrit
                    } else {
                        MultiplierSource::Crit
                    };
                    apply(&mut damage, &mut multipliers, source, table.multiplier_for(outcome));
                    trace!(?outcome, draw, chance = table.chance, "critical hit");
                }
            }
        }

        if let Some(armor) = request.target_armor {
            apply(&mut damage, &mut multipliers, MultiplierSource::Armor, 1.0 - armor);
            let penetration = request.attacker.armor_penetration;
            if penetration > 0.0 {
                apply(
                    &mut damage,
                    &mut multipliers,
                    MultiplierSource::ArmorPenetration,
                    1.0 + penetration * armor,
                );
            }
        }

        DamageResult {
            final_damage: floor_damage(damage),
            base_damage: request.base_damage,
            is_crit: outcome != CritOutcome::Normal,
            is_super_crit: outcome == CritOutcome::SuperCrit,
            multipliers,
            flat_bonuses: Vec::new(),
        }
    }

    /// Total crit chance of `attacker` in percent, capped at 100.
    #[must_use]
    pub fn crit_chance(&self, attacker: &Attacker) -> f64 {
        let source = attacker.source;
        let base = attacker.crit_chance.unwrap_or(self.tuning.base_crit_chance);
        let mastery = f64::from(self.modifiers.mastery_level(source))
            * self.tuning.mastery_crit_chance_per_level;
        (base
            + self.modifiers.research_crit_chance(source)
            + self.modifiers.passive_crit_chance(source)
            + self.modifiers.relic_crit_chance()
            + mastery)
            .min(100.0)
    }

    /// Super-crit chance of `attacker` in percent.
    #[must_use]
    pub fn super_crit_chance(&self, attacker: &Attacker) -> f64 {
        self.crit_chance(attacker) * self.tuning.super_crit_share
    }

    /// Crit damage multiplier of `attacker`.
    #[must_use]
    pub fn crit_multiplier(&self, attacker: &Attacker) -> f64 {
        let source = attacker.source;
        let base = attacker
            .crit_multiplier
            .unwrap_or(self.tuning.base_crit_multiplier);
        let mastery = f64::from(self.modifiers.mastery_level(source))
            * self.tuning.mastery_crit_multiplier_per_level;
        base + self.modifiers.research_crit_multiplier(source)
            + self.modifiers.passive_crit_multiplier(source)
            + self.modifiers.relic_crit_multiplier()
            + mastery
    }

    /// Crit thresholds of `attacker`.
    #[must_use]
    pub fn crit_table(&self, attacker: &Attacker) -> CritTable {
        CritTable {
            chance: self.crit_chance(attacker),
            super_chance: self.super_crit_chance(attacker),
            multiplier: self.crit_multiplier(attacker),
            super_factor: self.tuning.super_crit_factor,
        }
    }

    /// Estimates steady-state damage per second without rolling.
    #[must_use]
    pub fn dps_breakdown(&self, base_damage: f64, attacker: &Attacker, fire_rate: f64) -> DpsBreakdown {
        let (damage, multipliers) = self.scaled(base_damage, attacker);
        let modified_damage = floor_damage(damage) as f64;
        let table = self.crit_table(attacker);
        let dps = modified_damage * fire_rate;

        DpsBreakdown {
            base_damage,
            modified_damage,
            multipliers,
            fire_rate,
            crit_chance: table.chance,
            super_crit_chance: table.super_chance,
            crit_multiplier: table.multiplier,
            dps,
            crit_adjusted_dps: dps * table.expected_multiplier(),
        }
    }

    fn scaled(&self, base_damage: f64, attacker: &Attacker) -> (f64, Vec<AppliedMultiplier>) {
        let source = attacker.source;
        let modifiers = &self.modifiers;
        let dread = modifiers
            .dread_berserk_level()
            .map_or(1.0, |level| 1.0 + f64::from(level) * self.tuning.dread_bonus_per_level);
        let rage = if modifiers.rage_rune_active() {
            self.tuning.rage_rune_multiplier
        } else {
            1.0
        };
        let glass_cannon = if modifiers.glass_cannon_active() {
            self.tuning.glass_cannon_multiplier
        } else {
            1.0
        };

        let steps = [
            (
                MultiplierSource::Tier,
                self.tuning
                    .tier_multiplier
                    .powf(f64::from(attacker.tier.saturating_sub(1))),
            ),
            (MultiplierSource::Meta, modifiers.meta_damage_multiplier()),
            (MultiplierSource::Relic, 1.0 + modifiers.relic_damage_bonus()),
            (
                MultiplierSource::Research,
                1.0 + modifiers.research_damage_bonus(source),
            ),
            (
                MultiplierSource::Passive,
                1.0 + modifiers.passive_damage_bonus(source),
            ),
            (MultiplierSource::Prestige, modifiers.prestige_damage_multiplier()),
            (MultiplierSource::Aura, modifiers.aura_damage_multiplier(source)),
            (MultiplierSource::Chip, modifiers.chip_damage_multiplier(source)),
            (MultiplierSource::Dread, dread),
            (MultiplierSource::RageRune, rage),
            (MultiplierSource::GlassCannon, glass_cannon),
        ];

        let mut damage = base_damage;
        let mut applied = Vec::new();
        for (source, multiplier) in steps {
            apply(&mut damage, &mut applied, source, multiplier);
        }
        (damage, applied)
    }
}

impl<M: ModifierSources, R: Rng> DamageResolver for DamageSystem<M, R> {
    fn resolve(&mut self, request: DamageRequest) -> f64 {
        self.calculate(request).final_damage as f64
    }
}

fn apply(
    damage: &mut f64,
    applied: &mut Vec<AppliedMultiplier>,
    source: MultiplierSource,
    multiplier: f64,
) {
    *damage *= multiplier;
    if multiplier != 1.0 {
        applied.push(AppliedMultiplier {
            source,
            multiplier,
            label: source.label().to_owned(),
        });
    }
}

fn floor_damage(damage: f64) -> u64 {
    damage.max(0.0).floor() as u64
}

//! External bonus sources read by the damage pipeline.

use bastion_core::SourceId;
use serde::{Deserialize, Serialize};

/// Read-only view of every progression system that scales damage.
///
/// Each accessor defaults to its neutral value, so hosts only implement the
/// sources they actually track.
pub trait ModifierSources {
    /// Global damage multiplier bought through meta upgrades.
    fn meta_damage_multiplier(&self) -> f64 {
        1.0
    }

    /// Additive damage bonus granted by relics.
    fn relic_damage_bonus(&self) -> f64 {
        0.0
    }

    /// Additive damage bonus from research for `source`.
    fn research_damage_bonus(&self, _source: SourceId) -> f64 {
        0.0
    }

    /// Additive damage bonus from the passive tree for `source`.
    fn passive_damage_bonus(&self, _source: SourceId) -> f64 {
        0.0
    }

    /// Multiplier granted by prestige.
    fn prestige_damage_multiplier(&self) -> f64 {
        1.0
    }

    /// Multiplier from aura emitters currently covering `source`.
    fn aura_damage_multiplier(&self, _source: SourceId) -> f64 {
        1.0
    }

    /// Multiplier from chips equipped on `source`.
    fn chip_damage_multiplier(&self, _source: SourceId) -> f64 {
        1.0
    }

    /// Berserk tech level while dread mode is active.
    fn dread_berserk_level(&self) -> Option<u32> {
        None
    }

    /// Whether a rage rune is currently active.
    fn rage_rune_active(&self) -> bool {
        false
    }

    /// Whether the glass cannon challenge is running.
    fn glass_cannon_active(&self) -> bool {
        false
    }

    /// Crit chance from research, in percent.
    fn research_crit_chance(&self, _source: SourceId) -> f64 {
        0.0
    }

    /// Crit chance from the passive tree, in percent.
    fn passive_crit_chance(&self, _source: SourceId) -> f64 {
        0.0
    }

    /// Crit chance from relics, in percent.
    fn relic_crit_chance(&self) -> f64 {
        0.0
    }

    /// Crit multiplier bonus from research.
    fn research_crit_multiplier(&self, _source: SourceId) -> f64 {
        0.0
    }

    /// Crit multiplier bonus from the passive tree.
    fn passive_crit_multiplier(&self, _source: SourceId) -> f64 {
        0.0
    }

    /// Crit multiplier bonus from relics.
    fn relic_crit_multiplier(&self) -> f64 {
        0.0
    }

    /// Mastery level reached by `source`.
    fn mastery_level(&self, _source: SourceId) -> u32 {
        0
    }
}

/// Plain-data snapshot of modifier values shared by every source.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierSnapshot {
    /// Global meta-upgrade multiplier.
    pub meta_damage_multiplier: f64,
    /// Relic damage bonus.
    pub relic_damage_bonus: f64,
    /// Research damage bonus.
    pub research_damage_bonus: f64,
    /// Passive-tree damage bonus.
    pub passive_damage_bonus: f64,
    /// Prestige multiplier.
    pub prestige_damage_multiplier: f64,
    /// Aura multiplier.
    pub aura_damage_multiplier: f64,
    /// Chip multiplier.
    pub chip_damage_multiplier: f64,
    /// Berserk level while dread mode is active.
    pub dread_berserk_level: Option<u32>,
    /// Rage rune flag.
    pub rage_rune_active: bool,
    /// Glass cannon challenge flag.
    pub glass_cannon_active: bool,
    /// Research crit chance in percent.
    pub research_crit_chance: f64,
    /// Passive-tree crit chance in percent.
    pub passive_crit_chance: f64,
    /// Relic crit chance in percent.
    pub relic_crit_chance: f64,
    /// Research crit multiplier bonus.
    pub research_crit_multiplier: f64,
    /// Passive-tree crit multiplier bonus.
    pub passive_crit_multiplier: f64,
    /// Relic crit multiplier bonus.
    pub relic_crit_multiplier: f64,
    /// Mastery level.
    pub mastery_level: u32,
}

impl Default for ModifierSnapshot {
    fn default() -> Self {
        Self {
            meta_damage_multiplier: 1.0,
            relic_damage_bonus: 0.0,
            research_damage_bonus: 0.0,
            passive_damage_bonus: 0.0,
            prestige_damage_multiplier: 1.0,
            aura_damage_multiplier: 1.0,
            chip_damage_multiplier: 1.0,
            dread_berserk_level: None,
            rage_rune_active: false,
            glass_cannon_active: false,
            research_crit_chance: 0.0,
            passive_crit_chance: 0.0,
            relic_crit_chance: 0.0,
            research_crit_multiplier: 0.0,
            passive_crit_multiplier: 0.0,
            relic_crit_multiplier: 0.0,
            mastery_level: 0,
        }
    }
}

impl ModifierSources for ModifierSnapshot {
    fn meta_damage_multiplier(&self) -> f64 {
        self.meta_damage_multiplier
    }

    fn relic_damage_bonus(&self) -> f64 {
        self.relic_damage_bonus
    }

    fn research_damage_bonus(&self, _source: SourceId) -> f64 {
        self.research_damage_bonus
    }

    fn passive_damage_bonus(&self, _source: SourceId) -> f64 {
        self.passive_damage_bonus
    }

    fn prestige_damage_multiplier(&self) -> f64 {
        self.prestige_damage_multiplier
    }

    fn aura_damage_multiplier(&self, _source: SourceId) -> f64 {
        self.aura_damage_multiplier
    }

    fn chip_damage_multiplier(&self, _source: SourceId) -> f64 {
        self.chip_damage_multiplier
    }

    fn dread_berserk_level(&self) -> Option<u32> {
        self.dread_berserk_level
    }

    fn rage_rune_active(&self) -> bool {
        self.rage_rune_active
    }

    fn glass_cannon_active(&self) -> bool {
        self.glass_cannon_active
    }

    fn research_crit_chance(&self, _source: SourceId) -> f64 {
        self.research_crit_chance
    }

    fn passive_crit_chance(&self, _source: SourceId) -> f64 {
        self.passive_crit_chance
    }

    fn relic_crit_chance(&self) -> f64 {
        self.relic_crit_chance
    }

    fn research_crit_multiplier(&self, _source: SourceId) -> f64 {
        self.research_crit_multiplier
    }

    fn passive_crit_multiplier(&self, _source: SourceId) -> f64 {
        self.passive_crit_multiplier
    }

    fn relic_crit_multiplier(&self) -> f64 {
        self.relic_crit_multiplier
    }

    fn mastery_level(&self, _source: SourceId) -> u32 {
        self.mastery_level
    }
}

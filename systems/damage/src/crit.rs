//! Single-draw critical hit resolution.

use serde::{Deserialize, Serialize};

/// Outcome of a crit roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CritOutcome {
    /// The hit lands normally.
    Normal,
    /// The hit lands as a critical hit.
    Crit,
    /// The hit lands as a super-critical hit.
    SuperCrit,
}

/// Crit thresholds derived for one attacker.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CritTable {
    /// Total crit chance in percent, 0..=100.
    pub chance: f64,
    /// Super-crit chance in percent; always at most `chance`.
    pub super_chance: f64,
    /// Damage multiplier of a crit.
    pub multiplier: f64,
    /// Extra factor a super-crit applies on top of `multiplier`.
    pub super_factor: f64,
}

impl CritTable {
    /// Classifies a draw taken uniformly from `[0, 100)`.
    ///
    /// Both thresholds are strict, so a draw equal to a chance does not qualify.
    #[must_use]
    pub fn resolve(&self, draw: f64) -> CritOutcome {
        if draw < self.super_chance {
            CritOutcome::SuperCrit
        } else if draw < self.chance {
            CritOutcome::Crit
        } else {
            CritOutcome::Normal
        }
    }

    /// Damage multiplier applied for `outcome`.
    #[must_use]
    pub fn multiplier_for(&self, outcome: CritOutcome) -> f64 {
        match outcome {
            CritOutcome::Normal => 1.0,
            CritOutcome::Crit => self.multiplier,
            CritOutcome::SuperCrit => self.super_factor * self.multiplier,
        }
    }

    /// Mean damage multiplier over many draws.
    #[must_use]
    pub fn expected_multiplier(&self) -> f64 {
        let super_share = self.super_chance / 100.0;
        let crit_share = (self.chance - self.super_chance).max(0.0) / 100.0;
        let normal_share = (1.0 - super_share - crit_share).max(0.0);
        normal_share
            + crit_share * self.multiplier_for(CritOutcome::Crit)
            + super_share * self.multiplier_for(CritOutcome::SuperCrit)
    }
}

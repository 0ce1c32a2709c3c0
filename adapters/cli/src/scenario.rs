//! Skirmish scenario files: combat tuning plus the map the skirmish plays on.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use bastion_core::{CombatTuning, DamageTuning, ProjectileKind, ProjectileTuning, TargetingMode};
use bastion_system_damage::ModifierSnapshot;
use bastion_world::TowerSpec;
use glam::Vec2;
use serde::Deserialize;

/// Everything a skirmish run reads from disk.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct Scenario {
    pub(crate) projectiles: ProjectileTuning,
    pub(crate) damage: DamageTuning,
    pub(crate) modifiers: ModifierSnapshot,
    pub(crate) map: MapSettings,
    pub(crate) creeps: CreepSettings,
    pub(crate) towers: Vec<TowerEntry>,
}

impl Scenario {
    /// Reads and validates a scenario file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid scenario file {}", path.display()))
    }

    /// Parses and validates a scenario document.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let scenario: Self = toml::from_str(contents).context("failed to parse scenario")?;
        scenario
            .combat_tuning()
            .validate()
            .context("combat tuning out of range")?;
        Ok(scenario)
    }

    /// Combat tuning shared by every system.
    pub(crate) fn combat_tuning(&self) -> CombatTuning {
        CombatTuning {
            projectiles: self.projectiles.clone(),
            damage: self.damage.clone(),
        }
    }

    /// Towers to place, falling back to one of each kind when none are listed.
    pub(crate) fn tower_specs(&self) -> Vec<TowerSpec> {
        if self.towers.is_empty() {
            return default_towers(&self.map);
        }
        self.towers.iter().map(TowerEntry::to_spec).collect()
    }
}

/// Playfield dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct MapSettings {
    pub(crate) width: f32,
    pub(crate) height: f32,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Creep spawning parameters.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct CreepSettings {
    pub(crate) count: u32,
    pub(crate) spawn_interval: u32,
    pub(crate) hp: f64,
    pub(crate) speed: f32,
    pub(crate) armor: Option<f64>,
    pub(crate) boss_every: u32,
    pub(crate) flying_every: u32,
}

impl Default for CreepSettings {
    fn default() -> Self {
        Self {
            count: 40,
            spawn_interval: 20,
            hp: 120.0,
            speed: 1.2,
            armor: Some(0.1),
            boss_every: 10,
            flying_every: 4,
        }
    }
}

/// Tower placement as written in a scenario file.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub(crate) struct TowerEntry {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) kind: ProjectileKind,
    #[serde(default)]
    pub(crate) mode: TargetingMode,
    pub(crate) damage: f64,
    #[serde(default = "default_tier")]
    pub(crate) tier: u32,
    pub(crate) range: f32,
    pub(crate) fire_interval: f32,
    #[serde(default)]
    pub(crate) armor_penetration: f64,
}

impl TowerEntry {
    fn to_spec(&self) -> TowerSpec {
        TowerSpec {
            position: Vec2::new(self.x, self.y),
            kind: self.kind,
            damage: self.damage,
            tier: self.tier,
            range: self.range,
            mode: self.mode,
            fire_interval: self.fire_interval,
            armor_penetration: self.armor_penetration,
            ..TowerSpec::default()
        }
    }
}

fn default_tier() -> u32 {
    1
}

fn default_towers(map: &MapSettings) -> Vec<TowerSpec> {
    let layout = [
        (ProjectileKind::Bullet, TargetingMode::Nearest, 12.0, 15.0),
        (ProjectileKind::Laser, TargetingMode::Strongest, 9.0, 25.0),
        (ProjectileKind::Missile, TargetingMode::Cluster, 20.0, 60.0),
        (ProjectileKind::Artillery, TargetingMode::Furthest, 28.0, 90.0),
        (ProjectileKind::Tesla, TargetingMode::Boss, 10.0, 40.0),
        (ProjectileKind::Ice, TargetingMode::Fastest, 6.0, 30.0),
        (ProjectileKind::Poison, TargetingMode::Flying, 8.0, 35.0),
    ];

    let spacing = map.width / (layout.len() as f32 + 1.0);
    layout
        .iter()
        .enumerate()
        .map(|(index, &(kind, mode, damage, fire_interval))| {
            let lane = if index % 2 == 0 { 0.35 } else { 0.65 };
            TowerSpec {
                position: Vec2::new(spacing * (index as f32 + 1.0), map.height * lane),
                kind,
                damage,
                range: 160.0,
                mode,
                fire_interval,
                tier: 1 + (index as u32 % 3),
                ..TowerSpec::default()
            }
        })
        .collect()
}

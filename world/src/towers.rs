//! Turret state and the registry that allocates their identifiers.

use bastion_core::{ProjectileKind, SourceId, TargetingMode, TowerId, Turret};
use glam::Vec2;

/// Parameters for placing a tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSpec {
    /// Tower position.
    pub position: Vec2,
    /// Kind of projectile fired.
    pub kind: ProjectileKind,
    /// Base damage per shot.
    pub damage: f64,
    /// Evolution tier, starting at 1.
    pub tier: u32,
    /// Targeting reach.
    pub range: f32,
    /// Target selection strategy.
    pub mode: TargetingMode,
    /// Frames between shots.
    pub fire_interval: f32,
    /// Own crit chance in percent, overriding the global base.
    pub crit_chance: Option<f64>,
    /// Own crit multiplier, overriding the global base.
    pub crit_multiplier: Option<f64>,
    /// Extra damage per point of target armor.
    pub armor_penetration: f64,
}

impl Default for TowerSpec {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            kind: ProjectileKind::Bullet,
            damage: 10.0,
            tier: 1,
            range: 150.0,
            mode: TargetingMode::Nearest,
            fire_interval: 30.0,
            crit_chance: None,
            crit_multiplier: None,
            armor_penetration: 0.0,
        }
    }
}

/// Tower placed in the world.
#[derive(Clone, Debug, PartialEq)]
pub struct Tower {
    id: TowerId,
    spec: TowerSpec,
    cooldown: f32,
}

impl Tower {
    /// Identifier allocated by the world.
    #[must_use]
    pub fn id(&self) -> TowerId {
        self.id
    }

    /// Targeting reach.
    #[must_use]
    pub fn range(&self) -> f32 {
        self.spec.range
    }

    /// Target selection strategy.
    #[must_use]
    pub fn mode(&self) -> TargetingMode {
        self.spec.mode
    }

    /// Shots per second at the nominal frame rate.
    #[must_use]
    pub fn fire_rate(&self) -> f64 {
        if self.spec.fire_interval <= 0.0 {
            return f64::from(crate::FRAMES_PER_SECOND);
        }
        f64::from(crate::FRAMES_PER_SECOND / self.spec.fire_interval)
    }

    /// Reports whether the tower may fire this frame.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.cooldown <= 0.0
    }

    /// Restarts the cooldown after a shot.
    pub fn reload(&mut self) {
        self.cooldown = self.spec.fire_interval;
    }

    pub(crate) fn tick(&mut self, dt: f32) {
        self.cooldown = (self.cooldown - dt).max(0.0);
    }
}

impl Turret for Tower {
    fn source(&self) -> SourceId {
        SourceId::Tower(self.id)
    }

    fn position(&self) -> Vec2 {
        self.spec.position
    }

    fn damage(&self) -> f64 {
        self.spec.damage
    }

    fn projectile_kind(&self) -> ProjectileKind {
        self.spec.kind
    }

    fn tier(&self) -> u32 {
        self.spec.tier
    }

    fn crit_chance(&self) -> Option<f64> {
        self.spec.crit_chance
    }

    fn crit_multiplier(&self) -> Option<f64> {
        self.spec.crit_multiplier
    }

    fn armor_penetration(&self) -> f64 {
        self.spec.armor_penetration
    }
}

/// Registry that stores towers in placement order and allocates identifiers.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: Vec<Tower>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    pub(crate) fn place(&mut self, spec: TowerSpec) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().wrapping_add(1));
        self.entries.push(Tower {
            id,
            spec,
            cooldown: 0.0,
        });
        id
    }

    pub(crate) fn as_slice(&self) -> &[Tower] {
        &self.entries
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Tower] {
        &mut self.entries
    }
}

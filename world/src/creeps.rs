//! Creeps walking toward the defended objective.

use bastion_core::{Damageable, DotReceiver, Enemy, EnemyId, Slowable, SourceId};
use glam::Vec2;

/// Parameters for spawning a creep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CreepSpec {
    /// Spawn position.
    pub position: Vec2,
    /// Starting and maximum hit points.
    pub max_hp: f64,
    /// Distance walked per frame before slows.
    pub speed: f32,
    /// Fraction of incoming damage absorbed.
    pub armor: Option<f64>,
    /// Collision radius; `None` uses the combat default.
    pub radius: Option<f32>,
    /// Boss flag.
    pub boss: bool,
    /// Flying flag.
    pub flying: bool,
}

impl Default for CreepSpec {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            max_hp: 100.0,
            speed: 1.0,
            armor: None,
            radius: None,
            boss: false,
            flying: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ActiveSlow {
    amount: f32,
    remaining: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ActiveDot {
    per_frame: f64,
    remaining: f32,
}

/// Enemy that supports damage, slows and damage over time.
#[derive(Clone, Debug, PartialEq)]
pub struct Creep {
    id: EnemyId,
    position: Vec2,
    velocity: Vec2,
    hp: f64,
    max_hp: f64,
    speed: f32,
    armor: Option<f64>,
    radius: Option<f32>,
    boss: bool,
    flying: bool,
    slow: Option<ActiveSlow>,
    dots: Vec<ActiveDot>,
    last_source: Option<SourceId>,
}

impl Creep {
    /// Creates a creep from `spec`.
    #[must_use]
    pub fn new(id: EnemyId, spec: CreepSpec) -> Self {
        Self {
            id,
            position: spec.position,
            velocity: Vec2::ZERO,
            hp: spec.max_hp,
            max_hp: spec.max_hp,
            speed: spec.speed,
            armor: spec.armor,
            radius: spec.radius,
            boss: spec.boss,
            flying: spec.flying,
            slow: None,
            dots: Vec::new(),
            last_source: None,
        }
    }

    /// Current slow fraction, zero when unslowed.
    #[must_use]
    pub fn slow_amount(&self) -> f32 {
        self.slow.map_or(0.0, |slow| slow.amount)
    }

    /// Number of damage-over-time effects still ticking.
    #[must_use]
    pub fn active_dots(&self) -> usize {
        self.dots.len()
    }

    /// Source of the most recent direct hit.
    #[must_use]
    pub fn last_source(&self) -> Option<SourceId> {
        self.last_source
    }

    /// Ticks effects and walks toward `objective`.
    ///
    /// Returns `true` once the creep stands on the objective.
    pub(crate) fn advance(&mut self, dt: f32, objective: Vec2) -> bool {
        self.tick_dots(dt);
        self.tick_slow(dt);
        if self.is_dead() {
            self.velocity = Vec2::ZERO;
            return false;
        }

        let speed = self.speed * (1.0 - self.slow_amount()).max(0.0);
        let offset = objective - self.position;
        let step = speed * dt;
        let distance = offset.length();
        if distance <= step {
            self.velocity = Vec2::ZERO;
            self.position = objective;
            return true;
        }

        self.velocity = offset / distance * speed;
        self.position += self.velocity * dt;
        false
    }

    fn tick_dots(&mut self, dt: f32) {
        let mut total = 0.0;
        for dot in &mut self.dots {
            let elapsed = dt.min(dot.remaining);
            total += dot.per_frame * f64::from(elapsed);
            dot.remaining -= elapsed;
        }
        self.dots.retain(|dot| dot.remaining > 0.0);
        self.hp -= total;
    }

    fn tick_slow(&mut self, dt: f32) {
        if let Some(slow) = &mut self.slow {
            slow.remaining -= dt;
            if slow.remaining <= 0.0 {
                self.slow = None;
            }
        }
    }
}

impl Enemy for Creep {
    fn id(&self) -> EnemyId {
        self.id
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn hp(&self) -> f64 {
        self.hp
    }

    fn max_hp(&self) -> f64 {
        self.max_hp
    }

    fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    fn radius(&self) -> Option<f32> {
        self.radius
    }

    fn armor(&self) -> Option<f64> {
        self.armor
    }

    fn speed(&self) -> Option<f32> {
        Some(self.speed * (1.0 - self.slow_amount()).max(0.0))
    }

    fn velocity(&self) -> Option<Vec2> {
        Some(self.velocity)
    }

    fn is_boss(&self) -> bool {
        self.boss
    }

    fn is_flying(&self) -> bool {
        self.flying
    }

    fn damageable(&mut self) -> Option<&mut dyn Damageable> {
        Some(self)
    }

    fn slowable(&mut self) -> Option<&mut dyn Slowable> {
        Some(self)
    }

    fn dot_receiver(&mut self) -> Option<&mut dyn DotReceiver> {
        Some(self)
    }
}

impl Damageable for Creep {
    fn take_damage(&mut self, amount: f64, source: SourceId) {
        if self.is_dead() {
            return;
        }
        self.hp -= amount.max(0.0);
        self.last_source = Some(source);
    }
}

impl Slowable for Creep {
    fn apply_slow(&mut self, amount: f32, duration: f32) {
        let amount = amount.clamp(0.0, 1.0);
        self.slow = Some(match self.slow {
            Some(active) => ActiveSlow {
                amount: active.amount.max(amount),
                remaining: active.remaining.max(duration),
            },
            None => ActiveSlow {
                amount,
                remaining: duration,
            },
        });
    }
}

impl DotReceiver for Creep {
    fn apply_dot(&mut self, amount: f64, duration: f32) {
        if duration <= 0.0 {
            self.hp -= amount;
            return;
        }
        self.dots.push(ActiveDot {
            per_frame: amount / f64::from(duration),
            remaining: duration,
        });
    }
}

//! A single moving damage carrier and its hit resolution.

use std::{
    collections::HashSet,
    f32::consts::{PI, TAU},
};

use bastion_core::{
    Attacker, Canvas, Color, CombatEvent, DamageRequest, DotEffect, Enemy, EnemyId, Playfield,
    ProjectileId, ProjectileKind, ProjectileTuning, SlowEffect,
};
use glam::Vec2;
use tracing::trace;

use crate::{trail::Trail, Battlefield};

/// Construction options for a projectile.
///
/// The required fields describe the shot itself. Every optional field that is
/// missing, or malformed (non-finite or negative), falls back to the kind's
/// behaviour profile.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileOptions {
    /// Kind whose profile supplies defaults.
    pub kind: ProjectileKind,
    /// Launch position.
    pub origin: Vec2,
    /// Position the projectile is aimed at.
    pub target_position: Vec2,
    /// Enemy the projectile homes on, if any.
    pub target: Option<EnemyId>,
    /// Pre-multiplier damage of a primary hit.
    pub damage: f64,
    /// Dealer stats handed to the damage resolver.
    pub attacker: Attacker,
    /// Distance travelled per frame.
    pub speed: Option<f32>,
    /// Collision and drawing radius.
    pub size: Option<f32>,
    /// Body color.
    pub color: Option<Color>,
    /// Extra enemies the projectile passes through.
    pub pierce: Option<u32>,
    /// Radius of secondary damage around an impact.
    pub splash_radius: Option<f32>,
    /// Number of chain jumps after a primary hit.
    pub chain: Option<u32>,
    /// Maximum distance of a single chain jump.
    pub chain_range: Option<f32>,
    /// Slow applied to the primary target.
    pub slow: Option<SlowEffect>,
    /// Damage over time applied to the primary target.
    pub dot: Option<DotEffect>,
    /// Whether the projectile steers toward its target.
    pub homing: Option<bool>,
    /// Peak height of a lobbed flight.
    pub arc_height: Option<f32>,
    /// Whether recent positions are kept for drawing a trail.
    pub trail: Option<bool>,
}

impl ProjectileOptions {
    /// Describes a shot of `kind` from `origin` toward `target_position`.
    #[must_use]
    pub fn new(
        kind: ProjectileKind,
        origin: Vec2,
        target_position: Vec2,
        damage: f64,
        attacker: Attacker,
    ) -> Self {
        Self {
            kind,
            origin,
            target_position,
            target: None,
            damage,
            attacker,
            speed: None,
            size: None,
            color: None,
            pierce: None,
            splash_radius: None,
            chain: None,
            chain_range: None,
            slow: None,
            dot: None,
            homing: None,
            arc_height: None,
            trail: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ArcFlight {
    ground: Vec2,
    start_height: f32,
    total_distance: f32,
    traveled: f32,
    peak_height: f32,
}

/// Moving damage carrier with pierce, splash, chain, homing and arc behaviour.
#[derive(Clone, Debug)]
pub struct Projectile {
    id: ProjectileId,
    kind: ProjectileKind,
    attacker: Attacker,
    damage: f64,
    position: Vec2,
    target_position: Vec2,
    target: Option<EnemyId>,
    velocity: Vec2,
    speed: f32,
    radius: f32,
    color: Color,
    pierce: u32,
    splash_radius: f32,
    splash_radius_sq: f32,
    chain: u32,
    chain_range: f32,
    chain_range_sq: f32,
    slow: Option<SlowEffect>,
    dot: Option<DotEffect>,
    homing: bool,
    arc: Option<ArcFlight>,
    hit_targets: HashSet<EnemyId>,
    trail: Option<Trail>,
    alive: bool,
}

impl Projectile {
    /// Builds a projectile from `options`, filling gaps from the kind's profile.
    #[must_use]
    pub fn new(id: ProjectileId, options: ProjectileOptions, tuning: &ProjectileTuning) -> Self {
        debug_assert!(options.damage >= 0.0, "projectile damage must not be negative");
        let profile = tuning.profile(options.kind);

        let speed = positive(options.speed).unwrap_or(profile.speed);
        let radius = non_negative(options.size).unwrap_or(profile.size);
        let splash_radius = non_negative(options.splash_radius).unwrap_or(profile.splash_radius);
        let chain_range = non_negative(options.chain_range).unwrap_or(profile.chain_range);
        let slow = options
            .slow
            .filter(|slow| valid_slow(*slow))
            .or(profile.slow);
        let dot = options.dot.filter(|dot| valid_dot(*dot)).or(profile.dot);
        let arc_height = non_negative(options.arc_height).or(profile.arc_height);

        let direction = (options.target_position - options.origin)
            .try_normalize()
            .unwrap_or(Vec2::X);
        let arc = arc_height.map(|peak_height| ArcFlight {
            ground: options.origin,
            start_height: options.origin.y,
            total_distance: options
                .origin
                .distance(options.target_position)
                .max(f32::EPSILON),
            traveled: 0.0,
            peak_height,
        });
        let trail = options
            .trail
            .unwrap_or(profile.trail)
            .then(|| Trail::with_capacity(tuning.trail_capacity));

        Self {
            id,
            kind: options.kind,
            attacker: options.attacker,
            damage: options.damage,
            position: options.origin,
            target_position: options.target_position,
            target: options.target,
            velocity: direction * speed,
            speed,
            radius,
            color: options.color.unwrap_or(profile.color),
            pierce: options.pierce.unwrap_or(profile.pierce),
            splash_radius,
            splash_radius_sq: splash_radius * splash_radius,
            chain: options.chain.unwrap_or(profile.chain),
            chain_range,
            chain_range_sq: chain_range * chain_range,
            slow,
            dot,
            homing: options.homing.unwrap_or(profile.homing),
            arc,
            hit_targets: HashSet::new(),
            trail,
            alive: true,
        }
    }

    /// Identifier allocated by the projectile system.
    #[must_use]
    pub fn id(&self) -> ProjectileId {
        self.id
    }

    /// Kind the projectile was created as.
    #[must_use]
    pub fn kind(&self) -> ProjectileKind {
        self.kind
    }

    /// Dealer stats handed to the damage resolver.
    #[must_use]
    pub fn attacker(&self) -> Attacker {
        self.attacker
    }

    /// Pre-multiplier damage of a primary hit.
    #[must_use]
    pub fn damage(&self) -> f64 {
        self.damage
    }

    /// Current position, including any arc lift.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Position the projectile is heading for.
    #[must_use]
    pub fn target_position(&self) -> Vec2 {
        self.target_position
    }

    /// Enemy the projectile homes on.
    #[must_use]
    pub fn target(&self) -> Option<EnemyId> {
        self.target
    }

    /// Displacement per frame.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Collision radius.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Remaining extra penetrations.
    #[must_use]
    pub fn pierce(&self) -> u32 {
        self.pierce
    }

    /// Blast radius around impacts.
    #[must_use]
    pub fn splash_radius(&self) -> f32 {
        self.splash_radius
    }

    /// Number of chain jumps per primary hit.
    #[must_use]
    pub fn chain(&self) -> u32 {
        self.chain
    }

    /// Maximum distance of a chain jump.
    #[must_use]
    pub fn chain_range(&self) -> f32 {
        self.chain_range
    }

    /// Whether the projectile steers toward its target.
    #[must_use]
    pub fn is_homing(&self) -> bool {
        self.homing
    }

    /// Whether the projectile follows a lobbed flight.
    #[must_use]
    pub fn is_arcing(&self) -> bool {
        self.arc.is_some()
    }

    /// Height the lobbed flight launched from.
    #[must_use]
    pub fn arc_start_height(&self) -> Option<f32> {
        self.arc.map(|arc| arc.start_height)
    }

    /// Share of the planned flight already covered, for lobbed flights.
    #[must_use]
    pub fn arc_progress(&self) -> Option<f32> {
        self.arc
            .map(|arc| (arc.traveled / arc.total_distance).min(1.0))
    }

    /// Recent positions, when the kind draws a trail.
    #[must_use]
    pub fn trail(&self) -> Option<&Trail> {
        self.trail.as_ref()
    }

    /// Reports whether `enemy` has already been damaged by this projectile.
    #[must_use]
    pub fn has_hit(&self, enemy: EnemyId) -> bool {
        self.hit_targets.contains(&enemy)
    }

    /// Number of distinct enemies damaged so far.
    #[must_use]
    pub fn hit_count(&self) -> usize {
        self.hit_targets.len()
    }

    /// Reports whether the projectile still flies.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Marks the projectile dead without hitting anything.
    pub fn expire(&mut self) {
        self.alive = false;
    }

    /// Reports whether the projectile left `playfield` grown by `margin`.
    #[must_use]
    pub fn is_out_of_bounds(&self, playfield: Playfield, margin: f32) -> bool {
        !playfield.contains_with_margin(self.position, margin)
    }

    /// Advances the projectile by `dt` frames.
    pub fn update<E: Enemy>(&mut self, dt: f32, enemies: &[E], tuning: &ProjectileTuning) {
        if !self.alive {
            return;
        }

        if let Some(trail) = &mut self.trail {
            trail.push(self.position);
        }

        if self.homing {
            let target = self.target.and_then(|id| {
                enemies
                    .iter()
                    .find(|enemy| enemy.id() == id && !enemy.is_dead())
            });
            if let Some(target) = target {
                let destination = target.position();
                self.target_position = destination;
                self.steer_towards(destination, tuning.homing_turn_rate * dt);
            }
        }

        let step = self.velocity * dt;
        match &mut self.arc {
            Some(arc) => {
                arc.ground += step;
                arc.traveled += step.length();
                let progress = (arc.traveled / arc.total_distance).min(1.0);
                let lift = (progress * PI).sin() * arc.peak_height * tuning.arc_damping;
                self.position = arc.ground - Vec2::new(0.0, lift);
            }
            None => self.position += step,
        }
    }

    /// Reports whether the projectile currently overlaps `enemy`.
    ///
    /// Dead projectiles, dead enemies and enemies already hit never collide.
    #[must_use]
    pub fn check_collision<E: Enemy>(&self, enemy: &E, default_radius: f32) -> bool {
        if !self.alive || enemy.is_dead() || self.hit_targets.contains(&enemy.id()) {
            return false;
        }

        let reach = self.radius + enemy.radius().unwrap_or(default_radius);
        self.position.distance_squared(enemy.position()) <= reach * reach
    }

    /// Resolves a primary hit on the enemy at `index`.
    ///
    /// The primary target receives the resolved damage plus any slow and damage
    /// over time. Splash and chain targets receive flat fractions of the
    /// unresolved damage. Only this primary hit consumes pierce.
    pub fn on_hit<E: Enemy>(
        &mut self,
        index: usize,
        field: &mut Battlefield<'_, E>,
        tuning: &ProjectileTuning,
    ) {
        let Some(primary) = field.enemies.get_mut(index) else {
            return;
        };

        let enemy_id = primary.id();
        let _ = self.hit_targets.insert(enemy_id);

        let request = DamageRequest {
            base_damage: self.damage,
            attacker: self.attacker,
            target_armor: primary.armor(),
            can_crit: true,
        };
        let amount = field.resolver.resolve(request);
        if let Some(sink) = primary.damageable() {
            sink.take_damage(amount, self.attacker.source);
        }
        field.events.push(CombatEvent::Hit {
            projectile: self.id,
            enemy: enemy_id,
            amount,
        });
        trace!(
            projectile = self.id.get(),
            enemy = enemy_id.get(),
            amount,
            "primary hit"
        );

        if let Some(slow) = self.slow {
            if let Some(receiver) = primary.slowable() {
                receiver.apply_slow(slow.amount, slow.duration);
            }
        }
        if let Some(dot) = self.dot {
            if let Some(receiver) = primary.dot_receiver() {
                receiver.apply_dot(self.damage * dot.fraction, dot.duration);
            }
        }

        let anchor = primary.position();
        if self.splash_radius > 0.0 {
            self.splash(enemy_id, field, tuning.splash_fraction);
        }
        if self.chain > 0 {
            self.chain_from(anchor, field, tuning.chain_fraction);
        }

        if self.pierce > 0 {
            self.pierce -= 1;
        } else {
            self.alive = false;
        }
    }

    /// Draws the trail, body and highlight.
    pub fn render(&self, canvas: &mut dyn Canvas, scratch: &mut Vec<Vec2>) {
        if !self.alive {
            return;
        }

        if let Some(trail) = &self.trail {
            if !trail.is_empty() {
                scratch.clear();
                scratch.extend(trail.iter());
                scratch.push(self.position);
                canvas.stroke_polyline(scratch, self.radius * 0.5, self.color.with_alpha(0.4));
            }
        }

        canvas.fill_circle(self.position, self.radius, self.color);
        canvas.fill_circle(
            self.position - Vec2::splat(self.radius * 0.3),
            self.radius * 0.4,
            self.color.lighten(0.6),
        );
    }

    fn steer_towards(&mut self, destination: Vec2, max_turn: f32) {
        let desired = destination - self.position;
        if desired.length_squared() <= f32::EPSILON {
            return;
        }

        let current = self.velocity.y.atan2(self.velocity.x);
        let wanted = desired.y.atan2(desired.x);
        let turn = wrap_angle(wanted - current).clamp(-max_turn, max_turn);
        self.velocity = Vec2::from_angle(current + turn) * self.speed;
    }

    fn splash<E: Enemy>(&mut self, primary: EnemyId, field: &mut Battlefield<'_, E>, fraction: f64) {
        let amount = self.damage * fraction;
        let center = self.position;

        for enemy in field.enemies.iter_mut() {
            if enemy.is_dead() {
                continue;
            }
            let id = enemy.id();
            if id == primary || self.hit_targets.contains(&id) {
                continue;
            }
            if enemy.position().distance_squared(center) > self.splash_radius_sq {
                continue;
            }

            let _ = self.hit_targets.insert(id);
            if let Some(sink) = enemy.damageable() {
                sink.take_damage(amount, self.attacker.source);
            }
            field.events.push(CombatEvent::SplashHit {
                projectile: self.id,
                enemy: id,
                amount,
            });
        }
    }

    fn chain_from<E: Enemy>(&mut self, start: Vec2, field: &mut Battlefield<'_, E>, fraction: f64) {
        let amount = self.damage * fraction;
        let mut anchor = start;

        for jump in 0..self.chain {
            let mut best: Option<(usize, f32)> = None;
            for (index, enemy) in field.enemies.iter().enumerate() {
                if enemy.is_dead() || self.hit_targets.contains(&enemy.id()) {
                    continue;
                }
                let distance_sq = enemy.position().distance_squared(anchor);
                if distance_sq > self.chain_range_sq {
                    continue;
                }
                match best {
                    Some((_, best_sq)) if best_sq <= distance_sq => {}
                    _ => best = Some((index, distance_sq)),
                }
            }

            let Some((index, _)) = best else {
                trace!(projectile = self.id.get(), jump, "chain ran out of targets");
                break;
            };

            let enemy = &mut field.enemies[index];
            let id = enemy.id();
            let to = enemy.position();
            let _ = self.hit_targets.insert(id);
            if let Some(sink) = enemy.damageable() {
                sink.take_damage(amount, self.attacker.source);
            }
            field.events.push(CombatEvent::ChainArc {
                projectile: self.id,
                enemy: id,
                from: anchor,
                to,
                amount,
            });
            anchor = to;
        }
    }
}

fn positive(value: Option<f32>) -> Option<f32> {
    value.filter(|value| value.is_finite() && *value > 0.0)
}

fn non_negative(value: Option<f32>) -> Option<f32> {
    value.filter(|value| value.is_finite() && *value >= 0.0)
}

fn valid_slow(slow: SlowEffect) -> bool {
    slow.amount.is_finite() && slow.amount >= 0.0 && slow.duration.is_finite() && slow.duration >= 0.0
}

fn valid_dot(dot: DotEffect) -> bool {
    dot.fraction.is_finite() && dot.fraction >= 0.0 && dot.duration.is_finite() && dot.duration >= 0.0
}

fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

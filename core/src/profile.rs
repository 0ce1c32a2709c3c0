//! Projectile kinds and their default behaviour profiles.

use serde::{Deserialize, Serialize};

use crate::Color;

/// Kinds of projectiles turrets can fire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    /// Fast single-target round.
    #[default]
    Bullet,
    /// Piercing beam segment.
    Laser,
    /// Homing rocket with a blast radius.
    Missile,
    /// Lobbed shell with a wide blast radius.
    Artillery,
    /// Bolt that chains between nearby enemies.
    Tesla,
    /// Shard that slows its target.
    Ice,
    /// Dart that poisons its target.
    Poison,
}

impl ProjectileKind {
    /// Every projectile kind in declaration order.
    pub const ALL: [ProjectileKind; 7] = [
        Self::Bullet,
        Self::Laser,
        Self::Missile,
        Self::Artillery,
        Self::Tesla,
        Self::Ice,
        Self::Poison,
    ];

    /// Behaviour applied when neither tuning nor construction options override a field.
    #[must_use]
    pub const fn default_profile(self) -> ProjectileProfile {
        let base = ProjectileProfile {
            speed: 12.0,
            size: 4.0,
            color: Color::from_rgb_u8(0xff, 0xd5, 0x4f),
            pierce: 0,
            splash_radius: 0.0,
            chain: 0,
            chain_range: 0.0,
            slow: None,
            dot: None,
            homing: false,
            arc_height: None,
            trail: false,
        };

        match self {
            Self::Bullet => base,
            Self::Laser => ProjectileProfile {
                speed: 20.0,
                size: 3.0,
                color: Color::from_rgb_u8(0xff, 0x17, 0x44),
                pierce: 2,
                trail: true,
                ..base
            },
            Self::Missile => ProjectileProfile {
                speed: 8.0,
                size: 6.0,
                color: Color::from_rgb_u8(0xff, 0x91, 0x00),
                splash_radius: 60.0,
                homing: true,
                trail: true,
                ..base
            },
            Self::Artillery => ProjectileProfile {
                speed: 6.0,
                size: 8.0,
                color: Color::from_rgb_u8(0x8d, 0x6e, 0x63),
                splash_radius: 80.0,
                arc_height: Some(120.0),
                ..base
            },
            Self::Tesla => ProjectileProfile {
                speed: 15.0,
                size: 5.0,
                color: Color::from_rgb_u8(0x40, 0xc4, 0xff),
                chain: 3,
                chain_range: 120.0,
                trail: true,
                ..base
            },
            Self::Ice => ProjectileProfile {
                speed: 10.0,
                size: 5.0,
                color: Color::from_rgb_u8(0xb3, 0xe5, 0xfc),
                slow: Some(SlowEffect {
                    amount: 0.5,
                    duration: 120.0,
                }),
                trail: true,
                ..base
            },
            Self::Poison => ProjectileProfile {
                speed: 9.0,
                size: 5.0,
                color: Color::from_rgb_u8(0x76, 0xff, 0x03),
                dot: Some(DotEffect {
                    fraction: 0.3,
                    duration: 180.0,
                }),
                trail: true,
                ..base
            },
        }
    }
}

/// Movement slow applied on a primary hit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlowEffect {
    /// Fraction of speed removed, 0.0..=1.0.
    pub amount: f32,
    /// Frames the slow lasts.
    pub duration: f32,
}

/// Damage over time applied on a primary hit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DotEffect {
    /// Share of the projectile damage dealt over the duration.
    pub fraction: f64,
    /// Frames the effect lasts.
    pub duration: f32,
}

/// Complete behaviour description of a projectile kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileProfile {
    /// Distance travelled per frame.
    pub speed: f32,
    /// Collision and drawing radius.
    pub size: f32,
    /// Body color.
    pub color: Color,
    /// Extra enemies the projectile passes through.
    pub pierce: u32,
    /// Radius of secondary damage around an impact; zero disables splash.
    pub splash_radius: f32,
    /// Number of chain jumps after a primary hit.
    pub chain: u32,
    /// Maximum distance of a single chain jump.
    pub chain_range: f32,
    /// Slow applied to the primary target.
    pub slow: Option<SlowEffect>,
    /// Damage over time applied to the primary target.
    pub dot: Option<DotEffect>,
    /// Whether the projectile steers toward its target.
    pub homing: bool,
    /// Peak height of a lobbed flight; `None` flies straight.
    pub arc_height: Option<f32>,
    /// Whether recent positions are kept for drawing a trail.
    pub trail: bool,
}

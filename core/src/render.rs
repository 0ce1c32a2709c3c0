//! Drawing contracts used to present live projectiles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    #[serde(default = "opaque")]
    pub alpha: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Returns the same color with its alpha channel replaced.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self {
            red: self.red,
            green: self.green,
            blue: self.blue,
            alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Drawing surface supplied by a presentation adapter.
pub trait Canvas {
    /// Strokes connected line segments through `points`, oldest first.
    fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: Color);

    /// Fills a circle centred on `center`.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn lighten_moves_channels_towards_white() {
        let color = Color::new(0.0, 0.5, 1.0, 0.25).lighten(0.5);
        assert!((color.red - 0.5).abs() < f32::EPSILON);
        assert!((color.green - 0.75).abs() < f32::EPSILON);
        assert!((color.blue - 1.0).abs() < f32::EPSILON);
        assert!((color.alpha - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn lighten_clamps_amount() {
        let color = Color::from_rgb_u8(0, 0, 0).lighten(4.0);
        assert!((color.red - 1.0).abs() < f32::EPSILON);
    }
}

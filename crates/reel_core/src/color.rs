//! Color types
//!
//! Colors are stored as straight (non-premultiplied) RGBA in `[0, 1]`. HSL is the
//! space the timeline blends colors in, so both directions of the conversion live here.

use serde::{Deserialize, Serialize};

/// RGBA color
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    /// Build an opaque color from hue (degrees), saturation and lightness (`0..=1`).
    pub fn hsl(h: f32, s: f32, l: f32) -> Self {
        Hsla::new(h, s, l, 1.0).to_color()
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn to_hsla(&self) -> Hsla {
        Hsla::from_color(*self)
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|c| c.is_finite())
    }

    /// CSS `rgba(...)` notation with 8-bit channels
    pub fn to_css(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "rgba({}, {}, {}, {})",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            self.a.clamp(0.0, 1.0)
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Hue / saturation / lightness / alpha
///
/// Hue is in degrees and is not wrapped, so a blend between two hues can sweep
/// past 360. Saturation, lightness and alpha are in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hsla {
    pub h: f32,
    pub s: f32,
    pub l: f32,
    pub a: f32,
}

impl Hsla {
    pub const fn new(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self { h, s, l, a }
    }

    pub fn from_color(color: Color) -> Self {
        let max = color.r.max(color.g).max(color.b);
        let min = color.r.min(color.g).min(color.b);
        let l = (max + min) / 2.0;
        let d = max - min;

        if d.abs() < f32::EPSILON {
            return Self::new(0.0, 0.0, l, color.a);
        }

        let s = d / (1.0 - (2.0 * l - 1.0).abs());
        let h = if max == color.r {
            60.0 * ((color.g - color.b) / d).rem_euclid(6.0)
        } else if max == color.g {
            60.0 * ((color.b - color.r) / d + 2.0)
        } else {
            60.0 * ((color.r - color.g) / d + 4.0)
        };

        Self::new(h, s.clamp(0.0, 1.0), l, color.a)
    }

    pub fn to_color(&self) -> Color {
        let h = self.h.rem_euclid(360.0) / 60.0;
        let s = self.s.clamp(0.0, 1.0);
        let l = self.l.clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Color::rgba(r + m, g + m, b + m, self.a)
    }

    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            h: self.h + (other.h - self.h) * t,
            s: self.s + (other.s - self.s) * t,
            l: self.l + (other.l - self.l) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

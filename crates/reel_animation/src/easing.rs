//! Easing functions for animations
//!
//! Curves are addressable by name so compositions can be configured from files.
//! Both CSS-style (`ease-in-out-cubic`) and GSAP-style (`power3.inOut`) names resolve
//! through [`Easing::from_name`].

use std::f32::consts::PI;
use std::str::FromStr;

use crate::error::{ConfigurationError, Result};

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
    EaseInCirc,
    EaseOutCirc,
    EaseInOutCirc,
    CubicBezier(f32, f32, f32, f32),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    In,
    Out,
    InOut,
}

#[derive(Clone, Copy)]
enum Family {
    Quad,
    Cubic,
    Quart,
    Quint,
    Sine,
    Expo,
    Circ,
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => in_out_power(t, 2),
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => in_out_power(t, 3),
            Easing::EaseInQuart => t.powi(4),
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::EaseInOutQuart => in_out_power(t, 4),
            Easing::EaseInQuint => t.powi(5),
            Easing::EaseOutQuint => 1.0 - (1.0 - t).powi(5),
            Easing::EaseInOutQuint => in_out_power(t, 5),
            Easing::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            Easing::EaseOutSine => (t * PI / 2.0).sin(),
            Easing::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Easing::EaseInExpo => {
                if t <= 0.0 {
                    0.0
                } else {
                    2f32.powf(10.0 * t - 10.0)
                }
            }
            Easing::EaseOutExpo => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * t)
                }
            }
            Easing::EaseInOutExpo => {
                if t <= 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else if t < 0.5 {
                    2f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            Easing::EaseInCirc => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
            Easing::EaseOutCirc => (1.0 - (t - 1.0) * (t - 1.0)).max(0.0).sqrt(),
            Easing::EaseInOutCirc => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).max(0.0).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).max(0.0).sqrt() + 1.0) / 2.0
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, *x1, *y1, *x2, *y2),
        }
    }

    /// Look up a curve by name
    ///
    /// Accepts `linear`/`none`, the CSS keywords (`ease`, `ease-in`, `ease-out`,
    /// `ease-in-out`), CSS-style family names (`ease-in-out-quint`) and GSAP-style
    /// names (`power1.inOut`, `quart.out`, `sine`). A GSAP name without a direction
    /// eases out. Matching ignores ASCII case.
    pub fn from_name(name: &str) -> Result<Easing> {
        let key = name.trim().to_ascii_lowercase();

        let keyword = match key.as_str() {
            "linear" | "none" | "power0" => Some(Easing::Linear),
            "ease" => Some(Easing::CubicBezier(0.25, 0.1, 0.25, 1.0)),
            "ease-in" => Some(Easing::EaseIn),
            "ease-out" => Some(Easing::EaseOut),
            "ease-in-out" => Some(Easing::EaseInOut),
            _ => None,
        };
        if let Some(easing) = keyword {
            return Ok(easing);
        }

        let (family, direction) = if let Some(rest) = key.strip_prefix("ease-") {
            if let Some(family) = rest.strip_prefix("in-out-") {
                (family, Some(Direction::InOut))
            } else if let Some(family) = rest.strip_prefix("in-") {
                (family, Some(Direction::In))
            } else if let Some(family) = rest.strip_prefix("out-") {
                (family, Some(Direction::Out))
            } else {
                (rest, None)
            }
        } else {
            match key.split_once('.') {
                Some((family, "in")) => (family, Some(Direction::In)),
                Some((family, "out")) => (family, Some(Direction::Out)),
                Some((family, "inout")) => (family, Some(Direction::InOut)),
                Some((family, _)) => (family, None),
                None => (key.as_str(), Some(Direction::Out)),
            }
        };

        direction
            .and_then(|direction| Self::from_parts(family, direction))
            .ok_or_else(|| ConfigurationError::UnknownEasing(name.to_string()))
    }

    fn from_parts(family: &str, direction: Direction) -> Option<Easing> {
        let family = match family {
            "power0" | "linear" | "none" => return Some(Easing::Linear),
            "power1" | "quad" => Family::Quad,
            "power2" | "cubic" => Family::Cubic,
            "power3" | "quart" => Family::Quart,
            "power4" | "quint" | "strong" => Family::Quint,
            "sine" => Family::Sine,
            "expo" => Family::Expo,
            "circ" => Family::Circ,
            _ => return None,
        };

        Some(match (family, direction) {
            (Family::Quad, Direction::In) => Easing::EaseInQuad,
            (Family::Quad, Direction::Out) => Easing::EaseOutQuad,
            (Family::Quad, Direction::InOut) => Easing::EaseInOutQuad,
            (Family::Cubic, Direction::In) => Easing::EaseInCubic,
            (Family::Cubic, Direction::Out) => Easing::EaseOutCubic,
            (Family::Cubic, Direction::InOut) => Easing::EaseInOutCubic,
            (Family::Quart, Direction::In) => Easing::EaseInQuart,
            (Family::Quart, Direction::Out) => Easing::EaseOutQuart,
            (Family::Quart, Direction::InOut) => Easing::EaseInOutQuart,
            (Family::Quint, Direction::In) => Easing::EaseInQuint,
            (Family::Quint, Direction::Out) => Easing::EaseOutQuint,
            (Family::Quint, Direction::InOut) => Easing::EaseInOutQuint,
            (Family::Sine, Direction::In) => Easing::EaseInSine,
            (Family::Sine, Direction::Out) => Easing::EaseOutSine,
            (Family::Sine, Direction::InOut) => Easing::EaseInOutSine,
            (Family::Expo, Direction::In) => Easing::EaseInExpo,
            (Family::Expo, Direction::Out) => Easing::EaseOutExpo,
            (Family::Expo, Direction::InOut) => Easing::EaseInOutExpo,
            (Family::Circ, Direction::In) => Easing::EaseInCirc,
            (Family::Circ, Direction::Out) => Easing::EaseOutCirc,
            (Family::Circ, Direction::InOut) => Easing::EaseInOutCirc,
        })
    }
}

impl FromStr for Easing {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self> {
        Easing::from_name(s)
    }
}

/// Symmetric in-out curve built from `t^power`
#[inline]
fn in_out_power(t: f32, power: i32) -> f32 {
    if t < 0.5 {
        2f32.powi(power - 1) * t.powi(power)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(power) / 2.0
    }
}

/// Cubic bezier easing calculation (matches CSS spec / browser implementations).
///
/// Uses Newton-Raphson with binary-search fallback for robustness.
/// Computes in f64 internally so repeated seeks land on identical values.
fn cubic_bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    // Endpoints are always exact
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let x = t as f64;
    let (x1, y1, x2, y2) = (x1 as f64, y1 as f64, x2 as f64, y2 as f64);

    let mut p = x;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - x;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2) as f32;
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    // Binary search fallback (always converges)
    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    p = x;
    for _ in 0..20 {
        let val = bezier_sample(p, x1, x2);
        if (val - x).abs() < 1e-7 {
            break;
        }
        if val < x {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2) as f32
}

/// B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³ in Horner form
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}

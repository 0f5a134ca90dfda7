//! Value interpolation
//!
//! Numbers blend linearly, angles either linearly (multi-turn sweeps are kept) or
//! along the shortest arc, and colors per channel in RGB or HSL space.

use reel_core::{Color, Property, PropertyValue};

use crate::error::{ConfigurationError, Result};

/// How angles are blended
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AngleMode {
    /// Plain numeric blend; `0 -> 720` turns twice
    #[default]
    Absolute,
    /// Blend along the shorter arc; `350 -> 10` passes through 0
    ShortestPath,
}

/// Which space colors are blended in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorSpace {
    Rgb,
    #[default]
    Hsl,
}

/// Interpolation kind for one property track
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterpKind {
    Numeric,
    Angle(AngleMode),
    Color(ColorSpace),
}

impl InterpKind {
    /// Default kind for a property key
    pub fn for_property(property: &Property) -> Self {
        if property.is_angle() {
            InterpKind::Angle(AngleMode::Absolute)
        } else if property.is_color() {
            InterpKind::Color(ColorSpace::Hsl)
        } else {
            InterpKind::Numeric
        }
    }

    /// Whether `value` can be an endpoint of this kind
    pub fn accepts(&self, value: &PropertyValue) -> bool {
        matches!(
            (self, value),
            (InterpKind::Numeric, PropertyValue::Number(_))
                | (InterpKind::Angle(_), PropertyValue::Number(_) | PropertyValue::Angle(_))
                | (InterpKind::Color(_), PropertyValue::Color(_))
        )
    }
}

/// Interpolate between `a` and `b`
///
/// `progress` is clamped to `[0, 1]` after easing has been applied by the caller.
/// Non-finite inputs and endpoints the kind cannot blend are configuration errors.
pub fn interpolate(
    kind: InterpKind,
    a: &PropertyValue,
    b: &PropertyValue,
    progress: f32,
) -> Result<PropertyValue> {
    ConfigurationError::check_finite("progress", progress as f64)?;
    for value in [a, b] {
        if !value.is_finite() {
            return Err(ConfigurationError::NonFinite {
                what: "interpolation endpoint",
                value: value.as_f32().map_or(f64::NAN, |v| v as f64),
            });
        }
    }
    let mismatch = || ConfigurationError::MismatchedValues {
        property: format!("{kind:?}"),
        from: a.kind_name(),
        to: b.kind_name(),
    };
    if !kind.accepts(a) || !kind.accepts(b) {
        return Err(mismatch());
    }

    let t = progress.clamp(0.0, 1.0);

    let value = match (kind, a, b) {
        (InterpKind::Numeric, PropertyValue::Number(a), PropertyValue::Number(b)) => {
            PropertyValue::Number(lerp(*a, *b, t))
        }
        (InterpKind::Angle(mode), a, b) => {
            let a = a.as_f32().ok_or_else(mismatch)?;
            let b = b.as_f32().ok_or_else(mismatch)?;
            PropertyValue::Angle(match mode {
                AngleMode::Absolute => lerp(a, b, t),
                AngleMode::ShortestPath => a + shortest_delta(a, b) * t,
            })
        }
        (InterpKind::Color(space), PropertyValue::Color(a), PropertyValue::Color(b)) => {
            PropertyValue::Color(match space {
                ColorSpace::Rgb => lerp_rgb(a, b, t),
                ColorSpace::Hsl => lerp_hsl(a, b, t),
            })
        }
        _ => return Err(mismatch()),
    };

    Ok(value)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Signed difference `b - a` folded into `[-180, 180)`
fn shortest_delta(a: f32, b: f32) -> f32 {
    (b - a + 180.0).rem_euclid(360.0) - 180.0
}

fn lerp_rgb(a: &Color, b: &Color, t: f32) -> Color {
    Color::rgba(
        lerp(a.r, b.r, t),
        lerp(a.g, b.g, t),
        lerp(a.b, b.b, t),
        lerp(a.a, b.a, t),
    )
}

fn lerp_hsl(a: &Color, b: &Color, t: f32) -> Color {
    let mut from = a.to_hsla();
    let mut to = b.to_hsla();

    // Achromatic endpoints have no meaningful hue; borrow the other side's
    if from.s == 0.0 {
        from.h = to.h;
    }
    if to.s == 0.0 {
        to.h = from.h;
    }

    from.lerp(&to, t).to_color()
}

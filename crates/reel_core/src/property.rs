//! Animatable properties
//!
//! The engine does not know how elements are drawn. It only knows element ids,
//! property keys and the values written to them.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::color::Color;

/// Identifier of a visual element owned by the visual layer
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The `index`-th element of a repeated group, e.g. `die-3`
    pub fn indexed(group: &str, index: usize) -> Self {
        Self(format!("{group}-{index}"))
    }

    /// A named part nested under this element, e.g. `die-3/cube`
    pub fn child(&self, name: &str) -> Self {
        Self(format!("{}/{}", self.0, name))
    }

    /// The `index`-th part nested under this element, e.g. `die-3/face-1`
    pub fn indexed_child(&self, name: &str, index: usize) -> Self {
        Self(format!("{}/{}-{}", self.0, name, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ElementId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Property key written onto an element
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    /// Translation X in pixels
    X,
    /// Translation Y in pixels
    Y,
    /// Translation Z in pixels (positive = toward viewer)
    Z,
    /// Translation X as a percentage of the element width
    XPercent,
    /// Translation Y as a percentage of the element height
    YPercent,
    /// Rotation in degrees (Z-axis)
    Rotate,
    /// Rotation X in degrees (3D tilt)
    RotateX,
    /// Rotation Y in degrees (3D turn)
    RotateY,
    /// Uniform scale factor
    Scale,
    /// Opacity (0.0 to 1.0)
    Opacity,
    /// Foreground color
    Color,
    /// Background color
    BackgroundColor,
    /// Anything the visual layer understands that has no dedicated key
    Custom(String),
}

impl Property {
    pub fn as_str(&self) -> &str {
        match self {
            Property::X => "x",
            Property::Y => "y",
            Property::Z => "z",
            Property::XPercent => "xPercent",
            Property::YPercent => "yPercent",
            Property::Rotate => "rotate",
            Property::RotateX => "rotateX",
            Property::RotateY => "rotateY",
            Property::Scale => "scale",
            Property::Opacity => "opacity",
            Property::Color => "color",
            Property::BackgroundColor => "backgroundColor",
            Property::Custom(name) => name,
        }
    }

    /// Whether values for this key are angles in degrees
    pub fn is_angle(&self) -> bool {
        matches!(self, Property::Rotate | Property::RotateX | Property::RotateY)
    }

    /// Whether values for this key are colors
    pub fn is_color(&self) -> bool {
        matches!(self, Property::Color | Property::BackgroundColor)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Property {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "x" => Property::X,
            "y" => Property::Y,
            "z" => Property::Z,
            "xPercent" => Property::XPercent,
            "yPercent" => Property::YPercent,
            "rotate" | "rotation" | "rotateZ" => Property::Rotate,
            "rotateX" => Property::RotateX,
            "rotateY" => Property::RotateY,
            "scale" => Property::Scale,
            "opacity" | "alpha" => Property::Opacity,
            "color" => Property::Color,
            "backgroundColor" => Property::BackgroundColor,
            other => Property::Custom(other.to_string()),
        })
    }
}

impl Serialize for Property {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A resolved property value
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PropertyValue {
    Number(f32),
    /// Degrees
    Angle(f32),
    Color(Color),
}

impl PropertyValue {
    pub fn is_finite(&self) -> bool {
        match self {
            PropertyValue::Number(v) | PropertyValue::Angle(v) => v.is_finite(),
            PropertyValue::Color(c) => c.is_finite(),
        }
    }

    /// Scalar payload of a number or angle
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            PropertyValue::Number(v) | PropertyValue::Angle(v) => Some(*v),
            PropertyValue::Color(_) => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            PropertyValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    /// Short name of the value's kind, for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            PropertyValue::Number(_) => "number",
            PropertyValue::Angle(_) => "angle",
            PropertyValue::Color(_) => "color",
        }
    }
}

impl From<f32> for PropertyValue {
    fn from(value: f32) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<Color> for PropertyValue {
    fn from(color: Color) -> Self {
        PropertyValue::Color(color)
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PropertyValue::Number(v) | PropertyValue::Angle(v) => serializer.serialize_f32(*v),
            PropertyValue::Color(c) => serializer.serialize_str(&c.to_css()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_naming() {
        let die = ElementId::indexed("die", 3);
        assert_eq!(die.as_str(), "die-3");
        assert_eq!(die.child("cube").as_str(), "die-3/cube");
        assert_eq!(die.indexed_child("face", 1).as_str(), "die-3/face-1");
    }

    #[test]
    fn test_property_names_round_trip() {
        for prop in [
            Property::X,
            Property::YPercent,
            Property::RotateY,
            Property::Opacity,
            Property::BackgroundColor,
        ] {
            assert_eq!(prop.as_str().parse::<Property>().unwrap(), prop);
        }
        assert_eq!(
            "blur".parse::<Property>().unwrap(),
            Property::Custom("blur".to_string())
        );
    }

    #[test]
    fn test_value_serialization() {
        let json = serde_json::to_string(&PropertyValue::Color(Color::rgb(1.0, 0.0, 0.0))).unwrap();
        assert_eq!(json, "\"rgba(255, 0, 0, 1)\"");
        let json = serde_json::to_string(&PropertyValue::Angle(90.0)).unwrap();
        assert_eq!(json, "90.0");
    }
}

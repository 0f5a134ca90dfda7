//! Composition presets
//!
//! Ready-made compositions that build a complete animation tree from a small
//! serializable config.

use reel_core::{Color, ElementId, Property, PropertyValue, VisualLayer};
use serde::{Deserialize, Serialize};

use crate::adapter::Composition;
use crate::easing::Easing;
use crate::error::{ConfigurationError, Result};
use crate::stagger::Stagger;
use crate::timeline::Timeline;
use crate::timing::{FillMode, Repeat};
use crate::tween::{Tween, TweenDefaults, ValueSource};

/// Element group holding one element per die
pub const DIE_GROUP: &str = "die";

/// Element carrying the whole stack
pub const TRAY: &str = "tray";

/// Faces mounted on every die's cube
pub const FACES_PER_DIE: usize = 3;

const FACE_ROTATIONS: [f32; FACES_PER_DIE] = [90.0, 270.0, 0.0];
const FACE_DEPTH: f32 = 200.0;

/// Per-die face color: a hue ramp across the stack with fixed saturation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorFormula {
    /// Hue of the first die, degrees
    pub hue_start: f32,
    /// Hue added across the whole stack, degrees
    pub hue_span: f32,
    pub saturation: f32,
    /// Lightness of each face, cycled through by the color tweens
    pub lightness: [f32; FACES_PER_DIE],
}

impl Default for ColorFormula {
    fn default() -> Self {
        Self {
            hue_start: 130.0,
            hue_span: 75.0,
            saturation: 0.67,
            lightness: [0.4, 0.5, 0.85],
        }
    }
}

impl ColorFormula {
    /// Hue of die `index` among `count`
    pub fn hue(&self, index: usize, count: usize) -> f32 {
        if count == 0 {
            return self.hue_start;
        }
        index as f32 / count as f32 * self.hue_span + self.hue_start
    }

    /// Color of die `index` at lightness slot `slot`
    pub fn color(&self, index: usize, count: usize, slot: usize) -> Color {
        Color::hsl(
            self.hue(index, count),
            self.saturation,
            self.lightness[slot % FACES_PER_DIE],
        )
    }

    fn validate(&self) -> Result<()> {
        for value in [self.hue_start, self.hue_span, self.saturation]
            .into_iter()
            .chain(self.lightness)
        {
            ConfigurationError::check_finite("color formula", value as f64)?;
        }
        Ok(())
    }
}

/// Options of the dice-stack composition
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiceStackConfig {
    /// Number of dice; must match the mounted `die` group
    pub element_count: i64,
    /// Default easing of every die timeline
    pub easing: String,
    /// Repeat of every die timeline, `-1` for infinite
    pub repeat: Repeat,
    pub yoyo: bool,
    /// Start offset between consecutive dice, seconds
    pub stagger_each: f64,
    pub color_formula: ColorFormula,
}

impl Default for DiceStackConfig {
    fn default() -> Self {
        Self {
            element_count: 19,
            easing: "power3.inOut".to_string(),
            repeat: Repeat::Infinite,
            yoyo: true,
            stagger_each: 0.05,
            color_formula: ColorFormula::default(),
        }
    }
}

impl DiceStackConfig {
    /// Configured element count as a usize
    pub fn count(&self) -> Result<usize> {
        usize::try_from(self.element_count)
            .map_err(|_| ConfigurationError::InvalidElementCount(self.element_count))
    }

    pub fn validate(&self) -> Result<()> {
        self.count()?;
        self.color_formula.validate()?;
        Easing::from_name(&self.easing)?;
        let each = ConfigurationError::check_finite("stagger each", self.stagger_each)?;
        if each < 0.0 {
            return Err(ConfigurationError::NegativeOffset(each));
        }
        Ok(())
    }
}

/// A stack of rotating three-faced dice on a swaying tray
///
/// Every die's cube swings between -90° and 90° while its faces cycle through
/// the configured lightness levels. Dice start `stagger_each` apart and each one
/// is already `i / n` of the way through its own cycle. The tray bobs, rotates
/// and pulses in scale, and the dice fade in from the last one up.
#[derive(Clone, Debug, Default)]
pub struct DiceStack {
    config: DiceStackConfig,
}

impl DiceStack {
    pub fn new(config: DiceStackConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DiceStackConfig {
        &self.config
    }

    /// Build the full tree for `count` mounted dice
    pub fn timeline(&self, count: usize) -> Result<Timeline> {
        self.config.validate()?;

        let defaults = TweenDefaults {
            duration: 1.0,
            easing: Easing::from_name(&self.config.easing)?,
        };

        let mut root = Timeline::builder();
        if count > 0 {
            // Face geometry is static and applies from mount on
            let faces = (0..count).flat_map(|i| {
                let die = ElementId::indexed(DIE_GROUP, i);
                (0..FACES_PER_DIE).map(move |j| die.indexed_child("face", j))
            });
            root = root.set(
                Tween::builder()
                    .targets(faces)
                    .set(Property::Z, FACE_DEPTH)
                    .set(
                        Property::RotateY,
                        ValueSource::per_index(|j, _| {
                            PropertyValue::Angle(FACE_ROTATIONS[j % FACES_PER_DIE])
                        }),
                    ),
                0.0,
            );
        }
        for i in 0..count {
            let die = self.die_timeline(i, count, defaults)?;
            root = root.add_at_progress(
                die,
                i as f64 * self.config.stagger_each,
                i as f64 / count as f64,
            );
        }
        root.add(self.tray_timeline(count)?, 0.0).build()
    }

    fn die_timeline(&self, index: usize, count: usize, defaults: TweenDefaults) -> Result<Timeline> {
        let die = ElementId::indexed(DIE_GROUP, index);
        let faces: Vec<ElementId> = (0..FACES_PER_DIE)
            .map(|j| die.indexed_child("face", j))
            .collect();

        // Face `j` shows lightness slot `order[j]`
        let face_colors = |order: [usize; FACES_PER_DIE]| {
            let formula = self.color_formula();
            ValueSource::per_index(move |j, _| {
                PropertyValue::Color(formula.color(index, count, order[j % FACES_PER_DIE]))
            })
        };

        Timeline::builder()
            .repeat(self.config.repeat)
            .yoyo(self.config.yoyo)
            .defaults(defaults)
            // The opening tweens show their start values until the die starts
            .tween(
                Tween::builder()
                    .target(die.child("cube"))
                    .from_to(
                        Property::RotateY,
                        PropertyValue::Angle(-90.0),
                        PropertyValue::Angle(90.0),
                    )
                    .duration(2.0)
                    .ease("power1.inOut")
                    .fill(FillMode::Both),
                0.0,
            )
            .tween(
                Tween::builder()
                    .targets(faces.iter().cloned())
                    .from_to(Property::Color, face_colors([2, 0, 1]), face_colors([0, 1, 2]))
                    .fill(FillMode::Both),
                0.0,
            )
            .tween(
                Tween::builder()
                    .targets(faces)
                    .from_to(Property::Color, face_colors([0, 1, 2]), face_colors([1, 2, 0])),
                1.0,
            )
            .build()
    }

    fn tray_timeline(&self, count: usize) -> Result<Timeline> {
        let tray = ElementId::new(TRAY);
        let swaying = |property: Property, from: PropertyValue, to: PropertyValue, duration: f64| {
            Tween::builder()
                .target(tray.clone())
                .from_to(property, from, to)
                .duration(duration)
                .repeat(Repeat::Infinite)
                .yoyo(true)
        };

        let mut tray_timeline = Timeline::builder()
            .tween(
                swaying(
                    Property::YPercent,
                    PropertyValue::Number(-3.0),
                    PropertyValue::Number(0.0),
                    2.0,
                )
                .ease("power1.inOut"),
                0.0,
            )
            .tween(
                swaying(
                    Property::Rotate,
                    PropertyValue::Angle(-15.0),
                    PropertyValue::Angle(15.0),
                    4.0,
                )
                .ease("power1.inOut"),
                0.0,
            );

        if count > 0 {
            // Dice stay hidden until their fade starts; the last die appears first
            tray_timeline = tray_timeline.staggered_tween(
                Tween::builder()
                    .targets((0..count).map(|i| ElementId::indexed(DIE_GROUP, i)))
                    .from_to(Property::Opacity, 0.0, 1.0)
                    .duration(0.01)
                    .fill(FillMode::Both),
                Stagger::each(-0.05).ease(Easing::EaseInQuad),
                0.0,
            );
        }

        tray_timeline
            .tween(
                swaying(
                    Property::Scale,
                    PropertyValue::Number(1.0),
                    PropertyValue::Number(1.2),
                    2.0,
                )
                .ease("power3.inOut"),
                0.0,
            )
            .build()
    }

    fn color_formula(&self) -> ColorFormula {
        self.config.color_formula.clone()
    }
}

impl Composition for DiceStack {
    fn name(&self) -> &str {
        "dice-stack"
    }

    fn build(&self, layer: &dyn VisualLayer) -> Result<Option<Timeline>> {
        let expected = self.config.count()?;

        let (Some(mounted), Some(_)) = (layer.element_count(DIE_GROUP), layer.element_count(TRAY))
        else {
            return Ok(None);
        };

        if mounted != expected {
            return Err(ConfigurationError::ElementCountMismatch {
                group: DIE_GROUP.to_string(),
                expected,
                actual: mounted,
            });
        }

        self.timeline(mounted).map(Some)
    }
}

//! Tweens
//!
//! A tween is the atomic animation unit: a set of targets, one track per property,
//! a duration, an easing curve and its own repeat/yoyo rules. Tweens are immutable
//! once built.

use std::fmt;
use std::sync::Arc;

use reel_core::{Color, ElementId, Property, PropertySnapshot, PropertyValue};
use smallvec::SmallVec;

use crate::easing::Easing;
use crate::error::{ConfigurationError, Result};
use crate::interpolate::{interpolate, InterpKind};
use crate::timing::{FillMode, Playback, Repeat};

/// Pure per-target value function: `(index, count) -> value`
pub type IndexFn = Arc<dyn Fn(usize, usize) -> PropertyValue + Send + Sync>;

/// Start or end value of a track
#[derive(Clone)]
pub enum ValueSource {
    Constant(PropertyValue),
    /// Evaluated at query time with the target's index and the target count
    PerIndex(IndexFn),
}

impl ValueSource {
    pub fn per_index<F>(f: F) -> Self
    where
        F: Fn(usize, usize) -> PropertyValue + Send + Sync + 'static,
    {
        ValueSource::PerIndex(Arc::new(f))
    }

    pub fn resolve(&self, index: usize, count: usize) -> PropertyValue {
        match self {
            ValueSource::Constant(value) => *value,
            ValueSource::PerIndex(f) => f(index, count),
        }
    }
}

impl fmt::Debug for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            ValueSource::PerIndex(_) => f.write_str("PerIndex(..)"),
        }
    }
}

impl From<PropertyValue> for ValueSource {
    fn from(value: PropertyValue) -> Self {
        ValueSource::Constant(value)
    }
}

impl From<f32> for ValueSource {
    fn from(value: f32) -> Self {
        ValueSource::Constant(PropertyValue::Number(value))
    }
}

impl From<f64> for ValueSource {
    fn from(value: f64) -> Self {
        ValueSource::Constant(PropertyValue::Number(value as f32))
    }
}

impl From<Color> for ValueSource {
    fn from(color: Color) -> Self {
        ValueSource::Constant(PropertyValue::Color(color))
    }
}

/// One animated property of a tween
#[derive(Clone, Debug)]
pub struct Track {
    pub property: Property,
    pub from: ValueSource,
    pub to: ValueSource,
    pub kind: InterpKind,
}

/// An element animated by a tween, with its position among the tween's targets
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub element: ElementId,
    pub index: usize,
    pub count: usize,
}

/// Duration and easing used when a tween does not set its own
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenDefaults {
    pub duration: f64,
    pub easing: Easing,
}

impl Default for TweenDefaults {
    fn default() -> Self {
        Self {
            duration: 0.5,
            easing: Easing::EaseOutQuad,
        }
    }
}

/// Atomic animation unit
#[derive(Clone, Debug)]
pub struct Tween {
    targets: SmallVec<[Target; 4]>,
    tracks: SmallVec<[Track; 2]>,
    duration: f64,
    easing: Easing,
    playback: Playback,
    fill: FillMode,
}

impl Tween {
    pub fn builder() -> TweenBuilder {
        TweenBuilder::new()
    }

    /// Zero-duration tween holding `property` of `target` at `value`
    pub fn set(
        target: impl Into<ElementId>,
        property: Property,
        value: impl Into<ValueSource>,
    ) -> Result<Tween> {
        TweenBuilder::new()
            .target(target)
            .set(property, value)
            .duration(0.0)
            .build()
    }

    /// Duration of a single cycle
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Duration including repeats
    pub fn total_duration(&self) -> f64 {
        self.playback.total_duration(self.duration)
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn fill(&self) -> FillMode {
        self.fill
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Property values at `time`, measured from the tween's start
    ///
    /// Times outside the tween are clamped: before the start yields the start
    /// values, after the end the end values.
    pub fn evaluate(&self, time: f64) -> Result<PropertySnapshot> {
        ConfigurationError::check_finite("seek time", time)?;
        let mut snapshot = PropertySnapshot::new();
        self.write_clamped(time, &mut snapshot)?;
        Ok(snapshot)
    }

    /// Contribution of this tween when nested at local `time` inside a timeline
    pub(crate) fn contribute(&self, time: f64, out: &mut PropertySnapshot) -> Result<()> {
        if time < 0.0 {
            if self.fill.fills_backwards() {
                self.sample(0.0, out)?;
            }
            return Ok(());
        }
        if time > self.total_duration() && !self.fill.fills_forwards() {
            return Ok(());
        }
        self.write_clamped(time, out)
    }

    fn write_clamped(&self, time: f64, out: &mut PropertySnapshot) -> Result<()> {
        let position = self.playback.resolve(time, self.duration);
        self.sample(position.local, out)
    }

    /// Write every target's tracks at `local` time inside one cycle
    fn sample(&self, local: f64, out: &mut PropertySnapshot) -> Result<()> {
        let progress = if self.duration <= 0.0 {
            1.0
        } else {
            (local / self.duration).clamp(0.0, 1.0) as f32
        };

        // Pin the endpoints so clamped reads are exact whatever the curve
        let eased = if progress <= 0.0 {
            0.0
        } else if progress >= 1.0 {
            1.0
        } else {
            self.easing.apply(progress)
        };

        for target in &self.targets {
            for track in &self.tracks {
                let from = track.from.resolve(target.index, target.count);
                let to = track.to.resolve(target.index, target.count);
                let value = interpolate(track.kind, &from, &to, eased)?;
                out.insert(target.element.clone(), track.property.clone(), value);
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
enum EasingChoice {
    Curve(Easing),
    Named(String),
}

/// Builder for [`Tween`]
///
/// # Example
///
/// ```rust
/// use reel_animation::{Easing, Tween};
/// use reel_core::{ElementId, Property, PropertyValue};
///
/// let tween = Tween::builder()
///     .target(ElementId::new("cube"))
///     .from_to(Property::RotateY, PropertyValue::Angle(-90.0), PropertyValue::Angle(90.0))
///     .duration(2.0)
///     .easing(Easing::Linear)
///     .build()
///     .unwrap();
///
/// let snapshot = tween.evaluate(1.0).unwrap();
/// assert_eq!(
///     snapshot.get(&ElementId::new("cube"), &Property::RotateY),
///     Some(&PropertyValue::Angle(0.0))
/// );
/// ```
#[derive(Clone, Debug, Default)]
pub struct TweenBuilder {
    targets: Vec<ElementId>,
    tracks: Vec<Track>,
    duration: Option<f64>,
    easing: Option<EasingChoice>,
    playback: Playback,
    fill: FillMode,
}

impl TweenBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(mut self, element: impl Into<ElementId>) -> Self {
        self.targets.push(element.into());
        self
    }

    /// Add several targets; their order fixes the index passed to per-index values
    pub fn targets<I>(mut self, elements: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ElementId>,
    {
        self.targets.extend(elements.into_iter().map(Into::into));
        self
    }

    /// Animate `property` from `from` to `to`, blended the default way for the key
    pub fn from_to(
        self,
        property: Property,
        from: impl Into<ValueSource>,
        to: impl Into<ValueSource>,
    ) -> Self {
        let kind = InterpKind::for_property(&property);
        self.from_to_with(property, from, to, kind)
    }

    pub fn from_to_with(
        mut self,
        property: Property,
        from: impl Into<ValueSource>,
        to: impl Into<ValueSource>,
        kind: InterpKind,
    ) -> Self {
        self.tracks.push(Track {
            property,
            from: from.into(),
            to: to.into(),
            kind,
        });
        self
    }

    /// Hold `property` at `value`
    pub fn set(self, property: Property, value: impl Into<ValueSource>) -> Self {
        let value = value.into();
        self.from_to(property, value.clone(), value)
    }

    pub fn duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = Some(EasingChoice::Curve(easing));
        self
    }

    /// Easing by registry name, resolved when the tween is built
    pub fn ease(mut self, name: impl Into<String>) -> Self {
        self.easing = Some(EasingChoice::Named(name.into()));
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.playback.repeat = repeat;
        self
    }

    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.playback.yoyo = yoyo;
        self
    }

    pub fn fill(mut self, fill: FillMode) -> Self {
        self.fill = fill;
        self
    }

    pub fn build(self) -> Result<Tween> {
        self.build_with(&TweenDefaults::default())
    }

    /// Build, taking duration and easing from `defaults` where unset
    pub fn build_with(self, defaults: &TweenDefaults) -> Result<Tween> {
        let count = self.targets.len();
        let targets = self
            .targets
            .into_iter()
            .enumerate()
            .map(|(index, element)| Target {
                element,
                index,
                count,
            })
            .collect();
        Self::assemble(
            targets,
            self.tracks,
            self.duration,
            self.easing,
            self.playback,
            self.fill,
            defaults,
        )
    }

    /// One single-target tween per target, each keeping its index among the original
    /// targets so per-index values resolve as if the tween was never split
    pub(crate) fn split_per_target(self, defaults: &TweenDefaults) -> Result<Vec<Tween>> {
        let count = self.targets.len();
        if count == 0 {
            return Err(ConfigurationError::EmptyTween("targets"));
        }

        self.targets
            .iter()
            .enumerate()
            .map(|(index, element)| {
                let target = Target {
                    element: element.clone(),
                    index,
                    count,
                };
                Self::assemble(
                    SmallVec::from_elem(target, 1),
                    self.tracks.clone(),
                    self.duration,
                    self.easing.clone(),
                    self.playback,
                    self.fill,
                    defaults,
                )
            })
            .collect()
    }

    fn assemble(
        targets: SmallVec<[Target; 4]>,
        tracks: Vec<Track>,
        duration: Option<f64>,
        easing: Option<EasingChoice>,
        playback: Playback,
        fill: FillMode,
        defaults: &TweenDefaults,
    ) -> Result<Tween> {
        if targets.is_empty() {
            return Err(ConfigurationError::EmptyTween("targets"));
        }
        if tracks.is_empty() {
            return Err(ConfigurationError::EmptyTween("tracks"));
        }

        let duration =
            ConfigurationError::check_finite("duration", duration.unwrap_or(defaults.duration))?;
        if duration < 0.0 {
            return Err(ConfigurationError::NegativeDuration(duration));
        }

        let easing = match easing {
            Some(EasingChoice::Curve(easing)) => easing,
            Some(EasingChoice::Named(name)) => Easing::from_name(&name)?,
            None => defaults.easing,
        };

        for track in &tracks {
            validate_track(track)?;
        }

        Ok(Tween {
            targets,
            tracks: tracks.into_iter().collect(),
            duration,
            easing,
            playback,
            fill,
        })
    }
}

/// Constant endpoints are checked up front; per-index ones are checked when sampled
fn validate_track(track: &Track) -> Result<()> {
    for source in [&track.from, &track.to] {
        if let ValueSource::Constant(value) = source {
            if !value.is_finite() {
                return Err(ConfigurationError::NonFinite {
                    what: "tween value",
                    value: value.as_f32().map_or(f64::NAN, |v| v as f64),
                });
            }
            if !track.kind.accepts(value) {
                return Err(ConfigurationError::MismatchedValues {
                    property: track.property.to_string(),
                    from: value.kind_name(),
                    to: track_kind_name(track.kind),
                });
            }
        }
    }
    Ok(())
}

fn track_kind_name(kind: InterpKind) -> &'static str {
    match kind {
        InterpKind::Numeric => "number",
        InterpKind::Angle(_) => "angle",
        InterpKind::Color(_) => "color",
    }
}

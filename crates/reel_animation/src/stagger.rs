//! Stagger distribution
//!
//! Spreads the start times of `count` similar siblings. Offsets depend only on
//! `(index, count)` and the stagger settings.

use crate::easing::Easing;
use crate::error::{ConfigurationError, Result};

/// Where the stagger starts counting from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StaggerFrom {
    /// First sibling starts first (ascending)
    #[default]
    Start,
    /// Last sibling starts first (descending)
    End,
    /// Middle sibling(s) start first
    Center,
    /// Outermost siblings start first
    Edges,
    /// Given sibling starts first
    Index(usize),
}

/// Start-offset distribution across siblings
///
/// Sibling `i` of `n` starts at `ease(dᵢ / d_max) · d_max · |each|`, where `dᵢ` is its
/// distance from the origin in index units. A negative `each` mirrors the
/// distances, so `each = -0.05` from `Start` behaves like `0.05` from `End`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stagger {
    pub each: f64,
    pub from: StaggerFrom,
    pub ease: Easing,
}

impl Stagger {
    pub fn each(each: f64) -> Self {
        Self {
            each,
            from: StaggerFrom::Start,
            ease: Easing::Linear,
        }
    }

    pub fn from(mut self, from: StaggerFrom) -> Self {
        self.from = from;
        self
    }

    pub fn ease(mut self, ease: Easing) -> Self {
        self.ease = ease;
        self
    }

    pub fn validate(&self) -> Result<()> {
        ConfigurationError::check_finite("stagger each", self.each)?;
        Ok(())
    }

    /// Start offset of sibling `index` among `count`
    pub fn offset(&self, index: usize, count: usize) -> f64 {
        if count <= 1 {
            return 0.0;
        }

        let (distance, max_distance) = self.distance(index.min(count - 1), count);
        if max_distance <= 0.0 {
            return 0.0;
        }

        let step = self.each.abs();
        match self.ease {
            // Kept exact: `i * each` with no normalise/denormalise round trip
            Easing::Linear => distance * step,
            ease => ease.apply((distance / max_distance) as f32) as f64 * max_distance * step,
        }
    }

    pub fn offsets(&self, count: usize) -> Vec<f64> {
        (0..count).map(|i| self.offset(i, count)).collect()
    }

    /// Offset of the sibling that starts last
    pub fn span(&self, count: usize) -> f64 {
        self.offsets(count).into_iter().fold(0.0, f64::max)
    }

    fn distance(&self, index: usize, count: usize) -> (f64, f64) {
        let i = index as f64;
        let last = (count - 1) as f64;

        let (distance, max_distance) = match self.from {
            StaggerFrom::Start => (i, last),
            StaggerFrom::End => (last - i, last),
            StaggerFrom::Center => ((i - last / 2.0).abs(), last / 2.0),
            StaggerFrom::Edges => (i.min(last - i), (last / 2.0).floor()),
            StaggerFrom::Index(origin) => {
                let origin = origin.min(count - 1) as f64;
                ((i - origin).abs(), origin.max(last - origin))
            }
        };

        if self.each < 0.0 {
            (max_distance - distance, max_distance)
        } else {
            (distance, max_distance)
        }
    }
}

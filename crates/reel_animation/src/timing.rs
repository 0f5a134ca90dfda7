//! Repeat and yoyo time mapping
//!
//! Every tween and timeline maps the time it is handed onto a position inside one
//! cycle of itself. The mapping is a pure function of `(time, cycle duration)`; no
//! iteration counter is kept between calls.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};

/// How many times a cycle plays after the first
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Repeat {
    /// Play `n` additional cycles; `Count(0)` plays once
    Count(u32),
    /// Repeat forever
    Infinite,
}

impl Repeat {
    pub const ONCE: Repeat = Repeat::Count(0);

    pub fn is_infinite(&self) -> bool {
        matches!(self, Repeat::Infinite)
    }
}

/// `-1` is infinite, any non-negative count is `Count`
impl TryFrom<i64> for Repeat {
    type Error = ConfigurationError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            -1 => Ok(Repeat::Infinite),
            n if n >= 0 && n <= u32::MAX as i64 => Ok(Repeat::Count(n as u32)),
            n => Err(ConfigurationError::InvalidRepeat(n)),
        }
    }
}

impl From<Repeat> for i64 {
    fn from(repeat: Repeat) -> Self {
        match repeat {
            Repeat::Count(n) => n as i64,
            Repeat::Infinite => -1,
        }
    }
}

/// Repeat + yoyo rules of one tween or timeline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Playback {
    pub repeat: Repeat,
    /// Reverse direction on every odd cycle
    pub yoyo: bool,
}

impl Default for Playback {
    fn default() -> Self {
        Self::ONCE
    }
}

/// Where a time landed inside a playback
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CyclePosition {
    /// Zero-based cycle index
    pub cycle: u64,
    /// Time inside the cycle, direction already applied; in `[0, cycle duration]`
    pub local: f64,
}

impl Playback {
    pub const ONCE: Playback = Playback {
        repeat: Repeat::ONCE,
        yoyo: false,
    };

    pub fn new(repeat: Repeat, yoyo: bool) -> Self {
        Self { repeat, yoyo }
    }

    pub fn infinite(yoyo: bool) -> Self {
        Self::new(Repeat::Infinite, yoyo)
    }

    /// Duration of all cycles together; infinite for `Repeat::Infinite` unless the
    /// cycle itself is empty.
    pub fn total_duration(&self, cycle_duration: f64) -> f64 {
        if cycle_duration <= 0.0 {
            return 0.0;
        }
        match self.repeat {
            Repeat::Count(n) => cycle_duration * (n as f64 + 1.0),
            Repeat::Infinite => f64::INFINITY,
        }
    }

    /// Map `time` onto a position inside one cycle of length `cycle_duration`
    ///
    /// Times before zero map to the start. A time exactly on an internal cycle
    /// boundary belongs to the cycle that begins there; after the last cycle of a
    /// finite repeat the final position is held.
    pub fn resolve(&self, time: f64, cycle_duration: f64) -> CyclePosition {
        let time = time.max(0.0);

        // Degenerate or unbounded cycles never wrap
        if cycle_duration <= 0.0 || !cycle_duration.is_finite() {
            return CyclePosition {
                cycle: 0,
                local: time.min(cycle_duration.max(0.0)),
            };
        }

        let (cycle, within) = match self.repeat {
            Repeat::Count(n) if time >= cycle_duration * (n as f64 + 1.0) => {
                (n as u64, cycle_duration)
            }
            _ => {
                let within = time % cycle_duration;
                // `time - within` is a whole number of cycles; rounding absorbs the
                // division error that `floor(time / d)` would expose at boundaries
                let cycle = ((time - within) / cycle_duration).round() as u64;
                (cycle, within)
            }
        };

        let local = if self.yoyo && cycle % 2 == 1 {
            cycle_duration - within
        } else {
            within
        };

        CyclePosition { cycle, local }
    }
}

/// Whether a tween contributes outside its active window
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillMode {
    /// Contribute only while active
    None,
    /// Hold the final values after the tween completes
    #[default]
    Forwards,
    /// Apply the starting values before the tween begins
    Backwards,
    /// Apply both forwards and backwards fill
    Both,
}

impl FillMode {
    pub fn fills_backwards(&self) -> bool {
        matches!(self, FillMode::Backwards | FillMode::Both)
    }

    pub fn fills_forwards(&self) -> bool {
        matches!(self, FillMode::Forwards | FillMode::Both)
    }
}

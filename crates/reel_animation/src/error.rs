//! Animation error types

use thiserror::Error;

/// Malformed graph-construction input
///
/// These are fatal to the construction of the instance that hit them and are never
/// replaced by a default.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Easing name not present in the registry
    #[error("Unknown easing: {0:?}")]
    UnknownEasing(String),

    /// NaN or infinity where a finite number is required
    #[error("Non-finite {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    /// Duration below zero
    #[error("Negative duration: {0}")]
    NegativeDuration(f64),

    /// Child placed before the start of its parent
    #[error("Negative offset: {0}")]
    NegativeOffset(f64),

    /// Repeat count other than -1 or a non-negative integer
    #[error("Invalid repeat count: {0} (expected -1 or >= 0)")]
    InvalidRepeat(i64),

    /// Element count that cannot describe a group of elements
    #[error("Invalid element count: {0}")]
    InvalidElementCount(i64),

    /// Mounted element count differs from the configured one
    #[error("Element count mismatch for {group:?}: configured {expected}, mounted {actual}")]
    ElementCountMismatch {
        group: String,
        expected: usize,
        actual: usize,
    },

    /// Start and end values of different kinds
    #[error("Cannot interpolate {property}: {from} -> {to}")]
    MismatchedValues {
        property: String,
        from: &'static str,
        to: &'static str,
    },

    /// Frame rate that is zero, negative or not finite
    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(f64),

    /// Tween with no targets or no tracks
    #[error("Tween has no {0}")]
    EmptyTween(&'static str),
}

impl ConfigurationError {
    /// Check that `value` is finite, naming it `what` in the error
    pub fn check_finite(what: &'static str, value: f64) -> Result<f64> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ConfigurationError::NonFinite { what, value })
        }
    }
}

/// Result type for animation construction and evaluation
pub type Result<T> = std::result::Result<T, ConfigurationError>;

//! Reel Animation Engine
//!
//! Deterministic tween timelines, seeked once per rendered frame.
//!
//! # Features
//!
//! - **Tweens**: Property tracks with easing, repeat, yoyo and fill rules
//! - **Timelines**: Nested orchestration with offsets, phases and staggers
//! - **Seeking**: Pure evaluation of the whole tree at any time, in any order
//! - **Frame Adapter**: Build-once lifecycle driven by a frame-numbered host
//! - **Presets**: The dice-stack composition, configurable through serde

pub mod adapter;
pub mod easing;
pub mod error;
pub mod interpolate;
pub mod presets;
pub mod seek;
pub mod stage;
pub mod stagger;
pub mod timeline;
pub mod timing;
pub mod tween;

pub use adapter::{Composition, EvaluationSkipped, FrameAdapter, FrameClock, FrameOutcome};
pub use easing::Easing;
pub use error::{ConfigurationError, Result};
pub use interpolate::{AngleMode, ColorSpace, InterpKind};
pub use presets::{ColorFormula, DiceStack, DiceStackConfig};
pub use stage::{GraphHandle, Stage};
pub use stagger::{Stagger, StaggerFrom};
pub use timeline::{Child, Node, Position, Timeline, TimelineBuilder};
pub use timing::{FillMode, Playback, Repeat};
pub use tween::{Tween, TweenBuilder, TweenDefaults, ValueSource};

//! Frame adapter
//!
//! Bridges a frame-numbered host into the engine's continuous time. One adapter
//! belongs to one animated instance: it builds that instance's timeline once, seeks
//! it for every frame the host asks for, and drops it when the instance goes away.

use reel_core::VisualLayer;

use crate::error::{ConfigurationError, Result};
use crate::seek;
use crate::timeline::Timeline;

/// Frame rate and length supplied by the rendering host
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameClock {
    fps: f64,
    duration_in_frames: u32,
}

impl FrameClock {
    pub fn new(fps: f64, duration_in_frames: u32) -> Result<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(ConfigurationError::InvalidFrameRate(fps));
        }
        Ok(Self {
            fps,
            duration_in_frames,
        })
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn duration_in_frames(&self) -> u32 {
        self.duration_in_frames
    }

    /// Composition length in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.duration_in_frames as f64 / self.fps
    }

    /// Time of `frame` in seconds: `frame / fps`
    pub fn time_of(&self, frame: u32) -> f64 {
        frame as f64 / self.fps
    }
}

/// Builds the animation tree of one composition
pub trait Composition {
    fn name(&self) -> &str;

    /// Build the timeline against the current visual layer
    ///
    /// Returns `Ok(None)` while structural inputs (such as how many elements are
    /// mounted) are not available yet; the adapter retries on the next frame.
    fn build(&self, layer: &dyn VisualLayer) -> Result<Option<Timeline>>;
}

/// Why a frame was not evaluated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvaluationSkipped {
    /// The composition could not be built yet
    GraphNotReady,
}

/// What happened to one frame request
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOutcome {
    /// Snapshot computed and applied to the visual layer
    Applied { frame: u32, time: f64, properties: usize },
    /// Nothing was applied; retried on the next frame
    Skipped(EvaluationSkipped),
    /// The instance was torn down; the request was a no-op
    Released,
}

#[derive(Debug)]
enum GraphState {
    Pending { attempts: u32 },
    Ready(Timeline),
    Failed(ConfigurationError),
    Released,
}

/// Per-instance lifecycle around one composition's timeline
pub struct FrameAdapter {
    composition: Box<dyn Composition>,
    clock: FrameClock,
    state: GraphState,
}

impl FrameAdapter {
    pub fn new(composition: impl Composition + 'static, clock: FrameClock) -> Self {
        Self::from_boxed(Box::new(composition), clock)
    }

    pub fn from_boxed(composition: Box<dyn Composition>, clock: FrameClock) -> Self {
        Self {
            composition,
            clock,
            state: GraphState::Pending { attempts: 0 },
        }
    }

    pub fn clock(&self) -> FrameClock {
        self.clock
    }

    pub fn name(&self) -> &str {
        self.composition.name()
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, GraphState::Ready(_))
    }

    pub fn is_released(&self) -> bool {
        matches!(self.state, GraphState::Released)
    }

    /// The built timeline, once construction has completed
    pub fn timeline(&self) -> Option<&Timeline> {
        match &self.state {
            GraphState::Ready(timeline) => Some(timeline),
            _ => None,
        }
    }

    /// Build the timeline if it has not been built yet
    ///
    /// Idempotent: once built, later calls return `Ok(true)` without rebuilding.
    /// Returns `Ok(false)` while inputs are missing or after release. A construction
    /// error is fatal: it is returned now and on every later call.
    pub fn ensure_built(&mut self, layer: &dyn VisualLayer) -> Result<bool> {
        let attempts = match &self.state {
            GraphState::Ready(_) => return Ok(true),
            GraphState::Released => return Ok(false),
            GraphState::Failed(err) => return Err(err.clone()),
            GraphState::Pending { attempts } => attempts + 1,
        };

        match self.composition.build(layer) {
            Ok(Some(timeline)) => {
                tracing::debug!(
                    "Built {} after {} attempt(s): cycle {}s",
                    self.composition.name(),
                    attempts,
                    timeline.duration()
                );
                self.state = GraphState::Ready(timeline);
                Ok(true)
            }
            Ok(None) => {
                self.state = GraphState::Pending { attempts };
                Ok(false)
            }
            Err(err) => {
                tracing::warn!("Failed to build {}: {}", self.composition.name(), err);
                self.state = GraphState::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Seek to `frame` and apply the result to `layer`
    pub fn render_frame(
        &mut self,
        frame: u32,
        layer: &mut dyn VisualLayer,
    ) -> Result<FrameOutcome> {
        if self.is_released() {
            return Ok(FrameOutcome::Released);
        }

        if !self.ensure_built(&*layer)? {
            tracing::debug!(
                "Skipping frame {} of {}: graph not ready",
                frame,
                self.composition.name()
            );
            return Ok(FrameOutcome::Skipped(EvaluationSkipped::GraphNotReady));
        }

        let GraphState::Ready(timeline) = &self.state else {
            return Ok(FrameOutcome::Skipped(EvaluationSkipped::GraphNotReady));
        };

        let time = self.clock.time_of(frame);
        let snapshot = seek::evaluate(timeline, time)?;
        layer.apply(&snapshot);

        Ok(FrameOutcome::Applied {
            frame,
            time,
            properties: snapshot.len(),
        })
    }

    /// Drop the timeline; every later frame is a no-op
    ///
    /// Safe to call at any point, including while construction is still pending.
    pub fn release(&mut self) {
        if !self.is_released() {
            tracing::debug!("Released {}", self.composition.name());
        }
        self.state = GraphState::Released;
    }
}

//! Headless rendering
//!
//! Drives a composition frame by frame against an in-memory visual layer and
//! streams every frame as one JSON object per line.

use anyhow::{Context, Result};
use reel_animation::presets::{DIE_GROUP, FACES_PER_DIE, TRAY};
use reel_animation::{DiceStack, FrameOutcome, Node, Stage, Timeline};
use reel_core::{PropertySnapshot, VisualLayer};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::io::Write;
use std::ops::Range;

use crate::config::ReelConfig;

/// Visual layer with no output of its own: it knows which element groups are
/// mounted and keeps the last snapshot applied to it
#[derive(Debug, Default)]
pub struct HeadlessLayer {
    groups: FxHashMap<String, usize>,
    last: Option<PropertySnapshot>,
}

impl HeadlessLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount `count` elements of `group`
    pub fn mount(&mut self, group: &str, count: usize) {
        self.groups.insert(group.to_string(), count);
    }

    pub fn take_snapshot(&mut self) -> Option<PropertySnapshot> {
        self.last.take()
    }
}

impl VisualLayer for HeadlessLayer {
    fn element_count(&self, group: &str) -> Option<usize> {
        self.groups.get(group).copied()
    }

    fn apply(&mut self, snapshot: &PropertySnapshot) {
        self.last = Some(snapshot.clone());
    }
}

/// Mount the dice stack's element groups
pub fn mount_dice_stack(layer: &mut HeadlessLayer, dice: usize) {
    layer.mount(DIE_GROUP, dice);
    layer.mount(TRAY, 1);
}

/// One line of render output
#[derive(Debug, Serialize)]
struct FrameRecord<'a> {
    frame: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    time: Option<f64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<&'a PropertySnapshot>,
}

/// What `render` produced
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    pub applied: u32,
    pub skipped: u32,
}

pub struct RenderOptions {
    pub frames: Range<u32>,
    /// Frames rendered before the dice are mounted
    pub mount_after: u32,
}

/// Render `options.frames` of the configured composition into `out`
pub fn render(
    config: &ReelConfig,
    options: &RenderOptions,
    out: &mut dyn Write,
) -> Result<RenderSummary> {
    let clock = config.render.clock()?;
    let dice = config
        .composition
        .count()
        .context("Invalid [composition] element_count")?;

    let mut stage = Stage::new();
    let handle = stage.acquire(DiceStack::new(config.composition.clone()), clock);
    let mut layer = HeadlessLayer::new();
    let mut summary = RenderSummary::default();

    for (rendered, frame) in options.frames.clone().enumerate() {
        if rendered as u32 == options.mount_after {
            mount_dice_stack(&mut layer, dice);
        }

        let outcome = stage
            .render_frame(handle, frame, &mut layer)
            .with_context(|| format!("Failed to render frame {frame}"))?;

        let snapshot = layer.take_snapshot();
        let record = match outcome {
            FrameOutcome::Applied { time, .. } => {
                summary.applied += 1;
                FrameRecord {
                    frame,
                    time: Some(time),
                    skipped: false,
                    properties: snapshot.as_ref(),
                }
            }
            FrameOutcome::Skipped(reason) => {
                tracing::debug!("Frame {} skipped: {:?}", frame, reason);
                summary.skipped += 1;
                FrameRecord {
                    frame,
                    time: None,
                    skipped: true,
                    properties: None,
                }
            }
            FrameOutcome::Released => break,
        };

        serde_json::to_writer(&mut *out, &record).context("Failed to write frame")?;
        writeln!(out).context("Failed to write frame")?;
    }

    stage.release(handle);
    out.flush().context("Failed to flush output")?;

    tracing::info!(
        "Rendered {} frame(s), skipped {}",
        summary.applied,
        summary.skipped
    );
    Ok(summary)
}

/// Print the structure and durations of the configured composition
pub fn inspect(config: &ReelConfig, out: &mut dyn Write) -> Result<()> {
    let clock = config.render.clock()?;
    let dice = config.composition.count()?;
    let timeline = DiceStack::new(config.composition.clone())
        .timeline(dice)
        .context("Failed to build composition")?;

    writeln!(
        out,
        "dice-stack: {} dice, {} faces each",
        dice, FACES_PER_DIE
    )?;
    writeln!(
        out,
        "render: {} frames at {} fps ({}s), {}x{}",
        clock.duration_in_frames(),
        clock.fps(),
        clock.duration_seconds(),
        config.render.width,
        config.render.height
    )?;
    write_timeline(out, &timeline, 0)?;
    Ok(())
}

fn write_timeline(out: &mut dyn Write, timeline: &Timeline, depth: usize) -> Result<()> {
    let indent = "  ".repeat(depth);
    writeln!(
        out,
        "{indent}timeline: cycle {}s, total {}, repeat {}, yoyo {}",
        timeline.duration(),
        format_duration(timeline.total_duration()),
        i64::from(timeline.playback().repeat),
        timeline.playback().yoyo
    )?;

    for child in timeline.children() {
        match &child.node {
            Node::Timeline(nested) => {
                writeln!(out, "{indent}  @{}s (phase {:.3}s)", child.offset, child.phase)?;
                write_timeline(out, nested, depth + 2)?;
            }
            Node::Tween(tween) => {
                let properties: Vec<String> =
                    tween.tracks().iter().map(|t| t.property.to_string()).collect();
                writeln!(
                    out,
                    "{indent}  @{}s tween {} x{}: {}s {:?}, total {}",
                    child.offset,
                    properties.join(","),
                    tween.targets().len(),
                    tween.duration(),
                    tween.easing(),
                    format_duration(tween.total_duration())
                )?;
            }
        }
    }
    Ok(())
}

fn format_duration(seconds: f64) -> String {
    if seconds.is_infinite() {
        "infinite".to_string()
    } else {
        format!("{seconds}s")
    }
}

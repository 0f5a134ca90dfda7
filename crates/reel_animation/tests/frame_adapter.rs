//! Integration tests for the frame adapter and stage
//!
//! These tests drive the dice stack the way a frame-numbered host would:
//! mounting late, re-rendering frames out of order and tearing instances down.

use reel_animation::presets::{DIE_GROUP, TRAY};
use reel_animation::{
    DiceStack, DiceStackConfig, EvaluationSkipped, FrameAdapter, FrameClock, FrameOutcome, Stage,
};
use reel_core::{ElementId, Property, PropertySnapshot, VisualLayer};

/// Headless layer that records every applied snapshot
#[derive(Default)]
struct RecordingLayer {
    dice: Option<usize>,
    frames: Vec<PropertySnapshot>,
}

impl RecordingLayer {
    fn mounted(dice: usize) -> Self {
        Self {
            dice: Some(dice),
            frames: Vec::new(),
        }
    }
}

impl VisualLayer for RecordingLayer {
    fn element_count(&self, group: &str) -> Option<usize> {
        match group {
            DIE_GROUP => self.dice,
            TRAY => self.dice.map(|_| 1),
            _ => None,
        }
    }

    fn apply(&mut self, snapshot: &PropertySnapshot) {
        self.frames.push(snapshot.clone());
    }
}

fn clock() -> FrameClock {
    FrameClock::new(60.0, 360).unwrap()
}

#[test]
fn test_skips_until_dice_are_mounted() {
    let mut adapter = FrameAdapter::new(DiceStack::default(), clock());
    let mut layer = RecordingLayer::default();

    for frame in 0..3 {
        assert_eq!(
            adapter.render_frame(frame, &mut layer).unwrap(),
            FrameOutcome::Skipped(EvaluationSkipped::GraphNotReady)
        );
    }
    assert!(!adapter.is_ready());
    assert!(layer.frames.is_empty());

    layer.dice = Some(19);
    let outcome = adapter.render_frame(3, &mut layer).unwrap();
    assert_eq!(
        outcome,
        FrameOutcome::Applied {
            frame: 3,
            time: 0.05,
            properties: layer.frames[0].len(),
        }
    );
    assert!(adapter.is_ready());
}

#[test]
fn test_rerendering_a_frame_reproduces_it() {
    let mut adapter = FrameAdapter::new(DiceStack::default(), clock());
    let mut layer = RecordingLayer::mounted(19);

    for frame in [120, 7, 359, 120, 0, 7] {
        adapter.render_frame(frame, &mut layer).unwrap();
    }

    assert_eq!(layer.frames[0], layer.frames[3]);
    assert_eq!(layer.frames[1], layer.frames[5]);
    assert_ne!(layer.frames[0], layer.frames[1]);
}

#[test]
fn test_graph_is_built_once() {
    let mut adapter = FrameAdapter::new(DiceStack::default(), clock());
    let mut layer = RecordingLayer::mounted(19);

    adapter.render_frame(0, &mut layer).unwrap();
    let first = adapter.timeline().map(|t| t as *const _);

    // Changing what is mounted does not rebuild a graph that already exists
    layer.dice = Some(4);
    adapter.render_frame(1, &mut layer).unwrap();
    assert_eq!(adapter.timeline().map(|t| t as *const _), first);
    assert_eq!(layer.frames.len(), 2);
}

#[test]
fn test_mismatched_mount_is_fatal() {
    let mut adapter = FrameAdapter::new(DiceStack::default(), clock());
    let mut layer = RecordingLayer::mounted(5);

    assert!(adapter.render_frame(0, &mut layer).is_err());
    layer.dice = Some(19);
    assert!(adapter.render_frame(1, &mut layer).is_err());
    assert!(layer.frames.is_empty());
}

#[test]
fn test_stage_instances_are_independent() {
    let mut stage = Stage::new();
    let small = stage.acquire(
        DiceStack::new(DiceStackConfig {
            element_count: 3,
            ..Default::default()
        }),
        clock(),
    );
    let full = stage.acquire(DiceStack::default(), clock());

    let mut small_layer = RecordingLayer::mounted(3);
    let mut full_layer = RecordingLayer::mounted(19);

    stage.render_frame(small, 60, &mut small_layer).unwrap();
    stage.render_frame(full, 60, &mut full_layer).unwrap();

    let die = ElementId::indexed(DIE_GROUP, 10);
    assert!(!small_layer.frames[0].contains_element(&die));
    assert!(full_layer.frames[0].contains_element(&die));

    // Same tray motion in both
    let tray = ElementId::new(TRAY);
    assert_eq!(
        small_layer.frames[0].get(&tray, &Property::Rotate),
        full_layer.frames[0].get(&tray, &Property::Rotate)
    );

    assert!(stage.release(small));
    assert_eq!(
        stage.render_frame(small, 61, &mut small_layer).unwrap(),
        FrameOutcome::Released
    );
    assert_eq!(small_layer.frames.len(), 1);

    assert!(matches!(
        stage.render_frame(full, 61, &mut full_layer).unwrap(),
        FrameOutcome::Applied { .. }
    ));
    assert_eq!(stage.len(), 1);
}

#[test]
fn test_release_before_first_frame() {
    let mut stage = Stage::new();
    let handle = stage.acquire(DiceStack::default(), clock());
    assert!(stage.release(handle));
    assert!(stage.is_empty());

    let mut layer = RecordingLayer::mounted(19);
    assert_eq!(
        stage.render_frame(handle, 0, &mut layer).unwrap(),
        FrameOutcome::Released
    );
    assert!(layer.frames.is_empty());
}

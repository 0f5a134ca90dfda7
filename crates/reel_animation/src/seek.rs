//! Seek engine
//!
//! Seeking is a pure read of the animation tree: the same tree and time always
//! produce the same snapshot, and no call depends on the calls before it. Frames may
//! be requested in any order, and the same frame any number of times.

use reel_core::PropertySnapshot;

use crate::error::Result;
use crate::timeline::{Node, Timeline};

/// Resolve every animated property of `root` at global time `t` (seconds)
pub fn evaluate(root: &Timeline, t: f64) -> Result<PropertySnapshot> {
    tracing::trace!(time = t, "seek");
    root.evaluate(t)
}

/// Resolve a single tween or timeline at time `t`
pub fn evaluate_node(node: &Node, t: f64) -> Result<PropertySnapshot> {
    tracing::trace!(time = t, "seek node");
    match node {
        Node::Tween(tween) => tween.evaluate(t),
        Node::Timeline(timeline) => timeline.evaluate(t),
    }
}

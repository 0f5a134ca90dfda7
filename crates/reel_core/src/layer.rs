//! Visual layer boundary
//!
//! Whatever draws the elements (a DOM, a scene graph, a headless recorder) sits behind
//! this trait. The engine reads structural inputs from it and writes snapshots into it.

use crate::snapshot::PropertySnapshot;

/// The layer that owns element geometry and receives property writes
pub trait VisualLayer {
    /// Number of mounted elements in a repeated group, `None` while the group is not
    /// mounted yet.
    fn element_count(&self, group: &str) -> Option<usize>;

    /// Apply a resolved snapshot as direct property writes
    fn apply(&mut self, snapshot: &PropertySnapshot);
}

//! Stage
//!
//! Owns one frame adapter per mounted instance. Instances never share timelines,
//! so two mounts of the same composition evaluate and release independently.

use reel_core::VisualLayer;
use slotmap::{new_key_type, SlotMap};

use crate::adapter::{Composition, FrameAdapter, FrameClock, FrameOutcome};
use crate::error::Result;

new_key_type! {
    pub struct GraphHandle;
}

/// All mounted animation instances
#[derive(Default)]
pub struct Stage {
    instances: SlotMap<GraphHandle, FrameAdapter>,
}

impl Stage {
    pub fn new() -> Self {
        Self {
            instances: SlotMap::with_key(),
        }
    }

    /// Mount a new instance; its timeline is built on its first rendered frame
    pub fn acquire(
        &mut self,
        composition: impl Composition + 'static,
        clock: FrameClock,
    ) -> GraphHandle {
        let handle = self.instances.insert(FrameAdapter::new(composition, clock));
        tracing::debug!("Acquired instance {:?}", handle);
        handle
    }

    /// Unmount an instance, returning whether it was still mounted
    pub fn release(&mut self, handle: GraphHandle) -> bool {
        match self.instances.remove(handle) {
            Some(mut adapter) => {
                adapter.release();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, handle: GraphHandle) -> Option<&FrameAdapter> {
        self.instances.get(handle)
    }

    /// Render one frame of one instance
    ///
    /// A handle that was released (or never issued by this stage) is a no-op.
    pub fn render_frame(
        &mut self,
        handle: GraphHandle,
        frame: u32,
        layer: &mut dyn VisualLayer,
    ) -> Result<FrameOutcome> {
        match self.instances.get_mut(handle) {
            Some(adapter) => adapter.render_frame(frame, layer),
            None => Ok(FrameOutcome::Released),
        }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn handles(&self) -> impl Iterator<Item = GraphHandle> + '_ {
        self.instances.keys()
    }
}

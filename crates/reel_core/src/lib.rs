//! Reel Core
//!
//! Value types shared between the timeline engine and the layers that consume it:
//!
//! - **Color**: RGBA color with HSL conversions
//! - **Properties**: animatable property keys and their values
//! - **Snapshots**: the resolved `(element, property) -> value` map of one seek
//! - **Visual layer**: the boundary a snapshot is applied across
//!
//! # Example
//!
//! ```rust
//! use reel_core::{ElementId, Property, PropertySnapshot, PropertyValue};
//!
//! let mut snapshot = PropertySnapshot::new();
//! snapshot.insert(ElementId::new("tray"), Property::Rotate, PropertyValue::Angle(15.0));
//!
//! assert_eq!(
//!     snapshot.get(&ElementId::new("tray"), &Property::Rotate),
//!     Some(&PropertyValue::Angle(15.0))
//! );
//! ```

pub mod color;
pub mod layer;
pub mod property;
pub mod snapshot;

pub use color::{Color, Hsla};
pub use layer::VisualLayer;
pub use property::{ElementId, Property, PropertyValue};
pub use snapshot::PropertySnapshot;

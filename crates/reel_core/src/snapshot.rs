//! Property snapshots
//!
//! A snapshot is the full result of one seek. It is built fresh for every query and
//! handed to the visual layer by reference; nothing keeps one alive between frames.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::property::{ElementId, Property, PropertyValue};

/// Resolved `(element, property) -> value` map
///
/// Insertion order is kept for stable output. Writing a key that already exists
/// replaces its value in place, so the last writer wins.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertySnapshot {
    values: IndexMap<(ElementId, Property), PropertyValue>,
}

impl PropertySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, element: ElementId, property: Property, value: PropertyValue) {
        self.values.insert((element, property), value);
    }

    pub fn get(&self, element: &ElementId, property: &Property) -> Option<&PropertyValue> {
        // IndexMap lookups need an owned tuple key
        self.values.get(&(element.clone(), property.clone()))
    }

    /// Scalar value of a number or angle property
    pub fn get_f32(&self, element: &ElementId, property: &Property) -> Option<f32> {
        self.get(element, property).and_then(PropertyValue::as_f32)
    }

    pub fn contains_element(&self, element: &ElementId) -> bool {
        self.values.keys().any(|(id, _)| id == element)
    }

    /// Properties written onto one element
    pub fn for_element<'a>(
        &'a self,
        element: &'a ElementId,
    ) -> impl Iterator<Item = (&'a Property, &'a PropertyValue)> + 'a {
        self.values
            .iter()
            .filter(move |((id, _), _)| id == element)
            .map(|((_, prop), value)| (prop, value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ElementId, &Property, &PropertyValue)> {
        self.values
            .iter()
            .map(|((id, prop), value)| (id, prop, value))
    }

    /// Overlay `other` onto this snapshot; keys present in both take `other`'s value
    pub fn merge(&mut self, other: PropertySnapshot) {
        for (key, value) in other.values {
            self.values.insert(key, value);
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Serialized as `{ element: { property: value } }`
impl Serialize for PropertySnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut grouped: IndexMap<&ElementId, IndexMap<&Property, &PropertyValue>> =
            IndexMap::new();
        for ((id, prop), value) in &self.values {
            grouped.entry(id).or_default().insert(prop, value);
        }

        let mut map = serializer.serialize_map(Some(grouped.len()))?;
        for (id, props) in &grouped {
            map.serialize_entry(id, props)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let tray = ElementId::new("tray");
        let mut snapshot = PropertySnapshot::new();
        snapshot.insert(tray.clone(), Property::Scale, PropertyValue::Number(1.0));
        snapshot.insert(tray.clone(), Property::Scale, PropertyValue::Number(1.2));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get_f32(&tray, &Property::Scale), Some(1.2));
    }

    #[test]
    fn test_merge_prefers_incoming() {
        let tray = ElementId::new("tray");
        let mut base = PropertySnapshot::new();
        base.insert(tray.clone(), Property::Rotate, PropertyValue::Angle(-15.0));
        base.insert(tray.clone(), Property::Scale, PropertyValue::Number(1.0));

        let mut overlay = PropertySnapshot::new();
        overlay.insert(tray.clone(), Property::Rotate, PropertyValue::Angle(15.0));
        base.merge(overlay);

        assert_eq!(base.get_f32(&tray, &Property::Rotate), Some(15.0));
        assert_eq!(base.get_f32(&tray, &Property::Scale), Some(1.0));
    }

    #[test]
    fn test_for_element_filters_by_id() {
        let tray = ElementId::new("tray");
        let mut snapshot = PropertySnapshot::new();
        snapshot.insert(tray.clone(), Property::Scale, PropertyValue::Number(1.2));
        snapshot.insert(ElementId::new("die-0"), Property::Opacity, PropertyValue::Number(1.0));
        snapshot.insert(tray.clone(), Property::Rotate, PropertyValue::Angle(15.0));

        let props: Vec<_> = snapshot.for_element(&tray).map(|(p, _)| p.clone()).collect();
        assert_eq!(props, vec![Property::Scale, Property::Rotate]);
        assert_eq!(snapshot.for_element(&ElementId::new("die-1")).count(), 0);
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let a_id = ElementId::new("a");
        let b_id = ElementId::new("b");

        let mut first = PropertySnapshot::new();
        first.insert(a_id.clone(), Property::X, PropertyValue::Number(1.0));
        first.insert(b_id.clone(), Property::X, PropertyValue::Number(2.0));

        let mut second = PropertySnapshot::new();
        second.insert(b_id, Property::X, PropertyValue::Number(2.0));
        second.insert(a_id, Property::X, PropertyValue::Number(1.0));

        assert_eq!(first, second);
    }

    #[test]
    fn test_serializes_grouped_by_element() {
        let mut snapshot = PropertySnapshot::new();
        snapshot.insert(ElementId::new("tray"), Property::Scale, PropertyValue::Number(1.5));
        snapshot.insert(ElementId::new("tray"), Property::Rotate, PropertyValue::Angle(0.0));

        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, r#"{"tray":{"scale":1.5,"rotate":0.0}}"#);
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Insertion-ordered slot → reference map used for `children` and `inherits`.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordered map from slot name to reference path.
///
/// Iteration follows first-insertion order. Re-inserting an existing slot
/// replaces its reference in place, so the slot keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefMap {
    slots: Vec<(String, String)>,
}

impl RefMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the reference for `slot`; returns the previous reference.
    pub fn insert(
        &mut self,
        slot: impl Into<String>,
        reference: impl Into<String>,
    ) -> Option<String> {
        let slot = slot.into();
        let reference = reference.into();
        if let Some((_, existing)) = self.slots.iter_mut().find(|(s, _)| *s == slot) {
            return Some(std::mem::replace(existing, reference));
        }
        self.slots.push((slot, reference));
        None
    }

    /// Shallow-assign every slot of `other` onto `self` (later wins per slot).
    pub fn assign(&mut self, other: &RefMap) {
        for (slot, reference) in other.iter() {
            self.insert(slot, reference);
        }
    }

    /// Reference stored under `slot`, if any.
    pub fn get(&self, slot: &str) -> Option<&str> {
        self.slots
            .iter()
            .find(|(s, _)| s == slot)
            .map(|(_, r)| r.as_str())
    }

    /// Slot and reference at position `index`.
    pub fn at(&self, index: usize) -> Option<(&str, &str)> {
        self.slots
            .get(index)
            .map(|(s, r)| (s.as_str(), r.as_str()))
    }

    /// Iterate `(slot, reference)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.slots.iter().map(|(s, r)| (s.as_str(), r.as_str()))
    }

    /// Iterate references in order.
    pub fn references(&self) -> impl Iterator<Item = &str> + '_ {
        self.slots.iter().map(|(_, r)| r.as_str())
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no slot is set.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<S, R> FromIterator<(S, R)> for RefMap
where
    S: Into<String>,
    R: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (S, R)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (slot, reference) in iter {
            map.insert(slot, reference);
        }
        map
    }
}

impl Serialize for RefMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.slots.len()))?;
        for (slot, reference) in &self.slots {
            map.serialize_entry(slot, reference)?;
        }
        map.end()
    }
}

struct RefMapVisitor;

impl<'de> Visitor<'de> for RefMapVisitor {
    type Value = RefMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of slot names to reference paths")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RefMap, A::Error> {
        let mut map = RefMap::new();
        while let Some((slot, reference)) = access.next_entry::<String, String>()? {
            map.insert(slot, reference);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for RefMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RefMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reinsert_keeps_position() {
        let mut map: RefMap = [("b", "x"), ("a", "y")].into_iter().collect();
        assert_eq!(map.insert("b", "z"), Some("x".to_owned()));
        let slots: Vec<_> = map.iter().collect();
        assert_eq!(slots, vec![("b", "z"), ("a", "y")]);
        assert_eq!(map.at(1), Some(("a", "y")));
        assert_eq!(map.at(2), None);
    }

    #[test]
    fn deserializes_in_document_order() {
        let map: RefMap = serde_json::from_str(r#"{"z": "one", "a": "two/sub"}"#).unwrap();
        let refs: Vec<_> = map.references().collect();
        assert_eq!(refs, vec!["one", "two/sub"]);
    }

    #[test]
    fn rejects_non_string_references() {
        let res: Result<RefMap, _> = serde_json::from_str(r#"{"slot": 3}"#);
        assert!(res.is_err());
    }
}

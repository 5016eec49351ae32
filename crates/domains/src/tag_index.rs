//! # Tag Index
//!
//! Derived mapping from tag to the ids of entries carrying it. The index is
//! never patched in place: every repository write rebuilds it from the full
//! entry list with [`TagIndex::build`].
//!
//! Tags keep first-seen order, and so do ids within a tag. The JSON form is an
//! object whose keys appear in that same order.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::{Entry, EntryId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIndex {
    buckets: Vec<(String, Vec<EntryId>)>,
}

impl TagIndex {
    /// Rebuilds the index from an entry snapshot. Deterministic for a given order.
    pub fn build(entries: &[Entry]) -> Self {
        let mut index = Self::default();
        for entry in entries {
            for tag in &entry.tags {
                index.insert(tag, &entry.id);
            }
        }
        index
    }

    fn insert(&mut self, tag: &str, id: &EntryId) {
        match self.buckets.iter_mut().find(|(t, _)| t == tag) {
            Some((_, ids)) => {
                if !ids.contains(id) {
                    ids.push(id.clone());
                }
            }
            None => self.buckets.push((tag.to_string(), vec![id.clone()])),
        }
    }

    pub fn get(&self, tag: &str) -> Option<&[EntryId]> {
        self.buckets
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, ids)| ids.as_slice())
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|(t, _)| t.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[EntryId])> {
        self.buckets.iter().map(|(t, ids)| (t.as_str(), ids.as_slice()))
    }

    /// True if `id` appears under any tag.
    pub fn references(&self, id: &EntryId) -> bool {
        self.buckets.iter().any(|(_, ids)| ids.contains(id))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl Serialize for TagIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for (tag, ids) in &self.buckets {
            map.serialize_entry(tag, ids)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TagIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TagIndexVisitor;

        impl<'de> Visitor<'de> for TagIndexVisitor {
            type Value = TagIndex;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of tag to entry ids")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<TagIndex, A::Error> {
                let mut buckets = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((tag, ids)) = access.next_entry::<String, Vec<EntryId>>()? {
                    if !ids.is_empty() {
                        buckets.push((tag, ids));
                    }
                }
                Ok(TagIndex { buckets })
            }
        }

        deserializer.deserialize_map(TagIndexVisitor)
    }
}

//! The attribute map carried by every vector.
//!
//! Attributes are name → vector pairs in insertion order. The special
//! names (`names`, `dim`, `dimnames`, `class`, `levels`) have structural
//! invariants which [`RVector::set_attr`](super::RVector::set_attr)
//! enforces before the pair is stored; this module only stores and looks
//! up entries.

use super::RVector;

/// Ordered attribute map. Vectors carry few attributes, so a linear
/// scan over a pair list beats a hash map here and keeps the order
/// the attributes were assigned in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    entries: Vec<(String, RVector)>,
}

impl Attributes {
    pub fn new() -> Self {
        Attributes::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, name: &str) -> Option<&RVector> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Insert or replace an entry, keeping the original position on
    /// replacement.
    pub fn set(&mut self, name: &str, value: RVector) {
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
        } else {
            self.entries.push((name.to_string(), value));
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<RVector> {
        let idx = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RVector)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

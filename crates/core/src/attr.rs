//! Attribute descriptors and the ordered value container.
//!
//! Declaration order is significant: it drives decode order, display order,
//! and before/after comparison order. `AttributeValues` therefore keeps an
//! explicit insertion-ordered entry list with a hash index for name lookup,
//! rather than relying on map iteration order.

use crate::error::{Error, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Default persistence classification of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persistence {
    /// Value must survive the scenario unchanged
    Persistent,
    /// Value may change depending on device state
    Conditional,
    /// Value is expected to reset
    Volatile,
}

/// One fixed-layout field of a log page.
///
/// `default_value` is unset until explicitly recorded (baseline capture);
/// it is never populated by decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDescriptor {
    /// Field name, unique within a schema
    pub name: String,
    /// Index of the field's first byte in the page buffer
    pub byte_offset: usize,
    /// Field width in bytes (1..=16)
    pub num_of_bytes: usize,
    /// Default persistence classification
    pub persistency: Persistence,
    /// Recorded baseline value, if any
    pub default_value: Option<u128>,
}

impl AttributeDescriptor {
    /// Create a descriptor with no recorded default.
    pub fn new(
        name: impl Into<String>,
        byte_offset: usize,
        num_of_bytes: usize,
        persistency: Persistence,
    ) -> Self {
        Self {
            name: name.into(),
            byte_offset,
            num_of_bytes,
            persistency,
            default_value: None,
        }
    }

    /// One past the last byte this field occupies.
    pub fn end_offset(&self) -> usize {
        self.byte_offset + self.num_of_bytes
    }
}

/// Insertion-ordered name → value container.
///
/// Values are unsigned little-endian integers up to 128 bits wide. Setting
/// an existing name updates it in place without disturbing its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeValues {
    entries: Vec<(String, u128)>,
    index: FxHashMap<String, usize>,
}

impl AttributeValues {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty container sized for `capacity` attributes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: FxHashMap::default(),
        }
    }

    /// Insert or update a value, preserving first-insertion order.
    pub fn set(&mut self, name: &str, value: u128) {
        match self.index.get(name) {
            Some(&slot) => self.entries[slot].1 = value,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), value));
            }
        }
    }

    /// Look up a value by name.
    pub fn get(&self, name: &str) -> Option<u128> {
        self.index.get(name).map(|&slot| self.entries[slot].1)
    }

    /// Look up a value, failing with `InvalidAttributeRequest` if absent.
    pub fn require(&self, name: &str) -> Result<u128> {
        self.get(name).ok_or_else(|| Error::InvalidAttributeRequest {
            attribute: name.to_string(),
        })
    }

    /// Whether a value exists for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u128)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the container is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a AttributeValues {
    type Item = (&'a str, u128);
    type IntoIter = std::vec::IntoIter<(&'a str, u128)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter().collect::<Vec<_>>().into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_preserves_insertion_order() {
        let mut values = AttributeValues::new();
        values.set("CriticalWarning", 0);
        values.set("CompositeTemperature", 300);
        values.set("AvailableSpare", 100);
        // Update must not move the entry
        values.set("CriticalWarning", 4);

        let names: Vec<&str> = values.iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            ["CriticalWarning", "CompositeTemperature", "AvailableSpare"]
        );
        assert_eq!(values.get("CriticalWarning"), Some(4));
    }

    #[test]
    fn require_fails_for_unknown_attribute() {
        let values = AttributeValues::new();
        let err = values.require("PowerOnHours").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidAttributeRequest { attribute } if attribute == "PowerOnHours"
        ));
    }

    #[test]
    fn values_hold_full_128_bits() {
        let mut values = AttributeValues::new();
        values.set("LogPageGUID", u128::MAX);
        assert_eq!(values.get("LogPageGUID"), Some(u128::MAX));
    }

    #[test]
    fn descriptor_end_offset() {
        let attr = AttributeDescriptor::new("PowerOnHours", 128, 16, Persistence::Persistent);
        assert_eq!(attr.end_offset(), 144);
    }
}

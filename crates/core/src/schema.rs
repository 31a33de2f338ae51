//! Log page schema: identity, version coverage, and field layout.
//!
//! A schema is loaded from one descriptor file and is immutable afterwards.
//! Construction validates the layout invariant: every attribute's
//! `[offset, offset + width)` must lie within `[0, length)`. Offsets need
//! not be contiguous (reserved gaps are normal) and overlap is allowed —
//! decoding is independent per attribute.

use crate::attr::{AttributeDescriptor, Persistence};
use crate::error::{Error, Result};
use crate::vendor::Vendor;
use crate::version::VersionSpec;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// Widest field the decoder can represent (u128).
pub const MAX_FIELD_WIDTH: usize = 16;

/// One versioned log page layout.
#[derive(Debug, Clone)]
pub struct LogPageSchema {
    /// Numeric page identifier
    pub page_id: u16,
    /// Human-readable page name
    pub name: String,
    /// Version coverage of this descriptor
    pub version: VersionSpec,
    /// Vendor tag the descriptor belongs to
    pub vendor: Vendor,
    /// Total page length in bytes
    pub length: usize,
    /// Default persistence behavior keyed by scenario ("power-cycle", "reset", ...)
    pub default_persistence: BTreeMap<String, Persistence>,
    attributes: Vec<AttributeDescriptor>,
    index: FxHashMap<String, usize>,
}

impl LogPageSchema {
    /// Build a schema, validating the layout invariant.
    pub fn new(
        page_id: u16,
        name: impl Into<String>,
        version: VersionSpec,
        vendor: Vendor,
        length: usize,
        attributes: Vec<AttributeDescriptor>,
        default_persistence: BTreeMap<String, Persistence>,
    ) -> Result<Self> {
        let name = name.into();
        let mut index = FxHashMap::default();
        for (slot, attr) in attributes.iter().enumerate() {
            if attr.num_of_bytes == 0 || attr.num_of_bytes > MAX_FIELD_WIDTH {
                return Err(Error::Descriptor(format!(
                    "attribute {} of page {:#x} is {} bytes wide; supported widths are 1..={}",
                    attr.name, page_id, attr.num_of_bytes, MAX_FIELD_WIDTH
                )));
            }
            if attr.end_offset() > length {
                return Err(Error::Descriptor(format!(
                    "attribute {} of page {:#x} spans {}..{} but the page is {} bytes",
                    attr.name,
                    page_id,
                    attr.byte_offset,
                    attr.end_offset(),
                    length
                )));
            }
            if index.insert(attr.name.clone(), slot).is_some() {
                return Err(Error::Descriptor(format!(
                    "attribute {} declared twice in page {:#x}",
                    attr.name, page_id
                )));
            }
        }
        Ok(Self {
            page_id,
            name,
            version,
            vendor,
            length,
            default_persistence,
            attributes,
            index,
        })
    }

    /// Attributes in declaration order.
    pub fn attributes(&self) -> &[AttributeDescriptor] {
        &self.attributes
    }

    /// Look up one attribute by name.
    pub fn attribute(&self, name: &str) -> Result<&AttributeDescriptor> {
        self.index
            .get(name)
            .map(|&slot| &self.attributes[slot])
            .ok_or_else(|| Error::InvalidAttributeRequest {
                attribute: name.to_string(),
            })
    }

    /// Whether the schema declares `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// The conventional descriptor file name, `<hex_id>_v<version>.json`.
    pub fn file_name(&self) -> String {
        format!("{:#x}_v{}.json", self.page_id, self.version)
    }
}

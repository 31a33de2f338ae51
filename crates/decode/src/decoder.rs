//! Byte-accurate log page decoding.
//!
//! Decoding is pure: given a schema and a raw buffer it produces a
//! [`LogPageInstance`] with every attribute's current value populated.
//! Fields are unsigned little-endian integers read at their declared
//! offset/width; there is no signed, float, or bit-field interpretation —
//! flag bytes come out as whole integers and callers bitmask them.

use byteorder::{LittleEndian, ReadBytesExt};
use smartlog_core::{AttributeValues, Error, LogPageSchema, Result};
use std::sync::Arc;

/// Read `width` bytes at `offset` from `buffer` as an unsigned
/// little-endian integer. `None` when the span falls outside the buffer.
pub fn read_uint_le(buffer: &[u8], offset: usize, width: usize) -> Option<u128> {
    let end = offset.checked_add(width)?;
    let mut span = buffer.get(offset..end)?;
    span.read_uint128::<LittleEndian>(width).ok()
}

/// Maps raw page buffers to typed instances.
pub struct LogPageDecoder;

impl LogPageDecoder {
    /// Decode every attribute of `schema` from `buffer`.
    ///
    /// The buffer may be longer than the schema declares; it only has to
    /// cover every declared field span.
    pub fn decode(schema: Arc<LogPageSchema>, buffer: &[u8]) -> Result<LogPageInstance> {
        let mut values = AttributeValues::with_capacity(schema.attributes().len());
        for attr in schema.attributes() {
            let value = read_uint_le(buffer, attr.byte_offset, attr.num_of_bytes).ok_or(
                Error::BufferSizeMismatch {
                    page_id: schema.page_id,
                    expected: schema.length,
                    actual: buffer.len(),
                },
            )?;
            values.set(&attr.name, value);
        }
        Ok(LogPageInstance {
            schema,
            values,
            defaults: AttributeValues::new(),
        })
    }

    /// Decode with a strict length check: the buffer must be exactly the
    /// schema's declared length.
    pub fn decode_strict(schema: Arc<LogPageSchema>, buffer: &[u8]) -> Result<LogPageInstance> {
        if buffer.len() != schema.length {
            return Err(Error::BufferSizeMismatch {
                page_id: schema.page_id,
                expected: schema.length,
                actual: buffer.len(),
            });
        }
        Self::decode(schema, buffer)
    }
}

/// A decoded log page: an immutable schema reference plus the current
/// value of every attribute, and optionally recorded per-attribute
/// defaults used for regression comparison.
#[derive(Debug, Clone)]
pub struct LogPageInstance {
    schema: Arc<LogPageSchema>,
    values: AttributeValues,
    defaults: AttributeValues,
}

impl LogPageInstance {
    /// The schema this instance was decoded against.
    pub fn schema(&self) -> &LogPageSchema {
        &self.schema
    }

    /// All decoded values in declaration order.
    pub fn values(&self) -> &AttributeValues {
        &self.values
    }

    /// Current value of one attribute.
    pub fn value(&self, name: &str) -> Result<u128> {
        self.values.require(name)
    }

    /// Record a default (baseline) value for one attribute.
    ///
    /// Fails when the schema does not declare the attribute.
    pub fn record_default(&mut self, name: &str, value: u128) -> Result<()> {
        self.schema.attribute(name)?;
        self.defaults.set(name, value);
        Ok(())
    }

    /// Record every current value as the attribute's default.
    pub fn record_defaults_from_current(&mut self) {
        let snapshot: Vec<(String, u128)> = self
            .values
            .iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        for (name, value) in snapshot {
            self.defaults.set(&name, value);
        }
    }

    /// Recorded default for one attribute, if any.
    pub fn default_value(&self, name: &str) -> Option<u128> {
        self.defaults.get(name)
    }

    /// Compare the recorded default against the current value.
    ///
    /// `Ok(None)` when no default has been recorded for the attribute;
    /// fails when the attribute is not part of this instance.
    pub fn matches_default(&self, name: &str) -> Result<Option<bool>> {
        let current = self.values.require(name)?;
        Ok(self.defaults.get(name).map(|default| default == current))
    }

    /// Render the page as an aligned attribute/offset/width/value table.
    pub fn render_table(&self) -> String {
        let header = format!(
            "===================================== {:#x} {} LOG PAGE =====================================",
            self.schema.page_id, self.schema.name
        );
        let mut out = String::new();
        out.push_str(&header);
        out.push('\n');
        out.push_str(&format!(
            "{: <50} {: <10} {: <6} {: <30}\n\n",
            "Attribute", "start:end", "#Bytes", "Value"
        ));
        for attr in self.schema.attributes() {
            let value = self.values.get(&attr.name).unwrap_or(0);
            let span = format!("{}:{}", attr.byte_offset, attr.end_offset() - 1);
            out.push_str(&format!(
                "{: <50} {: <10} {: <6} {: <30}\n",
                attr.name, span, attr.num_of_bytes, value
            ));
        }
        out.push_str(&"=".repeat(header.len()));
        out
    }
}

//! Hard-coded vendor page layouts.
//!
//! These pages predate (or bypass) descriptor files: each module carries an
//! ordered field map applied with the same little-endian read algorithm as
//! the schema decoder, followed by page-specific postcondition checks on
//! fields that must hold exact constants. A violated postcondition fails
//! with [`Error::InvalidConstantField`] naming the field and both literal
//! values.

use crate::decoder::read_uint_le;
use smartlog_core::{AttributeValues, Error, Result};

pub mod dell;
pub mod fb;
pub mod hp;
pub mod msft;

/// One entry of a fixed field map.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    /// Attribute name
    pub name: &'static str,
    /// First byte in the page buffer
    pub offset: usize,
    /// Width in bytes (1..=16)
    pub width: usize,
}

/// Shorthand for building `const` field maps.
pub(crate) const fn field(name: &'static str, offset: usize, width: usize) -> Field {
    Field {
        name,
        offset,
        width,
    }
}

/// Apply a field map to a raw buffer.
pub(crate) fn apply(page_id: u16, length: usize, map: &[Field], buffer: &[u8]) -> Result<AttributeValues> {
    let mut values = AttributeValues::with_capacity(map.len());
    for field in map {
        let value = read_uint_le(buffer, field.offset, field.width).ok_or(
            Error::BufferSizeMismatch {
                page_id,
                expected: length,
                actual: buffer.len(),
            },
        )?;
        values.set(field.name, value);
    }
    Ok(values)
}

/// Postcondition: `field` must equal `expected`.
pub(crate) fn require_constant(
    page: &'static str,
    values: &AttributeValues,
    field: &'static str,
    expected: u128,
) -> Result<()> {
    let actual = values.require(field)?;
    if actual != expected {
        return Err(Error::InvalidConstantField {
            page,
            field,
            expected,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testutil {
    /// Write `value` little-endian into `width` bytes at `offset`.
    pub fn put(buffer: &mut [u8], offset: usize, width: usize, value: u128) {
        for (i, byte) in buffer[offset..offset + width].iter_mut().enumerate() {
            *byte = (value >> (8 * i)) as u8;
        }
    }
}

//! HP vendor SMART page.
//!
//! Sparse layout over a 512-byte page; no constant fields to assert.

use super::{apply, field, Field};
use smartlog_core::{AttributeValues, Result};

/// Page identifier.
pub const PAGE_ID: u16 = 0xC7;
/// Declared page length in bytes.
pub const PAGE_LENGTH: usize = 512;

/// Fixed field map, in layout order.
pub const FIELDS: &[Field] = &[
    field("Available_Spare", 3, 1),
    field("Percentage_Used", 5, 1),
    field("NVMI", 160, 3),
    field("IDPA", 163, 3),
    field("LBAT", 166, 2),
    field("CRCC", 168, 4),
    field("UECC", 172, 4),
];

/// Decode the page.
pub fn decode(buffer: &[u8]) -> Result<AttributeValues> {
    apply(PAGE_ID, PAGE_LENGTH, FIELDS, buffer)
}

#[cfg(test)]
mod tests {
    use super::super::testutil::put;
    use super::*;

    #[test]
    fn decodes_sparse_fields() {
        let mut buffer = vec![0u8; PAGE_LENGTH];
        put(&mut buffer, 3, 1, 100);
        put(&mut buffer, 168, 4, 0xDEAD);

        let values = decode(&buffer).unwrap();
        assert_eq!(values.get("Available_Spare"), Some(100));
        assert_eq!(values.get("CRCC"), Some(0xDEAD));
        assert_eq!(values.len(), FIELDS.len());
    }
}

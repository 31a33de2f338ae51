//! Dell vendor SMART page (0xCA).
//!
//! The layout branches on the externally tracked Dell spec revision: at or
//! below A05 the page is handed to a legacy whole-buffer parser owned by
//! the transport layer; later revisions use the fixed map below.

use super::{apply, field, Field};
use smartlog_core::{AttributeValues, Error, Result, VersionToken};

/// Page identifier.
pub const PAGE_ID: u16 = 0xCA;
/// Declared page length in bytes.
pub const PAGE_LENGTH: usize = 512;

/// Spec revisions at or below this number (A05) defer to the legacy parser.
pub const LEGACY_MAX_REVISION: u32 = 5;

/// Fixed field map for revisions above A05, in layout order.
pub const FIELDS: &[Field] = &[
    field("Reserved", 0, 5),
    field("WearLevel", 5, 1),
    field("WorstUsedReservedBlock", 6, 1),
    field("UsedReservedBlock", 7, 1),
    field("ReservedBlock", 8, 4),
    field("MinimumTemperature", 12, 2),
    field("MaximumTemperature", 14, 2),
    field("TotalDataWrittenToNAND", 16, 16),
    field("HostActiveIdleCounter", 32, 4),
    field("NonOperationalPSCounter", 36, 4),
    field("AbnormalInputVccVoltageCounter", 40, 1),
];

/// Whole-buffer parser for legacy (≤ A05) revisions, owned by the caller.
pub trait LegacyDellDecoder {
    /// Parse the raw page into attribute values.
    fn decode(&self, buffer: &[u8]) -> Result<AttributeValues>;
}

/// Decode the page under the given Dell spec revision.
pub fn decode(
    buffer: &[u8],
    spec_revision: &VersionToken,
    legacy: &dyn LegacyDellDecoder,
) -> Result<AttributeValues> {
    match spec_revision {
        VersionToken::Lettered { number, .. } if *number <= LEGACY_MAX_REVISION => {
            legacy.decode(buffer)
        }
        VersionToken::Lettered { .. } => apply(PAGE_ID, PAGE_LENGTH, FIELDS, buffer),
        VersionToken::Dotted(_) => Err(Error::Descriptor(format!(
            "Dell page {:#x} revisions use the lettered scheme, got {}",
            PAGE_ID, spec_revision
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::put;
    use super::*;

    struct StubLegacy;

    impl LegacyDellDecoder for StubLegacy {
        fn decode(&self, _buffer: &[u8]) -> Result<AttributeValues> {
            let mut values = AttributeValues::new();
            values.set("LegacyMarker", 1);
            Ok(values)
        }
    }

    fn revision(s: &str) -> VersionToken {
        s.parse().unwrap()
    }

    #[test]
    fn revisions_at_or_below_a05_use_the_legacy_parser() {
        let buffer = vec![0u8; PAGE_LENGTH];
        for rev in ["A04", "A05"] {
            let values = decode(&buffer, &revision(rev), &StubLegacy).unwrap();
            assert_eq!(values.get("LegacyMarker"), Some(1));
        }
    }

    #[test]
    fn later_revisions_use_the_fixed_map() {
        let mut buffer = vec![0u8; PAGE_LENGTH];
        put(&mut buffer, 5, 1, 7); // WearLevel
        put(&mut buffer, 12, 2, 290); // MinimumTemperature

        let values = decode(&buffer, &revision("A06"), &StubLegacy).unwrap();
        assert_eq!(values.get("WearLevel"), Some(7));
        assert_eq!(values.get("MinimumTemperature"), Some(290));
        assert!(!values.contains("LegacyMarker"));
    }

    #[test]
    fn dotted_revision_is_rejected() {
        let buffer = vec![0u8; PAGE_LENGTH];
        let err = decode(&buffer, &revision("2.0"), &StubLegacy).unwrap_err();
        assert!(matches!(err, Error::Descriptor(_)));
    }
}

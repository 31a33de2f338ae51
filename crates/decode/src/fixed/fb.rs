//! Facebook vendor SMART page (0xFB).
//!
//! 512-byte page. The layout-version word sits at the tail (510/2) and must
//! read 3; the endurance estimate is a per-capacity constant.

use super::{apply, field, require_constant, Field};
use smartlog_core::{AttributeValues, Result};

/// Page identifier.
pub const PAGE_ID: u16 = 0xFB;
/// Declared page length in bytes.
pub const PAGE_LENGTH: usize = 512;

const PAGE: &str = "FB";

/// Fixed field map, in layout order.
pub const FIELDS: &[Field] = &[
    field("PhysicalMediaUnitsWrittenTLC", 0, 16),
    field("PhysicalMediaUnitsWrittenSLC", 16, 16),
    field("BadUserNANDBlock_Normalized", 32, 2),
    field("BadUserNANDBlock_Raw", 34, 6),
    field("XORRecoverycount", 40, 8),
    field("UncorrectableReadErrorCount", 48, 8),
    field("SSDE2E_CorrectedErrors", 56, 8),
    field("SSDE2E_DetectedErrors", 64, 4),
    field("SSDE2E_UncorrectedErrors", 68, 4),
    field("PercentageUsed_System", 72, 1),
    field("MinPECTLC", 73, 8),
    field("MaxPECTLC", 81, 8),
    field("MinPECSLC", 89, 8),
    field("MaxPECSLC", 97, 8),
    field("PF_Normalized", 105, 2),
    field("PF_Raw", 107, 6),
    field("EF_Normalized", 113, 2),
    field("EF_Raw", 115, 6),
    field("PCIeCorrectableErrorcount", 121, 8),
    field("%FreeBlocks_User", 129, 1),
    field("SecurityVersionNumber", 130, 8),
    field("%FreeBlocks_System", 138, 1),
    field("TRIM_Completions_count", 139, 16),
    field("TRIM_InCompletion_MB", 155, 8),
    field("TRIM_Completion_%age", 163, 1),
    field("BackgroundBack-PressureGauge", 164, 1),
    field("SoftECCerrorcount", 165, 8),
    field("Refreshcount", 173, 8),
    field("BadSystemNANDBlock_Normalized", 181, 2),
    field("BadSystemNANDBlock_Raw", 183, 6),
    field("EnduranceEstimate", 189, 16),
    field("TT_Count", 205, 1),
    field("TT_Status", 206, 1),
    field("Unaligned_IO", 207, 8),
    field("PhysicalMediaUnitsRead", 215, 16),
    field("LogPageVersion", 510, 2),
];

/// Endurance estimate constants keyed by drive capacity in GB.
fn endurance_estimate_for(capacity_gb: u32) -> Option<u128> {
    match capacity_gb {
        256 => Some(512_000),
        512 => Some(1_024_000),
        _ => None,
    }
}

/// Decode the page and assert its constant fields.
///
/// `capacity_gb` selects the endurance-estimate constant; capacities
/// without a known constant skip that check.
pub fn decode(buffer: &[u8], capacity_gb: Option<u32>) -> Result<AttributeValues> {
    let values = apply(PAGE_ID, PAGE_LENGTH, FIELDS, buffer)?;

    require_constant(PAGE, &values, "SecurityVersionNumber", 1)?;
    require_constant(PAGE, &values, "LogPageVersion", 3)?;
    if let Some(expected) = capacity_gb.and_then(endurance_estimate_for) {
        require_constant(PAGE, &values, "EnduranceEstimate", expected)?;
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::super::testutil::put;
    use super::*;
    use smartlog_core::Error;

    fn valid_buffer() -> Vec<u8> {
        let mut buffer = vec![0u8; PAGE_LENGTH];
        put(&mut buffer, 130, 8, 1); // SecurityVersionNumber
        put(&mut buffer, 510, 2, 3); // LogPageVersion
        put(&mut buffer, 189, 16, 512_000); // EnduranceEstimate (256 GB)
        buffer
    }

    #[test]
    fn decodes_when_constants_hold() {
        let values = decode(&valid_buffer(), Some(256)).unwrap();
        assert_eq!(values.get("LogPageVersion"), Some(3));
        assert_eq!(values.get("EnduranceEstimate"), Some(512_000));
    }

    #[test]
    fn wrong_log_page_version_names_the_field() {
        let mut buffer = valid_buffer();
        put(&mut buffer, 510, 2, 2);
        let err = decode(&buffer, None).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConstantField {
                field: "LogPageVersion",
                expected: 3,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn endurance_estimate_is_checked_per_capacity() {
        let mut buffer = valid_buffer();
        put(&mut buffer, 189, 16, 1_024_000);
        // Wrong for 256 GB
        assert!(decode(&buffer, Some(256)).is_err());
        // Right for 512 GB
        assert!(decode(&buffer, Some(512)).is_ok());
        // Unknown capacity skips the check
        assert!(decode(&buffer, Some(1024)).is_ok());
    }
}

//! Microsoft OCP datacenter SMART page (0xC0).
//!
//! 512-byte page with a large reserved run at 200..494 (left as a gap) and
//! an identifying GUID in the tail. Most of the tail fields are constants
//! asserted after every decode; NUSE is checked against the caller's
//! expectation when one is supplied (it comes from an identify query the
//! transport owns).

use super::{apply, field, require_constant, Field};
use smartlog_core::{AttributeValues, Result};

/// Page identifier.
pub const PAGE_ID: u16 = 0xC0;
/// Declared page length in bytes.
pub const PAGE_LENGTH: usize = 512;

const PAGE: &str = "MS_C0";

/// Identifying GUID every revision of the page must carry.
pub const LOG_PAGE_GUID: u128 = 233721280104791642383937574454470684613;

/// Fixed field map, in layout order.
pub const FIELDS: &[Field] = &[
    field("PhysicalMediaUnitsWritten", 0, 16),
    field("PhysicalMediaUnitsRead", 16, 16),
    field("BadUserNANDBlock_Raw", 32, 6),
    field("BadUserNANDBlock_Normalized", 38, 2),
    field("BadSystemNANDBlock_Raw", 40, 6),
    field("BadSystemNANDBlock_Normalized", 46, 2),
    field("XORRecoverycount", 48, 8),
    field("UncorrectableReadErrorCount", 56, 8),
    field("SoftECCerrorcount", 64, 8),
    field("SSDE2E_DetectedErrors", 72, 4),
    field("SSDE2E_CorrectedErrors", 76, 4),
    field("SystemData_%ageUsed", 80, 1),
    field("Refreshcount", 81, 7),
    field("MaxPEC", 88, 4),
    field("MinPEC", 92, 4),
    field("TT_Count", 96, 1),
    field("TT_Status", 97, 1),
    field("OCPNVMe_Spec_ErrataVersion", 98, 1),
    field("OCPNVMe_Spec_PointVersion", 99, 2),
    field("OCPNVMe_Spec_MinorVersion", 101, 2),
    field("OCPNVMe_Spec_MajorVersion", 103, 1),
    field("PCIeCorrectableErrorcount", 104, 8),
    field("IncompleteShutdowns", 112, 4),
    field("Reserved1", 116, 4),
    field("%FreeBlocks_User", 120, 1),
    field("Reserved2", 121, 7),
    field("CapacitorHealth", 128, 2),
    field("NVMeErrataVersion", 130, 1),
    field("Reserved3", 131, 5),
    field("Unaligned_IO", 136, 8),
    field("SecurityVersionNumber", 144, 8),
    field("NUSE", 152, 8),
    field("PLPStartCount", 160, 16),
    field("EnduranceEstimate", 176, 16),
    field("PCIeLinkRe-trainingCount", 192, 8),
    field("LogPageVersion", 494, 2),
    field("LogPageGUID", 496, 16),
];

/// Decode the page and assert its constant fields.
///
/// `expected_nuse` is the namespace utilization reported by an identify
/// query; when provided, the page's NUSE field must equal it.
pub fn decode(buffer: &[u8], expected_nuse: Option<u128>) -> Result<AttributeValues> {
    let values = apply(PAGE_ID, PAGE_LENGTH, FIELDS, buffer)?;

    require_constant(PAGE, &values, "LogPageVersion", 3)?;
    require_constant(PAGE, &values, "LogPageGUID", LOG_PAGE_GUID)?;
    require_constant(PAGE, &values, "CapacitorHealth", 65_535)?;
    require_constant(PAGE, &values, "NVMeErrataVersion", 99)?;
    require_constant(PAGE, &values, "PLPStartCount", 0)?;
    require_constant(PAGE, &values, "OCPNVMe_Spec_MajorVersion", 2)?;
    require_constant(PAGE, &values, "OCPNVMe_Spec_MinorVersion", 0)?;
    require_constant(PAGE, &values, "OCPNVMe_Spec_PointVersion", 0)?;
    require_constant(PAGE, &values, "OCPNVMe_Spec_ErrataVersion", 0)?;
    require_constant(PAGE, &values, "SecurityVersionNumber", 0)?;
    require_constant(PAGE, &values, "Unaligned_IO", 0)?;
    if let Some(nuse) = expected_nuse {
        require_constant(PAGE, &values, "NUSE", nuse)?;
    }

    Ok(values)
}

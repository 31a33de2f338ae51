//! Descriptor file model.
//!
//! Descriptors are ordered JSON records, one file per page layout per
//! version coverage, named `<hex_id>_v<version>.json`:
//!
//! ```json
//! {
//!   "hex_id": "0x2",
//!   "log_page_name": "SMART_HEALTH_INFORMATION",
//!   "version": "1.4-2.0",
//!   "vendor": "Generic",
//!   "length": 512,
//!   "defaultPersistence": {"power-cycle": "persistent", "reset": "persistent"},
//!   "attributes": {
//!     "CriticalWarning": {"byte_offset": 0, "num_of_bytes": 1, "persistency": "conditional"}
//!   }
//! }
//! ```
//!
//! Attribute declaration order in the file is load-bearing: it becomes the
//! decode and display order of the schema.

use serde::Deserialize;
use smartlog_core::{
    AttributeDescriptor, Error, LogPageSchema, Persistence, Result, Vendor, VersionSpec,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct DescriptorFile {
    hex_id: PageId,
    log_page_name: String,
    version: String,
    vendor: String,
    length: usize,
    #[serde(rename = "defaultPersistence", default)]
    default_persistence: BTreeMap<String, Persistence>,
    // serde_json's preserve_order keeps the declaration order here
    attributes: serde_json::Map<String, serde_json::Value>,
}

/// Page ids appear as hex strings ("0xc0") in hand-written files and as
/// plain numbers in generated ones; accept both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PageId {
    Number(u16),
    Hex(String),
}

impl PageId {
    fn value(&self) -> Result<u16> {
        match self {
            PageId::Number(n) => Ok(*n),
            PageId::Hex(s) => parse_hex_id(s).ok_or_else(|| {
                Error::Descriptor(format!("hex_id {:?} is not a hexadecimal page id", s))
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AttrSpec {
    byte_offset: usize,
    num_of_bytes: usize,
    persistency: Persistence,
}

/// Parse a `<hex>` page-id token, with or without the `0x` prefix.
pub(crate) fn parse_hex_id(s: &str) -> Option<u16> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u16::from_str_radix(digits, 16).ok()
}

/// Parse descriptor text into a validated schema.
pub fn parse_schema(text: &str) -> Result<LogPageSchema> {
    let file: DescriptorFile =
        serde_json::from_str(text).map_err(|e| Error::Descriptor(e.to_string()))?;

    let page_id = file.hex_id.value()?;
    let version: VersionSpec = file
        .version
        .parse()
        .map_err(|e| Error::Descriptor(format!("page {:#x}: {}", page_id, e)))?;
    let vendor = Vendor::from_name(&file.vendor);

    let mut attributes = Vec::with_capacity(file.attributes.len());
    for (name, spec) in file.attributes {
        let spec: AttrSpec = serde_json::from_value(spec)
            .map_err(|e| Error::Descriptor(format!("attribute {}: {}", name, e)))?;
        attributes.push(AttributeDescriptor::new(
            name,
            spec.byte_offset,
            spec.num_of_bytes,
            spec.persistency,
        ));
    }

    LogPageSchema::new(
        page_id,
        file.log_page_name,
        version,
        vendor,
        file.length,
        attributes,
        file.default_persistence,
    )
}

/// Load and parse one descriptor file.
pub fn load_schema(path: &Path) -> Result<LogPageSchema> {
    let text = fs::read_to_string(path)?;
    parse_schema(&text).map_err(|e| match e {
        Error::Descriptor(msg) => Error::Descriptor(format!("{}: {}", path.display(), msg)),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMART_DESCRIPTOR: &str = r#"{
        "hex_id": "0x2",
        "log_page_name": "SMART_HEALTH_INFORMATION",
        "version": "1.4-2.0",
        "vendor": "Generic",
        "length": 512,
        "defaultPersistence": {"power-cycle": "persistent", "reset": "persistent"},
        "attributes": {
            "CriticalWarning": {"byte_offset": 0, "num_of_bytes": 1, "persistency": "conditional"},
            "CompositeTemperature": {"byte_offset": 1, "num_of_bytes": 2, "persistency": "volatile"},
            "AvailableSpare": {"byte_offset": 3, "num_of_bytes": 1, "persistency": "persistent"},
            "PowerOnHours": {"byte_offset": 128, "num_of_bytes": 16, "persistency": "persistent"}
        }
    }"#;

    #[test]
    fn parses_a_complete_descriptor() {
        let schema = parse_schema(SMART_DESCRIPTOR).unwrap();
        assert_eq!(schema.page_id, 0x02);
        assert_eq!(schema.name, "SMART_HEALTH_INFORMATION");
        assert_eq!(schema.vendor, Vendor::Generic);
        assert_eq!(schema.length, 512);
        assert_eq!(
            schema.default_persistence.get("power-cycle"),
            Some(&Persistence::Persistent)
        );
    }

    #[test]
    fn attribute_order_follows_the_file() {
        let schema = parse_schema(SMART_DESCRIPTOR).unwrap();
        let names: Vec<&str> = schema.attributes().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "CriticalWarning",
                "CompositeTemperature",
                "AvailableSpare",
                "PowerOnHours"
            ]
        );
    }

    #[test]
    fn numeric_hex_id_is_accepted() {
        let schema = parse_schema(
            r#"{"hex_id": 2, "log_page_name": "SMART", "version": "2.0",
                "vendor": "Generic", "length": 16, "attributes": {}}"#,
        )
        .unwrap();
        assert_eq!(schema.page_id, 2);
    }

    #[test]
    fn malformed_version_is_a_descriptor_error() {
        let err = parse_schema(
            r#"{"hex_id": "0x2", "log_page_name": "SMART", "version": "one.four",
                "vendor": "Generic", "length": 16, "attributes": {}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Descriptor(_)));
    }

    #[test]
    fn out_of_bounds_attribute_is_rejected_at_load() {
        let err = parse_schema(
            r#"{"hex_id": "0x2", "log_page_name": "SMART", "version": "2.0",
                "vendor": "Generic", "length": 4,
                "attributes": {"PowerOnHours": {"byte_offset": 0, "num_of_bytes": 8, "persistency": "persistent"}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Descriptor(_)));
    }

    #[test]
    fn parse_hex_id_accepts_both_spellings() {
        assert_eq!(parse_hex_id("0x2"), Some(2));
        assert_eq!(parse_hex_id("0xCA"), Some(0xCA));
        assert_eq!(parse_hex_id("ca"), Some(0xCA));
        assert_eq!(parse_hex_id("zz"), None);
    }
}

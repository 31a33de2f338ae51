//! Schema resolution: pick the one descriptor covering a request.
//!
//! Descriptors live under a root directory split by vendor:
//!
//! ```text
//! <root>/Generic/<hex_id>_v<version>.json
//! <root>/Vendor/<VendorName>/<hex_id>_v<version>.json
//! ```
//!
//! Candidates are the files whose id prefix matches the requested page;
//! the per-vendor match strategy then decides which candidate's version
//! portion covers the request. Version ranges let one descriptor cover
//! every spec revision with an identical layout. The CalX strategy is the
//! one buffer-dependent path: its pages carry their layout version in-band,
//! so resolution reads a word from the already-fetched buffer instead of
//! comparing against a context-supplied revision.

use crate::descriptor;
use byteorder::{ByteOrder, LittleEndian};
use smartlog_core::{
    title_case, Error, LogPageSchema, Result, Vendor, VersionSpec, VersionToken,
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Byte offset of the in-band layout version word on CalX pages.
const CALX_VERSION_OFFSET: usize = 510;

/// Version context for one resolution request.
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// Requested base-spec version (dotted scheme) for generic pages
    pub spec_version: VersionToken,
    /// Vendor name reported by the attached device
    pub device_vendor: String,
    /// Vendor-tracked spec revision (lettered scheme), when the vendor has one
    pub vendor_spec_version: Option<VersionToken>,
}

/// Locates and loads schema descriptors.
#[derive(Debug, Clone)]
pub struct SchemaResolver {
    root: PathBuf,
}

impl SchemaResolver {
    /// Create a resolver over a descriptor root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The descriptor root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the descriptor for `page_id` under the given context.
    ///
    /// `buffer` is the already-fetched raw page, required only by the CalX
    /// in-band strategy; every other path ignores it. Fails with
    /// [`Error::SchemaNotFound`] when no candidate's version specifier
    /// contains the requested version.
    pub fn resolve(
        &self,
        page_id: u16,
        ctx: &ResolveContext,
        buffer: Option<&[u8]>,
    ) -> Result<LogPageSchema> {
        let vendor = Vendor::classify(page_id, &ctx.device_vendor);
        let strategy = MatchStrategy::select(page_id, &vendor, ctx, buffer)?;
        let dir = self.vendor_dir(&vendor);
        debug!(
            "resolving page {:#x} in {} (requested {})",
            page_id,
            dir.display(),
            strategy.requested()
        );

        let mut candidates = candidate_files(&dir, page_id)?;
        candidates.sort();
        for file_name in &candidates {
            let Some(version_portion) = version_portion(file_name) else {
                continue;
            };
            if strategy.matches(version_portion) {
                debug!("page {:#x} resolved to {}", page_id, file_name);
                return descriptor::load_schema(&dir.join(file_name));
            }
        }

        Err(Error::SchemaNotFound {
            page_id,
            vendor: vendor.to_string(),
            version: strategy.requested(),
        })
    }

    fn vendor_dir(&self, vendor: &Vendor) -> PathBuf {
        if vendor.is_generic() {
            self.root.join("Generic")
        } else {
            self.root.join("Vendor").join(vendor.dir_name())
        }
    }
}

/// Per-vendor matching policy, selected once per resolution.
enum MatchStrategy {
    /// Compare the requested token against each file's version specifier
    /// (exact or inclusive range) under the token's own scheme.
    Versioned(VersionToken),
    /// Exact string match of an in-band derived token against the file's
    /// version portion.
    InBand(String),
}

impl MatchStrategy {
    fn select(
        page_id: u16,
        vendor: &Vendor,
        ctx: &ResolveContext,
        buffer: Option<&[u8]>,
    ) -> Result<MatchStrategy> {
        match vendor {
            Vendor::Generic => Ok(MatchStrategy::Versioned(ctx.spec_version.clone())),
            Vendor::CalX => {
                let buffer = buffer.ok_or_else(|| {
                    Error::Descriptor(format!(
                        "page {:#x}: CalX resolution requires the fetched page buffer",
                        page_id
                    ))
                })?;
                if buffer.len() < CALX_VERSION_OFFSET + 2 {
                    return Err(Error::BufferSizeMismatch {
                        page_id,
                        expected: CALX_VERSION_OFFSET + 2,
                        actual: buffer.len(),
                    });
                }
                let number = LittleEndian::read_u16(&buffer[CALX_VERSION_OFFSET..]);
                Ok(MatchStrategy::InBand(format!(
                    "{}-v{}",
                    title_case(&ctx.device_vendor),
                    number
                )))
            }
            _ => {
                let token = ctx.vendor_spec_version.clone().ok_or_else(|| {
                    Error::Device(format!(
                        "no vendor spec revision reported for {} page {:#x}",
                        vendor, page_id
                    ))
                })?;
                Ok(MatchStrategy::Versioned(token))
            }
        }
    }

    fn matches(&self, version_portion: &str) -> bool {
        match self {
            MatchStrategy::Versioned(requested) => version_portion
                .parse::<VersionSpec>()
                .map(|spec| spec.contains(requested))
                .unwrap_or(false),
            MatchStrategy::InBand(needed) => version_portion == needed,
        }
    }

    fn requested(&self) -> String {
        match self {
            MatchStrategy::Versioned(token) => token.to_string(),
            MatchStrategy::InBand(needed) => needed.clone(),
        }
    }
}

/// List `.json` files in `dir` whose `<hex_id>` prefix equals `page_id`.
///
/// A missing vendor directory is simply an empty candidate set; resolution
/// then reports `SchemaNotFound` rather than an I/O failure.
fn candidate_files(dir: &Path, page_id: u16) -> Result<Vec<String>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut matched = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !name.ends_with(".json") {
            continue;
        }
        let Some(prefix) = name.split('_').next() else {
            continue;
        };
        if descriptor::parse_hex_id(prefix) == Some(page_id) {
            matched.push(name.to_string());
        }
    }
    Ok(matched)
}

/// Extract the `<version>` portion of `<hex_id>_v<version>.json`.
fn version_portion(file_name: &str) -> Option<&str> {
    let stem = file_name.strip_suffix(".json")?;
    let underscore = stem.find('_')?;
    let rest = &stem[underscore + 1..];
    rest.strip_prefix('v')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_descriptor(dir: &Path, file_name: &str, hex_id: &str, version: &str, vendor: &str) {
        fs::create_dir_all(dir).unwrap();
        let body = format!(
            r#"{{"hex_id": "{}", "log_page_name": "PAGE", "version": "{}",
                "vendor": "{}", "length": 512,
                "attributes": {{"CriticalWarning": {{"byte_offset": 0, "num_of_bytes": 1, "persistency": "conditional"}}}}}}"#,
            hex_id, version, vendor
        );
        fs::write(dir.join(file_name), body).unwrap();
    }

    fn generic_ctx(version: &str) -> ResolveContext {
        ResolveContext {
            spec_version: version.parse().unwrap(),
            device_vendor: "GENERIC".to_string(),
            vendor_spec_version: None,
        }
    }

    #[test]
    fn generic_range_and_exact_files_resolve() {
        let root = tempfile::tempdir().unwrap();
        let generic = root.path().join("Generic");
        write_descriptor(&generic, "0x2_v1.4-2.0.json", "0x2", "1.4-2.0", "Generic");
        write_descriptor(&generic, "0x2_v1.3.json", "0x2", "1.3", "Generic");

        let resolver = SchemaResolver::new(root.path());
        let schema = resolver.resolve(0x2, &generic_ctx("1.6"), None).unwrap();
        assert_eq!(schema.version.to_string(), "1.4-2.0");

        let schema = resolver.resolve(0x2, &generic_ctx("1.3"), None).unwrap();
        assert_eq!(schema.version.to_string(), "1.3");
    }

    #[test]
    fn range_bounds_are_inclusive_and_one_step_outside_fails() {
        let root = tempfile::tempdir().unwrap();
        let generic = root.path().join("Generic");
        write_descriptor(&generic, "0x2_v1.4-2.0.json", "0x2", "1.4-2.0", "Generic");

        let resolver = SchemaResolver::new(root.path());
        assert!(resolver.resolve(0x2, &generic_ctx("1.4"), None).is_ok());
        assert!(resolver.resolve(0x2, &generic_ctx("2.0"), None).is_ok());

        let err = resolver.resolve(0x2, &generic_ctx("1.3"), None).unwrap_err();
        assert!(err.is_schema_not_found());
        let err = resolver.resolve(0x2, &generic_ctx("2.1"), None).unwrap_err();
        assert!(err.is_schema_not_found());
    }

    #[test]
    fn files_for_other_pages_are_not_candidates() {
        let root = tempfile::tempdir().unwrap();
        let generic = root.path().join("Generic");
        write_descriptor(&generic, "0x1_v1.4-2.0.json", "0x1", "1.4-2.0", "Generic");

        let resolver = SchemaResolver::new(root.path());
        let err = resolver.resolve(0x2, &generic_ctx("1.6"), None).unwrap_err();
        assert!(err.is_schema_not_found());
    }

    #[test]
    fn dell_pages_match_on_the_lettered_suffix() {
        let root = tempfile::tempdir().unwrap();
        let dell = root.path().join("Vendor").join("Dell");
        write_descriptor(&dell, "0xca_vA05-A07.json", "0xca", "A05-A07", "Dell");

        let ctx = ResolveContext {
            spec_version: "2.0".parse().unwrap(),
            device_vendor: "DELL".to_string(),
            vendor_spec_version: Some("A06".parse().unwrap()),
        };
        let resolver = SchemaResolver::new(root.path());
        let schema = resolver.resolve(0xCA, &ctx, None).unwrap();
        assert_eq!(schema.page_id, 0xCA);

        let ctx_outside = ResolveContext {
            vendor_spec_version: Some("A04".parse().unwrap()),
            ..ctx
        };
        let err = resolver.resolve(0xCA, &ctx_outside, None).unwrap_err();
        assert!(err.is_schema_not_found());
    }

    #[test]
    fn calx_resolution_reads_the_in_band_version_word() {
        let root = tempfile::tempdir().unwrap();
        let calx = root.path().join("Vendor").join("CalX");
        write_descriptor(
            &calx,
            "0xd0_vCalx2microsofteng-v3.json",
            "0xd0",
            "2.0",
            "CalX",
        );

        let mut buffer = vec![0u8; 512];
        buffer[510] = 3; // little-endian 3 at the version word

        let ctx = ResolveContext {
            spec_version: "2.0".parse().unwrap(),
            device_vendor: "calx2microsofteng".to_string(),
            vendor_spec_version: None,
        };
        let resolver = SchemaResolver::new(root.path());
        let schema = resolver.resolve(0xD0, &ctx, Some(&buffer)).unwrap();
        assert_eq!(schema.page_id, 0xD0);

        // Without the buffer the CalX path cannot derive its version
        let err = resolver.resolve(0xD0, &ctx, None).unwrap_err();
        assert!(matches!(err, Error::Descriptor(_)));

        // A different in-band version finds no descriptor
        buffer[510] = 4;
        let err = resolver.resolve(0xD0, &ctx, Some(&buffer)).unwrap_err();
        assert!(err.is_schema_not_found());
    }

    #[test]
    fn missing_vendor_directory_reports_schema_not_found() {
        let root = tempfile::tempdir().unwrap();
        let resolver = SchemaResolver::new(root.path());
        let err = resolver.resolve(0x2, &generic_ctx("1.6"), None).unwrap_err();
        assert!(err.is_schema_not_found());
    }
}

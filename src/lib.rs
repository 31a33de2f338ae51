//! # smartlog
//!
//! Schema-driven decoding of fixed-layout device telemetry records ("log
//! pages") and verification that tracked attributes survive device
//! lifecycle events.
//!
//! ## Quick Start
//!
//! ```ignore
//! use smartlog::prelude::*;
//!
//! // Resolve and decode one page
//! let resolver = SchemaResolver::new("./descriptors");
//! let ctx = ResolveContext {
//!     spec_version: "2.0".parse()?,
//!     device_vendor: device.vendor_name(),
//!     vendor_spec_version: device.vendor_spec_version(),
//! };
//! let buffer = device.fetch_log_page(0x02, true)?;
//! let schema = resolver.resolve(0x02, &ctx, Some(&buffer))?;
//! let page = LogPageDecoder::decode(schema.into(), &buffer)?;
//! println!("{}", page.render_table());
//!
//! // Verify attribute persistence across a randomized event sequence
//! let mut verifier = PersistenceVerifier::new(&mut device, VerifierOptions::new("./descriptors"));
//! let report = verifier.run()?;
//! println!("{}", report.summary());
//! ```
//!
//! ## Layers
//!
//! - [`SchemaResolver`] — locates the one descriptor file whose version
//!   specifier covers a request.
//! - [`LogPageDecoder`] — maps raw buffers to typed [`LogPageInstance`]s.
//! - [`fixed`] — hard-coded vendor page layouts with constant-field
//!   postconditions.
//! - [`PersistenceVerifier`] — snapshots tracked attributes around
//!   randomized lifecycle events and applies per-attribute rules.

#![warn(missing_docs)]

pub mod prelude;

// Core data model
pub use smartlog_core::{
    AttributeDescriptor, AttributeValues, Error, LogPageSchema, Persistence, Result, Vendor,
    VersionSpec, VersionToken,
};

// Schema resolution
pub use smartlog_schema::{ResolveContext, SchemaResolver};

// Decoding
pub use smartlog_decode::fixed;
pub use smartlog_decode::{read_uint_le, LogPageDecoder, LogPageInstance};

// Verification
pub use smartlog_verify::{
    AerSession, AttributeFault, Capabilities, ComparisonPolicy, DeviceLink, EventOutcome,
    LifecycleEvent, PersistenceVerifier, SanitizeStatus, SmartEventKind, Verdict, VerifierOptions,
    VerifyReport, GENERIC_SMART_PAGE_ID, READ_ONLY_MEDIA_BIT, SANITIZE_DONE, SANITIZE_SUCCESS,
    SMART_ATTRIBUTES,
};

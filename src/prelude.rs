//! Convenience imports for typical smartlog use.
//!
//! ```ignore
//! use smartlog::prelude::*;
//! ```

pub use smartlog_core::{
    AttributeDescriptor, AttributeValues, Error, LogPageSchema, Persistence, Result, Vendor,
    VersionSpec, VersionToken,
};
pub use smartlog_decode::{LogPageDecoder, LogPageInstance};
pub use smartlog_schema::{ResolveContext, SchemaResolver};
pub use smartlog_verify::{
    AerSession, Capabilities, DeviceLink, LifecycleEvent, PersistenceVerifier, SanitizeStatus,
    SmartEventKind, VerifierOptions, VerifyReport,
};

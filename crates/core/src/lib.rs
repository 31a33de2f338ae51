//! Core data model for smartlog.
//!
//! This crate holds the pieces every other layer builds on: attribute
//! descriptors and the ordered value container, the log page schema type,
//! version tokens and specifiers, vendor classification, and the canonical
//! error taxonomy.

#![warn(missing_docs)]

pub mod attr;
pub mod error;
pub mod schema;
pub mod vendor;
pub mod version;

pub use attr::{AttributeDescriptor, AttributeValues, Persistence};
pub use error::{Error, Result};
pub use schema::{LogPageSchema, MAX_FIELD_WIDTH};
pub use vendor::{title_case, Vendor, GENERIC_PAGE_THRESHOLD};
pub use version::{VersionSpec, VersionToken};

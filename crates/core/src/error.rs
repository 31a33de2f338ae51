//! Canonical error types for smartlog.
//!
//! Every failure is terminal to the current verification run — nothing here
//! is retried internally. The caller decides whether to retry the whole run.
//!
//! ## Error codes
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | SchemaNotFound | Resolution exhausted all candidate descriptors |
//! | BufferSizeMismatch | Declared page length differs from the fetched buffer |
//! | InvalidConstantField | Fixed-layout postcondition violated |
//! | AttributeMismatch | Persistence rule violated across an event |
//! | InvalidAttributeRequest | Attribute absent from the schema |
//! | Descriptor | Malformed or unusable descriptor file |
//! | Io | Filesystem failure while locating/reading descriptors |
//! | Device | External collaborator operation failed |
//! | AsyncEventMissing | No AER notification arrived when one was required |
//! | AsyncEventMismatch | AER payload field did not match the expected event |
//!
//! Each variant carries the offending identifier and the literal
//! expected/actual values, sufficient to reproduce the failure without
//! re-running.

use thiserror::Error;

/// All smartlog errors.
#[derive(Debug, Error)]
pub enum Error {
    /// No candidate descriptor's version specifier contains the requested version.
    #[error("no schema descriptor for page {page_id:#x} (vendor {vendor}, version {version})")]
    SchemaNotFound {
        /// Requested page identifier
        page_id: u16,
        /// Vendor directory that was searched
        vendor: String,
        /// Version the caller asked for
        version: String,
    },

    /// Fetched buffer length differs from the schema's declared length.
    #[error("buffer size mismatch for page {page_id:#x}: expected {expected} bytes, actual {actual} bytes")]
    BufferSizeMismatch {
        /// Page identifier
        page_id: u16,
        /// Length declared by the schema
        expected: usize,
        /// Length of the fetched buffer
        actual: usize,
    },

    /// A fixed-layout field that must hold an exact constant does not.
    #[error("{page} field {field} is {actual}, expected {expected}")]
    InvalidConstantField {
        /// Page (parser) the field belongs to
        page: &'static str,
        /// Field name
        field: &'static str,
        /// Required constant
        expected: u128,
        /// Decoded value
        actual: u128,
    },

    /// A tracked attribute changed in a way its persistence rule forbids.
    #[error("attribute {attribute} changed after {event}: before {before}, after {after}")]
    AttributeMismatch {
        /// Offending attribute name
        attribute: String,
        /// Value captured before the event
        before: u128,
        /// Value captured after the event
        after: u128,
        /// Event that triggered the change
        event: String,
    },

    /// Caller asked for an attribute the schema does not declare.
    #[error("attribute {attribute} is not declared by the schema")]
    InvalidAttributeRequest {
        /// Requested attribute name
        attribute: String,
    },

    /// Descriptor file exists but cannot be used.
    #[error("descriptor error: {0}")]
    Descriptor(String),

    /// Filesystem failure while locating or reading descriptors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An external collaborator (transport, reset, FFU, ...) failed.
    #[error("device operation failed: {0}")]
    Device(String),

    /// An async event notification was required but never arrived.
    #[error("no async event notification arrived for {event}")]
    AsyncEventMissing {
        /// SMART event that should have produced the notification
        event: String,
    },

    /// The async event payload does not describe the expected event.
    #[error("async event mismatch for {event}: {field} is {actual:#x}, expected {expected:#x}")]
    AsyncEventMismatch {
        /// SMART event being verified
        event: String,
        /// DWORD0 field that differed
        field: &'static str,
        /// Expected field value
        expected: u32,
        /// Decoded field value
        actual: u32,
    },
}

/// Result type for smartlog operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is a resolution failure.
    pub fn is_schema_not_found(&self) -> bool {
        matches!(self, Error::SchemaNotFound { .. })
    }

    /// Check if this is a persistence-rule violation.
    pub fn is_attribute_mismatch(&self) -> bool {
        matches!(self, Error::AttributeMismatch { .. })
    }

    /// Check if this is a fixed-layout postcondition violation.
    pub fn is_invalid_constant(&self) -> bool {
        matches!(self, Error::InvalidConstantField { .. })
    }
}

//! Attribute persistence verification across device lifecycle events.
//!
//! The verifier snapshots a configured attribute set before and after each
//! event of a randomized sequence and applies per-attribute comparison
//! rules, including a derived cross-attribute invariant. The device itself
//! is reached only through the [`DeviceLink`] collaborator trait.

#![warn(missing_docs)]

pub mod aer;
pub mod device;
pub mod events;
pub mod policy;
pub mod verifier;

pub use aer::{AerSession, SmartEventKind};
pub use device::{Capabilities, DeviceLink, SanitizeStatus, SANITIZE_DONE, SANITIZE_SUCCESS};
pub use events::{build_event_list, is_error_injection_build, LifecycleEvent};
pub use policy::{AttributeFault, ComparisonPolicy};
pub use verifier::{
    EventOutcome, PersistenceVerifier, Verdict, VerifierOptions, VerifyReport,
    FB_EXCEPTIONS, GENERIC_SMART_PAGE_ID, READ_ONLY_MEDIA_BIT, SMART_ATTRIBUTES,
};

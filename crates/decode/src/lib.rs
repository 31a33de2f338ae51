//! Log page decoding.
//!
//! Two decode paths share one read algorithm:
//!
//! - [`LogPageDecoder`] maps a raw buffer through a loaded
//!   [`smartlog_core::LogPageSchema`] into a typed [`LogPageInstance`].
//! - [`fixed`] holds hard-coded field maps for vendor pages that have no
//!   descriptor file, with inline postcondition checks on constant fields.

#![warn(missing_docs)]

pub mod decoder;
pub mod fixed;

pub use decoder::{read_uint_le, LogPageDecoder, LogPageInstance};

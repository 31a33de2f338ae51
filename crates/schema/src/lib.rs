//! Schema descriptor discovery and loading.
//!
//! Given a page identifier, vendor context, and version context, this crate
//! locates the one descriptor file whose version specifier covers the
//! request and loads it into a validated [`smartlog_core::LogPageSchema`].

#![warn(missing_docs)]

pub mod descriptor;
pub mod resolver;

pub use descriptor::{load_schema, parse_schema};
pub use resolver::{ResolveContext, SchemaResolver};

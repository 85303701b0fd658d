//! Tenet Core - Property types, value codec and caching primitives
//!
//! This crate provides the foundational types for the Tenet property store:
//! property metadata, validated tenant lookups, the typed value codec and
//! the single-slot TTL cache.

pub mod codec;
pub mod error;
pub mod ttl;
pub mod types;
pub mod validation;

pub use codec::{BlobMapping, Json, PropertyValue};
pub use error::{Result, TenetError};
pub use ttl::{Supplier, TtlCache};
pub use types::{Lookup, PropertyInfo, PropertyType};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

//! # Tenet Store
//!
//! Backing store resolvers, cached property handles and the property
//! registry for the Tenet property store.
//!
//! ## Features
//!
//! - `PropertyResolver` capability trait with in-memory and SQLite backends
//! - Store-backed properties wrapped by per-tenant TTL caches
//! - A registry that creates property metadata at most once and shares one
//!   cached handle per property across the process
//! - Cache hit/miss and store latency metrics via the `metrics` facade
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use tenet_core::{Lookup, PropertyType};
//! use tenet_store::{Property, PropertyProvider, SqliteResolver, StoreConfig};
//!
//! let resolver = Arc::new(SqliteResolver::open_in_memory()?);
//! let provider = PropertyProvider::new(resolver, StoreConfig::default());
//!
//! let info = provider.register_property("moderation", "auto_mod_enabled", true, PropertyType::Number)?;
//! let property = provider.get_property(&info)?;
//!
//! let tenant = Lookup::new(123456789012345678)?;
//! property.set(tenant, &true)?;
//! assert!(property.get(tenant)?.map(|m| m.as_bool()).transpose()?.unwrap_or(false));
//! # Ok::<(), tenet_core::TenetError>(())
//! ```

pub mod config;
pub mod metrics;
pub mod property;
pub mod provider;
pub mod resolver;

// Re-exports
pub use config::{StoreConfig, StoreConfigBuilder};
pub use self::metrics::CacheMetrics;
pub use property::{CachedProperty, Property, StoreProperty, TypedProperty};
pub use provider::{PropertyProvider, Registration, SharedProperty};
pub use resolver::{InMemoryResolver, PropertyResolver, SqliteResolver, StoreHealth, StoreState};

// Re-export tenet_core for consumers
pub use tenet_core;

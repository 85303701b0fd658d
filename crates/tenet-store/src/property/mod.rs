//! Property handles.
//!
//! [`StoreProperty`] talks to a resolver directly. [`CachedProperty`]
//! decorates any [`Property`] with per-tenant TTL caches, and
//! [`TypedProperty`] fixes the value type of a shared property.

mod cached;
mod store;
mod traits;
mod typed;

pub use cached::CachedProperty;
pub use store::StoreProperty;
pub use traits::Property;
pub use typed::TypedProperty;

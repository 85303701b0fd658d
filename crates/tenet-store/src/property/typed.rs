//! Typed property handle.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tenet_core::{Lookup, PropertyInfo, PropertyValue, Result};

use super::{CachedProperty, Property};

/// A shared property bound to one value type.
///
/// Decoding happens on every `get`; the underlying property keeps caching
/// the raw mapping.
pub struct TypedProperty<V, P = CachedProperty> {
    inner: Arc<P>,
    _value: PhantomData<fn() -> V>,
}

impl<V: PropertyValue, P: Property> TypedProperty<V, P> {
    pub fn new(inner: Arc<P>) -> Self {
        Self {
            inner,
            _value: PhantomData,
        }
    }

    /// Returns the metadata of the property.
    pub fn info(&self) -> &PropertyInfo {
        self.inner.info()
    }

    /// Returns the decoded value for a tenant, or `None` if nothing is stored.
    pub fn get(&self, lookup: Lookup) -> Result<Option<V>> {
        self.inner
            .get(lookup)?
            .map(|mapping| mapping.get::<V>())
            .transpose()
    }

    /// Returns the decoded value, or `default` if nothing is stored.
    pub fn get_or(&self, lookup: Lookup, default: V) -> Result<V> {
        Ok(self.get(lookup)?.unwrap_or(default))
    }

    pub fn set(&self, lookup: Lookup, value: &V) -> Result<bool> {
        self.inner.set(lookup, value)
    }

    pub fn remove(&self, lookup: Lookup) -> Result<bool> {
        self.inner.remove(lookup)
    }

    pub fn is_present(&self, lookup: Lookup) -> Result<bool> {
        self.inner.is_present(lookup)
    }

    /// Returns the untyped property.
    pub fn property(&self) -> &Arc<P> {
        &self.inner
    }
}

impl<V, P> Clone for TypedProperty<V, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _value: PhantomData,
        }
    }
}

impl<V, P: Property> fmt::Debug for TypedProperty<V, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedProperty")
            .field("info", self.inner.info())
            .field("value", &std::any::type_name::<V>())
            .finish()
    }
}

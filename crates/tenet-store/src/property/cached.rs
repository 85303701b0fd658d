//! Per-tenant caching decorator for properties.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use tenet_core::{BlobMapping, Lookup, PropertyInfo, Result, TtlCache};
use tracing::debug;

use super::{Property, StoreProperty};
use crate::config::StoreConfig;
use crate::metrics::CacheMetrics;

type TenantSlot = Arc<TtlCache<Option<BlobMapping>>>;

/// Wraps a property with one TTL cache per tenant lookup.
///
/// A tenant's slot is created on first access. Reads are served from the
/// slot until its window elapses. Writes go to the wrapped property first
/// and, only if the store accepted them, replace the slot's value without a
/// store re-read. A successful remove leaves the slot holding "absent".
/// The slot stays locked across the store write and the push, so writes to
/// one tenant land in the cache in the order they reached the store.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tenet_core::{Lookup, PropertyType};
/// use tenet_store::{CachedProperty, InMemoryResolver, Property, PropertyResolver, StoreConfig, StoreProperty};
///
/// let resolver = Arc::new(InMemoryResolver::new());
/// let info = resolver
///     .create_property_info("moderation", "auto_mod_enabled", true, PropertyType::Number)
///     .unwrap();
///
/// let property = CachedProperty::new(StoreProperty::new(info, resolver), &StoreConfig::default());
/// let tenant = Lookup::new(123456789012345678).unwrap();
///
/// assert!(property.set(tenant, &true).unwrap());
/// assert!(property.get(tenant).unwrap().unwrap().as_bool().unwrap());
/// ```
pub struct CachedProperty<P = StoreProperty> {
    inner: Arc<P>,
    ttl: Duration,
    tenants: Cache<Lookup, TenantSlot>,
    metrics: CacheMetrics,
}

impl<P: Property + 'static> CachedProperty<P> {
    /// Wraps `inner` using the TTL and tenant limits of `config`.
    pub fn new(inner: P, config: &StoreConfig) -> Self {
        let metrics = CacheMetrics::for_property(inner.info());

        let mut builder = Cache::builder().max_capacity(config.max_tenants());
        if let Some(idle) = config.tenant_idle() {
            builder = builder.time_to_idle(idle);
        }

        let eviction_metrics = metrics.clone();
        builder = builder.eviction_listener(move |_lookup, _slot, cause| {
            eviction_metrics.record_eviction(cause);
        });

        Self {
            inner: Arc::new(inner),
            ttl: config.default_ttl(),
            tenants: builder.build(),
            metrics,
        }
    }

    /// Returns the wrapped property.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Returns the TTL applied to each tenant slot.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cache counters of this property.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Drops the cached slot of one tenant.
    pub fn invalidate(&self, lookup: Lookup) {
        self.tenants.invalidate(&lookup);
    }

    /// Drops every cached tenant slot.
    pub fn clear(&self) {
        debug!(property_id = self.inner.info().id(), "Clearing tenant caches");
        self.tenants.invalidate_all();
    }

    /// Returns the number of cached tenant slots.
    ///
    /// Pending evictions are applied first, so the count is exact at the
    /// time of the call.
    pub fn cached_tenants(&self) -> u64 {
        self.tenants.run_pending_tasks();
        self.tenants.entry_count()
    }

    fn slot(&self, lookup: Lookup) -> TenantSlot {
        self.tenants.get_with(lookup, || {
            let inner = Arc::clone(&self.inner);
            let metrics = self.metrics.clone();

            Arc::new(TtlCache::new(
                self.ttl,
                Box::new(move || {
                    metrics.record_miss();
                    metrics.time_operation("get", || inner.get(lookup))
                }),
            ))
        })
    }
}

impl<P: Property + 'static> Property for CachedProperty<P> {
    fn info(&self) -> &PropertyInfo {
        self.inner.info()
    }

    fn get(&self, lookup: Lookup) -> Result<Option<BlobMapping>> {
        let slot = self.slot(lookup);

        let before = slot.last_refreshed();
        let value = slot.get()?;
        if before.is_some() && slot.last_refreshed() == before {
            self.metrics.record_hit();
        }

        Ok(value)
    }

    fn set_raw(&self, lookup: Lookup, value: &[u8]) -> Result<bool> {
        let written = self.slot(lookup).write_through(|| {
            let written = self
                .metrics
                .time_operation("put", || self.inner.set_raw(lookup, value))?;
            let mapping = written
                .then(|| Some(BlobMapping::new(self.info().property_type(), value.to_vec())));
            Ok((written, mapping))
        })?;

        if written {
            self.metrics.record_write();
            debug!(
                property_id = self.info().id(),
                %lookup,
                "Pushed written value into tenant cache"
            );
        }

        Ok(written)
    }

    fn remove(&self, lookup: Lookup) -> Result<bool> {
        self.slot(lookup).write_through(|| {
            let removed = self
                .metrics
                .time_operation("remove", || self.inner.remove(lookup))?;
            Ok((removed, Some(None)))
        })
    }

    fn is_present(&self, lookup: Lookup) -> Result<bool> {
        Ok(self.get(lookup)?.is_some())
    }
}

impl<P: Property> fmt::Debug for CachedProperty<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedProperty")
            .field("info", self.inner.info())
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

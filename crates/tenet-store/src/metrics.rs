//! Tenant cache metrics.
//!
//! Each cached property owns a [`CacheMetrics`] whose counters carry a
//! `property` label (`category/key`). Handles are resolved against the
//! recorder installed when the property is first cached; properties cached
//! before a recorder exists only keep their local counts.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use metrics::{Counter, counter, histogram};
use moka::notification::RemovalCause;
use tenet_core::PropertyInfo;

/// Describes the tenant cache metrics.
/// Call once at startup, after the recorder is installed.
pub fn register_cache_metrics() {
    metrics::describe_counter!(
        "tenet_cache_hits_total",
        "Property reads served from a tenant cache"
    );
    metrics::describe_counter!(
        "tenet_cache_misses_total",
        "Property reads that refreshed a tenant cache from the store"
    );
    metrics::describe_counter!(
        "tenet_cache_writes_total",
        "Values pushed into a tenant cache after a successful store write"
    );
    metrics::describe_counter!(
        "tenet_cache_evictions_total",
        "Tenant cache slots dropped, labelled by reason"
    );
    metrics::describe_histogram!(
        "tenet_store_operation_seconds",
        "Time spent in backing store operations"
    );
}

/// Label value for an eviction cause.
pub fn eviction_reason(cause: RemovalCause) -> &'static str {
    match cause {
        RemovalCause::Expired => "idle",
        RemovalCause::Size => "capacity",
        RemovalCause::Explicit => "manual",
        RemovalCause::Replaced => "replaced",
    }
}

#[derive(Debug)]
struct Counts {
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
}

/// Cache counters of one property. Clones share the same counts.
#[derive(Debug, Clone)]
pub struct CacheMetrics {
    property: String,
    counts: Arc<Counts>,
    hits: Counter,
    misses: Counter,
    writes: Counter,
}

impl CacheMetrics {
    pub fn for_property(info: &PropertyInfo) -> Self {
        let property = format!("{}/{}", info.category(), info.name());

        Self {
            hits: counter!("tenet_cache_hits_total", "property" => property.clone()),
            misses: counter!("tenet_cache_misses_total", "property" => property.clone()),
            writes: counter!("tenet_cache_writes_total", "property" => property.clone()),
            counts: Arc::new(Counts {
                hits: AtomicU64::new(0),
                misses: AtomicU64::new(0),
                writes: AtomicU64::new(0),
            }),
            property,
        }
    }

    /// A read answered without touching the store.
    pub fn record_hit(&self) {
        self.counts.hits.fetch_add(1, Ordering::Relaxed);
        self.hits.increment(1);
    }

    /// A read that refreshed a tenant slot from the store.
    pub fn record_miss(&self) {
        self.counts.misses.fetch_add(1, Ordering::Relaxed);
        self.misses.increment(1);
    }

    /// A successful write pushed into a tenant slot.
    pub fn record_write(&self) {
        self.counts.writes.fetch_add(1, Ordering::Relaxed);
        self.writes.increment(1);
    }

    pub fn record_eviction(&self, cause: RemovalCause) {
        counter!(
            "tenet_cache_evictions_total",
            "property" => self.property.clone(),
            "reason" => eviction_reason(cause)
        )
        .increment(1);
    }

    /// Runs a store operation and records its latency.
    pub fn time_operation<T, F: FnOnce() -> T>(&self, operation: &'static str, f: F) -> T {
        let start = Instant::now();
        let result = f();
        histogram!("tenet_store_operation_seconds", "operation" => operation)
            .record(start.elapsed().as_secs_f64());
        result
    }

    /// Fraction of reads served from cache, 0 before any read.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    pub fn hits(&self) -> u64 {
        self.counts.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.counts.misses.load(Ordering::Relaxed)
    }

    pub fn writes(&self) -> u64 {
        self.counts.writes.load(Ordering::Relaxed)
    }
}

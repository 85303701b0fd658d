//! Shared resolver doubles for store integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use tenet_core::{Lookup, PropertyInfo, PropertyType, Result};
use tenet_store::{InMemoryResolver, PropertyResolver};

pub const TENANT: u64 = 123456789012345678;

pub fn tenant() -> Lookup {
    Lookup::new(TENANT).unwrap()
}

/// In-memory resolver that counts every call and can forbid value reads.
#[derive(Debug, Default)]
pub struct CountingResolver {
    inner: InMemoryResolver,
    creates: AtomicUsize,
    lookups: AtomicUsize,
    reads: AtomicUsize,
    writes: AtomicUsize,
    forbid_reads: AtomicBool,
    create_delay: Option<Duration>,
}

impl CountingResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleeps inside `create_property_info` to widen race windows.
    pub fn with_create_delay(delay: Duration) -> Self {
        Self {
            create_delay: Some(delay),
            ..Self::default()
        }
    }

    /// Makes any later `get_internal` call fail the test.
    pub fn forbid_reads(&self) {
        self.forbid_reads.store(true, Ordering::SeqCst);
    }

    pub fn set_ready(&self, ready: bool) {
        self.inner.set_ready(ready);
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    /// Metadata queries of any kind.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Total number of calls that reached this resolver.
    pub fn total_calls(&self) -> usize {
        self.creates() + self.lookups() + self.reads() + self.writes()
    }
}

impl PropertyResolver for CountingResolver {
    fn name(&self) -> &str {
        "counting"
    }

    fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    fn create_property_info(
        &self,
        category: &str,
        key: &str,
        modifiable: bool,
        property_type: PropertyType,
    ) -> Result<PropertyInfo> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.create_delay {
            std::thread::sleep(delay);
        }
        self.inner
            .create_property_info(category, key, modifiable, property_type)
    }

    fn get_property_info(&self, category: &str, key: &str) -> Result<PropertyInfo> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get_property_info(category, key)
    }

    fn is_registered(&self, category: &str, key: &str) -> Result<bool> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.is_registered(category, key)
    }

    fn get_property_by_id(&self, id: i32) -> Result<PropertyInfo> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get_property_by_id(id)
    }

    fn get_property_list(&self) -> Result<Vec<PropertyInfo>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get_property_list()
    }

    fn get_internal(&self, lookup: Lookup, info: &PropertyInfo) -> Result<Option<Vec<u8>>> {
        assert!(
            !self.forbid_reads.load(Ordering::SeqCst),
            "store read for {} of tenant {} was not expected",
            info,
            lookup
        );
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_internal(lookup, info)
    }

    fn put_internal(&self, lookup: Lookup, info: &PropertyInfo, value: &[u8]) -> Result<bool> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.put_internal(lookup, info, value)
    }

    fn remove_internal(&self, lookup: Lookup, info: &PropertyInfo) -> Result<bool> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.remove_internal(lookup, info)
    }

    fn is_present(&self, lookup: Lookup, info: &PropertyInfo) -> Result<bool> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.is_present(lookup, info)
    }
}

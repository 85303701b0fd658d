//! In-process property resolver.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use parking_lot::RwLock;
use tenet_core::{Lookup, PropertyInfo, PropertyType, Result, TenetError};
use tracing::debug;

use super::PropertyResolver;

/// A resolver that keeps metadata and values in process memory.
///
/// Ids are assigned sequentially from 1. The resolver starts ready; tests
/// use [`set_ready`](Self::set_ready) to simulate a store that has not been
/// initialized yet.
#[derive(Debug)]
pub struct InMemoryResolver {
    ready: AtomicBool,
    next_id: AtomicI32,
    by_id: RwLock<BTreeMap<i32, PropertyInfo>>,
    by_name: RwLock<HashMap<(String, String), i32>>,
    values: RwLock<HashMap<(i32, Lookup), Vec<u8>>>,
}

impl InMemoryResolver {
    /// Creates an empty, ready resolver.
    pub fn new() -> Self {
        Self {
            ready: AtomicBool::new(true),
            next_id: AtomicI32::new(1),
            by_id: RwLock::new(BTreeMap::new()),
            by_name: RwLock::new(HashMap::new()),
            values: RwLock::new(HashMap::new()),
        }
    }

    /// Switches readiness on or off.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Returns the number of stored values across all properties.
    pub fn value_count(&self) -> usize {
        self.values.read().len()
    }
}

impl Default for InMemoryResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyResolver for InMemoryResolver {
    fn name(&self) -> &str {
        "memory"
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn create_property_info(
        &self,
        category: &str,
        key: &str,
        modifiable: bool,
        property_type: PropertyType,
    ) -> Result<PropertyInfo> {
        self.check_ready()?;

        let mut by_name = self.by_name.write();
        let name_key = (category.to_string(), key.to_string());
        if by_name.contains_key(&name_key) {
            return Err(TenetError::already_registered(category, key));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let info = PropertyInfo::new(id, category, key, modifiable, property_type)?;

        by_name.insert(name_key, id);
        self.by_id.write().insert(id, info.clone());

        debug!(property_id = id, category, key, "Created property metadata");
        Ok(info)
    }

    fn get_property_info(&self, category: &str, key: &str) -> Result<PropertyInfo> {
        self.check_ready()?;

        let id = self
            .by_name
            .read()
            .get(&(category.to_string(), key.to_string()))
            .copied()
            .ok_or_else(|| TenetError::not_found(format!("{}/{}", category, key)))?;

        self.get_property_by_id(id)
    }

    fn is_registered(&self, category: &str, key: &str) -> Result<bool> {
        self.check_ready()?;
        Ok(self
            .by_name
            .read()
            .contains_key(&(category.to_string(), key.to_string())))
    }

    fn get_property_by_id(&self, id: i32) -> Result<PropertyInfo> {
        self.check_ready()?;
        self.by_id
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| TenetError::not_found(format!("property id {}", id)))
    }

    fn get_property_list(&self) -> Result<Vec<PropertyInfo>> {
        self.check_ready()?;
        Ok(self.by_id.read().values().cloned().collect())
    }

    fn get_internal(&self, lookup: Lookup, info: &PropertyInfo) -> Result<Option<Vec<u8>>> {
        self.check_ready()?;
        Ok(self.values.read().get(&(info.id(), lookup)).cloned())
    }

    fn put_internal(&self, lookup: Lookup, info: &PropertyInfo, value: &[u8]) -> Result<bool> {
        self.check_ready()?;
        if !self.by_id.read().contains_key(&info.id()) {
            return Err(TenetError::not_found(info.to_string()));
        }

        self.values
            .write()
            .insert((info.id(), lookup), value.to_vec());
        Ok(true)
    }

    fn remove_internal(&self, lookup: Lookup, info: &PropertyInfo) -> Result<bool> {
        self.check_ready()?;
        Ok(self.values.write().remove(&(info.id(), lookup)).is_some())
    }

    fn is_present(&self, lookup: Lookup, info: &PropertyInfo) -> Result<bool> {
        self.check_ready()?;
        Ok(self.values.read().contains_key(&(info.id(), lookup)))
    }
}

//! Property registry.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tenet_core::validation::{validate_category, validate_key};
use tenet_core::{PropertyInfo, PropertyType, PropertyValue, Result, TenetError};
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::property::{CachedProperty, StoreProperty, TypedProperty};
use crate::resolver::PropertyResolver;

/// A cached property shared by every caller in the process.
pub type SharedProperty = Arc<CachedProperty<StoreProperty>>;

type NameKey = (String, String);

/// Outcome of [`PropertyProvider::register`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub info: PropertyInfo,
    /// True only for the call that created the metadata in the store.
    pub created: bool,
}

/// Registry that interns property metadata and cached property handles.
///
/// Registration of a `(category, key)` pair creates its metadata at most
/// once per process, even when the resolver checks and creates in two
/// separate calls. Handles are interned by property id, so every caller of
/// `get_property*` for the same property shares one cache.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tenet_core::{Lookup, PropertyType};
/// use tenet_store::{InMemoryResolver, Property, PropertyProvider, StoreConfig};
///
/// let provider = PropertyProvider::new(Arc::new(InMemoryResolver::new()), StoreConfig::default());
/// let info = provider
///     .register_property("moderation", "auto_mod_enabled", true, PropertyType::Number)
///     .unwrap();
///
/// let property = provider.get_property(&info).unwrap();
/// let tenant = Lookup::new(123456789012345678).unwrap();
/// assert!(property.set(tenant, &true).unwrap());
/// ```
pub struct PropertyProvider {
    resolver: Arc<dyn PropertyResolver>,
    config: StoreConfig,
    /// Metadata known to this process, by `(category, key)`.
    registrations: DashMap<NameKey, PropertyInfo>,
    /// Interned handles, by property id.
    properties: DashMap<i32, SharedProperty>,
}

impl PropertyProvider {
    pub fn new(resolver: Arc<dyn PropertyResolver>, config: StoreConfig) -> Self {
        Self {
            resolver,
            config,
            registrations: DashMap::new(),
            properties: DashMap::new(),
        }
    }

    /// Returns the resolver behind this provider.
    pub fn resolver(&self) -> &Arc<dyn PropertyResolver> {
        &self.resolver
    }

    /// Returns the configuration applied to new handles.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Registers a property, creating its metadata if it does not exist yet.
    ///
    /// If the pair is already registered the existing metadata is returned
    /// unchanged, even when `modifiable` or `property_type` differ.
    ///
    /// # Errors
    ///
    /// - `TenetError::Validation` if the category or key is malformed
    /// - `TenetError::StoreUnavailable` if the resolver is not ready
    pub fn register_property(
        &self,
        category: &str,
        key: &str,
        modifiable: bool,
        property_type: PropertyType,
    ) -> Result<PropertyInfo> {
        self.register(category, key, modifiable, property_type)
            .map(|registration| registration.info)
    }

    /// Like [`register_property`](Self::register_property), and also reports
    /// whether this call created the metadata.
    ///
    /// Among concurrent callers in this process at most one sees
    /// `created == true`. A pair created by another process reports `false`.
    pub fn register(
        &self,
        category: &str,
        key: &str,
        modifiable: bool,
        property_type: PropertyType,
    ) -> Result<Registration> {
        validate_category(category)?;
        validate_key(key)?;
        self.resolver.check_ready()?;

        // The vacant entry keeps its shard locked while the resolver is
        // consulted, so concurrent registrations of one pair wait here.
        let registration = match self
            .registrations
            .entry((category.to_string(), key.to_string()))
        {
            Entry::Occupied(entry) => Registration {
                info: entry.get().clone(),
                created: false,
            },
            Entry::Vacant(entry) => {
                let registration =
                    self.resolve_or_create(category, key, modifiable, property_type)?;
                entry.insert(registration.info.clone());
                registration
            },
        };

        let info = &registration.info;
        if info.is_modifiable() != modifiable || info.property_type() != property_type {
            warn!(
                category,
                key,
                registered_type = %info.property_type(),
                requested_type = %property_type,
                registered_modifiable = info.is_modifiable(),
                requested_modifiable = modifiable,
                "Property already registered with different attributes"
            );
        }

        Ok(registration)
    }

    fn resolve_or_create(
        &self,
        category: &str,
        key: &str,
        modifiable: bool,
        property_type: PropertyType,
    ) -> Result<Registration> {
        let existing = |info: PropertyInfo| Registration {
            info,
            created: false,
        };

        if self.resolver.is_registered(category, key)? {
            debug!(category, key, "Property metadata found in store");
            return self.resolver.get_property_info(category, key).map(existing);
        }

        match self
            .resolver
            .create_property_info(category, key, modifiable, property_type)
        {
            Ok(info) => {
                info!(
                    property_id = info.id(),
                    category,
                    key,
                    property_type = %property_type,
                    "Registered property"
                );
                Ok(Registration {
                    info,
                    created: true,
                })
            },
            // Another process created it between the check and the insert.
            Err(e) if e.is_already_registered() => {
                self.resolver.get_property_info(category, key).map(existing)
            },
            Err(e) => Err(e),
        }
    }

    /// Returns the shared handle for a property, creating it on first use.
    pub fn get_property(&self, info: &PropertyInfo) -> Result<SharedProperty> {
        let property = self
            .properties
            .entry(info.id())
            .or_insert_with(|| {
                debug!(property_id = info.id(), "Creating cached property handle");
                Arc::new(CachedProperty::new(
                    StoreProperty::new(info.clone(), Arc::clone(&self.resolver)),
                    &self.config,
                ))
            })
            .value()
            .clone();

        self.registrations
            .entry((info.category().to_string(), info.name().to_string()))
            .or_insert_with(|| info.clone());

        Ok(property)
    }

    /// Returns the shared handle for a registered `(category, key)` pair.
    ///
    /// # Errors
    ///
    /// - `TenetError::Validation` if the category or key is malformed
    /// - `TenetError::NotFound` if the pair is not registered
    pub fn get_property_by_name(&self, category: &str, key: &str) -> Result<SharedProperty> {
        validate_category(category)?;
        validate_key(key)?;

        let known = self
            .registrations
            .get(&(category.to_string(), key.to_string()))
            .map(|entry| entry.value().clone());

        let info = match known {
            Some(info) => info,
            None => {
                self.resolver.check_ready()?;
                self.resolver.get_property_info(category, key)?
            },
        };

        self.get_property(&info)
    }

    /// Returns the shared handle for a property id.
    ///
    /// # Errors
    ///
    /// - `TenetError::NotFound` if no property has that id
    pub fn get_property_by_id(&self, id: i32) -> Result<SharedProperty> {
        if let Some(property) = self.properties.get(&id) {
            return Ok(property.value().clone());
        }

        self.resolver.check_ready()?;
        let info = self.resolver.get_property_by_id(id)?;
        self.get_property(&info)
    }

    /// Returns a typed handle for a registered `(category, key)` pair.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use tenet_core::{Lookup, PropertyType};
    /// use tenet_store::{InMemoryResolver, PropertyProvider, StoreConfig};
    ///
    /// let provider = PropertyProvider::new(Arc::new(InMemoryResolver::new()), StoreConfig::default());
    /// provider
    ///     .register_property("moderation", "max_mentions", true, PropertyType::Number)
    ///     .unwrap();
    ///
    /// let limit = provider.typed::<i32>("moderation", "max_mentions").unwrap();
    /// let tenant = Lookup::new(123456789012345678).unwrap();
    /// limit.set(tenant, &5).unwrap();
    /// assert_eq!(limit.get(tenant).unwrap(), Some(5));
    /// ```
    pub fn typed<V: PropertyValue>(&self, category: &str, key: &str) -> Result<TypedProperty<V>> {
        Ok(TypedProperty::new(self.get_property_by_name(category, key)?))
    }

    /// Returns the metadata of every registered property.
    pub fn list_properties(&self) -> Result<Vec<PropertyInfo>> {
        self.resolver.check_ready()?;
        self.resolver.get_property_list()
    }

    /// Drops every cached tenant value of every live property.
    pub fn clear_caches(&self) {
        for property in self.properties.iter() {
            property.value().clear();
        }
        info!(properties = self.properties.len(), "Cleared property caches");
    }

    /// Returns the number of live property handles.
    pub fn live_properties(&self) -> usize {
        self.properties.len()
    }

    /// Returns an error if the resolver is not ready.
    pub fn check_ready(&self) -> Result<()> {
        self.resolver.check_ready()
    }

    /// Returns whether the resolver can serve requests.
    pub fn is_ready(&self) -> bool {
        self.resolver.is_ready()
    }
}

impl std::fmt::Debug for PropertyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyProvider")
            .field("resolver", &self.resolver.name())
            .field("registrations", &self.registrations.len())
            .field("properties", &self.properties.len())
            .finish()
    }
}

impl From<Arc<dyn PropertyResolver>> for PropertyProvider {
    fn from(resolver: Arc<dyn PropertyResolver>) -> Self {
        Self::new(resolver, StoreConfig::default())
    }
}

//! Property resolver trait definition.

use tenet_core::{Lookup, PropertyInfo, PropertyType, Result, TenetError};

use super::StoreHealth;

/// Capability interface to a backing store of properties.
///
/// A resolver owns two things: the metadata of registered properties and the
/// raw value bytes stored per property and tenant lookup. It knows nothing
/// about encoding or caching; those live in the property layer.
///
/// Every call may block on I/O. Callers check [`check_ready`] before
/// dispatching so that an uninitialized store surfaces as
/// [`TenetError::StoreUnavailable`] instead of a store-specific failure.
///
/// # Implementors
///
/// - `InMemoryResolver` - Keeps everything in process memory
/// - `SqliteResolver` - Persists to a SQLite database
///
/// # Example
///
/// ```
/// use tenet_core::{Lookup, PropertyType};
/// use tenet_store::{InMemoryResolver, PropertyResolver};
///
/// let resolver = InMemoryResolver::new();
/// let info = resolver
///     .create_property_info("moderation", "auto_mod_enabled", true, PropertyType::Number)
///     .unwrap();
///
/// let tenant = Lookup::new(123456789012345678).unwrap();
/// assert!(resolver.put_internal(tenant, &info, &[1]).unwrap());
/// assert_eq!(resolver.get_internal(tenant, &info).unwrap(), Some(vec![1]));
/// ```
///
/// [`check_ready`]: PropertyResolver::check_ready
pub trait PropertyResolver: Send + Sync {
    /// Returns the name of this resolver, used in logs and errors.
    fn name(&self) -> &str;

    /// Returns whether the backing store can serve requests.
    fn is_ready(&self) -> bool;

    /// Fails with `StoreUnavailable` if the backing store is not ready.
    fn check_ready(&self) -> Result<()> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(TenetError::unavailable(format!(
                "{} has not been initialized",
                self.name()
            )))
        }
    }

    /// Returns the last error observed by the store, if it tracks one.
    fn last_error(&self) -> Option<String> {
        None
    }

    /// Returns the health of the backing store.
    ///
    /// The default derives it from [`is_ready`] and [`last_error`]; stores
    /// that count consecutive failures report them by overriding this.
    ///
    /// [`is_ready`]: PropertyResolver::is_ready
    /// [`last_error`]: PropertyResolver::last_error
    fn health(&self) -> StoreHealth {
        if !self.is_ready() {
            return StoreHealth::Uninitialized;
        }
        match self.last_error() {
            None => StoreHealth::Ready,
            Some(last_error) => StoreHealth::Degraded {
                last_error,
                failures: 1,
            },
        }
    }

    /// Creates metadata for a new property.
    ///
    /// # Errors
    ///
    /// - `TenetError::AlreadyRegistered` if `(category, key)` already exists
    fn create_property_info(
        &self,
        category: &str,
        key: &str,
        modifiable: bool,
        property_type: PropertyType,
    ) -> Result<PropertyInfo>;

    /// Returns the metadata registered under `(category, key)`.
    ///
    /// # Errors
    ///
    /// - `TenetError::NotFound` if nothing is registered under that pair
    fn get_property_info(&self, category: &str, key: &str) -> Result<PropertyInfo>;

    /// Returns whether `(category, key)` is registered.
    fn is_registered(&self, category: &str, key: &str) -> Result<bool>;

    /// Returns the metadata with the given store id.
    ///
    /// # Errors
    ///
    /// - `TenetError::NotFound` if no property has that id
    fn get_property_by_id(&self, id: i32) -> Result<PropertyInfo>;

    /// Returns the metadata of every registered property, ordered by id.
    fn get_property_list(&self) -> Result<Vec<PropertyInfo>>;

    /// Reads the raw value of a property for a tenant.
    ///
    /// `None` means no value is stored, which is distinct from an empty value.
    fn get_internal(&self, lookup: Lookup, info: &PropertyInfo) -> Result<Option<Vec<u8>>>;

    /// Writes the raw value of a property for a tenant.
    ///
    /// Returns true iff a row was created or updated.
    fn put_internal(&self, lookup: Lookup, info: &PropertyInfo, value: &[u8]) -> Result<bool>;

    /// Deletes the raw value of a property for a tenant.
    ///
    /// Returns true iff a row was deleted.
    fn remove_internal(&self, lookup: Lookup, info: &PropertyInfo) -> Result<bool>;

    /// Returns whether a value is stored for a tenant.
    fn is_present(&self, lookup: Lookup, info: &PropertyInfo) -> Result<bool>;
}

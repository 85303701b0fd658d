//! Property capability trait.

use tenet_core::{BlobMapping, Lookup, PropertyInfo, PropertyValue, Result};

/// A handle bound to one registered property.
///
/// Every operation is scoped by a tenant lookup. Implementations may block
/// on the backing store.
pub trait Property: Send + Sync {
    /// Returns the metadata this handle is bound to.
    fn info(&self) -> &PropertyInfo;

    /// Returns the stored value for a tenant, or `None` if nothing is stored.
    fn get(&self, lookup: Lookup) -> Result<Option<BlobMapping>>;

    /// Stores already encoded bytes for a tenant.
    ///
    /// Returns true iff the store created or updated a value.
    fn set_raw(&self, lookup: Lookup, value: &[u8]) -> Result<bool>;

    /// Deletes the value stored for a tenant.
    ///
    /// Returns true iff a value was deleted.
    fn remove(&self, lookup: Lookup) -> Result<bool>;

    /// Returns whether a value is stored for a tenant.
    fn is_present(&self, lookup: Lookup) -> Result<bool>;

    /// Encodes `value` with the declared type of the property and stores it.
    fn set<V: PropertyValue>(&self, lookup: Lookup, value: &V) -> Result<bool>
    where
        Self: Sized,
    {
        let bytes = value.encode(self.info().property_type())?;
        self.set_raw(lookup, &bytes)
    }
}

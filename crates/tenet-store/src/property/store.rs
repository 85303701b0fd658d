//! Store-backed property.

use std::fmt;
use std::sync::Arc;

use tenet_core::{BlobMapping, Lookup, PropertyInfo, Result};
use tracing::trace;

use super::Property;
use crate::resolver::PropertyResolver;

/// A property that reads and writes straight through its resolver.
#[derive(Clone)]
pub struct StoreProperty {
    info: PropertyInfo,
    resolver: Arc<dyn PropertyResolver>,
}

impl StoreProperty {
    pub fn new(info: PropertyInfo, resolver: Arc<dyn PropertyResolver>) -> Self {
        Self { info, resolver }
    }

    /// Returns the resolver this property dispatches to.
    pub fn resolver(&self) -> &Arc<dyn PropertyResolver> {
        &self.resolver
    }
}

impl Property for StoreProperty {
    fn info(&self) -> &PropertyInfo {
        &self.info
    }

    fn get(&self, lookup: Lookup) -> Result<Option<BlobMapping>> {
        self.resolver.check_ready()?;
        trace!(property_id = self.info.id(), %lookup, "Reading value from store");

        let bytes = self.resolver.get_internal(lookup, &self.info)?;
        Ok(bytes.map(|b| BlobMapping::new(self.info.property_type(), b)))
    }

    fn set_raw(&self, lookup: Lookup, value: &[u8]) -> Result<bool> {
        self.resolver.check_ready()?;
        trace!(
            property_id = self.info.id(),
            %lookup,
            len = value.len(),
            "Writing value to store"
        );

        self.resolver.put_internal(lookup, &self.info, value)
    }

    fn remove(&self, lookup: Lookup) -> Result<bool> {
        self.resolver.check_ready()?;
        self.resolver.remove_internal(lookup, &self.info)
    }

    fn is_present(&self, lookup: Lookup) -> Result<bool> {
        self.resolver.check_ready()?;
        self.resolver.is_present(lookup, &self.info)
    }
}

impl fmt::Debug for StoreProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreProperty")
            .field("info", &self.info)
            .field("resolver", &self.resolver.name())
            .finish()
    }
}

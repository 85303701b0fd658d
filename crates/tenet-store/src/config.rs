//! Property store configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for cached properties created by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// How long a tenant's cached value is trusted before re-reading the store.
    #[serde(default = "default_ttl", with = "duration_secs")]
    default_ttl: Duration,

    /// Maximum number of tenant cache slots kept per property.
    #[serde(default = "default_max_tenants")]
    max_tenants: u64,

    /// Idle time after which a tenant's cache slot is dropped.
    #[serde(default, with = "option_duration_secs")]
    tenant_idle: Option<Duration>,
}

fn default_ttl() -> Duration {
    Duration::from_secs(60)
}

fn default_max_tenants() -> u64 {
    100_000
}

impl StoreConfig {
    /// Creates a new builder for StoreConfig.
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }

    /// Returns the cache window for tenant values.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Returns the tenant slot capacity per property.
    pub fn max_tenants(&self) -> u64 {
        self.max_tenants
    }

    /// Returns the idle expiry of tenant slots, if any.
    pub fn tenant_idle(&self) -> Option<Duration> {
        self.tenant_idle
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_ttl: default_ttl(),
            max_tenants: default_max_tenants(),
            tenant_idle: None,
        }
    }
}

/// Builder for StoreConfig.
#[derive(Debug, Default)]
pub struct StoreConfigBuilder {
    default_ttl: Option<Duration>,
    max_tenants: Option<u64>,
    tenant_idle: Option<Duration>,
}

impl StoreConfigBuilder {
    /// Sets the cache window.
    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Sets the tenant slot capacity per property.
    pub fn max_tenants(mut self, max: u64) -> Self {
        self.max_tenants = Some(max);
        self
    }

    /// Sets the idle expiry of tenant slots.
    pub fn tenant_idle(mut self, idle: Duration) -> Self {
        self.tenant_idle = Some(idle);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the tenant capacity is zero.
    pub fn build(self) -> Result<StoreConfig, &'static str> {
        let max_tenants = self.max_tenants.unwrap_or_else(default_max_tenants);
        if max_tenants == 0 {
            return Err("max_tenants must be greater than zero");
        }

        Ok(StoreConfig {
            default_ttl: self.default_ttl.unwrap_or_else(default_ttl),
            max_tenants,
            tenant_idle: self.tenant_idle,
        })
    }
}


mod duration_secs {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

mod option_duration_secs {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
    }
}

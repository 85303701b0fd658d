//! Server settings.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tenet_store::StoreConfig;

/// Settings for the `tenet-server` binary.
///
/// Loaded from an optional `tenet.toml` file, then `TENET_*` environment
/// variables (e.g. `TENET_PORT=9000`), which take precedence.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Interface to bind.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// SQLite database file.
    pub database_path: PathBuf,
    /// Cache window of tenant values, in seconds.
    pub cache_ttl_seconds: u64,
    /// Maximum cached tenants per property.
    pub cache_max_tenants: u64,
}

impl Settings {
    /// Loads settings from `tenet.toml` in the working directory and the
    /// environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("tenet.toml"))
    }

    /// Loads settings from the given file, if it exists, and the environment.
    pub fn load_from(file: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("database_path", "tenet.db")?
            .set_default("cache_ttl_seconds", 60)?
            .set_default("cache_max_tenants", 100_000)?
            .add_source(File::from(file).required(false))
            .add_source(Environment::with_prefix("TENET").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// Returns the cache configuration for the property provider.
    pub fn store_config(&self) -> Result<StoreConfig, &'static str> {
        StoreConfig::builder()
            .default_ttl(Duration::from_secs(self.cache_ttl_seconds))
            .max_tenants(self.cache_max_tenants)
            .build()
    }
}

//! Application state.

use std::sync::Arc;

use tenet_core::Result;
use tenet_store::{PropertyProvider, PropertyResolver, StoreConfig};
use tokio::task;

use crate::error::AppError;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The property registry.
    provider: Arc<PropertyProvider>,
}

impl AppState {
    /// Creates a new AppState with the given provider.
    pub fn new(provider: Arc<PropertyProvider>) -> Self {
        Self { provider }
    }

    /// Creates an AppState over a resolver.
    pub fn from_resolver(resolver: Arc<dyn PropertyResolver>, config: StoreConfig) -> Self {
        Self {
            provider: Arc::new(PropertyProvider::new(resolver, config)),
        }
    }

    /// Returns a reference to the provider.
    pub fn provider(&self) -> &PropertyProvider {
        self.provider.as_ref()
    }

    /// Runs a provider operation on the blocking thread pool.
    ///
    /// Store access may block on I/O, so handlers never call the provider
    /// from an async task directly.
    pub async fn blocking<T, F>(&self, f: F) -> std::result::Result<T, AppError>
    where
        F: FnOnce(&PropertyProvider) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let provider = Arc::clone(&self.provider);
        task::spawn_blocking(move || f(&provider))
            .await
            .map_err(|e| AppError::Internal(format!("store task failed: {}", e)))?
            .map_err(AppError::from)
    }
}

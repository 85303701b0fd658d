//! HTTP administration surface for the Tenet property store.
//!
//! Exposes property registration, per-tenant value reads and writes, cache
//! invalidation, health and Prometheus metrics over axum.

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod settings;
pub mod state;
pub mod value;

pub use error::AppError;
pub use handlers::HealthResponse;
pub use server::{create_router, run_server};
pub use settings::Settings;
pub use state::AppState;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

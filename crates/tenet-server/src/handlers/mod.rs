//! HTTP handlers.

pub mod cache;
pub mod health;
pub mod metrics;
pub mod properties;

pub use health::HealthResponse;
pub use properties::END_USER_HEADER;

//! Metrics for the property server.
//!
//! Cache and store metrics are emitted by `tenet-store`; this module adds
//! the HTTP layer and the Prometheus recorder.

pub mod http;
pub mod setup;

pub use setup::{detached_handle, init_metrics};

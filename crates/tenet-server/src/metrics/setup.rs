//! Metrics setup and initialization.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::info;

use super::http::register_http_metrics;

/// Histogram buckets in seconds, from 100us to 10s.
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

fn builder() -> Result<PrometheusBuilder, BuildError> {
    PrometheusBuilder::new().set_buckets(LATENCY_BUCKETS)
}

/// Installs the global Prometheus recorder and returns the handle that
/// renders it.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = builder()?.install_recorder()?;

    tenet_store::metrics::register_cache_metrics();
    register_http_metrics();
    metrics::describe_gauge!(
        "tenet_live_properties",
        "Properties with a live cached handle in this process"
    );
    metrics::describe_gauge!("tenet_store_ready", "1 when the backing store is ready");

    info!("Metrics system initialized");
    Ok(handle)
}

/// Builds a recorder without installing it globally.
///
/// The returned handle renders an empty exposition; it lets routers be
/// built in tests without fighting over the process-wide recorder.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}

//! Metrics endpoint handler.

use axum::{extract::State, response::IntoResponse};
use metrics::gauge;
use metrics_exporter_prometheus::PrometheusHandle;

use crate::state::AppState;

/// State of the metrics route: the recorder handle plus the application
/// state sampled at scrape time.
#[derive(Clone)]
pub struct MetricsState {
    pub prometheus: PrometheusHandle,
    pub app: AppState,
}

/// GET /metrics
/// Samples registry gauges, then renders the Prometheus exposition text.
pub async fn metrics_handler(State(state): State<MetricsState>) -> impl IntoResponse {
    let provider = state.app.provider();

    gauge!("tenet_live_properties").set(provider.live_properties() as f64);
    gauge!("tenet_store_ready").set(if provider.is_ready() { 1.0 } else { 0.0 });

    state.prometheus.render()
}

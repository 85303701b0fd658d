use std::net::SocketAddr;

use axum::{
    Router, middleware,
    routing::{delete, get},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;

use crate::handlers::{
    cache::clear_caches,
    health::health_check,
    metrics::{MetricsState, metrics_handler},
    properties::{delete_value, get_value, list_properties, put_value, register_property},
};
use crate::metrics::http::http_metrics_middleware;
use crate::middleware::{LoggingLayer, RequestIdLayer};
use crate::state::AppState;

/// Creates the router with the given application state and metrics handle.
pub fn create_router(state: AppState, prometheus_handle: PrometheusHandle) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(RequestIdLayer)
        .layer(LoggingLayer);

    // The metrics endpoint carries its own state.
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(MetricsState {
            prometheus: prometheus_handle,
            app: state.clone(),
        });

    let app_router = Router::new()
        .route("/health", get(health_check))
        .route(
            "/properties",
            get(list_properties).post(register_property),
        )
        .route(
            "/properties/{category}/{key}/{lookup}",
            get(get_value).put(put_value).delete(delete_value),
        )
        .route("/cache", delete(clear_caches))
        .with_state(state);

    Router::new()
        .merge(app_router)
        .merge(metrics_router)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware_stack)
}

/// Binds `addr` and serves until a shutdown signal arrives.
pub async fn run_server(
    addr: SocketAddr,
    state: AppState,
    prometheus_handle: PrometheusHandle,
) -> Result<(), std::io::Error> {
    let app = create_router(state, prometheus_handle);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

//! Structured request logging.

use axum::{
    body::Body,
    http::{Request, Response},
};
use std::{
    task::{Context, Poll},
    time::{Duration, Instant},
};
use tower::{Layer, Service};
use tracing::{Instrument, debug, info, info_span, warn};

use super::request_id::REQUEST_ID_HEADER;

/// Requests slower than this are logged at `warn` even when they succeed.
const SLOW_REQUEST: Duration = Duration::from_millis(500);

/// Layer that logs requests and responses.
#[derive(Clone, Default)]
pub struct LoggingLayer;

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingMiddleware { inner }
    }
}

/// Middleware that logs request/response details inside a request span.
#[derive(Clone)]
pub struct LoggingMiddleware<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for LoggingMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let start = Instant::now();

        // Set by RequestIdMiddleware when it runs first.
        let request_id = request
            .headers()
            .get(&REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        let span = info_span!(
            "http_request",
            request_id = %request_id,
            method = %request.method(),
            path = %request.uri().path(),
        );

        let mut inner = self.inner.clone();

        Box::pin(
            async move {
                debug!("Request started");

                let response = inner.call(request).await?;

                let status = response.status();
                let elapsed = start.elapsed();
                let duration_ms = elapsed.as_millis() as u64;

                if status.is_server_error() {
                    warn!(status = status.as_u16(), duration_ms, "Request failed");
                } else if elapsed >= SLOW_REQUEST {
                    warn!(status = status.as_u16(), duration_ms, "Slow request");
                } else {
                    info!(status = status.as_u16(), duration_ms, "Request completed");
                }

                Ok(response)
            }
            .instrument(span),
        )
    }
}

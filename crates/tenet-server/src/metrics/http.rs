//! HTTP metrics middleware.

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};
use metrics::{counter, histogram};
use std::time::Instant;

/// Records request count and latency for each request.
///
/// Paths are labelled by their matched route template and statuses by
/// class, so tenant ids never reach a label value.
pub async fn http_metrics_middleware(
    matched_path: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = matched_path
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    let status = status_class(response.status().as_u16());
    let duration = start.elapsed();

    counter!(
        "tenet_http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);

    histogram!(
        "tenet_http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(duration.as_secs_f64());

    response
}

fn status_class(status: u16) -> &'static str {
    match status {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    }
}

pub fn register_http_metrics() {
    metrics::describe_counter!("tenet_http_requests_total", "Total number of HTTP requests");
    metrics::describe_histogram!(
        "tenet_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_class() {
        assert_eq!(status_class(201), "2xx");
        assert_eq!(status_class(403), "4xx");
        assert_eq!(status_class(503), "5xx");
    }
}

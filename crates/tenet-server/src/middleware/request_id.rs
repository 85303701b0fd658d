//! Middleware that generates or propagates X-Request-Id.

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request, Response},
};
use std::task::{Context, Poll};
use tower::{Layer, Service};
use uuid::Uuid;

/// Header name for request ID.
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

const MAX_REQUEST_ID_LEN: usize = 128;

/// Layer that adds request ID to requests and responses.
#[derive(Clone, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdMiddleware { inner }
    }
}

/// Middleware that ensures every request has a unique ID.
#[derive(Clone)]
pub struct RequestIdMiddleware<S> {
    inner: S,
}

/// Accepts a caller-supplied id only when it is short printable ASCII.
fn accept_incoming(value: &HeaderValue) -> Option<HeaderValue> {
    let id = value.to_str().ok()?;
    let valid = !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LEN
        && id.bytes().all(|b| b.is_ascii_graphic());
    valid.then(|| value.clone())
}

fn generate() -> HeaderValue {
    // Hyphenated UUIDs are always valid header values.
    HeaderValue::from_str(&Uuid::new_v4().to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
}

impl<S> Service<Request<Body>> for RequestIdMiddleware<S>
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

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let request_id = request
            .headers()
            .get(&REQUEST_ID_HEADER)
            .and_then(accept_incoming)
            .unwrap_or_else(generate);

        request
            .headers_mut()
            .insert(REQUEST_ID_HEADER.clone(), request_id.clone());

        let mut inner = self.inner.clone();

        Box::pin(async move {
            let mut response = inner.call(request).await?;
            response
                .headers_mut()
                .insert(REQUEST_ID_HEADER.clone(), request_id);
            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_incoming() {
        let ok = HeaderValue::from_static("req-123");
        assert_eq!(accept_incoming(&ok), Some(ok));

        let spaced = HeaderValue::from_static("has space");
        assert!(accept_incoming(&spaced).is_none());

        let long = HeaderValue::from_str(&"a".repeat(MAX_REQUEST_ID_LEN + 1)).unwrap();
        assert!(accept_incoming(&long).is_none());
    }

    #[test]
    fn test_generated_id_is_uuid() {
        let id = generate();
        assert!(Uuid::parse_str(id.to_str().unwrap()).is_ok());
    }
}

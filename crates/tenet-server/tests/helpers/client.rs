//! Test client helpers.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tenet_server::{AppState, create_router, metrics::detached_handle};
use tenet_store::{InMemoryResolver, PropertyResolver, StoreConfig};
use tower::ServiceExt;

/// A tenant id created in 2017.
pub const TENANT: u64 = 302094807046684672;

/// Builds a router over the given resolver.
pub fn app(resolver: Arc<dyn PropertyResolver>) -> Router {
    let state = AppState::from_resolver(resolver, StoreConfig::default());
    create_router(state, detached_handle())
}

/// Client over a fresh in-memory store.
pub fn client() -> TestClient {
    client_with(Arc::new(InMemoryResolver::new()))
}

pub fn client_with(resolver: Arc<dyn PropertyResolver>) -> TestClient {
    TestClient::new(app(resolver))
}

/// Helper for HTTP integration tests.
pub struct TestClient {
    app: Router,
}

impl TestClient {
    pub fn new(app: Router) -> Self {
        Self { app }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send("GET", uri, None, &[]).await
    }

    pub async fn get_with_headers(&self, uri: &str, headers: &[(&str, &str)]) -> TestResponse {
        self.send("GET", uri, None, headers).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> TestResponse {
        self.send("POST", uri, Some(body), &[]).await
    }

    pub async fn put_json(&self, uri: &str, body: &Value) -> TestResponse {
        self.send("PUT", uri, Some(body), &[]).await
    }

    pub async fn put_json_with_headers(
        &self,
        uri: &str,
        body: &Value,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        self.send("PUT", uri, Some(body), headers).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send("DELETE", uri, None, &[]).await
    }

    pub async fn delete_with_headers(&self, uri: &str, headers: &[(&str, &str)]) -> TestResponse {
        self.send("DELETE", uri, None, headers).await
    }

    /// Registers a property and asserts success.
    pub async fn register(&self, category: &str, key: &str, modifiable: bool, ty: &str) -> Value {
        let response = self
            .post_json(
                "/properties",
                &serde_json::json!({
                    "category": category,
                    "key": key,
                    "modifiable": modifiable,
                    "type": ty,
                }),
            )
            .await;
        assert!(
            response.status.is_success(),
            "registration failed: {}",
            response.text()
        );
        response.json()
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        body: Option<&Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder().uri(uri).method(method);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        TestResponse::from_response(response).await
    }
}

/// Wrapper over Response with assertion helpers.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    async fn from_response(response: Response<Body>) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes()
            .to_vec();

        Self {
            status,
            headers,
            body,
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Body is not valid UTF-8")
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
        self
    }

    pub fn assert_content_type_contains(&self, expected: &str) -> &Self {
        let content_type = self
            .header("content-type")
            .expect("Response missing Content-Type header");

        assert!(
            content_type.contains(expected),
            "Expected Content-Type to contain '{}' but got '{}'",
            expected,
            content_type
        );
        self
    }

    pub fn assert_header_exists(&self, name: &str) -> &Self {
        assert!(
            self.headers.contains_key(name),
            "Expected header '{}' to exist",
            name
        );
        self
    }

    pub fn assert_header(&self, name: &str, expected: &str) -> &Self {
        let value = self
            .header(name)
            .unwrap_or_else(|| panic!("Header '{}' not found", name));

        assert_eq!(
            value, expected,
            "Expected header '{}' to be '{}' but got '{}'",
            name, expected, value
        );
        self
    }
}

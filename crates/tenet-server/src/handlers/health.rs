use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tenet_store::StoreHealth;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Consecutive failed store operations, set while degraded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failures: Option<u32>,
}

impl HealthResponse {
    pub fn up() -> Self {
        Self {
            status: "UP".to_string(),
            error: None,
            failures: None,
        }
    }

    pub fn degraded(error: String, failures: u32) -> Self {
        Self {
            status: "DEGRADED".to_string(),
            error: Some(error),
            failures: Some(failures),
        }
    }

    pub fn down(error: Option<String>) -> Self {
        Self {
            status: "DOWN".to_string(),
            error,
            failures: None,
        }
    }

    /// Maps store health to a status code and body.
    ///
    /// A degraded store still answers 200: it is open and may recover on the
    /// next operation. `open_error` explains an uninitialized store.
    pub fn from_health(health: StoreHealth, open_error: Option<String>) -> (StatusCode, Self) {
        match health {
            StoreHealth::Ready => (StatusCode::OK, Self::up()),
            StoreHealth::Degraded {
                last_error,
                failures,
            } => (StatusCode::OK, Self::degraded(last_error, failures)),
            StoreHealth::Uninitialized => (StatusCode::SERVICE_UNAVAILABLE, Self::down(open_error)),
        }
    }
}

/// GET /health
/// Reports whether the backing store can serve requests.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let resolver = state.provider().resolver();
    let health = resolver.health();

    if let StoreHealth::Degraded { failures, .. } = &health {
        tracing::warn!(failures, "Health check found a degraded store");
    }

    let (status, body) = HealthResponse::from_health(health, resolver.last_error());
    (status, Json(body))
}

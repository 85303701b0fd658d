//! Cache invalidation endpoint handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// Response for cache clear operations.
#[derive(Debug, Serialize)]
pub struct ClearCacheResponse {
    /// Number of properties whose tenant caches were dropped.
    pub properties: usize,
    pub message: String,
}

/// DELETE /cache
/// Drops every cached tenant value. Stored values are untouched.
#[instrument(skip_all)]
pub async fn clear_caches(
    State(state): State<AppState>,
) -> Result<Json<ClearCacheResponse>, AppError> {
    let properties = state
        .blocking(|provider| {
            provider.clear_caches();
            Ok(provider.live_properties())
        })
        .await?;

    Ok(Json(ClearCacheResponse {
        properties,
        message: format!("Cleared tenant caches of {} properties", properties),
    }))
}

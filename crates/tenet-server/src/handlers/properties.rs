//! Property endpoint handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderName, StatusCode},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tenet_core::{Lookup, PropertyInfo, PropertyType};
use tenet_store::Property;
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;
use crate::value::{encode_json, render};

/// Header flagging a request as coming from an end user rather than an
/// operator. End users may only write modifiable properties.
pub static END_USER_HEADER: HeaderName = HeaderName::from_static("x-tenet-end-user");

/// Request body for POST /properties.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub category: String,
    pub key: String,
    #[serde(default = "default_modifiable")]
    pub modifiable: bool,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
}

fn default_modifiable() -> bool {
    true
}

/// Request body for PUT /properties/{category}/{key}/{lookup}.
#[derive(Debug, Deserialize)]
pub struct PutValueRequest {
    pub value: Value,
}

/// Response for value reads.
#[derive(Debug, Serialize)]
pub struct ValueResponse {
    pub present: bool,
    pub value: Option<Value>,
}

/// Response for value writes and removals.
#[derive(Debug, Serialize)]
pub struct WriteResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct ValuePath {
    pub category: String,
    pub key: String,
    pub lookup: String,
}

impl ValuePath {
    /// Parses the tenant lookup segment.
    pub fn lookup(&self) -> Result<Lookup, AppError> {
        Ok(self.lookup.parse::<Lookup>()?)
    }
}

#[derive(Debug, Deserialize)]
pub struct ValueQuery {
    /// Accessor to decode the stored value with.
    #[serde(rename = "as")]
    pub as_type: Option<String>,
}

fn is_end_user(headers: &HeaderMap) -> bool {
    headers
        .get(&END_USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

/// GET /properties
#[instrument(skip_all)]
pub async fn list_properties(
    State(state): State<AppState>,
) -> Result<Json<Vec<PropertyInfo>>, AppError> {
    let properties = state
        .blocking(|provider| provider.list_properties())
        .await?;
    Ok(Json(properties))
}

/// POST /properties
/// Registers a property. Registering an existing pair returns its metadata.
#[instrument(skip_all, fields(category = %request.category, key = %request.key))]
pub async fn register_property(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PropertyInfo>), AppError> {
    let registration = state
        .blocking(move |provider| {
            provider.register(
                &request.category,
                &request.key,
                request.modifiable,
                request.property_type,
            )
        })
        .await?;

    let status = if registration.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(registration.info)))
}

/// GET /properties/{category}/{key}/{lookup}
#[instrument(skip_all, fields(category = %path.category, key = %path.key, lookup = %path.lookup))]
pub async fn get_value(
    State(state): State<AppState>,
    Path(path): Path<ValuePath>,
    Query(query): Query<ValueQuery>,
) -> Result<Json<ValueResponse>, AppError> {
    let lookup = path.lookup()?;

    let mapping = state
        .blocking(move |provider| {
            provider
                .get_property_by_name(&path.category, &path.key)?
                .get(lookup)
        })
        .await?;

    let response = match mapping {
        Some(mapping) => ValueResponse {
            present: true,
            value: Some(render(&mapping, query.as_type.as_deref())?),
        },
        None => ValueResponse {
            present: false,
            value: None,
        },
    };
    Ok(Json(response))
}

/// PUT /properties/{category}/{key}/{lookup}
#[instrument(skip_all, fields(category = %path.category, key = %path.key, lookup = %path.lookup))]
pub async fn put_value(
    State(state): State<AppState>,
    Path(path): Path<ValuePath>,
    headers: HeaderMap,
    Json(request): Json<PutValueRequest>,
) -> Result<Json<WriteResponse>, AppError> {
    let lookup = path.lookup()?;
    let end_user = is_end_user(&headers);

    let property = state
        .blocking(move |provider| provider.get_property_by_name(&path.category, &path.key))
        .await?;

    if end_user && !property.info().is_modifiable() {
        return Err(AppError::Forbidden(format!(
            "Property '{}/{}' cannot be modified by end users",
            property.info().category(),
            property.info().name()
        )));
    }

    let bytes = encode_json(property.info().property_type(), &request.value)?;

    let success = state
        .blocking(move |_| property.set_raw(lookup, &bytes))
        .await?;

    tracing::info!(success, "Property value written");
    Ok(Json(WriteResponse { success }))
}

/// DELETE /properties/{category}/{key}/{lookup}
#[instrument(skip_all, fields(category = %path.category, key = %path.key, lookup = %path.lookup))]
pub async fn delete_value(
    State(state): State<AppState>,
    Path(path): Path<ValuePath>,
    headers: HeaderMap,
) -> Result<Json<WriteResponse>, AppError> {
    let lookup = path.lookup()?;
    let end_user = is_end_user(&headers);

    let success = state
        .blocking(move |provider| {
            let property = provider.get_property_by_name(&path.category, &path.key)?;
            if end_user && !property.info().is_modifiable() {
                return Ok(None);
            }
            property.remove(lookup).map(Some)
        })
        .await?
        .ok_or_else(|| AppError::Forbidden("Property cannot be modified by end users".to_string()))?;

    Ok(Json(WriteResponse { success }))
}

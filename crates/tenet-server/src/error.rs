use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tenet_core::TenetError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Failure reported by the property store.
    #[error(transparent)]
    Store(#[from] TenetError),

    /// Malformed request body or parameters.
    #[error("{0}")]
    BadRequest(String),

    /// The caller may not modify this property.
    #[error("{0}")]
    Forbidden(String),

    /// Unexpected server failure.
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl AppError {
    /// Returns the status code this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Store(e) => match e {
                TenetError::Validation { .. } => StatusCode::BAD_REQUEST,
                TenetError::NotFound { .. } => StatusCode::NOT_FOUND,
                TenetError::AlreadyRegistered { .. } => StatusCode::CONFLICT,
                TenetError::Decode { .. } | TenetError::Conversion { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                },
                TenetError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
                TenetError::StoreFailure { .. } | TenetError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                },
            },
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(ErrorResponse {
            error: status
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

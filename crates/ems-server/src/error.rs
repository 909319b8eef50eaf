//! HTTP error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ems_core::error::EmsError;
use serde_json::json;

/// An error ready to be rendered as an HTTP response.
///
/// Bodies are always `{"message": ...}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: message.into(),
        }
    }
}

impl From<EmsError> for ApiError {
    fn from(err: EmsError) -> Self {
        let status = match &err {
            EmsError::Validation { .. } | EmsError::AlreadyExists { .. } => {
                StatusCode::BAD_REQUEST
            }
            EmsError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            EmsError::AuthorizationDenied { .. } => StatusCode::FORBIDDEN,
            EmsError::NotFound { .. } => StatusCode::NOT_FOUND,
            EmsError::Database(_) | EmsError::Crypto(_) | EmsError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match &err {
            // Storage details stay out of responses.
            EmsError::Database(_) | EmsError::Crypto(_) | EmsError::Internal(_) => {
                tracing::error!(error = %err, "internal error");
                "Internal server error".to_string()
            }
            EmsError::Validation { message } => message.clone(),
            EmsError::AuthenticationFailed { reason } => reason.clone(),
            EmsError::AuthorizationDenied { reason } => reason.clone(),
            EmsError::AlreadyExists { entity } => format!("{entity} already exists"),
            EmsError::NotFound { entity, .. } => format!("{entity} not found"),
        };

        Self { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

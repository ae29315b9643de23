use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned to API callers.
///
/// Server-side failure detail is logged, never serialized here: callers only
/// ever see a generic client or server error.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Bad Request")
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// ISO 8601 timestamp when the error occurred
    pub timestamp: String,
}

/// Service-level error taxonomy
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Gateway error: {0}")]
    GatewayError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Internal server error")]
    InternalServerError,
}

impl From<crate::repositories::RepositoryError> for ServiceError {
    fn from(err: crate::repositories::RepositoryError) -> Self {
        ServiceError::InternalError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(errors.to_string())
    }
}

impl ServiceError {
    /// Status code and caller-visible message for this error.
    ///
    /// Gateway and internal failures deliberately collapse to fixed generic
    /// messages; their detail stays in the server log.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ServiceError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServiceError::InvalidSignature => {
                (StatusCode::BAD_REQUEST, "Invalid signature".to_string())
            }
            ServiceError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ServiceError::GatewayError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong!".to_string(),
            ),
            ServiceError::InternalError(_) | ServiceError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server error!".to_string(),
            ),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }

        let body = ErrorResponse {
            error: status
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string(),
            message,
            timestamp: Utc::now().to_rfc3339(),
        };

        (status, Json(body)).into_response()
    }
}

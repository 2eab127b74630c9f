//! Error types for the recommendation backend
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Api Error Enum ==
/// Unified error type for the recommendation backend.
///
/// Cache failures are deliberately absent: both cache tiers are best-effort
/// and their read/write failures are logged and swallowed at the boundary.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Required input missing or unusable; no network call was attempted
    #[error("{0}")]
    MissingInput(String),

    /// Credential missing, malformed, or rejected by the verifier
    #[error("{0}")]
    InvalidCredential(String),

    /// Transport-level failure reaching the recipe provider
    #[error("Request failed: {0}")]
    GatewayFailure(String),

    /// Non-success status returned by the recipe provider
    #[error("{message}")]
    UpstreamFailure { status: u16, message: String },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status code this error maps to.
    ///
    /// Upstream failures forward the provider's status verbatim; a status
    /// outside the representable range degrades to 502.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingInput(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredential(_) => StatusCode::UNAUTHORIZED,
            ApiError::GatewayFailure(_) => StatusCode::BAD_GATEWAY,
            ApiError::UpstreamFailure { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body for this error, matching the shapes callers depend on.
    pub fn to_payload(&self) -> serde_json::Value {
        match self {
            ApiError::UpstreamFailure { status, message } => {
                json!({ "error": message, "status": status })
            }
            other => json!({ "error": other.to_string() }),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_payload())).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the recommendation backend.
pub type Result<T> = std::result::Result<T, ApiError>;

//! API error types with `{"error": message}` JSON bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pharmai_core::{LedgerError, PharmaiError, ResolverError};
use serde::Serialize;

/// Message for absent or blank drug names.
pub const MISSING_INPUT: &str = "Missing input";

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<ResolverError> for ApiError {
    fn from(err: ResolverError) -> Self {
        match err {
            ResolverError::InvalidInput(_) => ApiError::BadRequest(MISSING_INPUT.into()),
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::LockPoisoned => ApiError::Internal(err.to_string()),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<PharmaiError> for ApiError {
    fn from(err: PharmaiError) -> Self {
        match err {
            PharmaiError::Ledger(e) => e.into(),
            PharmaiError::InvalidInput(_) => ApiError::BadRequest(MISSING_INPUT.into()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

//! Mapping of core failures onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::{AuthFailure, ErrorCode, TokenFailure, sanitize_message};

/// A caller-facing error: status, stable code, sanitized message.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    code: &'static str,
    error: String,
}

impl ApiError {
    /// Bad request with an explicit message.
    #[must_use]
    pub fn bad_request(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: ErrorCode::MalformedInput.as_str(),
            error: sanitize_message(message),
        }
    }
}

impl From<AuthFailure> for ApiError {
    fn from(failure: AuthFailure) -> Self {
        let (status, code, error) = match &failure {
            // Wrong password and exhausted chain look identical to callers;
            // strategy-specific reasons stay in the logs.
            AuthFailure::InvalidCredentials | AuthFailure::NoMatchingStrategy => (
                StatusCode::UNAUTHORIZED,
                ErrorCode::InvalidCredentials,
                "invalid credentials".to_string(),
            ),
            AuthFailure::DirectoryUnavailable { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::DirectoryUnavailable,
                "identity source temporarily unavailable".to_string(),
            ),
            AuthFailure::MalformedInput { reason } => (
                StatusCode::BAD_REQUEST,
                ErrorCode::MalformedInput,
                sanitize_message(reason),
            ),
        };
        Self {
            status,
            code: code.as_str(),
            error,
        }
    }
}

impl From<TokenFailure> for ApiError {
    fn from(failure: TokenFailure) -> Self {
        // Malformed (400) vs rejected (403) is the only distinction exposed;
        // expired and bad-signature are indistinguishable to the caller so
        // probing responses reveals nothing about the signature check.
        let (status, code, error) = match &failure {
            TokenFailure::TokenMalformed { reason } => (
                StatusCode::BAD_REQUEST,
                ErrorCode::TokenMalformed,
                sanitize_message(reason),
            ),
            TokenFailure::TokenInvalid | TokenFailure::TokenExpired { .. } => (
                StatusCode::FORBIDDEN,
                ErrorCode::TokenInvalid,
                "session invalid or expired".to_string(),
            ),
            TokenFailure::InvalidIdentity { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InvalidIdentity,
                "internal error".to_string(),
            ),
        };
        Self {
            status,
            code: code.as_str(),
            error,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

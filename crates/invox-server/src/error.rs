//! HTTP error mapping.
//!
//! Validation and conflict failures carry a descriptive message;
//! authorization and ownership failures stay generic so nothing about
//! internal state leaks; infrastructure failures are logged in full
//! and surface as a generic server error.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use invox_auth::AuthError;
use invox_billing::BillingError;
use invox_core::InvoxError;
use tracing::error;

use crate::dto::MessageResponse;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    /// Carries the internal detail for diagnostics; the response body
    /// stays generic.
    Internal(String),
}

impl ApiError {
    pub fn unauthorized_token() -> Self {
        Self::Unauthorized("invalid or expired token".into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::Internal(detail) => {
                error!(%detail, "request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(MessageResponse::failure(message))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateEmail | AuthError::DuplicateDocument => {
                Self::BadRequest(err.to_string())
            }
            AuthError::UnknownIdentity | AuthError::InvalidCredential => {
                Self::Unauthorized(err.to_string())
            }
            AuthError::InvalidToken(_) => Self::unauthorized_token(),
            AuthError::Crypto(detail) => Self::Internal(detail),
            AuthError::Store(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::EmptyCart | BillingError::TotalMismatch { .. } => {
                Self::BadRequest(err.to_string())
            }
            BillingError::NotFoundOrForbidden { .. } => Self::NotFound("invoice not found".into()),
            BillingError::Store(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<InvoxError> for ApiError {
    fn from(err: InvoxError) -> Self {
        match err {
            InvoxError::NotFound { ref entity, .. } => Self::NotFound(format!("{entity} not found")),
            InvoxError::AlreadyExists { .. } | InvoxError::Validation { .. } => {
                Self::BadRequest(err.to_string())
            }
            InvoxError::AuthenticationFailed { .. } => Self::unauthorized_token(),
            InvoxError::Database(detail) | InvoxError::Crypto(detail) => Self::Internal(detail),
        }
    }
}

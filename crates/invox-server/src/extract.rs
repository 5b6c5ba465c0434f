//! Bearer-token handling for incoming requests.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use surrealdb::Connection;

use crate::error::ApiError;
use crate::state::AppState;

/// Pull the raw bearer token out of the `Authorization` header.
///
/// Used by the public verify/renew endpoints, which respond with a
/// client error (not unauthorized) when the header is simply missing.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::BadRequest("token not provided".into()))
}

/// The authenticated caller, resolved from a verified session token.
///
/// Extraction is purely cryptographic — no store lookup happens per
/// request. Any missing, malformed, expired, or tampered token yields
/// the same generic unauthorized response.
#[derive(Debug, Clone)]
pub struct AuthIdentity {
    pub id: i64,
    pub email: String,
}

impl<C: Connection + Clone> FromRequestParts<AppState<C>> for AuthIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<C>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(ApiError::unauthorized_token)?;

        let claims = state
            .auth
            .verify_token(token)
            .map_err(|_| ApiError::unauthorized_token())?;

        Ok(Self {
            id: claims.subject,
            email: claims.email,
        })
    }
}

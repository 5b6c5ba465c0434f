//! Identity and session endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use invox_auth::{AuthError, RegisterInput};
use surrealdb::Connection;
use tracing::{info, warn};

use crate::dto::{
    EmailAvailabilityResponse, IdentityResponse, LoginRequest, RegisterRequest, SessionResponse,
};
use crate::error::ApiError;
use crate::extract::{AuthIdentity, bearer_token};
use crate::state::AppState;

/// `POST /api/users/register` — public.
pub async fn register<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    request.validate()?;

    info!(email = %request.email, "registration requested");

    let session = state
        .auth
        .register(RegisterInput {
            email: request.email,
            secret: request.password,
            given_name: request.given_name,
            family_name: request.family_name,
            document_number: request.document_number,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse::new(session, "identity registered")),
    ))
}

/// `POST /api/users/login` — public.
pub async fn login<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    request.validate()?;

    let session = state.auth.login(&request.email, &request.password).await?;

    Ok(Json(SessionResponse::new(session, "login succeeded")))
}

/// `POST /api/users/verify-token` — public; takes the bearer header.
///
/// The session manager's verification is purely cryptographic; the
/// identity is then re-resolved separately to fill the profile fields
/// of the response. Every failure collapses into the same generic
/// unauthorized answer.
pub async fn verify_token<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>, ApiError> {
    let token = bearer_token(&headers)?;

    let claims = state
        .auth
        .verify_token(token)
        .map_err(|_| ApiError::unauthorized_token())?;
    let identity = state
        .auth
        .identity_by_id(claims.subject)
        .await
        .map_err(|_| ApiError::unauthorized_token())?;

    Ok(Json(SessionResponse {
        token: token.to_string(),
        identity_id: identity.id,
        email: claims.email,
        display_name: identity.display_name(),
        document: identity.document_number.clone(),
        message: "token valid".into(),
        success: true,
    }))
}

/// `POST /api/users/refresh-token` — public; takes the bearer header.
pub async fn refresh_token<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>, ApiError> {
    let token = bearer_token(&headers)?;

    let session = state.auth.refresh_token(token).await.map_err(|e| {
        warn!(error = %e, "token renewal rejected");
        ApiError::Unauthorized("could not refresh token".into())
    })?;

    Ok(Json(SessionResponse::new(session, "token refreshed")))
}

/// `GET /api/users/email-available/{email}` — public.
pub async fn email_available<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    Path(email): Path<String>,
) -> Result<Json<EmailAvailabilityResponse>, ApiError> {
    let available = state.auth.email_available(&email).await?;

    Ok(Json(EmailAvailabilityResponse {
        message: if available {
            "email available".into()
        } else {
            "email already registered".into()
        },
        available,
    }))
}

/// `GET /api/users/profile` — the authenticated caller's own profile.
pub async fn profile<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    auth: AuthIdentity,
) -> Result<Json<IdentityResponse>, ApiError> {
    let identity = state
        .auth
        .identity_by_id(auth.id)
        .await
        .map_err(not_found_or_else)?;

    Ok(Json(IdentityResponse::from(identity)))
}

/// `GET /api/users/{id}` — identity lookup, bearer token required.
pub async fn get_by_id<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    _auth: AuthIdentity,
    Path(id): Path<i64>,
) -> Result<Json<IdentityResponse>, ApiError> {
    let identity = state
        .auth
        .identity_by_id(id)
        .await
        .map_err(not_found_or_else)?;

    Ok(Json(IdentityResponse::from(identity)))
}

fn not_found_or_else(err: AuthError) -> ApiError {
    match err {
        AuthError::UnknownIdentity => ApiError::NotFound("identity not found".into()),
        other => other.into(),
    }
}

//! Route table.

use axum::Router;
use axum::routing::{get, post};
use surrealdb::Connection;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod identities;
mod invoices;

pub fn router<C: Connection + Clone>(state: AppState<C>) -> Router {
    Router::new()
        // Public identity/session endpoints.
        .route("/api/users/register", post(identities::register::<C>))
        .route("/api/users/login", post(identities::login::<C>))
        .route("/api/users/verify-token", post(identities::verify_token::<C>))
        .route(
            "/api/users/refresh-token",
            post(identities::refresh_token::<C>),
        )
        .route(
            "/api/users/email-available/{email}",
            get(identities::email_available::<C>),
        )
        // Everything below requires a valid bearer token.
        .route("/api/users/profile", get(identities::profile::<C>))
        .route("/api/users/{id}", get(identities::get_by_id::<C>))
        .route(
            "/api/invoices",
            post(invoices::issue::<C>).get(invoices::list::<C>),
        )
        .route("/api/invoices/ordered", get(invoices::list_newest_first::<C>))
        .route("/api/invoices/{id}", get(invoices::get::<C>))
        .route("/api/invoices/{id}/lines", get(invoices::lines::<C>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

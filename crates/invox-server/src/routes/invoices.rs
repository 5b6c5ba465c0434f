//! Invoice endpoints. All of them require a valid bearer token; reads
//! are scoped to the authenticated owner.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use invox_billing::{BillingError, IssueInvoice};
use invox_core::InvoxError;
use invox_core::models::invoice::Invoice;
use surrealdb::Connection;
use tracing::{info, warn};

use crate::dto::{
    InvoiceDetailsResponse, InvoiceLineResponse, IssueInvoiceRequest, IssueInvoiceResponse,
    VendorResponse,
};
use crate::error::ApiError;
use crate::extract::AuthIdentity;
use crate::state::AppState;

/// `POST /api/invoices` — checkout.
pub async fn issue<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    auth: AuthIdentity,
    Json(request): Json<IssueInvoiceRequest>,
) -> Result<(StatusCode, Json<IssueInvoiceResponse>), ApiError> {
    request.validate()?;

    info!(owner_id = auth.id, "issuing invoice");

    let input = IssueInvoice {
        customer_name: request.customer_name.clone(),
        customer_document: request.customer_document.clone(),
        customer_email: request.customer_email.clone(),
        claimed_total: request.claimed_total,
        lines: request.into_cart(),
    };

    match state.billing.issue(auth.id, input).await {
        Ok(invoice_id) => Ok((
            StatusCode::CREATED,
            Json(IssueInvoiceResponse::created(invoice_id)),
        )),
        Err(err @ (BillingError::EmptyCart | BillingError::TotalMismatch { .. })) => {
            warn!(owner_id = auth.id, error = %err, "invoice rejected");
            Ok((
                StatusCode::BAD_REQUEST,
                Json(IssueInvoiceResponse::error(err.to_string())),
            ))
        }
        Err(err) => Err(err.into()),
    }
}

/// `GET /api/invoices` — the caller's invoices, insertion order.
pub async fn list<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    auth: AuthIdentity,
) -> Result<Json<Vec<InvoiceDetailsResponse>>, ApiError> {
    let invoices = state.billing.list_by_owner(auth.id, false).await?;
    details_for(&state, invoices).await.map(Json)
}

/// `GET /api/invoices/ordered` — the caller's invoices, newest first.
pub async fn list_newest_first<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    auth: AuthIdentity,
) -> Result<Json<Vec<InvoiceDetailsResponse>>, ApiError> {
    let invoices = state.billing.list_by_owner(auth.id, true).await?;
    details_for(&state, invoices).await.map(Json)
}

/// `GET /api/invoices/{id}` — ownership enforced; a foreign or missing
/// invoice is indistinguishably "not found".
pub async fn get<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    auth: AuthIdentity,
    Path(id): Path<i64>,
) -> Result<Json<InvoiceDetailsResponse>, ApiError> {
    let invoice = state.billing.get_owned(id, auth.id).await?;
    let details = to_details(&state, invoice).await?;
    Ok(Json(details))
}

/// `GET /api/invoices/{id}/lines` — the parent invoice is authorized
/// first; only then are the lines fetched.
pub async fn lines<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    auth: AuthIdentity,
    Path(id): Path<i64>,
) -> Result<Json<Vec<InvoiceLineResponse>>, ApiError> {
    state.billing.get_owned(id, auth.id).await?;

    let lines = state.billing.get_lines(id).await?;
    Ok(Json(
        lines.into_iter().map(InvoiceLineResponse::from).collect(),
    ))
}

async fn details_for<C: Connection + Clone>(
    state: &AppState<C>,
    invoices: Vec<Invoice>,
) -> Result<Vec<InvoiceDetailsResponse>, ApiError> {
    let mut out = Vec::with_capacity(invoices.len());
    for invoice in invoices {
        out.push(to_details(state, invoice).await?);
    }
    Ok(out)
}

/// Assemble the full response: nested lines plus the vendor summary,
/// falling back to the sentinel when the vendor identity record is
/// missing.
async fn to_details<C: Connection + Clone>(
    state: &AppState<C>,
    invoice: Invoice,
) -> Result<InvoiceDetailsResponse, ApiError> {
    use invox_core::repository::IdentityRepository;

    let lines = state.billing.get_lines(invoice.id).await?;

    let vendor = match state.identities.get_by_id(invoice.owner_id).await {
        Ok(identity) => VendorResponse::from(identity),
        Err(InvoxError::NotFound { .. }) => VendorResponse::unknown(invoice.owner_id),
        Err(err) => return Err(err.into()),
    };

    Ok(InvoiceDetailsResponse::new(invoice, lines, vendor))
}

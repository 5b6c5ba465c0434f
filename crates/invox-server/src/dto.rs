//! Request and response shapes for the HTTP API.
//!
//! Field-level validation lives here, on the request types; the
//! services own the business invariants.

use invox_auth::Session;
use invox_core::models::identity::Identity;
use invox_core::models::invoice::{CartLine, Invoice, InvoiceLine};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub given_name: String,
    pub family_name: String,
    pub document_number: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_email(&self.email)?;
        if self.password.len() < 6 {
            return Err(ApiError::BadRequest(
                "the secret must be at least 6 characters".into(),
            ));
        }
        for (field, value) in [
            ("given name", &self.given_name),
            ("family name", &self.family_name),
        ] {
            let len = value.trim().chars().count();
            if !(2..=100).contains(&len) {
                return Err(ApiError::BadRequest(format!(
                    "the {field} must be between 2 and 100 characters"
                )));
            }
        }
        if let Some(document) = self.document_number.as_deref() {
            validate_document(document)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_email(&self.email)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineRequest {
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueInvoiceRequest {
    pub lines: Vec<CartLineRequest>,
    /// The caller-claimed total, reconciled against the computed one
    /// by the pipeline.
    pub claimed_total: Decimal,
    pub customer_name: String,
    pub customer_document: Option<String>,
    pub customer_email: Option<String>,
}

impl IssueInvoiceRequest {
    /// Shape-level cart validation. The empty-cart rule itself belongs
    /// to the pipeline.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.customer_name.trim().is_empty() {
            return Err(ApiError::BadRequest("the customer name is required".into()));
        }
        if let Some(email) = self.customer_email.as_deref() {
            validate_email(email)?;
        }
        for line in &self.lines {
            if line.product_name.trim().is_empty() {
                return Err(ApiError::BadRequest("a product name is required".into()));
            }
            if line.unit_price < Decimal::ZERO {
                return Err(ApiError::BadRequest(
                    "unit prices must not be negative".into(),
                ));
            }
            if line.quantity < 1 {
                return Err(ApiError::BadRequest("quantities must be at least 1".into()));
            }
        }
        Ok(())
    }

    pub fn into_cart(self) -> Vec<CartLine> {
        self.lines
            .into_iter()
            .map(|line| CartLine {
                product: line.product_name,
                unit_price: line.unit_price,
                quantity: line.quantity,
            })
            .collect()
    }
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ApiError::BadRequest("invalid email".into()))
    }
}

fn validate_document(document: &str) -> Result<(), ApiError> {
    let len = document.len();
    if (8..=20).contains(&len) && document.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ApiError::BadRequest("invalid document number".into()))
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
    pub success: bool,
}

impl MessageResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAvailabilityResponse {
    pub message: String,
    pub available: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub identity_id: i64,
    pub email: String,
    pub display_name: String,
    pub document: Option<String>,
    pub message: String,
    pub success: bool,
}

impl SessionResponse {
    pub fn new(session: Session, message: impl Into<String>) -> Self {
        Self {
            token: session.token,
            identity_id: session.identity_id,
            email: session.email,
            display_name: session.display_name,
            document: session.document,
            message: message.into(),
            success: true,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    pub id: i64,
    pub email: String,
    pub given_name: String,
    pub family_name: String,
    pub document_number: Option<String>,
    pub display_name: String,
}

impl From<Identity> for IdentityResponse {
    fn from(identity: Identity) -> Self {
        let display_name = identity.display_name();
        Self {
            id: identity.id,
            email: identity.email,
            given_name: identity.given_name,
            family_name: identity.family_name,
            document_number: identity.document_number,
            display_name,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueInvoiceResponse {
    pub success: bool,
    pub message: String,
    pub invoice_id: Option<i64>,
}

impl IssueInvoiceResponse {
    pub fn created(invoice_id: i64) -> Self {
        Self {
            success: true,
            message: "invoice created".into(),
            invoice_id: Some(invoice_id),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            invoice_id: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLineResponse {
    pub id: i64,
    pub product: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub subtotal: Decimal,
}

impl From<InvoiceLine> for InvoiceLineResponse {
    fn from(line: InvoiceLine) -> Self {
        Self {
            id: line.id,
            product: line.product,
            unit_price: line.unit_price,
            quantity: line.quantity,
            subtotal: line.subtotal,
        }
    }
}

/// Summary of the identity that issued an invoice.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorResponse {
    pub id: i64,
    pub given_name: String,
    pub family_name: String,
    pub document: Option<String>,
}

impl VendorResponse {
    /// Sentinel used when the vendor identity record is missing.
    pub fn unknown(id: i64) -> Self {
        Self {
            id,
            given_name: "Unknown vendor".into(),
            family_name: String::new(),
            document: Some("N/A".into()),
        }
    }
}

impl From<Identity> for VendorResponse {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id,
            given_name: identity.given_name,
            family_name: identity.family_name,
            document: identity.document_number,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetailsResponse {
    pub id: i64,
    pub owner_id: i64,
    pub created_at: String,
    pub total: Decimal,
    pub customer_name: String,
    pub customer_document: Option<String>,
    pub customer_email: Option<String>,
    pub lines: Vec<InvoiceLineResponse>,
    pub vendor: VendorResponse,
}

impl InvoiceDetailsResponse {
    pub fn new(invoice: Invoice, lines: Vec<InvoiceLine>, vendor: VendorResponse) -> Self {
        Self {
            id: invoice.id,
            owner_id: invoice.owner_id,
            created_at: invoice.created_at.to_rfc3339(),
            total: invoice.total,
            customer_name: invoice.customer_name,
            customer_document: invoice.customer_document,
            customer_email: invoice.customer_email,
            lines: lines.into_iter().map(InvoiceLineResponse::from).collect(),
            vendor,
        }
    }
}

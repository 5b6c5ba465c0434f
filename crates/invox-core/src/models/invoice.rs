//! Invoice domain model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An invoice header: one completed transaction, denormalized with the
/// customer's contact fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Store-assigned numeric id.
    pub id: i64,
    /// Owning identity.
    pub owner_id: i64,
    /// Fixed 2-digit scale.
    pub total: Decimal,
    /// Store-assigned at creation, immutable.
    pub created_at: DateTime<Utc>,
    pub customer_name: String,
    pub customer_document: Option<String>,
    pub customer_email: Option<String>,
}

/// Input for creating an invoice header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvoice {
    pub owner_id: i64,
    pub total: Decimal,
    pub customer_name: String,
    pub customer_document: Option<String>,
    pub customer_email: Option<String>,
}

/// One product/quantity/price entry belonging to exactly one invoice.
///
/// `subtotal` is recomputed by the write path on every persist; it is
/// never taken from caller input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub id: i64,
    pub invoice_id: i64,
    pub product: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub subtotal: Decimal,
}

/// Input for creating an invoice line. No subtotal field: the storage
/// layer derives it from `unit_price` and `quantity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvoiceLine {
    pub product: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

/// A transient cart entry submitted at issuance time. Never persisted
/// directly; consumed to produce [`InvoiceLine`] records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub product: String,
    /// Non-negative.
    pub unit_price: Decimal,
    /// At least 1.
    pub quantity: u32,
}

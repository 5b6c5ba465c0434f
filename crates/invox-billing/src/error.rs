//! Billing error types.

use invox_core::InvoxError;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BillingError {
    #[error("the cart is empty")]
    EmptyCart,

    #[error("claimed total {claimed} does not match computed total {computed}")]
    TotalMismatch { claimed: Decimal, computed: Decimal },

    /// The invoice does not exist, or it belongs to another identity.
    /// The two cases are deliberately indistinguishable to callers so
    /// that reads cannot probe for foreign invoice ids.
    #[error("invoice {invoice_id} not found")]
    NotFoundOrForbidden { invoice_id: i64 },

    #[error(transparent)]
    Store(#[from] InvoxError),
}

//! Invoice issuance pipeline — cart validation, total reconciliation,
//! and atomic commit of a header plus its lines.

use invox_core::InvoxError;
use invox_core::models::invoice::{
    CartLine, CreateInvoice, CreateInvoiceLine, Invoice, InvoiceLine,
};
use invox_core::repository::InvoiceRepository;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::config::BillingConfig;
use crate::error::BillingError;

/// Input for the issuance flow. The owning identity arrives separately
/// — it comes from the verified session token, never from the cart.
#[derive(Debug)]
pub struct IssueInvoice {
    pub customer_name: String,
    pub customer_document: Option<String>,
    pub customer_email: Option<String>,
    pub lines: Vec<CartLine>,
    /// The total as submitted by the caller, as opposed to the total
    /// computed from the lines.
    pub claimed_total: Decimal,
}

/// Invoice issuance pipeline.
///
/// Generic over the invoice-store trait so the pipeline carries no
/// dependency on the database crate.
pub struct BillingService<R: InvoiceRepository> {
    invoices: R,
    config: BillingConfig,
}

impl<R: InvoiceRepository> BillingService<R> {
    pub fn new(invoices: R, config: BillingConfig) -> Self {
        Self { invoices, config }
    }

    /// Validate a cart, reconcile its totals, and persist the invoice
    /// header together with all of its lines in one atomic unit of
    /// work. Returns the new invoice id.
    pub async fn issue(&self, owner_id: i64, input: IssueInvoice) -> Result<i64, BillingError> {
        // 1. An empty cart is rejected before anything else.
        if input.lines.is_empty() {
            return Err(BillingError::EmptyCart);
        }

        // 2. Reconcile the claimed total against the computed one.
        //    On mismatch the claimed total is persisted anyway (the
        //    historical contract), unless strict reconciliation is
        //    configured.
        let computed: Decimal = input
            .lines
            .iter()
            .map(|line| line.unit_price * Decimal::from(line.quantity))
            .sum();
        let claimed = input.claimed_total.round_dp(2);

        if computed != claimed {
            if self.config.strict_totals {
                return Err(BillingError::TotalMismatch {
                    claimed,
                    computed,
                });
            }
            warn!(
                owner_id,
                %claimed,
                %computed,
                "claimed cart total does not match computed total; persisting claimed total"
            );
        }

        // 3–4. Header first, then every line, one transaction. Line
        //    subtotals are recomputed by the store's write path.
        let header = CreateInvoice {
            owner_id,
            total: claimed,
            customer_name: input.customer_name,
            customer_document: input.customer_document,
            customer_email: input.customer_email,
        };
        let lines = input
            .lines
            .into_iter()
            .map(|line| CreateInvoiceLine {
                product: line.product,
                unit_price: line.unit_price,
                quantity: line.quantity,
            })
            .collect();

        let invoice = self.invoices.create_with_lines(header, lines).await?;

        info!(invoice_id = invoice.id, owner_id, "invoice issued");

        // 5. Only the id goes back to the caller.
        Ok(invoice.id)
    }

    /// Fetch an invoice, enforcing that it belongs to `owner_id`.
    ///
    /// A missing invoice and a foreign owner collapse into the same
    /// error; the distinction is only logged.
    pub async fn get_owned(&self, invoice_id: i64, owner_id: i64) -> Result<Invoice, BillingError> {
        let invoice = match self.invoices.get_by_id(invoice_id).await {
            Ok(invoice) => invoice,
            Err(InvoxError::NotFound { .. }) => {
                info!(invoice_id, owner_id, "invoice not found");
                return Err(BillingError::NotFoundOrForbidden { invoice_id });
            }
            Err(e) => return Err(e.into()),
        };

        if invoice.owner_id != owner_id {
            warn!(
                invoice_id,
                owner_id,
                actual_owner = invoice.owner_id,
                "invoice belongs to a different identity"
            );
            return Err(BillingError::NotFoundOrForbidden { invoice_id });
        }

        Ok(invoice)
    }

    /// All invoices for an owner. When `newest_first` is set, sorted
    /// by creation timestamp descending (ties keep insertion order).
    pub async fn list_by_owner(
        &self,
        owner_id: i64,
        newest_first: bool,
    ) -> Result<Vec<Invoice>, BillingError> {
        let invoices = if newest_first {
            self.invoices.list_by_owner_newest_first(owner_id).await?
        } else {
            self.invoices.list_by_owner(owner_id).await?
        };
        Ok(invoices)
    }

    /// Lines for an invoice. Callers must have authorized the parent
    /// invoice via [`BillingService::get_owned`] first.
    pub async fn get_lines(&self, invoice_id: i64) -> Result<Vec<InvoiceLine>, BillingError> {
        Ok(self.invoices.lines_by_invoice(invoice_id).await?)
    }
}

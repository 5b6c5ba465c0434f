//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. The backing store assigns
//! numeric ids; callers never choose them.

use crate::error::InvoxResult;
use crate::models::identity::{CreateIdentity, Identity};
use crate::models::invoice::{CreateInvoice, CreateInvoiceLine, Invoice, InvoiceLine};

// ---------------------------------------------------------------------------
// Credential store
// ---------------------------------------------------------------------------

pub trait IdentityRepository: Send + Sync {
    fn create(&self, input: CreateIdentity) -> impl Future<Output = InvoxResult<Identity>> + Send;

    fn get_by_id(&self, id: i64) -> impl Future<Output = InvoxResult<Identity>> + Send;

    fn get_by_email(&self, email: &str) -> impl Future<Output = InvoxResult<Identity>> + Send;

    /// Pure existence check; no side effects.
    fn exists_by_email(&self, email: &str) -> impl Future<Output = InvoxResult<bool>> + Send;

    /// Pure existence check; no side effects.
    fn exists_by_document(
        &self,
        document_number: &str,
    ) -> impl Future<Output = InvoxResult<bool>> + Send;
}

// ---------------------------------------------------------------------------
// Invoice store
// ---------------------------------------------------------------------------

pub trait InvoiceRepository: Send + Sync {
    /// Persist a header together with all of its lines in one atomic
    /// unit of work. The header is written first (lines reference its
    /// id); if any write fails, nothing is persisted.
    ///
    /// Line subtotals are recomputed from unit price and quantity on
    /// every write.
    fn create_with_lines(
        &self,
        header: CreateInvoice,
        lines: Vec<CreateInvoiceLine>,
    ) -> impl Future<Output = InvoxResult<Invoice>> + Send;

    fn get_by_id(&self, id: i64) -> impl Future<Output = InvoxResult<Invoice>> + Send;

    /// All invoices for an owner, in insertion order.
    fn list_by_owner(&self, owner_id: i64)
    -> impl Future<Output = InvoxResult<Vec<Invoice>>> + Send;

    /// All invoices for an owner, newest first. Ties on the creation
    /// timestamp keep insertion order.
    fn list_by_owner_newest_first(
        &self,
        owner_id: i64,
    ) -> impl Future<Output = InvoxResult<Vec<Invoice>>> + Send;

    /// Lines for an invoice, in insertion order. Callers must have
    /// authorized the parent invoice first.
    fn lines_by_invoice(
        &self,
        invoice_id: i64,
    ) -> impl Future<Output = InvoxResult<Vec<InvoiceLine>>> + Send;

    /// Delete a header and its lines: lines first, then the header,
    /// inside one atomic unit of work, so no orphaned line is ever
    /// observable.
    fn delete(&self, id: i64) -> impl Future<Output = InvoxResult<()>> + Send;
}

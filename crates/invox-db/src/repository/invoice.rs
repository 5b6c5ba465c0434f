//! SurrealDB implementation of [`InvoiceRepository`].
//!
//! A header and its lines are committed inside a single transaction:
//! the header statement runs first (lines reference its id), and any
//! failure rolls the whole batch back. Deletion is the mirror image —
//! lines first, then the header, again in one transaction, so no
//! orphaned line is ever observable.
//!
//! Monetary amounts are stored as canonical decimal strings; line
//! subtotals are recomputed from unit price and quantity on every
//! write and never taken from input.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use invox_core::InvoxResult;
use invox_core::models::invoice::{CreateInvoice, CreateInvoiceLine, Invoice, InvoiceLine};
use invox_core::repository::InvoiceRepository;
use rust_decimal::Decimal;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;
use crate::repository::sequence::next_id;

/// DB-side row struct for queries where the id is already known.
#[derive(Debug, SurrealValue)]
struct InvoiceRow {
    owner_id: i64,
    total: String,
    created_at: DateTime<Utc>,
    customer_name: String,
    customer_document: Option<String>,
    customer_email: Option<String>,
}

/// DB-side row struct that includes the record id via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct InvoiceRowWithId {
    record_id: i64,
    owner_id: i64,
    total: String,
    created_at: DateTime<Utc>,
    customer_name: String,
    customer_document: Option<String>,
    customer_email: Option<String>,
}

#[derive(Debug, SurrealValue)]
struct LineRowWithId {
    record_id: i64,
    invoice_id: i64,
    product: String,
    unit_price: String,
    quantity: u32,
    subtotal: String,
}

fn parse_amount(field: &str, raw: &str) -> Result<Decimal, DbError> {
    Decimal::from_str(raw).map_err(|e| DbError::Decode(format!("invalid {field} '{raw}': {e}")))
}

impl InvoiceRow {
    fn into_invoice(self, id: i64) -> Result<Invoice, DbError> {
        Ok(Invoice {
            id,
            owner_id: self.owner_id,
            total: parse_amount("total", &self.total)?,
            created_at: self.created_at,
            customer_name: self.customer_name,
            customer_document: self.customer_document,
            customer_email: self.customer_email,
        })
    }
}

impl InvoiceRowWithId {
    fn into_invoice(self) -> Result<Invoice, DbError> {
        Ok(Invoice {
            id: self.record_id,
            owner_id: self.owner_id,
            total: parse_amount("total", &self.total)?,
            created_at: self.created_at,
            customer_name: self.customer_name,
            customer_document: self.customer_document,
            customer_email: self.customer_email,
        })
    }
}

impl LineRowWithId {
    fn into_line(self) -> Result<InvoiceLine, DbError> {
        Ok(InvoiceLine {
            id: self.record_id,
            invoice_id: self.invoice_id,
            product: self.product,
            unit_price: parse_amount("unit_price", &self.unit_price)?,
            quantity: self.quantity,
            subtotal: parse_amount("subtotal", &self.subtotal)?,
        })
    }
}

/// SurrealDB implementation of the invoice store.
#[derive(Clone)]
pub struct SurrealInvoiceRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealInvoiceRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> InvoiceRepository for SurrealInvoiceRepository<C> {
    async fn create_with_lines(
        &self,
        header: CreateInvoice,
        lines: Vec<CreateInvoiceLine>,
    ) -> InvoxResult<Invoice> {
        // Ids are allocated up front; an aborted transaction just
        // leaves gaps in the sequence.
        let invoice_id = next_id(&self.db, "invoice").await?;
        let mut line_ids = Vec::with_capacity(lines.len());
        for _ in &lines {
            line_ids.push(next_id(&self.db, "invoice_line").await?);
        }

        let mut statements = vec![
            "BEGIN TRANSACTION".to_string(),
            "CREATE type::record('invoice', $invoice_id) SET \
             owner_id = $owner_id, \
             total = $total, \
             customer_name = $customer_name, \
             customer_document = $customer_document, \
             customer_email = $customer_email"
                .to_string(),
        ];
        for idx in 0..lines.len() {
            statements.push(format!(
                "CREATE type::record('invoice_line', $line_id_{idx}) SET \
                 invoice_id = $invoice_id, \
                 product = $product_{idx}, \
                 unit_price = $unit_price_{idx}, \
                 quantity = $quantity_{idx}, \
                 subtotal = $subtotal_{idx}"
            ));
        }
        statements.push("COMMIT TRANSACTION".to_string());

        let mut builder = self
            .db
            .query(statements.join(";\n"))
            .bind(("invoice_id", invoice_id))
            .bind(("owner_id", header.owner_id))
            .bind(("total", header.total.round_dp(2).to_string()))
            .bind(("customer_name", header.customer_name))
            .bind(("customer_document", header.customer_document))
            .bind(("customer_email", header.customer_email));

        for (idx, (line, line_id)) in lines.into_iter().zip(line_ids).enumerate() {
            let subtotal = (line.unit_price * Decimal::from(line.quantity)).round_dp(2);
            builder = builder
                .bind((format!("line_id_{idx}"), line_id))
                .bind((format!("product_{idx}"), line.product))
                .bind((format!("unit_price_{idx}"), line.unit_price.to_string()))
                .bind((format!("quantity_{idx}"), line.quantity))
                .bind((format!("subtotal_{idx}"), subtotal.to_string()));
        }

        let result = builder.await.map_err(DbError::from)?;
        result.check().map_err(DbError::from)?;

        self.get_by_id(invoice_id).await
    }

    async fn get_by_id(&self, id: i64) -> InvoxResult<Invoice> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('invoice', $id)")
            .bind(("id", id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<InvoiceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "invoice".into(),
            id: id.to_string(),
        })?;

        Ok(row.into_invoice(id)?)
    }

    async fn list_by_owner(&self, owner_id: i64) -> InvoxResult<Vec<Invoice>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM invoice \
                 WHERE owner_id = $owner_id \
                 ORDER BY record_id ASC",
            )
            .bind(("owner_id", owner_id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<InvoiceRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| row.into_invoice())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn list_by_owner_newest_first(&self, owner_id: i64) -> InvoxResult<Vec<Invoice>> {
        // Ascending id as tie-break keeps insertion order stable for
        // invoices sharing a creation timestamp.
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM invoice \
                 WHERE owner_id = $owner_id \
                 ORDER BY created_at DESC, record_id ASC",
            )
            .bind(("owner_id", owner_id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<InvoiceRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| row.into_invoice())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn lines_by_invoice(&self, invoice_id: i64) -> InvoxResult<Vec<InvoiceLine>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM invoice_line \
                 WHERE invoice_id = $invoice_id \
                 ORDER BY record_id ASC",
            )
            .bind(("invoice_id", invoice_id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LineRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| row.into_line())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn delete(&self, id: i64) -> InvoxResult<()> {
        // Lines first, then the header, one transaction: the
        // no-orphaned-line invariant may not be violated even
        // transiently.
        let result = self
            .db
            .query(
                "BEGIN TRANSACTION;\n\
                 DELETE invoice_line WHERE invoice_id = $id;\n\
                 DELETE type::record('invoice', $id);\n\
                 COMMIT TRANSACTION",
            )
            .bind(("id", id))
            .await
            .map_err(DbError::from)?;
        result.check().map_err(DbError::from)?;

        Ok(())
    }
}

//! Numeric id allocation.
//!
//! Each entity table owns one `seq` record that is bumped atomically
//! per allocation. Allocation happens before the enclosing write, so
//! an aborted write leaves a gap in the sequence — acceptable, since
//! ids only need to be unique, not dense.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct SeqRow {
    value: i64,
}

/// Allocate the next id for `table`.
pub(crate) async fn next_id<C: Connection>(db: &Surreal<C>, table: &str) -> Result<i64, DbError> {
    let mut result = db
        .query("UPSERT type::record('seq', $table) SET value += 1")
        .bind(("table", table.to_string()))
        .await?;

    let rows: Vec<SeqRow> = result.take(0)?;
    rows.into_iter()
        .next()
        .map(|row| row.value)
        .ok_or_else(|| DbError::Decode(format!("sequence for '{table}' returned no row")))
}

//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! Numeric ids live in the record id itself and are allocated through
//! the `seq` table. Monetary amounts are stored as canonical decimal
//! strings and parsed in the row converters.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Id sequences — one record per entity table, bumped atomically
-- =======================================================================
DEFINE TABLE seq SCHEMAFULL;
DEFINE FIELD value ON TABLE seq TYPE int DEFAULT 0;

-- =======================================================================
-- Identities
-- =======================================================================
DEFINE TABLE identity SCHEMAFULL;
DEFINE FIELD email ON TABLE identity TYPE string;
DEFINE FIELD secret_hash ON TABLE identity TYPE string;
DEFINE FIELD given_name ON TABLE identity TYPE string;
DEFINE FIELD family_name ON TABLE identity TYPE string;
DEFINE FIELD document_number ON TABLE identity TYPE option<string>;
DEFINE FIELD created_at ON TABLE identity TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_identity_email ON TABLE identity COLUMNS email UNIQUE;
-- Lookup only: uniqueness of optional documents is enforced by the
-- service-level existence check, since absent values may repeat.
DEFINE INDEX idx_identity_document ON TABLE identity \
    COLUMNS document_number;

-- =======================================================================
-- Invoice headers
-- =======================================================================
DEFINE TABLE invoice SCHEMAFULL;
DEFINE FIELD owner_id ON TABLE invoice TYPE int;
DEFINE FIELD total ON TABLE invoice TYPE string;
DEFINE FIELD created_at ON TABLE invoice TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD customer_name ON TABLE invoice TYPE string;
DEFINE FIELD customer_document ON TABLE invoice TYPE option<string>;
DEFINE FIELD customer_email ON TABLE invoice TYPE option<string>;
DEFINE INDEX idx_invoice_owner ON TABLE invoice COLUMNS owner_id;

-- =======================================================================
-- Invoice lines
-- =======================================================================
DEFINE TABLE invoice_line SCHEMAFULL;
DEFINE FIELD invoice_id ON TABLE invoice_line TYPE int;
DEFINE FIELD product ON TABLE invoice_line TYPE string;
DEFINE FIELD unit_price ON TABLE invoice_line TYPE string;
DEFINE FIELD quantity ON TABLE invoice_line TYPE int;
DEFINE FIELD subtotal ON TABLE invoice_line TYPE string;
DEFINE INDEX idx_invoice_line_invoice ON TABLE invoice_line \
    COLUMNS invoice_id;
";

// -----------------------------------------------------------------------
// Runner
// -----------------------------------------------------------------------

/// Apply all pending migrations, in version order.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL).await?.check()?;

    let mut applied = db
        .query("SELECT version, name FROM _migration ORDER BY version ASC")
        .await?;
    let applied: Vec<MigrationRecord> = applied.take(0)?;
    let latest = applied.iter().map(|m| m.version).max().unwrap_or(0);

    for migration in MIGRATIONS.iter().filter(|m| m.version > latest) {
        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );

        db.query(migration.sql)
            .await?
            .check()
            .map_err(|e| DbError::Migration(format!("{}: {e}", migration.name)))?;

        db.query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", migration.version))
            .bind(("name", migration.name.to_string()))
            .await?
            .check()
            .map_err(|e| DbError::Migration(format!("recording {}: {e}", migration.name)))?;
    }

    Ok(())
}

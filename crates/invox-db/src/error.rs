//! Database-specific error types and conversions.

use invox_core::InvoxError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Stored record could not be decoded: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for InvoxError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => InvoxError::NotFound { entity, id },
            other => InvoxError::Database(other.to_string()),
        }
    }
}

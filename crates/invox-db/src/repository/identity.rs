//! SurrealDB implementation of [`IdentityRepository`].
//!
//! Identities arrive with the secret already hashed — this layer never
//! sees a plaintext secret.

use chrono::{DateTime, Utc};
use invox_core::InvoxResult;
use invox_core::models::identity::{CreateIdentity, Identity};
use invox_core::repository::IdentityRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;
use crate::repository::sequence::next_id;

/// DB-side row struct for queries where the id is already known.
#[derive(Debug, SurrealValue)]
struct IdentityRow {
    email: String,
    secret_hash: String,
    given_name: String,
    family_name: String,
    document_number: Option<String>,
    created_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record id via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct IdentityRowWithId {
    record_id: i64,
    email: String,
    secret_hash: String,
    given_name: String,
    family_name: String,
    document_number: Option<String>,
    created_at: DateTime<Utc>,
}

impl IdentityRow {
    fn into_identity(self, id: i64) -> Identity {
        Identity {
            id,
            email: self.email,
            secret_hash: self.secret_hash,
            given_name: self.given_name,
            family_name: self.family_name,
            document_number: self.document_number,
            created_at: self.created_at,
        }
    }
}

impl IdentityRowWithId {
    fn into_identity(self) -> Identity {
        Identity {
            id: self.record_id,
            email: self.email,
            secret_hash: self.secret_hash,
            given_name: self.given_name,
            family_name: self.family_name,
            document_number: self.document_number,
            created_at: self.created_at,
        }
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the credential store.
#[derive(Clone)]
pub struct SurrealIdentityRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealIdentityRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn count_where(&self, field: &'static str, value: &str) -> Result<u64, DbError> {
        let query = format!(
            "SELECT count() AS total FROM identity WHERE {field} = $value GROUP ALL"
        );
        let mut result = self
            .db
            .query(query)
            .bind(("value", value.to_string()))
            .await?;

        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}

impl<C: Connection> IdentityRepository for SurrealIdentityRepository<C> {
    async fn create(&self, input: CreateIdentity) -> InvoxResult<Identity> {
        let id = next_id(&self.db, "identity").await?;

        let result = self
            .db
            .query(
                "CREATE type::record('identity', $id) SET \
                 email = $email, \
                 secret_hash = $secret_hash, \
                 given_name = $given_name, \
                 family_name = $family_name, \
                 document_number = $document_number",
            )
            .bind(("id", id))
            .bind(("email", input.email))
            .bind(("secret_hash", input.secret_hash))
            .bind(("given_name", input.given_name))
            .bind(("family_name", input.family_name))
            .bind(("document_number", input.document_number))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<IdentityRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "identity".into(),
            id: id.to_string(),
        })?;

        Ok(row.into_identity(id))
    }

    async fn get_by_id(&self, id: i64) -> InvoxResult<Identity> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('identity', $id)")
            .bind(("id", id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<IdentityRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "identity".into(),
            id: id.to_string(),
        })?;

        Ok(row.into_identity(id))
    }

    async fn get_by_email(&self, email: &str) -> InvoxResult<Identity> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM identity \
                 WHERE email = $email",
            )
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<IdentityRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "identity".into(),
            id: format!("email={email}"),
        })?;

        Ok(row.into_identity())
    }

    async fn exists_by_email(&self, email: &str) -> InvoxResult<bool> {
        Ok(self.count_where("email", email).await? > 0)
    }

    async fn exists_by_document(&self, document_number: &str) -> InvoxResult<bool> {
        Ok(self.count_where("document_number", document_number).await? > 0)
    }
}

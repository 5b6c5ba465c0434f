//! Identity domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account capable of authenticating and owning invoices.
///
/// Identities are immutable after registration and are never deleted
/// by this system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Store-assigned numeric id.
    pub id: i64,
    /// Unique, case-sensitive as stored.
    pub email: String,
    /// Argon2id PHC-format hash of the secret. The plaintext is never
    /// stored.
    pub secret_hash: String,
    pub given_name: String,
    pub family_name: String,
    /// National document number. Unique when present.
    pub document_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Display name shown to callers: given name followed by family
    /// name.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}

/// Input for creating an identity. The secret arrives already hashed;
/// the storage layer never sees a plaintext secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIdentity {
    pub email: String,
    pub secret_hash: String,
    pub given_name: String,
    pub family_name: String,
    pub document_number: Option<String>,
}

//! Identity & session manager — registration, login, token
//! verification, and token renewal orchestration.

use chrono::Utc;
use invox_core::InvoxError;
use invox_core::models::identity::{CreateIdentity, Identity};
use invox_core::repository::IdentityRepository;
use tracing::info;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token::{IdentityClaims, TokenCodec};

/// Input for the registration flow.
#[derive(Debug)]
pub struct RegisterInput {
    pub email: String,
    pub secret: String,
    pub given_name: String,
    pub family_name: String,
    pub document_number: Option<String>,
}

/// A freshly minted session, returned by registration, login, and
/// renewal.
#[derive(Debug, Clone)]
pub struct Session {
    /// Signed session token.
    pub token: String,
    pub identity_id: i64,
    pub email: String,
    /// Given name followed by family name.
    pub display_name: String,
    pub document: Option<String>,
}

impl Session {
    fn for_identity(token: String, identity: &Identity) -> Self {
        Self {
            token,
            identity_id: identity.id,
            email: identity.email.clone(),
            display_name: identity.display_name(),
            document: identity.document_number.clone(),
        }
    }
}

/// Identity & session manager.
///
/// Generic over the credential-store trait so the auth layer carries
/// no dependency on the database crate. Secret hashing and token
/// cryptography stay here, isolated from persistence, so the signing
/// key and hashing cost factor rotate independently of the storage
/// schema.
pub struct AuthService<I: IdentityRepository> {
    identities: I,
    codec: TokenCodec,
    pepper: Option<String>,
}

impl<I: IdentityRepository> AuthService<I> {
    pub fn new(identities: I, config: AuthConfig) -> Self {
        let codec = TokenCodec::new(&config);
        Self {
            identities,
            codec,
            pepper: config.pepper,
        }
    }

    /// Register a new identity and mint its first session.
    pub async fn register(&self, input: RegisterInput) -> Result<Session, AuthError> {
        // 1. Conflict checks before any write.
        if self.identities.exists_by_email(&input.email).await? {
            return Err(AuthError::DuplicateEmail);
        }
        if let Some(document) = input.document_number.as_deref() {
            if self.identities.exists_by_document(document).await? {
                return Err(AuthError::DuplicateDocument);
            }
        }

        // 2. Hash the secret; the store never sees the plaintext.
        let secret_hash = password::hash_secret(&input.secret, self.pepper.as_deref())?;

        // 3. Persist the identity.
        let identity = self
            .identities
            .create(CreateIdentity {
                email: input.email,
                secret_hash,
                given_name: input.given_name,
                family_name: input.family_name,
                document_number: input.document_number,
            })
            .await?;

        info!(identity_id = identity.id, "identity registered");

        // 4. Mint the session token.
        let token = self.mint(&identity)?;
        Ok(Session::for_identity(token, &identity))
    }

    /// Authenticate with email + secret and mint a fresh session.
    pub async fn login(&self, email: &str, secret: &str) -> Result<Session, AuthError> {
        // 1. Resolve the identity by email.
        let identity = match self.identities.get_by_email(email).await {
            Ok(identity) => identity,
            Err(InvoxError::NotFound { .. }) => return Err(AuthError::UnknownIdentity),
            Err(e) => return Err(e.into()),
        };

        // 2. Verify the secret (constant-time comparison inside the
        //    Argon2 verifier).
        let valid = password::verify_secret(secret, &identity.secret_hash, self.pepper.as_deref())?;
        if !valid {
            return Err(AuthError::InvalidCredential);
        }

        info!(identity_id = identity.id, "login succeeded");

        // 3. Mint a fresh token.
        let token = self.mint(&identity)?;
        Ok(Session::for_identity(token, &identity))
    }

    /// Verify a session token and return its claims.
    ///
    /// Purely cryptographic: the credential store is not consulted.
    pub fn verify_token(&self, token: &str) -> Result<IdentityClaims, AuthError> {
        Ok(self.codec.verify(token, Utc::now())?)
    }

    /// Renew a session: verify the presented token, re-resolve the
    /// identity to pick up current state, and mint a token with a
    /// fresh expiry window.
    ///
    /// The old token stays cryptographically valid until its own
    /// expiry lapses — there is no server-side revocation list.
    pub async fn refresh_token(&self, token: &str) -> Result<Session, AuthError> {
        // 1. Full verification; any failure propagates.
        let claims = self.codec.verify(token, Utc::now())?;

        // 2. Re-resolve the identity (it may have been removed since
        //    the token was issued).
        let identity = match self.identities.get_by_id(claims.subject).await {
            Ok(identity) => identity,
            Err(InvoxError::NotFound { .. }) => return Err(AuthError::UnknownIdentity),
            Err(e) => return Err(e.into()),
        };

        info!(identity_id = identity.id, "session token renewed");

        // 3. Mint the replacement.
        let fresh = self.mint(&identity)?;
        Ok(Session::for_identity(fresh, &identity))
    }

    /// True when no identity is registered under `email`.
    pub async fn email_available(&self, email: &str) -> Result<bool, AuthError> {
        Ok(!self.identities.exists_by_email(email).await?)
    }

    /// Resolve an identity by id, for profile reads.
    pub async fn identity_by_id(&self, id: i64) -> Result<Identity, AuthError> {
        match self.identities.get_by_id(id).await {
            Ok(identity) => Ok(identity),
            Err(InvoxError::NotFound { .. }) => Err(AuthError::UnknownIdentity),
            Err(e) => Err(e.into()),
        }
    }

    fn mint(&self, identity: &Identity) -> Result<String, AuthError> {
        self.codec
            .mint(identity.id, &identity.email, Utc::now())
            .map_err(|e| AuthError::Crypto(e.to_string()))
    }
}

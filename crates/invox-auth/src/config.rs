//! Authentication configuration.
//!
//! Loaded once at process start and passed explicitly into the token
//! codec and the auth service; never read from ambient state at call
//! time.

/// Compiled-in fallback signing secret. Insecure by definition — any
/// real deployment must override it. The server logs a warning at
/// startup when this value is still in use.
pub const DEFAULT_TOKEN_SECRET: &str = "invox-dev-signing-secret-override-me-in-production";

/// Default session token lifetime: 24 hours.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;

/// Configuration for the authentication service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Symmetric secret for HS256 token signing and verification.
    pub token_secret: String,
    /// Session token lifetime in seconds.
    pub token_ttl_secs: u64,
    /// Optional pepper prepended to secrets before Argon2id hashing
    /// and verification.
    pub pepper: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: DEFAULT_TOKEN_SECRET.into(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            pepper: None,
        }
    }
}

impl AuthConfig {
    /// True while the compiled-in fallback secret is still in use.
    pub fn uses_default_secret(&self) -> bool {
        self.token_secret == DEFAULT_TOKEN_SECRET
    }
}

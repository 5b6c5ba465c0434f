//! Session token issuance and verification.
//!
//! Tokens are compact HS256 JWTs carrying the identity id, the email
//! claim, and an issue/expiry pair. The same configured symmetric
//! secret signs and verifies. Nothing here touches the credential
//! store: verification is stateless and side-effect-free.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;

/// Token verification/minting failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token signature does not verify")]
    BadSignature,

    #[error("token has expired")]
    Expired,

    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Wire-format claims as embedded in the JWT payload.
#[derive(Debug, Serialize, Deserialize)]
struct RawClaims {
    /// Subject — identity id, as a string.
    sub: String,
    email: String,
    /// Issued-at (Unix timestamp).
    iat: i64,
    /// Expiration (Unix timestamp).
    exp: i64,
}

/// Verified claims with the subject already parsed back to its numeric
/// form.
#[derive(Debug, Clone)]
pub struct IdentityClaims {
    pub subject: i64,
    pub email: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Stateless signer/verifier for session tokens.
///
/// Constructed once from [`AuthConfig`]; the signing secret and TTL
/// are fixed for the lifetime of the codec.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.token_secret.as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::seconds(config.token_ttl_secs as i64),
        }
    }

    /// Issue a signed token with `exp = now + ttl`.
    pub fn mint(&self, subject: i64, email: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let iat = now.timestamp();
        let claims = RawClaims {
            sub: subject.to_string(),
            email: email.to_owned(),
            iat,
            exp: iat + self.ttl.num_seconds(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Decode and verify a token against the supplied clock.
    ///
    /// Expiry is compared strictly (`now >= exp` fails) with zero
    /// leeway, so the check is done here rather than by the JWT
    /// library's leeway-tolerant validator.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<IdentityClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "exp", "iat"]);

        let data = jsonwebtoken::decode::<RawClaims>(token, &self.decoding, &validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed(e.to_string()),
            },
        )?;

        let claims = data.claims;
        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        let subject = claims
            .sub
            .parse::<i64>()
            .map_err(|_| TokenError::Malformed("non-numeric subject claim".into()))?;

        Ok(IdentityClaims {
            subject,
            email: claims.email,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_codec() -> TokenCodec {
        TokenCodec::new(&AuthConfig {
            token_secret: "unit-test-secret".into(),
            token_ttl_secs: 3_600,
            pepper: None,
        })
    }

    #[test]
    fn mint_verify_roundtrip() {
        let codec = test_codec();
        let now = Utc::now();

        let token = codec.mint(42, "alice@example.com", now).unwrap();
        let claims = codec.verify(&token, now).unwrap();

        assert_eq!(claims.subject, 42);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.issued_at, now.timestamp());
        assert_eq!(claims.expires_at, now.timestamp() + 3_600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = test_codec();
        let now = Utc::now();

        // Minted so that exp = now - 1s.
        let token = codec
            .mint(1, "a@x.com", now - Duration::seconds(3_601))
            .unwrap();

        assert_eq!(codec.verify(&token, now).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn expiry_comparison_is_strict() {
        let codec = test_codec();
        let now = Utc::now();

        // exp == now: no leeway, already expired.
        let token = codec.mint(1, "a@x.com", now - Duration::seconds(3_600)).unwrap();
        assert_eq!(codec.verify(&token, now).unwrap_err(), TokenError::Expired);

        // One second before expiry is still valid.
        let token = codec.mint(1, "a@x.com", now - Duration::seconds(3_599)).unwrap();
        assert!(codec.verify(&token, now).is_ok());
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let codec = test_codec();
        let now = Utc::now();

        let token = codec.mint(7, "a@x.com", now).unwrap();
        let tampered = format!("{token}x");

        assert_eq!(
            codec.verify(&tampered, now).unwrap_err(),
            TokenError::BadSignature
        );
    }

    #[test]
    fn foreign_key_is_rejected() {
        let codec = test_codec();
        let other = TokenCodec::new(&AuthConfig {
            token_secret: "a-different-secret".into(),
            token_ttl_secs: 3_600,
            pepper: None,
        });
        let now = Utc::now();

        let token = other.mint(7, "a@x.com", now).unwrap();
        assert_eq!(
            codec.verify(&token, now).unwrap_err(),
            TokenError::BadSignature
        );
    }

    #[test]
    fn garbage_is_malformed() {
        let codec = test_codec();
        let err = codec.verify("not-a-token", Utc::now()).unwrap_err();
        assert!(matches!(err, TokenError::Malformed(_)));
    }

    #[test]
    fn non_numeric_subject_is_malformed() {
        let codec = test_codec();
        let now = Utc::now();

        // Forge a structurally valid token with a non-numeric subject.
        let claims = RawClaims {
            sub: "not-a-number".into(),
            email: "a@x.com".into(),
            iat: now.timestamp(),
            exp: now.timestamp() + 60,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();

        let err = codec.verify(&token, now).unwrap_err();
        assert!(matches!(err, TokenError::Malformed(_)));
    }
}

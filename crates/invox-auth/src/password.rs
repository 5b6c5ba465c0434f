//! Secret hashing and verification using Argon2id.
//!
//! Hashing lives here rather than in the storage layer so the cost
//! parameters can change without touching the storage schema. The
//! credential store only ever sees the finished PHC string.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHasher, PasswordVerifier};

use crate::error::AuthError;

/// Prepend the optional pepper to the secret.
fn peppered<'a>(secret: &'a str, pepper: Option<&str>, buf: &'a mut String) -> &'a [u8] {
    match pepper {
        Some(p) => {
            *buf = format!("{p}{secret}");
            buf.as_bytes()
        }
        None => secret.as_bytes(),
    }
}

/// Hash a secret with Argon2id using OWASP-recommended parameters
/// (memory: 19 MiB, iterations: 2, parallelism: 1). The salt is
/// randomly generated per call.
pub fn hash_secret(secret: &str, pepper: Option<&str>) -> Result<String, AuthError> {
    let params = argon2::Params::new(19_456, 2, 1, None)
        .map_err(|e| AuthError::Crypto(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let mut buf = String::new();
    let input = peppered(secret, pepper, &mut buf);

    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(input, &salt)
        .map_err(|e| AuthError::Crypto(format!("secret hash error: {e}")))?;

    Ok(hash.to_string())
}

/// Verify a plaintext secret against an Argon2id PHC-format hash.
///
/// The Argon2 verifier performs the comparison in constant time.
/// Returns `Ok(true)` on match, `Ok(false)` on mismatch, or
/// `Err(AuthError::Crypto)` if the stored hash is malformed.
pub fn verify_secret(secret: &str, hash: &str, pepper: Option<&str>) -> Result<bool, AuthError> {
    let mut buf = String::new();
    let input = peppered(secret, pepper, &mut buf);

    let parsed_hash = argon2::PasswordHash::new(hash)
        .map_err(|e| AuthError::Crypto(format!("invalid hash format: {e}")))?;

    let argon2 = Argon2::default();
    match argon2.verify_password(input, &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Crypto(format!("verify error: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_secret_matches() {
        let hash = hash_secret("hunter2", None).unwrap();
        assert!(verify_secret("hunter2", &hash, None).unwrap());
    }

    #[test]
    fn wrong_secret_does_not_match() {
        let hash = hash_secret("hunter2", None).unwrap();
        assert!(!verify_secret("wrong", &hash, None).unwrap());
    }

    #[test]
    fn pepper_is_applied() {
        let hash = hash_secret("hunter2", Some("pepper!")).unwrap();
        assert!(verify_secret("hunter2", &hash, Some("pepper!")).unwrap());
        // Without the pepper the same secret must fail.
        assert!(!verify_secret("hunter2", &hash, None).unwrap());
    }

    #[test]
    fn salts_are_random() {
        let h1 = hash_secret("hunter2", None).unwrap();
        let h2 = hash_secret("hunter2", None).unwrap();
        assert_ne!(h1, h2);
    }

    #[test]
    fn malformed_hash_returns_error() {
        let result = verify_secret("pw", "not-a-hash", None);
        assert!(result.is_err());
    }
}

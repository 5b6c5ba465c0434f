//! Authentication error types.

use invox_core::InvoxError;
use thiserror::Error;

use crate::token::TokenError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email is already registered")]
    DuplicateEmail,

    #[error("document number is already registered")]
    DuplicateDocument,

    #[error("identity is not registered")]
    UnknownIdentity,

    #[error("invalid credentials")]
    InvalidCredential,

    #[error("invalid token: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("cryptography error: {0}")]
    Crypto(String),

    #[error(transparent)]
    Store(#[from] InvoxError),
}

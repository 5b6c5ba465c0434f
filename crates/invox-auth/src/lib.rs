//! INVOX Auth — secret hashing, session token issuance/verification,
//! and the identity & session manager.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, RegisterInput, Session};
pub use token::{IdentityClaims, TokenCodec, TokenError};

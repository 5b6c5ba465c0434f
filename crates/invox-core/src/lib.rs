//! INVOX Core — domain models, repository trait definitions, and the
//! shared error type.
//!
//! This crate has no knowledge of the database engine or the HTTP
//! layer; both depend on it, never the other way around.

pub mod error;
pub mod models;
pub mod repository;

pub use error::{InvoxError, InvoxResult};

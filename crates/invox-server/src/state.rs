//! Shared application state handed to every handler.

use std::sync::Arc;

use invox_auth::{AuthConfig, AuthService};
use invox_billing::{BillingConfig, BillingService};
use invox_db::repository::{SurrealIdentityRepository, SurrealInvoiceRepository};
use surrealdb::{Connection, Surreal};

/// Application state, generic over the database engine so the same
/// router serves the remote client in production and the in-memory
/// engine in tests.
#[derive(Clone)]
pub struct AppState<C: Connection> {
    pub auth: Arc<AuthService<SurrealIdentityRepository<C>>>,
    pub billing: Arc<BillingService<SurrealInvoiceRepository<C>>>,
    /// Direct identity lookups for vendor summaries and profile reads.
    pub identities: SurrealIdentityRepository<C>,
}

impl<C: Connection + Clone> AppState<C> {
    pub fn new(db: Surreal<C>, auth: AuthConfig, billing: BillingConfig) -> Self {
        let identities = SurrealIdentityRepository::new(db.clone());
        let invoices = SurrealInvoiceRepository::new(db);

        Self {
            auth: Arc::new(AuthService::new(identities.clone(), auth)),
            billing: Arc::new(BillingService::new(invoices, billing)),
            identities,
        }
    }
}

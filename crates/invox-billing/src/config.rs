//! Billing configuration.

/// Configuration for the invoice issuance pipeline.
#[derive(Debug, Clone, Default)]
pub struct BillingConfig {
    /// Reject issuance when the caller's claimed total does not match
    /// the computed total. Off by default: the persisted header then
    /// carries the claimed total and the mismatch is only logged,
    /// matching the historical behavior callers depend on.
    pub strict_totals: bool,
}

//! Server configuration, assembled once at startup from environment
//! variables and handed down into the component constructors.

use invox_auth::AuthConfig;
use invox_billing::BillingConfig;
use invox_db::DbConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address, e.g. `0.0.0.0:8080`.
    pub bind_addr: String,
    pub db: DbConfig,
    pub auth: AuthConfig,
    pub billing: BillingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".into(),
            db: DbConfig::default(),
            auth: AuthConfig::default(),
            billing: BillingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Build the full configuration from `INVOX_*` environment
    /// variables, falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: std::env::var("INVOX_BIND_ADDR").unwrap_or(defaults.bind_addr),
            db: DbConfig::from_env(),
            auth: AuthConfig {
                token_secret: std::env::var("INVOX_TOKEN_SECRET")
                    .unwrap_or(defaults.auth.token_secret),
                token_ttl_secs: std::env::var("INVOX_TOKEN_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.auth.token_ttl_secs),
                pepper: std::env::var("INVOX_SECRET_PEPPER").ok(),
            },
            billing: BillingConfig {
                strict_totals: std::env::var("INVOX_STRICT_TOTALS")
                    .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                    .unwrap_or(defaults.billing.strict_totals),
            },
        }
    }
}

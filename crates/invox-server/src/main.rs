//! INVOX Server — application entry point.

use invox_db::DbManager;
use invox_server::{AppState, ServerConfig, router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("invox=info".parse()?))
        .json()
        .init();

    let config = ServerConfig::from_env();
    if config.auth.uses_default_secret() {
        tracing::warn!(
            "token signing secret is the compiled-in default; set INVOX_TOKEN_SECRET in any real deployment"
        );
    }

    let db = DbManager::connect(&config.db).await?;
    invox_db::run_migrations(db.client()).await?;

    let state = AppState::new(db.client().clone(), config.auth.clone(), config.billing.clone());
    let app = router(state);

    tracing::info!(addr = %config.bind_addr, "Starting INVOX server");
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// HTTP API server binary for the Salamawy storefront and admin dashboard

use anyhow::Result;
use salamawy_store::api::ApiServer;
use salamawy_store::storage;
use salamawy_store::telemetry::init_tracing;
use salamawy_store::util::env as env_util;

#[actix_web::main]
async fn main() -> Result<()> {
    // Load dotenv/env before the filter is read
    env_util::init_env();
    init_tracing("info,sqlx=warn")?;

    tracing::info!("Initializing Salamawy Store API server");
    env_util::preflight_check(
        "api_server",
        &[],
        &[
            "API_HOST",
            "API_PORT",
            "APP_ENV",
            "STORAGE_BACKEND",
            "DATABASE_URL",
            "AUTO_MIGRATE",
            "ALLOWED_ORIGINS",
            "STATIC_DIR",
            "SESSION_SECRET",
        ],
    )?;

    // Load configuration from environment
    let server = ApiServer::from_env()?;

    let store = storage::open_from_env().await?;
    tracing::info!("Storage backend ready");

    // Start HTTP server
    server.run(store).await?;

    Ok(())
}

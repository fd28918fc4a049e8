use actix_web::HttpResponse;

use super::Store;
use crate::api::models::HealthResponse;

/// Health check endpoint
pub async fn health_check(store: Store) -> HttpResponse {
    let database = match store.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "health check: storage unreachable");
            "disconnected"
        }
    };

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        database,
        version: env!("CARGO_PKG_VERSION"),
    })
}

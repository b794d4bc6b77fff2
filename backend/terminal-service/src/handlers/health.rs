/// Liveness endpoint
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::state::AppState;

pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    match state.repos.health.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "service": state.config.app.name,
            "version": env!("CARGO_PKG_VERSION"),
            "database": "connected",
        })),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unhealthy",
                "service": state.config.app.name,
                "version": env!("CARGO_PKG_VERSION"),
                "database": "unreachable",
            }))
        }
    }
}

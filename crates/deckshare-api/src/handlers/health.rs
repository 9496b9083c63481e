//! Health check handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use deckshare_core::traits::CacheProvider;

use crate::dto::response::{DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

/// GET /health/detailed
///
/// Checks every backing service; answers 503 when any of them is down.
pub async fn health_detailed(
    State(state): State<AppState>,
) -> (StatusCode, Json<DetailedHealthResponse>) {
    let database = match &state.db {
        Some(db) => component_status(db.health_check().await),
        None => "disabled",
    };
    let cache = component_status(state.cache.health_check().await);
    let storage = component_status(state.blobs.health_check().await);

    let healthy = [database, cache, storage]
        .iter()
        .all(|s| *s != "unavailable");
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(DetailedHealthResponse {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            database: database.to_string(),
            cache: cache.to_string(),
            cache_provider: state.cache.provider_name().to_string(),
            storage: storage.to_string(),
        }),
    )
}

fn component_status<E: std::fmt::Display>(result: Result<bool, E>) -> &'static str {
    match result {
        Ok(true) => "connected",
        Ok(false) => "unavailable",
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            "unavailable"
        }
    }
}

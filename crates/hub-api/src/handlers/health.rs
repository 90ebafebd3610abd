//! Liveness and database reachability.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database probe fails.
    pub status: String,
    pub version: String,
    pub search_mode: String,
}

/// Health check. Always 200; a failed database probe shows as `degraded`.
#[utoipa::path(get, path = "/health", tag = "System",
    responses((status = 200, description = "Service status", body = HealthResponse)))]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = match &state.db {
        Some(db) => match db.ping().await {
            Ok(()) => "ok",
            Err(e) => {
                warn!(
                    subsystem = "api",
                    component = "health",
                    error = %e,
                    "Database probe failed"
                );
                "degraded"
            }
        },
        None => "ok",
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        search_mode: state.engine.strategy_name().to_string(),
    })
}

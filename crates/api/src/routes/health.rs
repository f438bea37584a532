use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use notewell_core::lifecycle::LifecycleState;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, `degraded` when the database is unreachable, or `stopping`.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

/// GET /health -- returns service and database health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = notewell_db::health_check(&state.pool).await.is_ok();

    let status = match (state.lifecycle.state(), db_healthy) {
        (LifecycleState::Stopping, _) => "stopping",
        (_, true) => "ok",
        (_, false) => "degraded",
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Mount health check routes (root level, not under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

//! Liveness / readiness handler.

use axum::extract::State;
use axum::Json;

use crate::error::AppResult;
use crate::response::HealthResponse;
use crate::state::AppState;

/// GET /health
///
/// Returns 200 with a database round-trip check.
pub async fn health(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    campus_db::health_check(&state.pool).await?;
    Ok(Json(HealthResponse {
        status: "ok",
        database: "reachable",
    }))
}

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::app_state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub bucket_configured: bool,
}

/// GET /health — liveness plus whether a target bucket is resolved.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let settings = state.settings.current();
    Json(HealthResponse {
        status: "ok",
        bucket_configured: !settings.bucket.is_empty(),
    })
}

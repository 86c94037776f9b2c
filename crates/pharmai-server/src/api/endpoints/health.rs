//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::config::APP_VERSION;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub records: usize,
    pub duplicates: usize,
    pub dataset_fingerprint: String,
    pub inference_configured: bool,
    pub version: &'static str,
}

/// `GET /api/health`
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        records: state.store.len(),
        duplicates: state.store.duplicates().len(),
        dataset_fingerprint: state.store.fingerprint().to_string(),
        inference_configured: state.inferencer.is_configured(),
        version: APP_VERSION,
    })
}

use axum::{Json, extract::State};
use chrono::Utc;

use crate::api::HealthResponse;
use crate::infra::app_state::AppState;

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: state.storage.as_str().to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

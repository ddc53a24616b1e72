//! Health check endpoints

use axum::{extract::State, Json};
use trace_core::ledger::ProvenanceStore;

use crate::dto::HealthResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let sequence = state.store.current_sequence().await;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        current_sequence: sequence,
    }))
}

/// Ready check endpoint (re-verifies the whole record log)
pub async fn ready_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let intact = state.store.verify_integrity().await.unwrap_or(false);
    let status = if intact { "ready" } else { "degraded" };

    Ok(Json(HealthResponse {
        status: status.to_string(),
        version: state.version.clone(),
        current_sequence: state.store.current_sequence().await,
    }))
}

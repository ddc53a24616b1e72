//! API route handlers

pub mod health;
pub mod provenance;
pub mod records;

use axum::{routing::get, routing::post, Router};

use crate::state::AppState;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        // Producer submission endpoints
        .route("/records/collection", post(records::submit_collection))
        .route("/records/quality-test", post(records::submit_quality_test))
        .route("/records/processing", post(records::submit_processing))
        .route("/records/attestation", post(records::submit_attestation))
        // Consumer query endpoints
        .route("/records/:record_id", get(records::get_record))
        .route("/provenance/:batch_id", get(provenance::get_provenance))
        .route("/scan", get(provenance::scan))
        // State
        .with_state(state)
}

//! Consumer provenance resolution endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::dto::{ProvenanceResponse, ScanParams};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Resolve a batch id into a verified provenance bundle.
///
/// The bundle is returned even when verification yields a tampered
/// verdict; the `verification` field carries the outcome.
pub async fn get_provenance(
    State(state): State<AppState>,
    Path(batch_id): Path<String>,
) -> ApiResult<Json<ProvenanceResponse>> {
    let resolved = state
        .resolver
        .resolve_verified(&batch_id)
        .await
        .map_err(ApiError::Ledger)?;

    Ok(Json(ProvenanceResponse::from_bundle(
        &resolved.bundle,
        resolved.verdict,
    )))
}

/// Resolve a QR-code payload (or bare batch id)
pub async fn scan(
    State(state): State<AppState>,
    Query(params): Query<ScanParams>,
) -> ApiResult<Json<ProvenanceResponse>> {
    let resolved = state
        .resolver
        .resolve_scan(&params.code)
        .await
        .map_err(ApiError::Ledger)?;

    Ok(Json(ProvenanceResponse::from_bundle(
        &resolved.bundle,
        resolved.verdict,
    )))
}

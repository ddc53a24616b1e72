//! Producer submission and record lookup endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};

use trace_core::ledger::ProvenanceStore;
use trace_core::types::{
    DraftRecord, Principal, RecordId, RecordPayload, Role, SubmissionId, SubmitReceipt,
};

use crate::dto::{
    PrincipalDto, RecordResponse, SubmitAttestationRequest, SubmitCollectionRequest,
    SubmitProcessingRequest, SubmitQualityTestRequest, SubmitResponse,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Submit a collection event
pub async fn submit_collection(
    State(state): State<AppState>,
    Json(req): Json<SubmitCollectionRequest>,
) -> ApiResult<Json<SubmitResponse>> {
    submit(
        &state,
        req.principal,
        req.submission_id,
        req.record_id,
        req.recorded_at,
        RecordPayload::Collection(req.event),
    )
    .await
}

/// Submit a laboratory quality test
pub async fn submit_quality_test(
    State(state): State<AppState>,
    Json(req): Json<SubmitQualityTestRequest>,
) -> ApiResult<Json<SubmitResponse>> {
    submit(
        &state,
        req.principal,
        req.submission_id,
        req.record_id,
        req.recorded_at,
        RecordPayload::QualityTest(req.test),
    )
    .await
}

/// Submit a processing step
pub async fn submit_processing(
    State(state): State<AppState>,
    Json(req): Json<SubmitProcessingRequest>,
) -> ApiResult<Json<SubmitResponse>> {
    submit(
        &state,
        req.principal,
        req.submission_id,
        req.record_id,
        req.recorded_at,
        RecordPayload::Processing(req.step),
    )
    .await
}

/// Submit a batch attestation
pub async fn submit_attestation(
    State(state): State<AppState>,
    Json(req): Json<SubmitAttestationRequest>,
) -> ApiResult<Json<SubmitResponse>> {
    submit(
        &state,
        req.principal,
        req.submission_id,
        req.record_id,
        req.recorded_at,
        RecordPayload::Attestation(req.attestation),
    )
    .await
}

/// Get one committed record by id
pub async fn get_record(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> ApiResult<Json<RecordResponse>> {
    let record = state
        .store
        .get(&RecordId(record_id.clone()))
        .await
        .map_err(ApiError::Ledger)?
        .ok_or_else(|| ApiError::NotFound(format!("Record {} not found", record_id)))?;

    Ok(Json(RecordResponse::from_record(&record)))
}

// ============ Helper Functions ============

async fn submit(
    state: &AppState,
    principal: PrincipalDto,
    submission_id: String,
    record_id: String,
    recorded_at: DateTime<Utc>,
    payload: RecordPayload,
) -> ApiResult<Json<SubmitResponse>> {
    let principal = parse_principal(principal)?;
    let draft = DraftRecord {
        record_id: RecordId(record_id),
        recorded_at,
        payload,
    };

    let receipt = state
        .ingestion
        .submit(draft, principal, SubmissionId(submission_id))
        .await
        .map_err(ApiError::Ledger)?;

    Ok(Json(receipt_to_response(&receipt)))
}

fn parse_principal(dto: PrincipalDto) -> Result<Principal, ApiError> {
    let role = parse_role(&dto.role)?;
    Ok(Principal {
        id: dto.id,
        name: dto.name,
        role,
        organization: dto.organization,
    })
}

fn parse_role(s: &str) -> Result<Role, ApiError> {
    Role::parse(s).ok_or_else(|| ApiError::BadRequest(format!("Invalid role: {}", s)))
}

fn receipt_to_response(receipt: &SubmitReceipt) -> SubmitResponse {
    SubmitResponse {
        record_id: receipt.record_id.0.clone(),
        tx_ref: receipt.tx_ref.to_hex(),
        sequence: receipt.sequence,
    }
}

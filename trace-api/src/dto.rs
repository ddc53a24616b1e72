//! Data Transfer Objects for API requests and responses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use trace_core::bundle::{ProvenanceBundle, Verdict};
use trace_core::types::{
    BatchAttestation, CollectionEvent, CommittedRecord, Compliance, ProcessingStep, ProductInfo,
    QualityTest, RecordPayload, Sustainability,
};

// ============ Principal DTO ============

/// Submitting principal, as supplied by the identity provider
#[derive(Debug, Clone, Deserialize)]
pub struct PrincipalDto {
    pub id: String,
    pub name: String,
    /// Role string (collector, processor, lab, manufacturer)
    pub role: String,
    pub organization: String,
}

// ============ Submission DTOs ============

/// Submit a collection event
#[derive(Debug, Deserialize)]
pub struct SubmitCollectionRequest {
    /// Client-supplied idempotency key
    pub submission_id: String,
    pub principal: PrincipalDto,
    /// Producer-chosen record id (e.g. "CE-001")
    pub record_id: String,
    /// Producer timestamp; advisory only
    pub recorded_at: DateTime<Utc>,
    pub event: CollectionEvent,
}

/// Submit a laboratory quality test
#[derive(Debug, Deserialize)]
pub struct SubmitQualityTestRequest {
    pub submission_id: String,
    pub principal: PrincipalDto,
    pub record_id: String,
    pub recorded_at: DateTime<Utc>,
    pub test: QualityTest,
}

/// Submit a processing step
#[derive(Debug, Deserialize)]
pub struct SubmitProcessingRequest {
    pub submission_id: String,
    pub principal: PrincipalDto,
    pub record_id: String,
    pub recorded_at: DateTime<Utc>,
    pub step: ProcessingStep,
}

/// Submit a batch attestation
#[derive(Debug, Deserialize)]
pub struct SubmitAttestationRequest {
    pub submission_id: String,
    pub principal: PrincipalDto,
    pub record_id: String,
    pub recorded_at: DateTime<Utc>,
    pub attestation: BatchAttestation,
}

/// Receipt for a committed submission
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub record_id: String,
    /// 0x-prefixed transaction reference
    pub tx_ref: String,
    pub sequence: u64,
}

// ============ Record DTOs ============

/// One committed record
#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub record_id: String,
    pub kind: String,
    pub sequence: u64,
    pub tx_ref: String,
    pub recorded_at: DateTime<Utc>,
    pub committed_at: DateTime<Utc>,
    pub producer_id: String,
    pub producer_role: String,
    pub producer_organization: String,
    /// Kind-tagged payload
    pub payload: RecordPayload,
}

impl RecordResponse {
    /// Build from a committed record
    pub fn from_record(record: &CommittedRecord) -> Self {
        Self {
            record_id: record.record_id.0.clone(),
            kind: record.kind().to_string(),
            sequence: record.sequence,
            tx_ref: record.tx_ref.to_hex(),
            recorded_at: record.recorded_at,
            committed_at: record.committed_at,
            producer_id: record.producer.id.clone(),
            producer_role: record.producer.role.to_string(),
            producer_organization: record.producer.organization.clone(),
            payload: record.payload.clone(),
        }
    }
}

// ============ Provenance DTOs ============

/// Resolved provenance bundle with its verification verdict
#[derive(Debug, Serialize)]
pub struct ProvenanceResponse {
    pub batch_id: Option<String>,
    pub product: Option<ProductInfo>,
    pub sustainability: Option<Sustainability>,
    pub compliance: Option<Compliance>,
    pub collection_events: Vec<RecordResponse>,
    pub quality_tests: Vec<RecordResponse>,
    pub processing_steps: Vec<RecordResponse>,
    pub attestations: Vec<RecordResponse>,
    pub snapshot_sequence: u64,
    /// `{"status": "verified"}` or
    /// `{"status": "tampered", "record_id": ...}`
    pub verification: Verdict,
}

impl ProvenanceResponse {
    /// Build from a resolved bundle and its verdict
    pub fn from_bundle(bundle: &ProvenanceBundle, verdict: Verdict) -> Self {
        Self {
            batch_id: bundle.batch_id.as_ref().map(|b| b.0.clone()),
            product: bundle.product().cloned(),
            sustainability: bundle.sustainability().cloned(),
            compliance: bundle.compliance().cloned(),
            collection_events: bundle
                .collection_events
                .iter()
                .map(RecordResponse::from_record)
                .collect(),
            quality_tests: bundle
                .quality_tests
                .iter()
                .map(RecordResponse::from_record)
                .collect(),
            processing_steps: bundle
                .processing_steps
                .iter()
                .map(RecordResponse::from_record)
                .collect(),
            attestations: bundle
                .attestations
                .iter()
                .map(RecordResponse::from_record)
                .collect(),
            snapshot_sequence: bundle.snapshot_sequence,
            verification: verdict,
        }
    }
}

/// Scan query parameters
#[derive(Debug, Deserialize)]
pub struct ScanParams {
    /// QR-code payload or bare batch id
    pub code: String,
}

// ============ Health DTOs ============

/// Health/ready response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub current_sequence: u64,
}

//! Event record model
//!
//! Four record variants flow through the ledger as a tagged enum:
//! collection events (lineage roots), quality tests, processing steps,
//! and batch attestations. Records are immutable once committed; the
//! producer-supplied timestamp is retained as display metadata only,
//! while the store-assigned commit sequence is authoritative for
//! causal ordering.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::canon;
use crate::error::LedgerResult;
use crate::types::{BatchId, Principal, RecordId, TraceDigest, TxRef};

/// Record kind discriminant, used by the role gate and the resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Collection,
    QualityTest,
    Processing,
    Attestation,
}

impl RecordKind {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collection => "collection",
            Self::QualityTest => "quality_test",
            Self::Processing => "processing",
            Self::Attestation => "attestation",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Species identity, immutable triple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub scientific_name: String,
    pub common_name: String,
    pub local_name: String,
}

/// Collected quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    /// Amount, must be finite and >= 0
    pub amount: f64,
    /// Unit of measure (e.g. "kg")
    pub unit: String,
}

/// Collection site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geolocation {
    /// Latitude in [-90, 90]
    pub latitude: f64,
    /// Longitude in [-180, 180]
    pub longitude: f64,
    pub address: String,
    pub region: String,
}

/// Qualitative appearance grade at collection time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppearanceGrade {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Initial quality snapshot taken in the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySnapshot {
    /// Moisture percentage in [0, 100]
    pub moisture: f64,
    pub appearance: AppearanceGrade,
    pub notes: String,
}

/// Collector identity attached to a collection event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectorInfo {
    pub id: String,
    pub name: String,
    pub cooperative: String,
    pub certification: String,
}

/// Root of a provenance lineage: one field collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEvent {
    pub species: Species,
    pub quantity: Quantity,
    pub location: Geolocation,
    pub initial_quality: QualitySnapshot,
    /// Opaque photo reference URIs; binary content lives elsewhere
    pub photos: Vec<String>,
    pub collector: CollectorInfo,
}

/// Pass/fail screen outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenResult {
    Passed,
    Failed,
}

/// DNA barcode verification result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnaBarcode {
    pub verified: bool,
    /// Confidence percentage in [0, 100]
    pub confidence: f64,
}

/// Laboratory identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Laboratory {
    pub name: String,
    pub accreditation: String,
    pub location: String,
}

/// Numeric and boolean laboratory results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResults {
    /// Moisture percentage in [0, 100]
    pub moisture: f64,
    pub pesticides: ScreenResult,
    pub heavy_metals: ScreenResult,
    pub dna_barcode: DnaBarcode,
    /// Active compound concentrations in mg/g, each >= 0.
    /// BTreeMap keeps canonical hashing order-stable.
    #[serde(default)]
    pub active_compounds: BTreeMap<String, f64>,
}

/// Laboratory quality test referencing one committed collection event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityTest {
    pub event_id: RecordId,
    pub laboratory: Laboratory,
    pub results: TestResults,
    /// Opaque certificate reference URI
    pub certificate_url: String,
}

/// Processing operation applied to a lot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Drying,
    Grinding,
    Extraction,
    Packaging,
}

impl StepType {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drying => "drying",
            Self::Grinding => "grinding",
            Self::Extraction => "extraction",
            Self::Packaging => "packaging",
        }
    }
}

/// Processing conditions; each, when present, must be non-negative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProcessingConditions {
    /// Temperature in degrees Celsius
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Relative humidity percentage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    /// Duration in hours
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<f64>,
}

/// Processor identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorInfo {
    pub name: String,
    pub location: String,
    pub license: String,
}

/// One processing operation on a batch; many steps may share a batch id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStep {
    pub event_id: RecordId,
    pub batch_id: BatchId,
    pub step_type: StepType,
    #[serde(default)]
    pub conditions: ProcessingConditions,
    pub processor: ProcessorInfo,
}

/// Finished-product metadata; expiry must be after manufacturing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub name: String,
    pub scientific_name: String,
    pub formulation: String,
    pub net_weight: String,
    pub manufacturing_date: NaiveDate,
    pub expiry_date: NaiveDate,
}

/// Batch-level sustainability flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sustainability {
    pub fair_trade: bool,
    pub organic: bool,
    pub biodiversity_impact: String,
    /// kg CO2e per unit, >= 0
    pub carbon_footprint: f64,
}

/// Batch-level compliance flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compliance {
    pub regulatory_approval: bool,
    pub export_certification: bool,
    pub gmp_compliant: bool,
}

/// Manufacturer attestation sealing product metadata onto a bound batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchAttestation {
    pub batch_id: BatchId,
    pub product: ProductInfo,
    pub sustainability: Sustainability,
    pub compliance: Compliance,
}

/// Record payload, tagged-variant dispatch over the four kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordPayload {
    Collection(CollectionEvent),
    QualityTest(QualityTest),
    Processing(ProcessingStep),
    Attestation(BatchAttestation),
}

impl RecordPayload {
    /// The kind discriminant for this payload
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Collection(_) => RecordKind::Collection,
            Self::QualityTest(_) => RecordKind::QualityTest,
            Self::Processing(_) => RecordKind::Processing,
            Self::Attestation(_) => RecordKind::Attestation,
        }
    }

    /// The collection event this payload depends on, if any
    pub fn event_ref(&self) -> Option<&RecordId> {
        match self {
            Self::Collection(_) => None,
            Self::QualityTest(t) => Some(&t.event_id),
            Self::Processing(p) => Some(&p.event_id),
            Self::Attestation(_) => None,
        }
    }

    /// The batch this payload declares, if any
    pub fn batch_ref(&self) -> Option<&BatchId> {
        match self {
            Self::Collection(_) | Self::QualityTest(_) => None,
            Self::Processing(p) => Some(&p.batch_id),
            Self::Attestation(a) => Some(&a.batch_id),
        }
    }
}

/// A record as submitted by a producer, before commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftRecord {
    pub record_id: RecordId,
    /// Producer-supplied timestamp; advisory only
    pub recorded_at: DateTime<Utc>,
    pub payload: RecordPayload,
}

impl DraftRecord {
    /// The kind discriminant for this draft
    pub fn kind(&self) -> RecordKind {
        self.payload.kind()
    }

    /// Canonical content digest over id, timestamp, producer and payload
    pub fn content_digest(&self, producer: &Principal) -> LedgerResult<TraceDigest> {
        canon::content_digest(&ContentView {
            record_id: &self.record_id,
            recorded_at: &self.recorded_at,
            producer,
            payload: &self.payload,
        })
    }
}

/// A record as committed to the ledger store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommittedRecord {
    pub record_id: RecordId,
    /// Producer-supplied timestamp, retained as display metadata
    pub recorded_at: DateTime<Utc>,
    pub producer: Principal,
    pub payload: RecordPayload,
    /// Store-assigned commit sequence number; authoritative ordering
    pub sequence: u64,
    /// Wall-clock commit time (store metadata, not part of the txRef)
    pub committed_at: DateTime<Utc>,
    pub tx_ref: TxRef,
}

impl CommittedRecord {
    /// The kind discriminant for this record
    pub fn kind(&self) -> RecordKind {
        self.payload.kind()
    }

    /// Canonical content digest, recomputable for integrity checks
    pub fn content_digest(&self) -> LedgerResult<TraceDigest> {
        canon::content_digest(&ContentView {
            record_id: &self.record_id,
            recorded_at: &self.recorded_at,
            producer: &self.producer,
            payload: &self.payload,
        })
    }

    /// Recompute the transaction reference this record should carry
    pub fn expected_tx_ref(&self) -> LedgerResult<TxRef> {
        Ok(canon::tx_ref(&self.content_digest()?, self.sequence))
    }
}

/// Borrowed view of the content fields covered by the txRef.
///
/// Draft and committed records hash through this one view so the digest
/// is identical on both sides of the commit.
#[derive(Serialize)]
struct ContentView<'a> {
    record_id: &'a RecordId,
    recorded_at: &'a DateTime<Utc>,
    producer: &'a Principal,
    payload: &'a RecordPayload,
}

/// Receipt returned to a producer for a committed submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub record_id: RecordId,
    pub tx_ref: TxRef,
    pub sequence: u64,
}

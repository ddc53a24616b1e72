//! Provenance bundle assembly and integrity verification
//!
//! A bundle is the read-only, derived aggregate for one batch: it is
//! recomputed on every resolution and never stored. The verifier
//! recomputes each member's transaction reference and checks reference
//! closure before a bundle may be reported as verified.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::LedgerResult;
use crate::types::{
    BatchAttestation, BatchId, CommittedRecord, Compliance, ProductInfo, RecordId, RecordKind,
    RecordPayload, Sustainability,
};

/// Resolved provenance view for a batch (or a lone collection lineage)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceBundle {
    /// Batch identifier; `None` when the lineage has not been bound to
    /// a batch yet and resolution went through the lineage root
    pub batch_id: Option<BatchId>,
    /// Collection events, commit sequence ascending
    pub collection_events: Vec<CommittedRecord>,
    /// Quality tests, commit sequence ascending
    pub quality_tests: Vec<CommittedRecord>,
    /// Processing steps, commit sequence ascending — the supply-chain
    /// journey order consumers see
    pub processing_steps: Vec<CommittedRecord>,
    /// Batch attestations, commit sequence ascending
    pub attestations: Vec<CommittedRecord>,
    /// Highest commit sequence contained in this bundle
    pub snapshot_sequence: u64,
}

impl ProvenanceBundle {
    /// Assemble a bundle from an unordered record set.
    ///
    /// Partitions by kind and orders every partition by commit
    /// sequence; producer-supplied timestamps take no part in this.
    pub fn assemble(batch_id: Option<BatchId>, mut records: Vec<CommittedRecord>) -> Self {
        records.sort_by_key(|r| r.sequence);
        let snapshot_sequence = records.last().map(|r| r.sequence).unwrap_or(0);

        let mut bundle = Self {
            batch_id,
            collection_events: Vec::new(),
            quality_tests: Vec::new(),
            processing_steps: Vec::new(),
            attestations: Vec::new(),
            snapshot_sequence,
        };
        for record in records {
            match record.kind() {
                RecordKind::Collection => bundle.collection_events.push(record),
                RecordKind::QualityTest => bundle.quality_tests.push(record),
                RecordKind::Processing => bundle.processing_steps.push(record),
                RecordKind::Attestation => bundle.attestations.push(record),
            }
        }
        bundle
    }

    /// Total number of records in the bundle
    pub fn len(&self) -> usize {
        self.collection_events.len()
            + self.quality_tests.len()
            + self.processing_steps.len()
            + self.attestations.len()
    }

    /// True when the bundle holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All records, commit sequence ascending
    pub fn records(&self) -> Vec<&CommittedRecord> {
        let mut all: Vec<&CommittedRecord> = self
            .collection_events
            .iter()
            .chain(self.quality_tests.iter())
            .chain(self.processing_steps.iter())
            .chain(self.attestations.iter())
            .collect();
        all.sort_by_key(|r| r.sequence);
        all
    }

    /// The latest committed attestation payload, if any
    pub fn attestation(&self) -> Option<&BatchAttestation> {
        self.attestations.last().and_then(|r| match &r.payload {
            RecordPayload::Attestation(a) => Some(a),
            _ => None,
        })
    }

    /// Product metadata from the latest attestation
    pub fn product(&self) -> Option<&ProductInfo> {
        self.attestation().map(|a| &a.product)
    }

    /// Sustainability flags from the latest attestation
    pub fn sustainability(&self) -> Option<&Sustainability> {
        self.attestation().map(|a| &a.sustainability)
    }

    /// Compliance flags from the latest attestation
    pub fn compliance(&self) -> Option<&Compliance> {
        self.attestation().map(|a| &a.compliance)
    }
}

/// Outcome of bundle verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    /// Every transaction reference recomputed cleanly and the reference
    /// graph is closed
    Verified,
    /// A record failed recomputation or references outside the bundle
    Tampered { record_id: RecordId },
}

impl Verdict {
    /// True for the verified outcome
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }
}

/// Bundle integrity verifier
///
/// Read-only and side-effect-free. A `Tampered` verdict is reported to
/// the caller alongside the bundle, never silently dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundleVerifier;

impl BundleVerifier {
    /// Create a new verifier
    pub fn new() -> Self {
        Self
    }

    /// Verify a resolved bundle
    pub fn verify(&self, bundle: &ProvenanceBundle) -> LedgerResult<Verdict> {
        // 1. Recompute each record's txRef from content + sequence.
        for record in bundle.records() {
            if record.expected_tx_ref()? != record.tx_ref {
                return Ok(Verdict::Tampered {
                    record_id: record.record_id.clone(),
                });
            }
        }

        // 2. Closure: every event_id must resolve inside the bundle.
        let roots: HashSet<&RecordId> = bundle
            .collection_events
            .iter()
            .map(|r| &r.record_id)
            .collect();
        for record in bundle.quality_tests.iter().chain(&bundle.processing_steps) {
            match record.payload.event_ref() {
                Some(event_id) if roots.contains(event_id) => {}
                _ => {
                    return Ok(Verdict::Tampered {
                        record_id: record.record_id.clone(),
                    })
                }
            }
        }

        // 3. Batch-scoped records must agree with the bundle's batch.
        if let Some(ref batch_id) = bundle.batch_id {
            for record in bundle.processing_steps.iter().chain(&bundle.attestations) {
                if record.payload.batch_ref() != Some(batch_id) {
                    return Ok(Verdict::Tampered {
                        record_id: record.record_id.clone(),
                    });
                }
            }
        }

        Ok(Verdict::Verified)
    }
}

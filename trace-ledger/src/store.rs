//! In-memory append-only ledger store
//!
//! All mutable state lives behind one `tokio::sync::RwLock`. The
//! commit critical section covers duplicate checks, sequence
//! assignment, the append itself and the linkage-index update, so a
//! record and its index entries become visible together or not at all.
//! Validation, authorization and canonical hashing happen before the
//! lock is taken.
//!
//! The linkage index is derived state: every map in `LedgerState`
//! besides `records` and `log` can be rebuilt by replaying the log.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use trace_core::canon;
use trace_core::error::{LedgerError, LedgerResult};
use trace_core::ledger::ProvenanceStore;
use trace_core::types::{
    BatchId, CommittedRecord, DraftRecord, Principal, RecordId, RecordPayload, SubmissionId,
    SubmitReceipt, TraceDigest,
};

#[derive(Default)]
struct LedgerState {
    /// Last assigned commit sequence number; 0 means empty
    sequence: u64,
    /// Append order of record ids
    log: Vec<RecordId>,
    /// Committed records by id
    records: HashMap<RecordId, CommittedRecord>,
    /// Content digest -> record id, for duplicate detection
    by_content: HashMap<TraceDigest, RecordId>,
    /// Submission id -> issued receipt, for idempotent retries
    by_submission: HashMap<SubmissionId, SubmitReceipt>,
    /// Collection event id -> dependent record ids, commit order
    lineage: HashMap<RecordId, Vec<RecordId>>,
    /// Collection event id -> the one batch its lineage is bound to
    batch_of_lineage: HashMap<RecordId, BatchId>,
    /// Batch id -> the one collection event rooting its lineage
    lineage_of_batch: HashMap<BatchId, RecordId>,
    /// Batch id -> batch-level attestation record ids, commit order
    batch_records: HashMap<BatchId, Vec<RecordId>>,
}

impl LedgerState {
    /// Referential checks that must run under the write lock, before
    /// anything is mutated. Returns the batch binding to apply, if the
    /// record declares one.
    fn check_references(
        &self,
        draft: &DraftRecord,
    ) -> LedgerResult<Option<(RecordId, BatchId)>> {
        match &draft.payload {
            RecordPayload::Collection(_) => Ok(None),
            RecordPayload::QualityTest(test) => {
                self.require_collection(&draft.record_id, &test.event_id)?;
                Ok(None)
            }
            RecordPayload::Processing(step) => {
                self.require_collection(&draft.record_id, &step.event_id)?;

                // One lineage per batch, one batch per lineage. First
                // processing step to declare a batch id wins; every
                // later record must agree.
                if let Some(bound) = self.batch_of_lineage.get(&step.event_id) {
                    if *bound != step.batch_id {
                        return Err(LedgerError::BatchIdentityConflict {
                            batch_id: step.batch_id.clone(),
                            detail: format!(
                                "lineage {} is already bound to batch {}",
                                step.event_id, bound
                            ),
                        });
                    }
                }
                if let Some(root) = self.lineage_of_batch.get(&step.batch_id) {
                    if *root != step.event_id {
                        return Err(LedgerError::BatchIdentityConflict {
                            batch_id: step.batch_id.clone(),
                            detail: format!(
                                "batch is already bound to lineage {}, cannot adopt {}",
                                root, step.event_id
                            ),
                        });
                    }
                }
                Ok(Some((step.event_id.clone(), step.batch_id.clone())))
            }
            RecordPayload::Attestation(attestation) => {
                if !self.lineage_of_batch.contains_key(&attestation.batch_id) {
                    return Err(LedgerError::DanglingReference {
                        record_id: draft.record_id.clone(),
                        reference: format!("batch {}", attestation.batch_id),
                    });
                }
                Ok(None)
            }
        }
    }

    fn require_collection(
        &self,
        referencing: &RecordId,
        event_id: &RecordId,
    ) -> LedgerResult<()> {
        match self.records.get(event_id) {
            Some(record) if matches!(record.payload, RecordPayload::Collection(_)) => Ok(()),
            _ => Err(LedgerError::DanglingReference {
                record_id: referencing.clone(),
                reference: format!("collection event {}", event_id),
            }),
        }
    }

    /// Apply index updates for a just-committed record
    fn index(&mut self, record: &CommittedRecord, binding: Option<(RecordId, BatchId)>) {
        match &record.payload {
            RecordPayload::Collection(_) => {
                self.lineage.insert(record.record_id.clone(), Vec::new());
            }
            RecordPayload::QualityTest(test) => {
                self.lineage
                    .entry(test.event_id.clone())
                    .or_default()
                    .push(record.record_id.clone());
            }
            RecordPayload::Processing(step) => {
                self.lineage
                    .entry(step.event_id.clone())
                    .or_default()
                    .push(record.record_id.clone());
            }
            RecordPayload::Attestation(attestation) => {
                self.batch_records
                    .entry(attestation.batch_id.clone())
                    .or_default()
                    .push(record.record_id.clone());
            }
        }
        if let Some((event_id, batch_id)) = binding {
            self.batch_of_lineage
                .entry(event_id.clone())
                .or_insert_with(|| batch_id.clone());
            self.lineage_of_batch.entry(batch_id).or_insert(event_id);
        }
    }
}

/// In-memory append-only ledger
#[derive(Default)]
pub struct MemoryLedger {
    state: RwLock<LedgerState>,
}

impl MemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProvenanceStore for MemoryLedger {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn current_sequence(&self) -> u64 {
        self.state.read().await.sequence
    }

    async fn append(
        &self,
        draft: DraftRecord,
        producer: Principal,
        submission_id: SubmissionId,
    ) -> LedgerResult<SubmitReceipt> {
        // Canonical hashing happens outside the lock.
        let content_digest = draft.content_digest(&producer)?;

        let mut state = self.state.write().await;

        // Idempotent replay: same submission id returns the original
        // receipt without touching the log.
        if let Some(receipt) = state.by_submission.get(&submission_id) {
            return Ok(receipt.clone());
        }

        if let Some(existing_id) = state.by_content.get(&content_digest) {
            let existing = &state.records[existing_id];
            return Err(LedgerError::DuplicateRecord {
                record_id: existing.record_id.clone(),
                tx_ref: existing.tx_ref,
            });
        }

        if state.records.contains_key(&draft.record_id) {
            return Err(LedgerError::RecordIdInUse(draft.record_id));
        }

        let binding = state.check_references(&draft)?;

        let sequence = state.sequence + 1;
        let tx_ref = canon::tx_ref(&content_digest, sequence);
        let record = CommittedRecord {
            record_id: draft.record_id,
            recorded_at: draft.recorded_at,
            producer,
            payload: draft.payload,
            sequence,
            committed_at: Utc::now(),
            tx_ref,
        };
        let receipt = SubmitReceipt {
            record_id: record.record_id.clone(),
            tx_ref,
            sequence,
        };

        state.sequence = sequence;
        state.log.push(record.record_id.clone());
        state.by_content.insert(content_digest, record.record_id.clone());
        state
            .by_submission
            .insert(submission_id, receipt.clone());
        state.index(&record, binding);
        state.records.insert(record.record_id.clone(), record);

        debug!(
            record_id = %receipt.record_id,
            sequence = receipt.sequence,
            "record committed"
        );
        Ok(receipt)
    }

    async fn get(&self, record_id: &RecordId) -> LedgerResult<Option<CommittedRecord>> {
        Ok(self.state.read().await.records.get(record_id).cloned())
    }

    async fn get_many(
        &self,
        record_ids: &[RecordId],
    ) -> LedgerResult<Vec<Option<CommittedRecord>>> {
        let state = self.state.read().await;
        Ok(record_ids
            .iter()
            .map(|id| state.records.get(id).cloned())
            .collect())
    }

    async fn lookup_batch(&self, batch_id: &BatchId) -> LedgerResult<Vec<RecordId>> {
        let state = self.state.read().await;
        let mut ids = Vec::new();
        if let Some(root) = state.lineage_of_batch.get(batch_id) {
            ids.push(root.clone());
            if let Some(dependents) = state.lineage.get(root) {
                ids.extend(dependents.iter().cloned());
            }
            if let Some(attestations) = state.batch_records.get(batch_id) {
                ids.extend(attestations.iter().cloned());
            }
        }
        Ok(ids)
    }

    async fn lookup_lineage(&self, event_id: &RecordId) -> LedgerResult<Vec<RecordId>> {
        let state = self.state.read().await;
        let mut ids = Vec::new();
        let is_collection = matches!(
            state.records.get(event_id),
            Some(record) if matches!(record.payload, RecordPayload::Collection(_))
        );
        if is_collection {
            ids.push(event_id.clone());
            if let Some(dependents) = state.lineage.get(event_id) {
                ids.extend(dependents.iter().cloned());
            }
        }
        Ok(ids)
    }

    async fn find_submission(
        &self,
        submission_id: &SubmissionId,
    ) -> LedgerResult<Option<SubmitReceipt>> {
        Ok(self
            .state
            .read()
            .await
            .by_submission
            .get(submission_id)
            .cloned())
    }

    async fn verify_integrity(&self) -> LedgerResult<bool> {
        let state = self.state.read().await;
        for id in &state.log {
            let record = match state.records.get(id) {
                Some(record) => record,
                None => return Ok(false),
            };
            if record.expected_tx_ref()? != record.tx_ref {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

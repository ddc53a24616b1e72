//! Ledger store contract
//!
//! The store is append-only and content-addressed: records are never
//! updated or deleted, every commit is assigned a strictly increasing
//! sequence number and a transaction reference, and the linkage index
//! (batch id / lineage -> record ids) is updated atomically with each
//! append. The index is derived state, fully rebuildable from the
//! record log — a cache, not a source of truth.
//!
//! `trace-ledger` provides the in-memory implementation; any
//! append-only replicated backend satisfying this contract can stand
//! in for it.

use async_trait::async_trait;

use crate::error::LedgerResult;
use crate::types::{
    BatchId, CommittedRecord, DraftRecord, Principal, RecordId, SubmissionId, SubmitReceipt,
};

/// Append-only provenance store with its derived linkage index
#[async_trait]
pub trait ProvenanceStore: Send + Sync {
    /// Store name, for diagnostics
    fn name(&self) -> &'static str;

    /// The most recently assigned commit sequence number (0 if empty)
    async fn current_sequence(&self) -> u64;

    /// Atomically commit a record and update the linkage index.
    ///
    /// Enforces, inside one critical section: submission-id idempotency
    /// (a replayed submission returns the original receipt), content
    /// dedup (`DuplicateRecord`), record-id uniqueness, referential
    /// integrity of `event_id` (`DanglingReference`) and the
    /// one-lineage-per-batch rule (`BatchIdentityConflict`).
    async fn append(
        &self,
        draft: DraftRecord,
        producer: Principal,
        submission_id: SubmissionId,
    ) -> LedgerResult<SubmitReceipt>;

    /// Fetch one committed record
    async fn get(&self, record_id: &RecordId) -> LedgerResult<Option<CommittedRecord>>;

    /// Fetch many records in one read snapshot
    async fn get_many(&self, record_ids: &[RecordId])
        -> LedgerResult<Vec<Option<CommittedRecord>>>;

    /// All record ids linked to a batch: the lineage root, its
    /// dependents, and batch-level attestations. Empty for an unknown
    /// batch — absence of data is not failure.
    async fn lookup_batch(&self, batch_id: &BatchId) -> LedgerResult<Vec<RecordId>>;

    /// All record ids in the lineage rooted at a collection event
    /// (including the root). Empty if the id is unknown or not a
    /// collection event.
    async fn lookup_lineage(&self, event_id: &RecordId) -> LedgerResult<Vec<RecordId>>;

    /// The receipt previously issued for a submission id, if any
    async fn find_submission(
        &self,
        submission_id: &SubmissionId,
    ) -> LedgerResult<Option<SubmitReceipt>>;

    /// Recompute every committed record's transaction reference against
    /// its stored value. True when the whole log checks out.
    async fn verify_integrity(&self) -> LedgerResult<bool>;
}

//! Ingestion gateway
//!
//! Validates, authorizes, deduplicates and commits incoming drafts.
//! The linkage index is updated synchronously with the append, so a
//! record is resolvable the moment `submit` returns.

use std::sync::Arc;
use tracing::{info, warn};

use trace_core::authz;
use trace_core::error::{LedgerError, LedgerResult};
use trace_core::ledger::ProvenanceStore;
use trace_core::types::{DraftRecord, Principal, SubmissionId, SubmitReceipt};

use crate::validation;

/// Ingestion gateway over a shared provenance store
pub struct IngestionService {
    store: Arc<dyn ProvenanceStore>,
}

impl IngestionService {
    /// Create a new ingestion service
    pub fn new(store: Arc<dyn ProvenanceStore>) -> Self {
        Self { store }
    }

    /// Submit one event record.
    ///
    /// Check order: field validation, role gate, idempotency fast
    /// path, then the atomic commit (which settles referential
    /// integrity and batch identity under the store's write lock).
    /// A replayed submission id and a content-identical resubmission
    /// both return the original receipt.
    pub async fn submit(
        &self,
        draft: DraftRecord,
        principal: Principal,
        submission_id: SubmissionId,
    ) -> LedgerResult<SubmitReceipt> {
        validation::validate_draft(&draft)?;
        authz::authorize(&principal, draft.kind())?;

        if let Some(receipt) = self.store.find_submission(&submission_id).await? {
            info!(
                record_id = %receipt.record_id,
                submission_id = %submission_id,
                "replayed submission, returning original receipt"
            );
            return Ok(receipt);
        }

        let kind = draft.kind();
        match self.store.append(draft, principal, submission_id).await {
            Ok(receipt) => {
                info!(
                    record_id = %receipt.record_id,
                    kind = %kind,
                    sequence = receipt.sequence,
                    tx_ref = %receipt.tx_ref,
                    "record ingested"
                );
                Ok(receipt)
            }
            // Content already committed under another submission id:
            // treat as a retry and hand back the original receipt.
            Err(LedgerError::DuplicateRecord { record_id, tx_ref }) => {
                warn!(
                    record_id = %record_id,
                    "duplicate content resubmitted, returning original receipt"
                );
                let record = self.store.get(&record_id).await?.ok_or(
                    LedgerError::IncompleteChain {
                        record_id: record_id.clone(),
                    },
                )?;
                Ok(SubmitReceipt {
                    record_id,
                    tx_ref,
                    sequence: record.sequence,
                })
            }
            Err(err) => {
                warn!(error = %err, kind = %kind, "submission rejected");
                Err(err)
            }
        }
    }
}

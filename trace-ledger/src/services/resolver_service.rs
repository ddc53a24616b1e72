//! Provenance resolver
//!
//! Gathers the record set for a batch from the linkage index, fetches
//! the records, assembles the ordered bundle and runs the integrity
//! verifier. Bundles are recomputed on every request; nothing is
//! persisted here.

use std::sync::Arc;
use tracing::{debug, error};

use trace_core::bundle::{BundleVerifier, ProvenanceBundle, Verdict};
use trace_core::error::{LedgerError, LedgerResult};
use trace_core::ledger::ProvenanceStore;
use trace_core::types::{BatchId, CommittedRecord, RecordId};

/// A resolved bundle together with its verification verdict.
///
/// A `Tampered` verdict never suppresses the bundle; both travel to
/// the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProvenance {
    pub bundle: ProvenanceBundle,
    pub verdict: Verdict,
}

/// Extract a batch identifier from a QR-code payload.
///
/// Consumer QR codes encode a URL whose trailing path segment is the
/// batch id (e.g. `https://trace.example.com/batch/ASH-2024-001-KR`).
/// A bare batch id passes through unchanged.
pub fn batch_id_from_scan(payload: &str) -> &str {
    let trimmed = payload.trim();
    let without_query = trimmed.split(['?', '#']).next().unwrap_or(trimmed);
    without_query
        .split('/')
        .filter(|segment| !segment.is_empty())
        .last()
        .unwrap_or(trimmed)
}

/// Provenance resolver over a shared store
pub struct ResolverService {
    store: Arc<dyn ProvenanceStore>,
    verifier: BundleVerifier,
}

impl ResolverService {
    /// Create a new resolver
    pub fn new(store: Arc<dyn ProvenanceStore>) -> Self {
        Self {
            store,
            verifier: BundleVerifier::new(),
        }
    }

    /// Resolve an identifier into a provenance bundle.
    ///
    /// The identifier is tried as a batch id first; if no batch
    /// binding exists it is retried as a collection-event record id,
    /// which covers lineages no processing step has bound to a batch
    /// yet. An empty result set is `NotFound`.
    pub async fn resolve(&self, identifier: &str) -> LedgerResult<ProvenanceBundle> {
        let batch_id = BatchId(identifier.to_string());
        let mut ids = self.store.lookup_batch(&batch_id).await?;
        let mut bound_batch = Some(batch_id);

        if ids.is_empty() {
            ids = self
                .store
                .lookup_lineage(&RecordId(identifier.to_string()))
                .await?;
            bound_batch = None;
        }
        if ids.is_empty() {
            return Err(LedgerError::NotFound(identifier.to_string()));
        }

        let records = self.fetch_all(&ids).await?;
        debug!(
            identifier,
            count = records.len(),
            "assembled provenance bundle"
        );
        Ok(ProvenanceBundle::assemble(bound_batch, records))
    }

    /// Resolve an identifier and verify the resulting bundle
    pub async fn resolve_verified(&self, identifier: &str) -> LedgerResult<ResolvedProvenance> {
        let bundle = self.resolve(identifier).await?;
        let verdict = self.verifier.verify(&bundle)?;
        if let Verdict::Tampered { ref record_id } = verdict {
            error!(
                identifier,
                record_id = %record_id,
                "integrity verification failed for resolved bundle"
            );
        }
        Ok(ResolvedProvenance { bundle, verdict })
    }

    /// Resolve a QR-code payload (or bare batch id) and verify
    pub async fn resolve_scan(&self, payload: &str) -> LedgerResult<ResolvedProvenance> {
        self.resolve_verified(batch_id_from_scan(payload)).await
    }

    /// Fetch every indexed record; a miss means the store and index
    /// have diverged and surfaces as `IncompleteChain`.
    async fn fetch_all(&self, ids: &[RecordId]) -> LedgerResult<Vec<CommittedRecord>> {
        let fetched = self.store.get_many(ids).await?;
        let mut records = Vec::with_capacity(ids.len());
        for (id, record) in ids.iter().zip(fetched) {
            match record {
                Some(record) => records.push(record),
                None => {
                    error!(record_id = %id, "linkage index references a missing record");
                    return Err(LedgerError::IncompleteChain {
                        record_id: id.clone(),
                    });
                }
            }
        }
        Ok(records)
    }
}

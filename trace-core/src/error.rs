//! Error types for the provenance ledger core

use thiserror::Error;

use crate::types::{BatchId, RecordId, RecordKind, Role, TxRef};

/// Ledger operation errors
///
/// Every rejection the core can produce is a typed variant here; none of
/// them are retried automatically. `DuplicateRecord` carries the original
/// commit so the ingestion gateway can recover it idempotently.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Role {role} is not authorized to submit {kind} records")]
    UnauthorizedRole { role: Role, kind: RecordKind },

    #[error("Record {record_id} references unknown {reference}")]
    DanglingReference {
        record_id: RecordId,
        reference: String,
    },

    #[error("Batch identity conflict for {batch_id}: {detail}")]
    BatchIdentityConflict { batch_id: BatchId, detail: String },

    #[error("Duplicate record content; originally committed as {record_id} with txRef {tx_ref}")]
    DuplicateRecord { record_id: RecordId, tx_ref: TxRef },

    #[error("Record id {0} is already committed with different content")]
    RecordIdInUse(RecordId),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Incomplete chain: record {record_id} is indexed but missing from the ledger store")]
    IncompleteChain { record_id: RecordId },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

//! Canonicalization and transaction-reference derivation
//!
//! Records are hashed over a canonical JSON form with a domain
//! separation tag prepended, so digests from different contexts can
//! never collide. Canonical form is obtained by round-tripping through
//! `serde_json::Value`, whose object representation orders keys; the
//! result is stable across runs and field-declaration order.

use serde::Serialize;

use crate::error::LedgerResult;
use crate::types::{TraceDigest, TxRef};

/// Canonicalization scheme version, baked into the domain tags
pub const CANON_VERSION: &str = "v1";

/// Domain separation tags for hashing contexts
pub mod domain_tags {
    /// Tag for record content digests
    pub const RECORD_CONTENT: &[u8] = b"trace:record:v1\0";
    /// Tag for transaction references
    pub const TX_REF: &[u8] = b"trace:txref:v1\0";
}

/// Serialize a value into canonical JSON bytes
pub fn canonical_json<T: Serialize>(value: &T) -> LedgerResult<Vec<u8>> {
    let normalized = serde_json::to_value(value)?;
    Ok(serde_json::to_vec(&normalized)?)
}

/// Compute the tagged content digest of a record's canonical form
pub fn content_digest<T: Serialize>(content: &T) -> LedgerResult<TraceDigest> {
    let canonical = canonical_json(content)?;
    let mut tagged = domain_tags::RECORD_CONTENT.to_vec();
    tagged.extend_from_slice(&canonical);
    Ok(TraceDigest::blake3(&tagged))
}

/// Derive the transaction reference for a content digest committed at
/// the given sequence number.
///
/// The sequence breaks ties between identical content committed at
/// different times; identical retried submissions never reach this far
/// (they are deduplicated upstream by submission id and content digest).
pub fn tx_ref(content: &TraceDigest, sequence: u64) -> TxRef {
    let mut tagged = domain_tags::TX_REF.to_vec();
    tagged.extend_from_slice(content.as_bytes());
    tagged.extend_from_slice(&sequence.to_be_bytes());
    TxRef(TraceDigest::blake3(&tagged))
}

//! Identifier newtypes and digest primitives
//!
//! The ledger uses fixed 32-byte BLAKE3 digests for content hashes and
//! transaction references. Identifiers are producer-supplied strings
//! wrapped in newtypes so the cross-reference graph stays typed.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error type for digest parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DigestError {
    #[error("Invalid digest length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid hex string: {0}")]
    InvalidHex(String),
}

impl From<hex::FromHexError> for DigestError {
    fn from(err: hex::FromHexError) -> Self {
        DigestError::InvalidHex(err.to_string())
    }
}

/// 32-byte fixed-size BLAKE3 digest
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceDigest(pub [u8; 32]);

impl TraceDigest {
    /// Create a new digest from bytes
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Compute the BLAKE3 digest of raw bytes
    pub fn blake3(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Parse a digest from a hex string
    pub fn from_hex(s: &str) -> Result<Self, DigestError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(DigestError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Convert to a hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Create a zero digest (null marker)
    pub fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Check if this is a zero digest
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }
}

impl fmt::Debug for TraceDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TraceDigest({}...)", &self.to_hex()[..16])
    }
}

impl fmt::Display for TraceDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Default for TraceDigest {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transaction reference: the ledger receipt for a committed record
///
/// Derived deterministically from canonical record content and the
/// store-assigned commit sequence number. Unique process-wide; opaque
/// to callers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxRef(pub TraceDigest);

impl TxRef {
    /// Render as a 0x-prefixed hex string
    pub fn to_hex(&self) -> String {
        format!("0x{}", self.0.to_hex())
    }

    /// Parse from a hex string, with or without the 0x prefix
    pub fn from_hex(s: &str) -> Result<Self, DigestError> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        Ok(Self(TraceDigest::from_hex(stripped)?))
    }

    /// Get the underlying digest
    pub fn digest(&self) -> &TraceDigest {
        &self.0
    }
}

impl fmt::Debug for TxRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxRef({}...)", &self.0.to_hex()[..16])
    }
}

impl fmt::Display for TxRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Unique record identifier, producer-supplied (e.g. "CE-001")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Finished-lot identifier (e.g. "ASH-2024-001-KR")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchId(pub String);

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Client-supplied idempotency key for a submission
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

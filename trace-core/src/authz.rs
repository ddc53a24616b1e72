//! Identity & role gate
//!
//! One capability check parameterized by role and record kind replaces
//! the per-role dashboards of the surrounding UI. Stateless and
//! side-effect-free.

use crate::error::{LedgerError, LedgerResult};
use crate::types::{Principal, RecordKind, Role};

/// The producer role required to submit a given record kind
pub fn required_role(kind: RecordKind) -> Role {
    match kind {
        RecordKind::Collection => Role::Collector,
        RecordKind::QualityTest => Role::Lab,
        RecordKind::Processing => Role::Processor,
        RecordKind::Attestation => Role::Manufacturer,
    }
}

/// Check that a principal may submit a record of the given kind
pub fn authorize(principal: &Principal, kind: RecordKind) -> LedgerResult<()> {
    if principal.role == required_role(kind) {
        Ok(())
    } else {
        Err(LedgerError::UnauthorizedRole {
            role: principal.role,
            kind,
        })
    }
}

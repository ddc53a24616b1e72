//! Trace Ledger
//!
//! Storage and service layer for the HerbTrace provenance ledger:
//!
//! - `MemoryLedger` — the in-memory append-only record store with its
//!   derived linkage index, satisfying `trace_core::ProvenanceStore`
//! - Field validation for incoming drafts
//! - `IngestionService` — validate, authorize, deduplicate, commit
//! - `ResolverService` — batch resolution into verified bundles

pub mod services;
pub mod store;
pub mod validation;

pub use services::{IngestionService, ResolvedProvenance, ResolverService};
pub use store::MemoryLedger;

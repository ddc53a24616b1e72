//! Provenance services layered on the ledger store

mod ingestion_service;
mod resolver_service;

pub use ingestion_service::IngestionService;
pub use resolver_service::{batch_id_from_scan, ResolvedProvenance, ResolverService};

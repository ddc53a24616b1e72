//! Application state for the API server

use std::sync::Arc;

use trace_core::ledger::ProvenanceStore;
use trace_ledger::{IngestionService, MemoryLedger, ResolverService};

/// API server state
#[derive(Clone)]
pub struct AppState {
    /// Ingestion gateway
    pub ingestion: Arc<IngestionService>,
    /// Provenance resolver
    pub resolver: Arc<ResolverService>,
    /// Shared store handle, for health checks
    pub store: Arc<dyn ProvenanceStore>,
    /// API version
    pub version: String,
}

impl AppState {
    /// Create app state over a fresh in-memory ledger
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryLedger::new()))
    }

    /// Create app state over an existing store
    pub fn with_store(store: Arc<dyn ProvenanceStore>) -> Self {
        Self {
            ingestion: Arc::new(IngestionService::new(store.clone())),
            resolver: Arc::new(ResolverService::new(store.clone())),
            store,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
        }
    }
}

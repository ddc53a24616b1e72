//! HerbTrace API Server
//!
//! REST boundary for the provenance ledger.
//!
//! ## Endpoints
//!
//! ### Producer submission
//! - POST /records/collection - Submit a collection event
//! - POST /records/quality-test - Submit a laboratory quality test
//! - POST /records/processing - Submit a processing step
//! - POST /records/attestation - Submit a batch attestation
//!
//! ### Consumer queries
//! - GET /records/:record_id - Fetch one committed record
//! - GET /provenance/:batch_id - Resolve a batch into a verified bundle
//! - GET /scan?code=... - Resolve a QR-code payload
//!
//! ### Operations
//! - GET /health - Liveness
//! - GET /ready - Ledger integrity check

pub mod dto;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use dto::*;
pub use error::*;
pub use routes::*;
pub use server::*;
pub use state::*;

//! API Error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use trace_core::error::LedgerError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::Ledger(err) => {
                let (status, code) = ledger_status(err);
                (status, code, err.to_string())
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Map ledger rejections onto HTTP statuses and stable error codes
fn ledger_status(err: &LedgerError) -> (StatusCode, &'static str) {
    match err {
        LedgerError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        LedgerError::UnauthorizedRole { .. } => (StatusCode::FORBIDDEN, "UNAUTHORIZED_ROLE"),
        LedgerError::DanglingReference { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "DANGLING_REFERENCE")
        }
        LedgerError::BatchIdentityConflict { .. } => {
            (StatusCode::CONFLICT, "BATCH_IDENTITY_CONFLICT")
        }
        // The ingestion gateway recovers duplicates into the original
        // receipt; reaching here means a direct store-level conflict.
        LedgerError::DuplicateRecord { .. } => (StatusCode::CONFLICT, "DUPLICATE_RECORD"),
        LedgerError::RecordIdInUse(_) => (StatusCode::CONFLICT, "RECORD_ID_IN_USE"),
        LedgerError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        LedgerError::IncompleteChain { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "INCOMPLETE_CHAIN")
        }
        LedgerError::Serialization(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

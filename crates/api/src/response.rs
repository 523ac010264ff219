//! Shared response envelope types for API handlers.

use restx_core::Transaction;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Envelope of transactional writes: the payload plus the batch transaction.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub data: serde_json::Value,
    pub transaction: Transaction,
}

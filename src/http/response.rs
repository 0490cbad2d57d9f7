//! Response bodies and error mapping for the demo API.
//!
//! Transfer errors map to a status by kind: not found → 404, validation →
//! 400, deadline → 504, other upstream failures → 502, signing → 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::blockchain::types::NodeError;
use crate::domain::{NotFoundError, RepositoryError};
use crate::transfer::{ErrorKind, TransferError};

#[derive(Debug, Serialize)]
pub struct CurrencyView {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct AddressView {
    pub id: Uuid,
    pub address: String,
    pub network_code: String,
    pub wallet_id: Uuid,
    pub provider_id: String,
}

#[derive(Debug, Serialize)]
pub struct NetworkView {
    pub currencies: Vec<CurrencyView>,
    pub addresses: Vec<AddressView>,
}

#[derive(Debug, Serialize)]
pub struct PayoutView {
    pub id: String,
    /// Link to the transaction lookup for this payout.
    pub url: String,
    pub provider_id: String,
}

#[derive(Debug, Serialize)]
pub struct TransactionView {
    pub id: String,
    pub chain_id: Option<u64>,
    pub nonce: u64,
    pub gas: u64,
    pub gas_price: u128,
    pub block_number: Option<u64>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// An error rendered as `{"error": "..."}` with a matching status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

pub fn status_for(err: &TransferError) -> StatusCode {
    if matches!(err, TransferError::DeadlineExceeded(_)) {
        return StatusCode::GATEWAY_TIMEOUT;
    }
    match err.kind() {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Upstream => StatusCode::BAD_GATEWAY,
        ErrorKind::Signing => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<TransferError> for ApiError {
    fn from(err: TransferError) -> Self {
        Self::new(status_for(&err), err.to_string())
    }
}

impl From<NotFoundError> for ApiError {
    fn from(err: NotFoundError) -> Self {
        Self::not_found(err.to_string())
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        TransferError::from(err).into()
    }
}

impl From<NodeError> for ApiError {
    fn from(err: NodeError) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

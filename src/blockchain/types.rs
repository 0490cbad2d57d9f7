//! Chain-level error definitions and node data types.

use alloy::primitives::TxHash;
use serde::Serialize;
use thiserror::Error;

pub use crate::config::schema::NodeConfig;

/// Errors returned by a node client.
#[derive(Debug, Error)]
pub enum NodeError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The configured endpoint could not be parsed.
    #[error("Invalid RPC URL '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Result type for node operations.
pub type NodeResult<T> = Result<T, NodeError>;

/// Errors turning transactions into bytes and back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("failed to unmarshal transaction: {0}")]
    Decode(String),

    #[error("unsupported transaction type 0x{0:02x}")]
    UnsupportedType(u8),
}

/// What a node reports about a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionInfo {
    pub hash: TxHash,
    pub chain_id: Option<u64>,
    pub nonce: u64,
    pub gas_limit: u64,
    /// Maximum fee per gas the sender agreed to, in wei.
    pub gas_price: u128,
    /// Block the transaction was mined in; `None` while pending.
    pub block_number: Option<u64>,
}

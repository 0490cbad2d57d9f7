//! Transfer error taxonomy.

use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::blockchain::types::{CodecError, NodeError};
use crate::domain::{NotFoundError, RepositoryError};
use crate::transfer::types::TransferPayload;

/// Result type for transfer operations.
pub type TransferResult<T> = Result<T, TransferError>;

/// Coarse classification callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A key needed for routing is not registered.
    NotFound,
    /// The request or key material is malformed.
    Validation,
    /// The node, the store or the clock failed us.
    Upstream,
    /// The signature scheme itself failed.
    Signing,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::Upstream => "upstream",
            Self::Signing => "signing",
        }
    }
}

/// Request or key material rejected before anything is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("source address is not provided")]
    MissingSourceAddress,

    #[error("amount {0} is negative")]
    NegativeAmount(Decimal),

    #[error("amount {amount} does not fit in 256 bits at scale {scale}")]
    AmountOverflow { amount: Decimal, scale: u32 },

    #[error("invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("failed to convert key: {0}")]
    InvalidKey(String),

    /// The pipeline's key does not control the requested source address.
    #[error("source address {address} is not controlled by signer {signer}")]
    SignerMismatch { address: String, signer: String },

    /// A stage ran before the stage that produces its input.
    #[error("{0} transaction is empty")]
    EmptyTransaction(&'static str),
}

/// Failure of a transfer at the first stage that errored.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    /// A node query failed; `context` names the operation and its argument.
    #[error("failed to {context}: {source}")]
    Node {
        context: String,
        #[source]
        source: NodeError,
    },

    #[error("repository error: {0}")]
    Repository(String),

    #[error("failed to sign transaction: {0}")]
    Signing(String),

    /// Broadcast failed after the payload was built and signed.
    ///
    /// The payload is handed back so the caller can resubmit the same
    /// signed bytes.
    #[error("{source}")]
    Broadcast {
        source: Box<TransferError>,
        payload: Box<TransferPayload>,
    },

    #[error("transfer did not complete within {0:?}")]
    DeadlineExceeded(Duration),
}

impl TransferError {
    /// Wrap a node failure with the operation that failed.
    pub fn node(context: impl Into<String>, source: NodeError) -> Self {
        Self::Node {
            context: context.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Invalid(_) | Self::Codec(_) => ErrorKind::Validation,
            Self::Node { .. } | Self::Repository(_) | Self::DeadlineExceeded(_) => ErrorKind::Upstream,
            Self::Signing(_) => ErrorKind::Signing,
            Self::Broadcast { source, .. } => source.kind(),
        }
    }

    /// The signed payload left behind by a failed broadcast.
    pub fn unbroadcast_payload(&self) -> Option<&TransferPayload> {
        match self {
            Self::Broadcast { payload, .. } => Some(payload),
            _ => None,
        }
    }

    pub(crate) fn unbroadcast_payload_mut(&mut self) -> Option<&mut TransferPayload> {
        match self {
            Self::Broadcast { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

impl From<RepositoryError> for TransferError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(not_found) => Self::NotFound(not_found),
            RepositoryError::Storage(message) => Self::Repository(message),
        }
    }
}

//! Transfer request, pipeline payload and the stage contracts.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::transfer::error::TransferResult;

/// A caller's request to move an amount of one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub source_address: String,
    pub destination_address: String,
    /// Amount in user-facing units (e.g. `1.5` ETH).
    pub amount: Decimal,
    pub asset_id: String,
}

/// Record threaded through build → sign → broadcast.
///
/// The builder creates it with the unsigned bytes, the signer adds the
/// signed bytes, and whoever learns the transaction hash first assigns the
/// id. Once assigned the id never changes.
#[derive(Debug, Clone)]
pub struct TransferPayload {
    request: Arc<TransferRequest>,
    source_wallet_id: Option<Uuid>,
    provider_id: Option<String>,
    id: Option<String>,
    raw: Vec<u8>,
    signed: Vec<u8>,
}

impl TransferPayload {
    /// Payload for a freshly built, unsigned transaction.
    pub fn new(request: Arc<TransferRequest>, raw: Vec<u8>) -> Self {
        Self {
            request,
            source_wallet_id: None,
            provider_id: None,
            id: None,
            raw,
            signed: Vec::new(),
        }
    }

    pub fn request(&self) -> &TransferRequest {
        &self.request
    }

    pub fn source_wallet_id(&self) -> Option<Uuid> {
        self.source_wallet_id
    }

    pub fn provider_id(&self) -> Option<&str> {
        self.provider_id.as_deref()
    }

    /// On-chain transaction identifier, once known.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Unsigned transaction in the chain's canonical encoding.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Signed transaction; empty until the signer ran.
    pub fn signed(&self) -> &[u8] {
        &self.signed
    }

    pub fn is_signed(&self) -> bool {
        !self.signed.is_empty()
    }

    /// Set the transaction id unless one is already present.
    ///
    /// Returns whether the id was assigned by this call.
    pub fn assign_id(&mut self, id: impl Into<String>) -> bool {
        if self.id.is_some() {
            return false;
        }
        self.id = Some(id.into());
        true
    }

    pub fn set_signed(&mut self, signed: Vec<u8>) {
        self.signed = signed;
    }

    /// Record which wallet and custody provider the transfer went through.
    pub fn stamp_origin(&mut self, wallet_id: Uuid, provider_id: impl Into<String>) {
        self.source_wallet_id = Some(wallet_id);
        self.provider_id = Some(provider_id.into());
    }
}

/// Builds an unsigned transaction for a request.
#[async_trait]
pub trait Builder: Send + Sync {
    async fn build(&self, request: Arc<TransferRequest>) -> TransferResult<TransferPayload>;
}

/// Signs the payload's raw transaction.
#[async_trait]
pub trait Signer: Send + Sync {
    async fn sign(&self, payload: &mut TransferPayload) -> TransferResult<()>;
}

/// Submits the payload's signed transaction to the network.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn broadcast(&self, payload: &mut TransferPayload) -> TransferResult<()>;
}

/// Anything that can carry a transfer end to end.
#[async_trait]
pub trait Transferor: Send + Sync {
    async fn transfer(&self, request: Arc<TransferRequest>) -> TransferResult<TransferPayload>;

    /// Submit an already signed payload again, without rebuilding it.
    async fn rebroadcast(&self, payload: &mut TransferPayload) -> TransferResult<()>;
}

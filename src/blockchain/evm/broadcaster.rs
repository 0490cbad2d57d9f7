//! Submission of signed EVM transactions.

use std::sync::Arc;

use async_trait::async_trait;

use crate::blockchain::evm::client::NodeClient;
use crate::blockchain::evm::codec;
use crate::observability::metrics;
use crate::transfer::{Broadcaster, TransferError, TransferPayload, TransferResult, ValidationError};

/// Sends signed transactions through a node, once.
pub struct EvmTransactionBroadcaster {
    node: Arc<dyn NodeClient>,
}

impl EvmTransactionBroadcaster {
    pub fn new(node: Arc<dyn NodeClient>) -> Self {
        Self { node }
    }
}

#[async_trait]
impl Broadcaster for EvmTransactionBroadcaster {
    async fn broadcast(&self, payload: &mut TransferPayload) -> TransferResult<()> {
        if !payload.is_signed() {
            return Err(ValidationError::EmptyTransaction("signed").into());
        }
        let envelope = codec::decode_signed(payload.signed())?;
        let id = payload
            .id()
            .map(str::to_string)
            .unwrap_or_else(|| envelope.tx_hash().to_string());

        match self.node.send_raw_transaction(payload.signed()).await {
            Ok(hash) => {
                metrics::record_broadcast(true);
                payload.assign_id(hash.to_string());
                tracing::info!(tx_id = %id, "Transaction broadcast");
                Ok(())
            }
            Err(e) => {
                metrics::record_broadcast(false);
                Err(TransferError::node(format!("broadcast transaction ({id})"), e))
            }
        }
    }
}

//! Build → sign → broadcast composition.

use std::sync::Arc;

use async_trait::async_trait;

use crate::transfer::error::{TransferError, TransferResult};
use crate::transfer::types::{Broadcaster, Builder, Signer, TransferPayload, TransferRequest, Transferor};

/// Runs one chain's three stages strictly in sequence.
///
/// The first failing stage ends the transfer. Nothing is compensated: a
/// failed broadcast hands the signed payload back inside
/// [`TransferError::Broadcast`].
#[derive(Debug)]
pub struct GenericTransferor<B, S, C> {
    builder: B,
    signer: S,
    broadcaster: C,
}

impl<B, S, C> GenericTransferor<B, S, C>
where
    B: Builder,
    S: Signer,
    C: Broadcaster,
{
    pub fn new(builder: B, signer: S, broadcaster: C) -> Self {
        Self {
            builder,
            signer,
            broadcaster,
        }
    }
}

#[async_trait]
impl<B, S, C> Transferor for GenericTransferor<B, S, C>
where
    B: Builder,
    S: Signer,
    C: Broadcaster,
{
    async fn transfer(&self, request: Arc<TransferRequest>) -> TransferResult<TransferPayload> {
        let mut payload = self.builder.build(request).await?;
        self.signer.sign(&mut payload).await?;

        if let Err(source) = self.broadcaster.broadcast(&mut payload).await {
            return Err(TransferError::Broadcast {
                source: Box::new(source),
                payload: Box::new(payload),
            });
        }
        Ok(payload)
    }

    async fn rebroadcast(&self, payload: &mut TransferPayload) -> TransferResult<()> {
        self.broadcaster.broadcast(payload).await
    }
}

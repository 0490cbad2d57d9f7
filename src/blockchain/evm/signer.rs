//! Private-key signing of EVM transactions.
//!
//! # Security
//! - The key is parsed at signing time and never logged
//! - `Debug` output redacts the key
//! - Only transactions from the key's own address are signed

use alloy::consensus::{SignableTransaction, TxEnvelope};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use async_trait::async_trait;

use crate::blockchain::evm::{codec, units};
use crate::transfer::{Signer, TransferError, TransferPayload, TransferResult, ValidationError};

/// Signs with a hex-encoded secp256k1 private key.
pub struct PrivateKeyTransactionSigner {
    private_key: String,
}

impl PrivateKeyTransactionSigner {
    pub fn new(private_key: impl Into<String>) -> Self {
        Self {
            private_key: private_key.into(),
        }
    }

    fn signing_key(&self) -> Result<PrivateKeySigner, ValidationError> {
        let key_hex = strip_hex_prefix(&self.private_key);
        key_hex
            .parse()
            .map_err(|e| ValidationError::InvalidKey(format!("{e}")))
    }
}

fn strip_hex_prefix(key: &str) -> &str {
    key.strip_prefix("0x")
        .or_else(|| key.strip_prefix("0X"))
        .unwrap_or(key)
}

#[async_trait]
impl Signer for PrivateKeyTransactionSigner {
    async fn sign(&self, payload: &mut TransferPayload) -> TransferResult<()> {
        if payload.raw().is_empty() {
            return Err(ValidationError::EmptyTransaction("raw").into());
        }
        let tx = codec::decode_unsigned(payload.raw())?;
        let key = self.signing_key()?;

        let source = units::parse_address(&payload.request().source_address)?;
        if source != key.address() {
            return Err(ValidationError::SignerMismatch {
                address: payload.request().source_address.clone(),
                signer: key.address().to_string(),
            }
            .into());
        }

        // The signing hash commits to the chain ID carried by the transaction.
        let signature = key
            .sign_hash_sync(&tx.signature_hash())
            .map_err(|e| TransferError::Signing(e.to_string()))?;
        let chain_id = tx.chain_id;
        let signed = tx.into_signed(signature);
        let hash = *signed.hash();

        let envelope = TxEnvelope::from(signed);
        payload.set_signed(codec::encode_signed(&envelope));
        payload.assign_id(hash.to_string());

        tracing::debug!(
            chain_id,
            signer = %key.address(),
            tx_id = ?payload.id(),
            "Transaction signed"
        );
        Ok(())
    }
}

impl std::fmt::Debug for PrivateKeyTransactionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKeyTransactionSigner")
            .field("private_key", &"<redacted>")
            .finish()
    }
}

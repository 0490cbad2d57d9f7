//! EVM chain family.
//!
//! # Data Flow
//! ```text
//! TransferRequest
//!     → builder.rs (asset lookup, amount scaling, node quote, ERC-20 call data)
//!     → codec.rs (0x02 || rlp(fields))                        → payload.raw
//!     → signer.rs (secp256k1 over the EIP-1559 signing hash)  → payload.signed, payload.id
//!     → broadcaster.rs (eth_sendRawTransaction, once)
//! ```

pub mod abi;
pub mod broadcaster;
pub mod builder;
pub mod client;
pub mod codec;
pub mod signer;
pub mod units;

use std::sync::Arc;

pub use broadcaster::EvmTransactionBroadcaster;
pub use builder::EvmTransactionBuilder;
pub use client::{GasEstimateCall, NodeClient, RpcNodeClient};
pub use signer::PrivateKeyTransactionSigner;

use crate::domain::AssetRegistry;
use crate::transfer::GenericTransferor;

/// Complete EVM pipeline signing with a local private key.
pub type EvmTransferor =
    GenericTransferor<EvmTransactionBuilder, PrivateKeyTransactionSigner, EvmTransactionBroadcaster>;

/// Wire the three EVM stages around one node.
pub fn evm_transferor(
    node: Arc<dyn NodeClient>,
    assets: Arc<AssetRegistry>,
    private_key: impl Into<String>,
) -> EvmTransferor {
    GenericTransferor::new(
        EvmTransactionBuilder::new(Arc::clone(&node), assets),
        PrivateKeyTransactionSigner::new(private_key),
        EvmTransactionBroadcaster::new(node),
    )
}

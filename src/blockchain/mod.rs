//! Chain integration subsystem.
//!
//! # Data Flow
//! ```text
//! [[providers.networks]] config (RPC URL, chain ID, signer key)
//!     → evm/client.rs (JSON-RPC with timeouts and read failover)
//!     → evm/builder.rs → evm/signer.rs → evm/broadcaster.rs
//!     → GenericTransferor registered under the network code
//! ```
//!
//! # Security Constraints
//! - Private keys come from config or environment, never from requests
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Submission is never retried or failed over

pub mod evm;
pub mod types;

pub use evm::{evm_transferor, EvmTransferor, NodeClient, RpcNodeClient};
pub use types::{CodecError, NodeConfig, NodeError, NodeResult, TransactionInfo};

//! Transfer orchestration.
//!
//! # Data Flow
//! ```text
//! TransferRequest
//!     → manager.rs (validate, resolve asset, address → wallet → provider)
//!     → provider.rs (provider's pipeline for the asset's network)
//!     → generic.rs (Builder → Signer → Broadcaster)
//!     → TransferPayload stamped with wallet and provider
//! ```
//!
//! # Design Decisions
//! - Stages are `async_trait` objects so chains plug in without generics
//!   leaking into the routing layers
//! - The first failing stage ends a transfer; nothing is retried
//! - A failed broadcast returns the signed payload for an explicit resubmit

pub mod error;
pub mod generic;
pub mod locks;
pub mod manager;
pub mod provider;
pub mod types;

pub use error::{ErrorKind, TransferError, TransferResult, ValidationError};
pub use generic::GenericTransferor;
pub use locks::AddressLocks;
pub use manager::TransactionManager;
pub use provider::{ProviderRegistry, ProviderTransferor};
pub use types::{Broadcaster, Builder, Signer, TransferPayload, TransferRequest, Transferor};

//! Lookup failures shared by the registry, the repositories and the routers.

use thiserror::Error;
use uuid::Uuid;

/// A key that routing needed was not registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFoundError {
    /// Asset identifier unknown to the registry.
    #[error("invalid currency: {0}")]
    Asset(String),

    /// Network code with no registered assets.
    #[error("invalid network: {0}")]
    Network(String),

    /// No address record for this value on this network.
    #[error("address {address} not found for network {network}")]
    Address { address: String, network: String },

    #[error("wallet {0} not found")]
    Wallet(Uuid),

    /// No transferor registered for the wallet's custody provider.
    #[error("transferor not found for provider {0}")]
    Provider(String),

    /// The provider exists but has no pipeline for the network.
    #[error("network {network} not supported by provider {provider}")]
    NetworkNotSupported { provider: String, network: String },
}

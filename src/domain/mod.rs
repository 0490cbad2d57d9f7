//! Domain model and repository seams.
//!
//! # Data Flow
//! ```text
//! asset id ──▶ asset.rs (AssetRegistry) ──▶ NetworkCurrency (network, scale, contract)
//! (address, network) ──▶ AddressRepository ──▶ Address.wallet_id
//! wallet id ──▶ WalletRepository ──▶ Wallet.provider_id
//! ```
//!
//! # Design Decisions
//! - Persistence is behind async traits; the core never caches records
//! - Lookups that miss return [`NotFoundError`] naming the missing key

pub mod address;
pub mod asset;
pub mod error;
pub mod wallet;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub use address::{Address, CreateAddressPayload};
pub use asset::{AssetRegistry, Network, NetworkCurrency, RegistryError};
pub use error::NotFoundError;
pub use wallet::{CreateWalletPayload, Wallet};

/// Failure reported by a repository implementation.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The backing store itself failed.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Storage of address records.
#[async_trait]
pub trait AddressRepository: Send + Sync {
    async fn create_address(&self, payload: CreateAddressPayload) -> Result<Address, RepositoryError>;

    /// Find the record for a literal address on a network.
    async fn get_address_by_value(
        &self,
        address: &str,
        network_code: &str,
    ) -> Result<Address, RepositoryError>;

    async fn get_addresses_by_network(&self, network_code: &str) -> Result<Vec<Address>, RepositoryError>;
}

/// Storage of wallet records.
#[async_trait]
pub trait WalletRepository: Send + Sync {
    async fn create_wallet(&self, payload: CreateWalletPayload) -> Result<Wallet, RepositoryError>;

    async fn get_wallet(&self, wallet_id: Uuid) -> Result<Wallet, RepositoryError>;
}

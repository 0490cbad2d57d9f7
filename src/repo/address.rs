//! Address store keyed by record id.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::{Address, AddressRepository, CreateAddressPayload, NotFoundError, RepositoryError};

/// Thread-safe address repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAddressRepository {
    inner: Arc<DashMap<Uuid, Address>>,
}

impl InMemoryAddressRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored addresses.
    pub fn count(&self) -> usize {
        self.inner.len()
    }
}

#[async_trait]
impl AddressRepository for InMemoryAddressRepository {
    async fn create_address(&self, payload: CreateAddressPayload) -> Result<Address, RepositoryError> {
        let address = Address {
            id: Uuid::new_v4(),
            address: payload.address,
            network_code: payload.network_code,
            wallet_id: payload.wallet_id,
        };
        self.inner.insert(address.id, address.clone());

        tracing::debug!(
            address = %address.address,
            network = %address.network_code,
            wallet_id = %address.wallet_id,
            "Address stored"
        );
        Ok(address)
    }

    async fn get_address_by_value(
        &self,
        address: &str,
        network_code: &str,
    ) -> Result<Address, RepositoryError> {
        self.inner
            .iter()
            .find(|r| r.value().address == address && r.value().network_code == network_code)
            .map(|r| r.value().clone())
            .ok_or_else(|| {
                NotFoundError::Address {
                    address: address.to_string(),
                    network: network_code.to_string(),
                }
                .into()
            })
    }

    async fn get_addresses_by_network(&self, network_code: &str) -> Result<Vec<Address>, RepositoryError> {
        let mut addresses: Vec<Address> = self
            .inner
            .iter()
            .filter(|r| r.value().network_code == network_code)
            .map(|r| r.value().clone())
            .collect();
        // DashMap iteration order is arbitrary.
        addresses.sort_by(|a, b| a.address.cmp(&b.address));
        Ok(addresses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(address: &str, network: &str, wallet_id: Uuid) -> CreateAddressPayload {
        CreateAddressPayload {
            address: address.to_string(),
            network_code: network.to_string(),
            wallet_id,
        }
    }

    #[tokio::test]
    async fn test_lookup_by_value_and_network() {
        let repo = InMemoryAddressRepository::new();
        let wallet_id = Uuid::new_v4();
        let created = repo.create_address(payload("0xA", "TestEth", wallet_id)).await.unwrap();

        let found = repo.get_address_by_value("0xA", "TestEth").await.unwrap();
        assert_eq!(found, created);
        assert_eq!(found.wallet_id, wallet_id);

        // Same literal on another network is a different record.
        let err = repo.get_address_by_value("0xA", "Sepolia").await.unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::NotFound(NotFoundError::Address { ref network, .. }) if network == "Sepolia"
        ));
    }

    #[tokio::test]
    async fn test_addresses_by_network() {
        let repo = InMemoryAddressRepository::new();
        let wallet_id = Uuid::new_v4();
        repo.create_address(payload("0xB", "TestEth", wallet_id)).await.unwrap();
        repo.create_address(payload("0xA", "TestEth", wallet_id)).await.unwrap();
        repo.create_address(payload("0xC", "Sepolia", wallet_id)).await.unwrap();

        let listed = repo.get_addresses_by_network("TestEth").await.unwrap();
        let values: Vec<&str> = listed.iter().map(|a| a.address.as_str()).collect();
        assert_eq!(values, vec!["0xA", "0xB"]);
        assert!(repo.get_addresses_by_network("Unknown").await.unwrap().is_empty());
        assert_eq!(repo.count(), 3);
    }
}

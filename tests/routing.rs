//! Transaction manager routing: address → wallet → provider → network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use transfer_gateway::domain::{
    Address, AddressRepository, CreateAddressPayload, CreateWalletPayload, NotFoundError, RepositoryError, Wallet,
    WalletRepository,
};
use transfer_gateway::repo::{InMemoryAddressRepository, InMemoryWalletRepository};
use transfer_gateway::transfer::{TransactionManager, TransferError, Transferor, ValidationError};

mod common;
use common::{Fixture, ANVIL_ADDRESS};

/// Address repository that counts lookups.
struct CountingAddresses {
    inner: Arc<InMemoryAddressRepository>,
    lookups: AtomicUsize,
}

#[async_trait]
impl AddressRepository for CountingAddresses {
    async fn create_address(&self, payload: CreateAddressPayload) -> Result<Address, RepositoryError> {
        self.inner.create_address(payload).await
    }

    async fn get_address_by_value(&self, address: &str, network_code: &str) -> Result<Address, RepositoryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get_address_by_value(address, network_code).await
    }

    async fn get_addresses_by_network(&self, network_code: &str) -> Result<Vec<Address>, RepositoryError> {
        self.inner.get_addresses_by_network(network_code).await
    }
}

/// Wallet repository that counts lookups.
struct CountingWallets {
    inner: Arc<InMemoryWalletRepository>,
    lookups: AtomicUsize,
}

#[async_trait]
impl WalletRepository for CountingWallets {
    async fn create_wallet(&self, payload: CreateWalletPayload) -> Result<Wallet, RepositoryError> {
        self.inner.create_wallet(payload).await
    }

    async fn get_wallet(&self, wallet_id: Uuid) -> Result<Wallet, RepositoryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get_wallet(wallet_id).await
    }
}

struct Counted {
    fixture: Fixture,
    addresses: Arc<CountingAddresses>,
    wallets: Arc<CountingWallets>,
    manager: TransactionManager,
}

async fn counted() -> Counted {
    let fixture = Fixture::new().await;
    let addresses = Arc::new(CountingAddresses {
        inner: fixture.addresses.clone(),
        lookups: AtomicUsize::new(0),
    });
    let wallets = Arc::new(CountingWallets {
        inner: fixture.wallets.clone(),
        lookups: AtomicUsize::new(0),
    });
    let manager = TransactionManager::new(
        addresses.clone(),
        wallets.clone(),
        fixture.assets.clone(),
        fixture.providers(),
    );
    Counted {
        fixture,
        addresses,
        wallets,
        manager,
    }
}

#[tokio::test]
async fn test_unknown_asset_fails_before_any_lookup() {
    let counted = counted().await;
    let err = counted
        .manager
        .transfer(common::request(ANVIL_ADDRESS, "1", "DOGE"))
        .await
        .unwrap_err();

    assert!(matches!(err, TransferError::NotFound(NotFoundError::Asset(ref id)) if id == "DOGE"));
    assert_eq!(counted.addresses.lookups.load(Ordering::SeqCst), 0);
    assert_eq!(counted.wallets.lookups.load(Ordering::SeqCst), 0);
    assert!(counted.fixture.node.calls().is_empty());
}

#[tokio::test]
async fn test_empty_source_fails_before_asset() {
    let counted = counted().await;
    let err = counted
        .manager
        .transfer(common::request("", "1", "DOGE"))
        .await
        .unwrap_err();
    assert!(matches!(err, TransferError::Invalid(ValidationError::MissingSourceAddress)));
}

#[tokio::test]
async fn test_unknown_address_fails_before_wallet_lookup() {
    let counted = counted().await;
    let err = counted
        .manager
        .transfer(common::request("0x000000000000000000000000000000000000dEaD", "1", "TEST_ETH"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TransferError::NotFound(NotFoundError::Address { ref network, .. }) if network == "TestEth"
    ));
    assert_eq!(counted.addresses.lookups.load(Ordering::SeqCst), 1);
    assert_eq!(counted.wallets.lookups.load(Ordering::SeqCst), 0);
    assert!(counted.fixture.node.calls().is_empty());
}

#[tokio::test]
async fn test_successful_transfer_looks_up_each_record_once() {
    let counted = counted().await;
    counted
        .manager
        .transfer(common::request(ANVIL_ADDRESS, "1", "TEST_ETH"))
        .await
        .unwrap();
    assert_eq!(counted.addresses.lookups.load(Ordering::SeqCst), 1);
    assert_eq!(counted.wallets.lookups.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_wallet() {
    let counted = counted().await;
    let orphan = Uuid::new_v4();
    counted
        .fixture
        .addresses
        .create_address(CreateAddressPayload {
            address: "0xA".to_string(),
            network_code: "TestEth".to_string(),
            wallet_id: orphan,
        })
        .await
        .unwrap();

    let err = counted
        .manager
        .transfer(common::request("0xA", "1", "TEST_ETH"))
        .await
        .unwrap_err();
    assert!(matches!(err, TransferError::NotFound(NotFoundError::Wallet(id)) if id == orphan));
    assert!(counted.fixture.node.calls().is_empty());
}

#[tokio::test]
async fn test_provider_not_found() {
    let counted = counted().await;
    let wallet = counted
        .fixture
        .wallets
        .create_wallet(CreateWalletPayload {
            id: None,
            provider_id: "Fireblocks".to_string(),
        })
        .await
        .unwrap();
    counted
        .fixture
        .addresses
        .create_address(CreateAddressPayload {
            address: "0xB".to_string(),
            network_code: "TestEth".to_string(),
            wallet_id: wallet.id,
        })
        .await
        .unwrap();

    let err = counted
        .manager
        .transfer(common::request("0xB", "1", "TEST_ETH"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "transferor not found for provider Fireblocks");
    assert!(counted.fixture.node.calls().is_empty());
}

#[tokio::test]
async fn test_network_not_supported_by_provider() {
    let counted = counted().await;
    let err = counted
        .manager
        .transfer(common::request(ANVIL_ADDRESS, "1", "SEPOLIA_ETH"))
        .await
        .unwrap_err();

    match err {
        TransferError::NotFound(NotFoundError::NetworkNotSupported { provider, network }) => {
            assert_eq!(provider, "Local");
            assert_eq!(network, "Sepolia");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(counted.fixture.node.calls().is_empty());
}

#[tokio::test]
async fn test_short_destination_routes_and_builds() {
    let fixture = Fixture::new().await;
    let request = Arc::new(transfer_gateway::transfer::TransferRequest {
        source_address: ANVIL_ADDRESS.to_string(),
        destination_address: "0xB".to_string(),
        amount: "1.5".parse().unwrap(),
        asset_id: "TEST_ETH".to_string(),
    });
    let payload = fixture.manager().transfer(request).await.unwrap();

    assert_eq!(payload.provider_id(), Some("Local"));
    assert_eq!(fixture.node.submissions().len(), 1);
}

#[tokio::test]
async fn test_address_not_controlled_by_pipeline_key_is_refused() {
    let fixture = Fixture::new().await;
    let foreign = "0x000000000000000000000000000000000000dEaD";
    fixture
        .addresses
        .create_address(CreateAddressPayload {
            address: foreign.to_string(),
            network_code: "TestEth".to_string(),
            wallet_id: fixture.wallet_id,
        })
        .await
        .unwrap();

    let err = fixture
        .manager()
        .transfer(common::request(foreign, "1", "TEST_ETH"))
        .await
        .unwrap_err();

    match err {
        TransferError::Invalid(ValidationError::SignerMismatch { address, signer }) => {
            assert_eq!(address, foreign);
            assert_eq!(signer, ANVIL_ADDRESS);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(fixture.node.submissions().is_empty());
}

//! Shared utilities for integration testing.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::consensus::{Transaction, TxEnvelope};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{Address, TxHash};
use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use transfer_gateway::blockchain::evm::{evm_transferor, GasEstimateCall, NodeClient};
use transfer_gateway::blockchain::types::{NodeConfig, NodeError, NodeResult, TransactionInfo};
use transfer_gateway::domain::{
    AddressRepository, AssetRegistry, CreateAddressPayload, CreateWalletPayload, Network, NetworkCurrency,
    WalletRepository,
};
use transfer_gateway::lifecycle::NodeConnector;
use transfer_gateway::repo::{InMemoryAddressRepository, InMemoryWalletRepository};
use transfer_gateway::transfer::{ProviderRegistry, ProviderTransferor, TransactionManager, TransferRequest};

/// Anvil account #0. Never use for real funds.
pub const ANVIL_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const ANVIL_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const RECIPIENT: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
pub const TOKEN_CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
pub const CHAIN_ID: u64 = 31337;
pub const GAS_PRICE: u128 = 2_000_000_000;
pub const TOKEN_GAS: u64 = 51_234;

/// Every call a [`MockNode`] received, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeCall {
    ChainId,
    PendingNonce(Address),
    GasPrice,
    EstimateGas(GasEstimateCall),
    SendRaw(Vec<u8>),
    TransactionByHash(TxHash),
}

impl NodeCall {
    fn name(&self) -> &'static str {
        match self {
            Self::ChainId => "chain_id",
            Self::PendingNonce(_) => "pending_nonce",
            Self::GasPrice => "gas_price",
            Self::EstimateGas(_) => "estimate_gas",
            Self::SendRaw(_) => "send_raw_transaction",
            Self::TransactionByHash(_) => "transaction_by_hash",
        }
    }
}

/// Scripted node: fixed answers, opt-in failures, a pending nonce that
/// advances with every accepted submission.
pub struct MockNode {
    calls: Mutex<Vec<NodeCall>>,
    failing: Mutex<HashSet<&'static str>>,
    nonce: AtomicU64,
    delay: Mutex<Duration>,
    mined: Mutex<HashMap<TxHash, TransactionInfo>>,
}

impl MockNode {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            nonce: AtomicU64::new(0),
            delay: Mutex::new(Duration::ZERO),
            mined: Mutex::new(HashMap::new()),
        })
    }

    /// Make every call of `operation` fail from now on.
    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    pub fn recover(&self, operation: &'static str) {
        self.failing.lock().unwrap().remove(operation);
    }

    /// Delay nonce queries, widening the window for concurrent transfers.
    pub fn set_nonce_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn calls(&self) -> Vec<NodeCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_names(&self) -> Vec<&'static str> {
        self.calls().iter().map(NodeCall::name).collect()
    }

    /// Raw bytes of every submission, accepted or not.
    pub fn submissions(&self) -> Vec<Vec<u8>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                NodeCall::SendRaw(raw) => Some(raw),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: NodeCall) -> NodeResult<()> {
        let name = call.name();
        self.calls.lock().unwrap().push(call);
        if self.failing.lock().unwrap().contains(name) {
            return Err(NodeError::Rpc(format!("{name} unavailable")));
        }
        Ok(())
    }
}

#[async_trait]
impl NodeClient for MockNode {
    async fn chain_id(&self) -> NodeResult<u64> {
        self.record(NodeCall::ChainId)?;
        Ok(CHAIN_ID)
    }

    async fn pending_nonce(&self, address: Address) -> NodeResult<u64> {
        self.record(NodeCall::PendingNonce(address))?;
        let delay = *self.delay.lock().unwrap();
        let nonce = self.nonce.load(Ordering::SeqCst);
        tokio::time::sleep(delay).await;
        Ok(nonce)
    }

    async fn suggest_gas_price(&self) -> NodeResult<u128> {
        self.record(NodeCall::GasPrice)?;
        Ok(GAS_PRICE)
    }

    async fn estimate_gas(&self, call: GasEstimateCall) -> NodeResult<u64> {
        self.record(NodeCall::EstimateGas(call))?;
        Ok(TOKEN_GAS)
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> NodeResult<TxHash> {
        self.record(NodeCall::SendRaw(raw.to_vec()))?;
        let envelope =
            TxEnvelope::decode_2718(&mut &raw[..]).map_err(|e| NodeError::Rpc(format!("rlp: {e}")))?;

        let expected = self.nonce.load(Ordering::SeqCst);
        if envelope.nonce() != expected {
            return Err(NodeError::Rpc(format!("nonce too low: have {}, want {expected}", envelope.nonce())));
        }
        self.nonce.fetch_add(1, Ordering::SeqCst);

        let hash = *envelope.tx_hash();
        self.mined.lock().unwrap().insert(
            hash,
            TransactionInfo {
                hash,
                chain_id: envelope.chain_id(),
                nonce: envelope.nonce(),
                gas_limit: envelope.gas_limit(),
                gas_price: envelope.max_fee_per_gas(),
                block_number: Some(1),
            },
        );
        Ok(hash)
    }

    async fn transaction_by_hash(&self, hash: TxHash) -> NodeResult<Option<TransactionInfo>> {
        self.record(NodeCall::TransactionByHash(hash))?;
        Ok(self.mined.lock().unwrap().get(&hash).cloned())
    }
}

/// Hands out the same [`MockNode`] for every pipeline.
pub struct MockConnector(pub Arc<MockNode>);

#[async_trait]
impl NodeConnector for MockConnector {
    async fn connect(&self, _network: &str, _config: &NodeConfig) -> NodeResult<Arc<dyn NodeClient>> {
        let node: Arc<dyn NodeClient> = self.0.clone();
        Ok(node)
    }
}

/// Default registry plus a six-decimal test token.
pub fn assets() -> Arc<AssetRegistry> {
    let mut registry = AssetRegistry::with_defaults();
    registry
        .register(NetworkCurrency {
            id: "TEST_USDC".to_string(),
            network: Network {
                code: "TestEth".to_string(),
                native_token: "TEST_ETH".to_string(),
            },
            currency: "USDC".to_string(),
            scale: 6,
            contract_address: TOKEN_CONTRACT.to_string(),
        })
        .unwrap();
    registry
        .register(NetworkCurrency {
            id: "SEPOLIA_ETH".to_string(),
            network: Network {
                code: "Sepolia".to_string(),
                native_token: "SEPOLIA_ETH".to_string(),
            },
            currency: "ETH".to_string(),
            scale: 18,
            contract_address: String::new(),
        })
        .unwrap();
    Arc::new(registry)
}

pub fn request(source: &str, amount: &str, asset: &str) -> Arc<TransferRequest> {
    Arc::new(TransferRequest {
        source_address: source.to_string(),
        destination_address: RECIPIENT.to_string(),
        amount: Decimal::from_str(amount).unwrap(),
        asset_id: asset.to_string(),
    })
}

/// Repositories and providers a [`TransactionManager`] is built from.
pub struct Fixture {
    pub node: Arc<MockNode>,
    pub assets: Arc<AssetRegistry>,
    pub addresses: Arc<InMemoryAddressRepository>,
    pub wallets: Arc<InMemoryWalletRepository>,
    pub wallet_id: Uuid,
}

impl Fixture {
    /// One `Local` wallet owning [`ANVIL_ADDRESS`] on `TestEth` and `Sepolia`.
    pub async fn new() -> Self {
        let node = MockNode::new();
        let addresses = Arc::new(InMemoryAddressRepository::new());
        let wallets = Arc::new(InMemoryWalletRepository::new());

        let wallet = wallets
            .create_wallet(CreateWalletPayload {
                id: None,
                provider_id: "Local".to_string(),
            })
            .await
            .unwrap();
        for network in ["TestEth", "Sepolia"] {
            addresses
                .create_address(CreateAddressPayload {
                    address: ANVIL_ADDRESS.to_string(),
                    network_code: network.to_string(),
                    wallet_id: wallet.id,
                })
                .await
                .unwrap();
        }

        Self {
            node,
            assets: assets(),
            addresses,
            wallets,
            wallet_id: wallet.id,
        }
    }

    /// `Local` provider with an EVM pipeline on `TestEth` only.
    pub fn providers(&self) -> ProviderRegistry {
        let pipeline = evm_transferor(self.node.clone(), self.assets.clone(), ANVIL_KEY);
        let local = ProviderTransferor::new("Local", self.assets.clone()).with_network("TestEth", Arc::new(pipeline));

        let mut providers = ProviderRegistry::new();
        providers.register("Local", Arc::new(local));
        providers
    }

    pub fn manager(&self) -> TransactionManager {
        TransactionManager::new(
            self.addresses.clone(),
            self.wallets.clone(),
            self.assets.clone(),
            self.providers(),
        )
    }
}

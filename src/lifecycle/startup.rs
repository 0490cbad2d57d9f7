//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the asset registry from defaults plus configured assets
//! - Seed the wallet and address repositories
//! - Connect one node client and one EVM pipeline per provider network
//! - Assemble the transaction manager
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Node connections go through [`NodeConnector`] so tests can script them

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::blockchain::evm::{evm_transferor, NodeClient, RpcNodeClient};
use crate::blockchain::types::{NodeConfig, NodeError, NodeResult};
use crate::config::{AppConfig, NetworkPipelineConfig};
use crate::domain::{
    AddressRepository, AssetRegistry, CreateAddressPayload, CreateWalletPayload, Network, NetworkCurrency,
    RegistryError, RepositoryError, WalletRepository,
};
use crate::repo::{InMemoryAddressRepository, InMemoryWalletRepository};
use crate::transfer::{ProviderRegistry, ProviderTransferor, TransactionManager};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid asset configuration: {0}")]
    Asset(#[from] RegistryError),

    #[error("{context} refers to unknown network {network}")]
    UnknownNetwork { context: String, network: String },

    #[error("failed to connect node for {provider}/{network}: {source}")]
    Node {
        provider: String,
        network: String,
        #[source]
        source: NodeError,
    },

    #[error("no signing key for {provider}/{network}: {reason}")]
    MissingKey {
        provider: String,
        network: String,
        reason: String,
    },

    #[error("failed to seed repository: {0}")]
    Seed(#[from] RepositoryError),
}

/// Opens node clients for configured pipelines.
#[async_trait]
pub trait NodeConnector: Send + Sync {
    async fn connect(&self, network: &str, config: &NodeConfig) -> NodeResult<Arc<dyn NodeClient>>;
}

/// Connects over JSON-RPC.
#[derive(Debug, Default, Clone, Copy)]
pub struct RpcConnector;

#[async_trait]
impl NodeConnector for RpcConnector {
    async fn connect(&self, _network: &str, config: &NodeConfig) -> NodeResult<Arc<dyn NodeClient>> {
        let client: Arc<dyn NodeClient> = Arc::new(RpcNodeClient::new(config.clone()).await?);
        Ok(client)
    }
}

/// Everything the demo API and the binaries need at runtime.
#[derive(Clone)]
pub struct Services {
    pub assets: Arc<AssetRegistry>,
    pub addresses: Arc<dyn AddressRepository>,
    pub wallets: Arc<dyn WalletRepository>,
    pub manager: Arc<TransactionManager>,
    /// One node per network, for transaction lookups.
    pub nodes: Arc<BTreeMap<String, Arc<dyn NodeClient>>>,
    pub explorer_url_prefix: String,
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("manager", &self.manager)
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Wire the gateway from configuration using JSON-RPC nodes.
pub async fn bootstrap(config: &AppConfig) -> Result<Services, StartupError> {
    bootstrap_with(config, &RpcConnector).await
}

/// Wire the gateway with a custom node connector.
pub async fn bootstrap_with(config: &AppConfig, connector: &dyn NodeConnector) -> Result<Services, StartupError> {
    let assets = Arc::new(build_registry(config)?);
    tracing::info!(networks = ?assets.networks().collect::<Vec<_>>(), "Asset registry loaded");

    let wallets = Arc::new(InMemoryWalletRepository::new());
    for wallet in &config.wallets {
        wallets
            .create_wallet(CreateWalletPayload {
                id: Some(wallet.id),
                provider_id: wallet.provider_id.clone(),
            })
            .await?;
    }

    let addresses = Arc::new(InMemoryAddressRepository::new());
    for address in &config.addresses {
        require_network(&assets, &address.network, || format!("address {}", address.address))?;
        addresses
            .create_address(CreateAddressPayload {
                address: address.address.clone(),
                network_code: address.network.clone(),
                wallet_id: address.wallet_id,
            })
            .await?;
    }

    let mut providers = ProviderRegistry::new();
    let mut nodes: BTreeMap<String, Arc<dyn NodeClient>> = BTreeMap::new();

    for provider in &config.providers {
        let mut dispatcher = ProviderTransferor::new(provider.id.clone(), Arc::clone(&assets));

        for pipeline in &provider.networks {
            require_network(&assets, &pipeline.network, || format!("provider {}", provider.id))?;

            let node = connector
                .connect(&pipeline.network, &pipeline.node)
                .await
                .map_err(|source| StartupError::Node {
                    provider: provider.id.clone(),
                    network: pipeline.network.clone(),
                    source,
                })?;
            let key = resolve_private_key(&provider.id, pipeline)?;

            nodes
                .entry(pipeline.network.clone())
                .or_insert_with(|| Arc::clone(&node));
            let transferor = evm_transferor(node, Arc::clone(&assets), key);
            dispatcher = dispatcher.with_network(pipeline.network.clone(), Arc::new(transferor));

            tracing::info!(
                provider = %provider.id,
                network = %pipeline.network,
                rpc_url = %pipeline.node.rpc_url,
                "Pipeline registered"
            );
        }

        providers.register(provider.id.clone(), Arc::new(dispatcher));
    }

    let mut manager = TransactionManager::new(
        addresses.clone(),
        wallets.clone(),
        Arc::clone(&assets),
        providers,
    );
    if config.transfer.serialize_per_address {
        manager = manager.with_address_locks();
    }
    if config.transfer.timeout_secs > 0 {
        manager = manager.with_deadline(Duration::from_secs(config.transfer.timeout_secs));
    }

    tracing::info!(
        providers = config.providers.len(),
        wallets = config.wallets.len(),
        addresses = addresses.count(),
        "Transaction manager ready"
    );

    Ok(Services {
        assets,
        addresses,
        wallets,
        manager: Arc::new(manager),
        nodes: Arc::new(nodes),
        explorer_url_prefix: config.transfer.explorer_url_prefix.clone(),
    })
}

fn build_registry(config: &AppConfig) -> Result<AssetRegistry, RegistryError> {
    let mut registry = AssetRegistry::with_defaults();
    for asset in &config.assets {
        registry.register(NetworkCurrency {
            id: asset.id.clone(),
            network: Network {
                code: asset.network.clone(),
                native_token: asset.native_token.clone(),
            },
            currency: asset.currency.clone(),
            scale: asset.scale,
            contract_address: asset.contract_address.clone(),
        })?;
    }
    Ok(registry)
}

fn require_network(
    assets: &AssetRegistry,
    network: &str,
    context: impl FnOnce() -> String,
) -> Result<(), StartupError> {
    if assets.has_network(network) {
        return Ok(());
    }
    Err(StartupError::UnknownNetwork {
        context: context(),
        network: network.to_string(),
    })
}

/// The configured key literal, or the value of the configured env var.
fn resolve_private_key(provider: &str, pipeline: &NetworkPipelineConfig) -> Result<String, StartupError> {
    let missing = |reason: String| StartupError::MissingKey {
        provider: provider.to_string(),
        network: pipeline.network.clone(),
        reason,
    };

    if let Some(key) = &pipeline.private_key {
        return Ok(key.clone());
    }
    match &pipeline.private_key_env {
        Some(var) => std::env::var(var).map_err(|e| missing(format!("{var}: {e}"))),
        None => Err(missing("neither private_key nor private_key_env is set".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    struct RefusingConnector;

    #[async_trait]
    impl NodeConnector for RefusingConnector {
        async fn connect(&self, _network: &str, config: &NodeConfig) -> NodeResult<Arc<dyn NodeClient>> {
            Err(NodeError::InvalidEndpoint {
                url: config.rpc_url.clone(),
                reason: "refused".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_empty_config_boots() {
        let services = bootstrap(&AppConfig::default()).await.unwrap();
        assert!(services.nodes.is_empty());
        assert!(services.assets.has_network("TestEth"));
    }

    #[tokio::test]
    async fn test_unknown_address_network() {
        let config = parse_config(
            r#"
            [[providers]]
            id = "Local"

            [[wallets]]
            id = "4a1f0c9e-6b7d-4e2a-9c3b-1d5e8f7a6b01"
            provider_id = "Local"

            [[addresses]]
            address = "0xA"
            network = "Solana"
            wallet_id = "4a1f0c9e-6b7d-4e2a-9c3b-1d5e8f7a6b01"
            "#,
        )
        .unwrap();

        let err = bootstrap(&config).await.unwrap_err();
        assert_eq!(err.to_string(), "address 0xA refers to unknown network Solana");
    }

    #[tokio::test]
    async fn test_node_failure_names_pipeline() {
        let config = parse_config(
            r#"
            [[providers]]
            id = "Local"

            [[providers.networks]]
            network = "TestEth"
            rpc_url = "http://127.0.0.1:8545"
            private_key = "0x01"
            "#,
        )
        .unwrap();

        let err = bootstrap_with(&config, &RefusingConnector).await.unwrap_err();
        assert!(matches!(err, StartupError::Node { ref provider, .. } if provider == "Local"));
    }

    #[test]
    fn test_key_from_environment() {
        let mut pipeline = NetworkPipelineConfig {
            network: "TestEth".to_string(),
            node: NodeConfig::default(),
            private_key: None,
            private_key_env: Some("TRANSFER_GATEWAY_TEST_KEY_UNSET".to_string()),
        };
        let err = resolve_private_key("Local", &pipeline).unwrap_err();
        assert!(err.to_string().starts_with("no signing key for Local/TestEth"));

        pipeline.private_key = Some("0x01".to_string());
        assert_eq!(resolve_private_key("Local", &pipeline).unwrap(), "0x01");
    }

    #[test]
    fn test_conflicting_asset_config() {
        let config = parse_config(
            r#"
            [[assets]]
            id = "TEST_ETH"
            network = "TestEth"
            native_token = "TEST_ETH"
            currency = "ETH"
            scale = 18
            "#,
        )
        .unwrap();
        assert!(matches!(
            build_registry(&config),
            Err(RegistryError::Duplicate(ref id)) if id == "TEST_ETH"
        ));
    }
}

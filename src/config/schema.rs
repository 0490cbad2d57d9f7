//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Root configuration for the transfer gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Demo API listener.
    pub listener: ListenerConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,

    /// Transfer orchestration settings.
    pub transfer: TransferConfig,

    /// Assets registered on top of the built-in test network.
    pub assets: Vec<AssetConfig>,

    /// Custody providers and the networks each one serves.
    pub providers: Vec<ProviderConfig>,

    /// Wallets seeded into the wallet repository.
    pub wallets: Vec<WalletConfig>,

    /// Addresses seeded into the address repository.
    pub addresses: Vec<AddressConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 60,
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Transfer orchestration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Run one transfer at a time per (network, source address).
    pub serialize_per_address: bool,

    /// Overall deadline for one transfer in seconds; 0 disables it.
    pub timeout_secs: u64,

    /// Prefix joined with the transaction id to form the payout link.
    pub explorer_url_prefix: String,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            serialize_per_address: true,
            timeout_secs: 45,
            explorer_url_prefix: "http://localhost:8080/demo/transactions?tid=".to_string(),
        }
    }
}

/// One transferable asset.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetConfig {
    pub id: String,

    /// Network code the asset lives on.
    pub network: String,

    /// Asset id of the network's fee-paying coin.
    pub native_token: String,

    /// Display code, e.g. "USDC".
    pub currency: String,

    pub scale: u32,

    /// Token contract; leave empty for the native coin.
    #[serde(default)]
    pub contract_address: String,
}

/// A custody provider.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Provider identifier wallets refer to.
    pub id: String,

    #[serde(default)]
    pub description: String,

    /// One chain pipeline per network.
    #[serde(default)]
    pub networks: Vec<NetworkPipelineConfig>,
}

/// A provider's pipeline for one network.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkPipelineConfig {
    /// Network code served by this pipeline.
    pub network: String,

    #[serde(flatten)]
    pub node: NodeConfig,

    /// Hex signing key. Prefer `private_key_env` outside local testing.
    #[serde(default)]
    pub private_key: Option<String>,

    /// Environment variable holding the hex signing key.
    #[serde(default)]
    pub private_key_env: Option<String>,
}

/// Node connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, used for reads only.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Expected chain ID (e.g., 31337 for local Anvil); checked at startup.
    #[serde(default)]
    pub chain_id: Option<u64>,

    /// RPC request timeout in seconds.
    #[serde(default = "default_rpc_timeout_secs")]
    pub rpc_timeout_secs: u64,
}

fn default_rpc_timeout_secs() -> u64 {
    10
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: None,
            rpc_timeout_secs: default_rpc_timeout_secs(),
        }
    }
}

/// A wallet record to seed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WalletConfig {
    pub id: Uuid,
    pub provider_id: String,
}

/// An address record to seed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddressConfig {
    pub address: String,
    pub network: String,
    pub wallet_id: Uuid,
}

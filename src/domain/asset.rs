//! Asset registry: asset identifier → network, scale and contract.
//!
//! # Responsibilities
//! - Describe every transferable asset (native coin or token) per network
//! - Resolve an asset identifier to its descriptor
//! - List the assets of a network
//!
//! # Design Decisions
//! - Built once at startup and shared by `Arc`; read-only afterwards
//! - Exact, case-sensitive identifier matching
//! - A network's native asset is the one whose id equals the network's
//!   native token; tokens carry a contract address, native assets do not

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::error::NotFoundError;

/// Network code of the local EVM test network.
pub const TEST_ETH_NETWORK: &str = "TestEth";

/// Native asset of [`TEST_ETH_NETWORK`].
pub const TEST_ETH: &str = "TEST_ETH";

/// Largest scale whose power of ten still fits in 256 bits.
pub const MAX_SCALE: u32 = 77;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Network {
    pub code: String,
    /// Asset identifier of the coin that pays fees on this network.
    pub native_token: String,
}

/// Descriptor of one asset on one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkCurrency {
    pub id: String,
    pub network: Network,
    /// Display code, e.g. `ETH`.
    pub currency: String,
    /// Fractional digits used on-chain.
    pub scale: u32,
    /// Token contract address; empty for the native coin.
    pub contract_address: String,
}

impl NetworkCurrency {
    /// Whether this is the coin the network pays fees in.
    pub fn is_native(&self) -> bool {
        self.id == self.network.native_token
    }
}

/// Reasons an asset cannot be registered.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("asset {0} is already registered")]
    Duplicate(String),

    #[error("asset {id} has scale {scale}, maximum is {MAX_SCALE}")]
    ScaleTooLarge { id: String, scale: u32 },

    #[error("network {network} already uses native token {existing}, not {requested}")]
    NativeTokenConflict {
        network: String,
        existing: String,
        requested: String,
    },

    #[error("native asset {0} must not have a contract address")]
    NativeWithContract(String),

    #[error("token {0} requires a contract address")]
    TokenWithoutContract(String),
}

/// Static lookup of the assets the gateway can move.
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    assets: BTreeMap<String, NetworkCurrency>,
    networks: BTreeMap<String, Network>,
}

impl AssetRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the local test network.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let network = Network {
            code: TEST_ETH_NETWORK.to_string(),
            native_token: TEST_ETH.to_string(),
        };
        // Built-in entries are consistent by construction.
        registry.assets.insert(
            TEST_ETH.to_string(),
            NetworkCurrency {
                id: TEST_ETH.to_string(),
                network: network.clone(),
                currency: "ETH".to_string(),
                scale: 18,
                contract_address: String::new(),
            },
        );
        registry.networks.insert(network.code.clone(), network);
        registry
    }

    /// Add an asset. Only called while wiring the process.
    pub fn register(&mut self, asset: NetworkCurrency) -> Result<(), RegistryError> {
        if self.assets.contains_key(&asset.id) {
            return Err(RegistryError::Duplicate(asset.id));
        }
        if asset.scale > MAX_SCALE {
            return Err(RegistryError::ScaleTooLarge {
                id: asset.id,
                scale: asset.scale,
            });
        }
        if let Some(existing) = self.networks.get(&asset.network.code) {
            if existing.native_token != asset.network.native_token {
                return Err(RegistryError::NativeTokenConflict {
                    network: asset.network.code,
                    existing: existing.native_token.clone(),
                    requested: asset.network.native_token,
                });
            }
        }
        match (asset.is_native(), asset.contract_address.is_empty()) {
            (true, false) => return Err(RegistryError::NativeWithContract(asset.id)),
            (false, true) => return Err(RegistryError::TokenWithoutContract(asset.id)),
            _ => {}
        }

        self.networks
            .entry(asset.network.code.clone())
            .or_insert_with(|| asset.network.clone());
        self.assets.insert(asset.id.clone(), asset);
        Ok(())
    }

    /// Look up an asset by identifier.
    pub fn resolve(&self, asset_id: &str) -> Result<NetworkCurrency, NotFoundError> {
        self.assets
            .get(asset_id)
            .cloned()
            .ok_or_else(|| NotFoundError::Asset(asset_id.to_string()))
    }

    /// All assets of a network, ordered by identifier.
    pub fn list_assets(&self, network_code: &str) -> Result<Vec<NetworkCurrency>, NotFoundError> {
        let assets: Vec<NetworkCurrency> = self
            .assets
            .values()
            .filter(|asset| asset.network.code == network_code)
            .cloned()
            .collect();

        if assets.is_empty() {
            return Err(NotFoundError::Network(network_code.to_string()));
        }
        Ok(assets)
    }

    /// Codes of every network with at least one asset.
    pub fn networks(&self) -> impl Iterator<Item = &str> {
        self.networks.keys().map(String::as_str)
    }

    /// Whether the network has registered assets.
    pub fn has_network(&self, network_code: &str) -> bool {
        self.networks.contains_key(network_code)
    }
}

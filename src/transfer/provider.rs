//! Custody-provider dispatch.
//!
//! # Responsibilities
//! - Pick the chain pipeline for a request's network ([`ProviderTransferor`])
//! - Pick the provider transferor for a wallet ([`ProviderRegistry`])
//!
//! # Design Decisions
//! - Both maps are filled while wiring and never change afterwards
//! - Errors from the chosen pipeline pass through unchanged

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{AssetRegistry, NotFoundError};
use crate::transfer::error::TransferResult;
use crate::transfer::types::{TransferPayload, TransferRequest, Transferor};

/// Dispatcher for one custody provider, keyed by network code.
pub struct ProviderTransferor {
    provider_id: String,
    assets: Arc<AssetRegistry>,
    networks: HashMap<String, Arc<dyn Transferor>>,
}

impl ProviderTransferor {
    pub fn new(provider_id: impl Into<String>, assets: Arc<AssetRegistry>) -> Self {
        Self {
            provider_id: provider_id.into(),
            assets,
            networks: HashMap::new(),
        }
    }

    /// Register the pipeline serving a network.
    pub fn with_network(mut self, network_code: impl Into<String>, transferor: Arc<dyn Transferor>) -> Self {
        self.networks.insert(network_code.into(), transferor);
        self
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    pub fn supports(&self, network_code: &str) -> bool {
        self.networks.contains_key(network_code)
    }

    /// Network codes with a registered pipeline, sorted.
    pub fn networks(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.networks.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    fn pipeline(&self, asset_id: &str) -> TransferResult<&Arc<dyn Transferor>> {
        let asset = self.assets.resolve(asset_id)?;
        let network = asset.network.code;
        match self.networks.get(&network) {
            Some(pipeline) => Ok(pipeline),
            None => Err(NotFoundError::NetworkNotSupported {
                provider: self.provider_id.clone(),
                network,
            }
            .into()),
        }
    }
}

#[async_trait]
impl Transferor for ProviderTransferor {
    async fn transfer(&self, request: Arc<TransferRequest>) -> TransferResult<TransferPayload> {
        let pipeline = self.pipeline(&request.asset_id)?;
        pipeline.transfer(request).await
    }

    async fn rebroadcast(&self, payload: &mut TransferPayload) -> TransferResult<()> {
        let pipeline = self.pipeline(&payload.request().asset_id)?;
        pipeline.rebroadcast(payload).await
    }
}

impl std::fmt::Debug for ProviderTransferor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderTransferor")
            .field("provider_id", &self.provider_id)
            .field("networks", &self.networks())
            .finish()
    }
}

/// Provider id → transferor.
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn Transferor>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider_id: impl Into<String>, transferor: Arc<dyn Transferor>) {
        self.providers.insert(provider_id.into(), transferor);
    }

    pub fn get(&self, provider_id: &str) -> Result<Arc<dyn Transferor>, NotFoundError> {
        self.providers
            .get(provider_id)
            .cloned()
            .ok_or_else(|| NotFoundError::Provider(provider_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&String> = self.providers.keys().collect();
        ids.sort_unstable();
        f.debug_struct("ProviderRegistry").field("providers", &ids).finish()
    }
}

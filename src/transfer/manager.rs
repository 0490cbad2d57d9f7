//! Transaction manager: the entry point for transfers.
//!
//! # Responsibilities
//! - Validate the request and resolve its asset before any lookup
//! - Route source address → wallet → custody provider → pipeline
//! - Stamp the result with the wallet and provider it went through
//! - Serialise transfers per source address when enabled
//! - Bound a whole transfer with an optional deadline
//!
//! # Design Decisions
//! - Routing state is read through the repository traits on every call
//! - Errors are logged with their routing context and returned unchanged

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::domain::{AddressRepository, AssetRegistry, NetworkCurrency, Wallet, WalletRepository};
use crate::observability::metrics;
use crate::transfer::error::{TransferError, TransferResult, ValidationError};
use crate::transfer::locks::AddressLocks;
use crate::transfer::provider::ProviderRegistry;
use crate::transfer::types::{TransferPayload, TransferRequest, Transferor};

/// Where a request's source address leads.
struct Route {
    asset: NetworkCurrency,
    wallet: Wallet,
    transferor: Arc<dyn Transferor>,
}

pub struct TransactionManager {
    addresses: Arc<dyn AddressRepository>,
    wallets: Arc<dyn WalletRepository>,
    assets: Arc<AssetRegistry>,
    providers: ProviderRegistry,
    locks: Option<AddressLocks>,
    deadline: Option<Duration>,
}

impl TransactionManager {
    pub fn new(
        addresses: Arc<dyn AddressRepository>,
        wallets: Arc<dyn WalletRepository>,
        assets: Arc<AssetRegistry>,
        providers: ProviderRegistry,
    ) -> Self {
        Self {
            addresses,
            wallets,
            assets,
            providers,
            locks: None,
            deadline: None,
        }
    }

    /// Run at most one transfer per `(network, source address)` at a time.
    pub fn with_address_locks(mut self) -> Self {
        self.locks = Some(AddressLocks::new());
        self
    }

    /// Abort transfers that take longer than `deadline`.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn assets(&self) -> &Arc<AssetRegistry> {
        &self.assets
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    async fn resolve_route(&self, request: &TransferRequest) -> TransferResult<Route> {
        if request.source_address.is_empty() {
            return Err(ValidationError::MissingSourceAddress.into());
        }

        let asset = self.assets.resolve(&request.asset_id)?;
        let address = self
            .addresses
            .get_address_by_value(&request.source_address, &asset.network.code)
            .await?;
        let wallet = self.wallets.get_wallet(address.wallet_id).await?;
        let transferor = self.providers.get(&wallet.provider_id)?;

        Ok(Route {
            asset,
            wallet,
            transferor,
        })
    }

    async fn route_and_transfer(&self, request: Arc<TransferRequest>) -> TransferResult<TransferPayload> {
        let route = match self.resolve_route(&request).await {
            Ok(route) => route,
            Err(err) => {
                tracing::warn!(
                    source_address = %request.source_address,
                    asset = %request.asset_id,
                    error = %err,
                    "Transfer routing failed"
                );
                return Err(err);
            }
        };
        let network = route.asset.network.code.as_str();

        let _guard = match &self.locks {
            Some(locks) => Some(locks.acquire(network, &request.source_address).await),
            None => None,
        };

        tracing::debug!(
            wallet_id = %route.wallet.id,
            provider = %route.wallet.provider_id,
            network,
            "Transfer routed"
        );

        match route.transferor.transfer(request).await {
            Ok(mut payload) => {
                payload.stamp_origin(route.wallet.id, route.wallet.provider_id.clone());
                Ok(payload)
            }
            Err(mut err) => {
                if let Some(payload) = err.unbroadcast_payload_mut() {
                    payload.stamp_origin(route.wallet.id, route.wallet.provider_id.clone());
                }
                tracing::warn!(
                    provider = %route.wallet.provider_id,
                    network,
                    error = %err,
                    "Transfer failed"
                );
                Err(err)
            }
        }
    }

    async fn within_deadline<T, F>(&self, work: F) -> TransferResult<T>
    where
        F: std::future::Future<Output = TransferResult<T>> + Send,
        T: Send,
    {
        match self.deadline {
            Some(limit) => tokio::time::timeout(limit, work)
                .await
                .unwrap_or(Err(TransferError::DeadlineExceeded(limit))),
            None => work.await,
        }
    }

    fn network_label(&self, asset_id: &str) -> String {
        self.assets
            .resolve(asset_id)
            .map(|asset| asset.network.code)
            .unwrap_or_else(|_| "unknown".to_string())
    }
}

fn outcome_label(result: &TransferResult<TransferPayload>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(TransferError::DeadlineExceeded(_)) => "deadline",
        Err(err) => err.kind().as_str(),
    }
}

#[async_trait]
impl Transferor for TransactionManager {
    async fn transfer(&self, request: Arc<TransferRequest>) -> TransferResult<TransferPayload> {
        let started = Instant::now();
        let result = self
            .within_deadline(self.route_and_transfer(Arc::clone(&request)))
            .await;

        let network = self.network_label(&request.asset_id);
        metrics::record_transfer(&network, outcome_label(&result), started.elapsed());

        match &result {
            Ok(payload) => tracing::info!(
                tx_id = payload.id().unwrap_or_default(),
                provider = payload.provider_id().unwrap_or_default(),
                network = %network,
                asset = %request.asset_id,
                amount = %request.amount,
                "Transfer submitted"
            ),
            Err(TransferError::DeadlineExceeded(limit)) => tracing::warn!(
                network = %network,
                asset = %request.asset_id,
                deadline = ?limit,
                "Transfer abandoned at deadline"
            ),
            Err(_) => {}
        }
        result
    }

    /// Resubmit a payload through the provider stamped on it, or through
    /// the provider its source address routes to when it carries none.
    async fn rebroadcast(&self, payload: &mut TransferPayload) -> TransferResult<()> {
        let work = async {
            let transferor = match payload.provider_id() {
                Some(provider_id) => self.providers.get(provider_id)?,
                None => {
                    let route = self.resolve_route(payload.request()).await?;
                    payload.stamp_origin(route.wallet.id, route.wallet.provider_id.clone());
                    route.transferor
                }
            };
            transferor.rebroadcast(payload).await
        };
        let result = self.within_deadline(work).await;

        if let Err(err) = &result {
            tracing::warn!(tx_id = ?payload.id(), error = %err, "Rebroadcast failed");
        }
        result
    }
}

impl std::fmt::Debug for TransactionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionManager")
            .field("providers", &self.providers)
            .field("serialize_per_address", &self.locks.is_some())
            .field("deadline", &self.deadline)
            .finish()
    }
}

//! Wallet store keyed by wallet id.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::{CreateWalletPayload, NotFoundError, RepositoryError, Wallet, WalletRepository};

/// Thread-safe wallet repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWalletRepository {
    inner: Arc<DashMap<Uuid, Wallet>>,
}

impl InMemoryWalletRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WalletRepository for InMemoryWalletRepository {
    async fn create_wallet(&self, payload: CreateWalletPayload) -> Result<Wallet, RepositoryError> {
        let wallet = Wallet {
            id: payload.id.unwrap_or_else(Uuid::new_v4),
            provider_id: payload.provider_id,
        };
        self.inner.insert(wallet.id, wallet.clone());

        tracing::debug!(wallet_id = %wallet.id, provider = %wallet.provider_id, "Wallet stored");
        Ok(wallet)
    }

    async fn get_wallet(&self, wallet_id: Uuid) -> Result<Wallet, RepositoryError> {
        self.inner
            .get(&wallet_id)
            .map(|r| r.value().clone())
            .ok_or_else(|| NotFoundError::Wallet(wallet_id).into())
    }
}

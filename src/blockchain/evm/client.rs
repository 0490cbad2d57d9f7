//! Node client capability and its JSON-RPC implementation.
//!
//! # Responsibilities
//! - Define what the pipeline needs from a node ([`NodeClient`])
//! - Connect to JSON-RPC endpoints with per-call timeouts
//! - Fail reads over to secondary endpoints
//! - Submit raw transactions to the primary endpoint exactly once

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy::consensus::Transaction as _;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::transports::TransportResult;
use async_trait::async_trait;
use tokio::time::timeout;

use crate::blockchain::types::{NodeConfig, NodeError, NodeResult, TransactionInfo};
use crate::observability::metrics;

/// A contract call to estimate gas for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasEstimateCall {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
}

/// Everything the EVM pipeline asks of a node.
#[async_trait]
pub trait NodeClient: Send + Sync {
    async fn chain_id(&self) -> NodeResult<u64>;

    /// Next nonce for `address`, counting pending transactions.
    async fn pending_nonce(&self, address: Address) -> NodeResult<u64>;

    /// Suggested gas price in wei.
    async fn suggest_gas_price(&self) -> NodeResult<u128>;

    async fn estimate_gas(&self, call: GasEstimateCall) -> NodeResult<u64>;

    /// Submit an EIP-2718 encoded signed transaction.
    async fn send_raw_transaction(&self, raw: &[u8]) -> NodeResult<TxHash>;

    async fn transaction_by_hash(&self, hash: TxHash) -> NodeResult<Option<TransactionInfo>>;
}

type DynProvider = Arc<dyn Provider + Send + Sync>;

/// JSON-RPC node client with failover for reads.
#[derive(Clone)]
pub struct RpcNodeClient {
    /// List of providers (primary + failovers).
    providers: Vec<DynProvider>,
    config: NodeConfig,
    timeout_duration: Duration,
}

impl RpcNodeClient {
    /// Create a client for the configured endpoints.
    ///
    /// An unreachable node does not fail construction. A mismatching chain
    /// ID is logged here, and every later [`NodeClient::chain_id`] call
    /// fails with [`NodeError::ChainMismatch`].
    pub async fn new(config: NodeConfig) -> NodeResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers: Vec<DynProvider> = Vec::new();

        let primary_url: url::Url = config.rpc_url.parse().map_err(|e: url::ParseError| {
            NodeError::InvalidEndpoint {
                url: config.rpc_url.clone(),
                reason: e.to_string(),
            }
        })?;
        providers.push(Arc::new(ProviderBuilder::new().connect_http(primary_url)));

        for url_str in &config.failover_urls {
            match url_str.parse::<url::Url>() {
                Ok(url) => providers.push(Arc::new(ProviderBuilder::new().connect_http(url))),
                Err(e) => tracing::warn!(url = %url_str, error = %e, "Ignoring invalid failover RPC URL"),
            }
        }

        let client = Self {
            providers,
            config,
            timeout_duration,
        };

        if client.config.chain_id.is_some() {
            match client.verify_chain_id().await {
                Ok(()) => tracing::info!(
                    rpc_url = %client.config.rpc_url,
                    chain_id = ?client.config.chain_id,
                    "Node client initialized"
                ),
                Err(e) => tracing::warn!(
                    rpc_url = %client.config.rpc_url,
                    error = %e,
                    "Node client initialized but chain verification failed"
                ),
            }
        }

        Ok(client)
    }

    /// Verify the connected chain ID matches the configured one, if any.
    pub async fn verify_chain_id(&self) -> NodeResult<()> {
        let Some(expected) = self.config.chain_id else {
            return Ok(());
        };
        let actual = self.reported_chain_id().await?;
        if actual != expected {
            return Err(NodeError::ChainMismatch { expected, actual });
        }
        Ok(())
    }

    async fn reported_chain_id(&self) -> NodeResult<u64> {
        self.with_failover("chain_id", |p| async move { p.get_chain_id().await })
            .await
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Run a read against each provider in turn until one answers.
    async fn with_failover<T, F, Fut>(&self, operation: &'static str, call: F) -> NodeResult<T>
    where
        F: Fn(DynProvider) -> Fut + Send,
        Fut: Future<Output = TransportResult<T>> + Send,
        T: Send,
    {
        let mut last_error = None;

        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, call(Arc::clone(provider))).await {
                Ok(Ok(result)) => {
                    metrics::record_node_call(operation, true);
                    return Ok(result);
                }
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, operation, error = %e, "RPC error, trying next provider");
                    last_error = Some(NodeError::Rpc(e.to_string()));
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, operation, "RPC timeout, trying next provider");
                    last_error = Some(NodeError::Timeout(self.config.rpc_timeout_secs));
                }
            }
        }

        metrics::record_node_call(operation, false);
        Err(last_error.unwrap_or_else(|| NodeError::Rpc(format!("no RPC provider available for {operation}"))))
    }
}

#[async_trait]
impl NodeClient for RpcNodeClient {
    /// Chain ID reported by the node, refused when it differs from the
    /// configured one.
    async fn chain_id(&self) -> NodeResult<u64> {
        let actual = self.reported_chain_id().await?;
        match self.config.chain_id {
            Some(expected) if expected != actual => Err(NodeError::ChainMismatch { expected, actual }),
            _ => Ok(actual),
        }
    }

    async fn pending_nonce(&self, address: Address) -> NodeResult<u64> {
        self.with_failover("pending_nonce", move |p| async move {
            p.get_transaction_count(address).pending().await
        })
        .await
    }

    async fn suggest_gas_price(&self) -> NodeResult<u128> {
        self.with_failover("gas_price", |p| async move { p.get_gas_price().await })
            .await
    }

    async fn estimate_gas(&self, call: GasEstimateCall) -> NodeResult<u64> {
        let request = TransactionRequest::default()
            .with_from(call.from)
            .with_to(call.to)
            .with_input(call.data);

        self.with_failover("estimate_gas", move |p| {
            let request = request.clone();
            async move { p.estimate_gas(request).await }
        })
        .await
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> NodeResult<TxHash> {
        // Submission never fails over: a second endpoint would be a retry.
        let provider = &self.providers[0];
        match timeout(self.timeout_duration, provider.send_raw_transaction(raw)).await {
            Ok(Ok(pending)) => {
                metrics::record_node_call("send_raw_transaction", true);
                Ok(*pending.tx_hash())
            }
            Ok(Err(e)) => {
                metrics::record_node_call("send_raw_transaction", false);
                Err(NodeError::Rpc(e.to_string()))
            }
            Err(_) => {
                metrics::record_node_call("send_raw_transaction", false);
                Err(NodeError::Timeout(self.config.rpc_timeout_secs))
            }
        }
    }

    async fn transaction_by_hash(&self, hash: TxHash) -> NodeResult<Option<TransactionInfo>> {
        let tx = self
            .with_failover("transaction_by_hash", move |p| async move {
                p.get_transaction_by_hash(hash).await
            })
            .await?;

        Ok(tx.map(|tx| TransactionInfo {
            hash,
            chain_id: tx.chain_id(),
            nonce: tx.nonce(),
            gas_limit: tx.gas_limit(),
            gas_price: tx.max_fee_per_gas(),
            block_number: tx.block_number,
        }))
    }
}

impl std::fmt::Debug for RpcNodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcNodeClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("failovers", &(self.providers.len() - 1))
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}

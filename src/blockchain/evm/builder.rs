//! Unsigned EVM transaction assembly.

use std::sync::Arc;

use alloy::consensus::TxEip1559;
use alloy::primitives::{Address, Bytes, TxKind, U256};
use async_trait::async_trait;

use crate::blockchain::evm::abi::encode_token_transfer;
use crate::blockchain::evm::client::{GasEstimateCall, NodeClient};
use crate::blockchain::evm::codec;
use crate::blockchain::evm::units::{parse_address, to_base_units};
use crate::domain::{AssetRegistry, NetworkCurrency};
use crate::transfer::{Builder, TransferError, TransferPayload, TransferRequest, TransferResult};

/// Gas limit of a plain value transfer.
pub const NATIVE_TRANSFER_GAS_LIMIT: u64 = 21_000;

/// Builds EIP-1559 transfers for native coins and ERC-20 tokens.
pub struct EvmTransactionBuilder {
    node: Arc<dyn NodeClient>,
    assets: Arc<AssetRegistry>,
}

/// Node-provided parameters every transaction needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FeeQuote {
    chain_id: u64,
    nonce: u64,
    gas_price: u128,
}

/// Where the transaction goes and what it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CallPlan {
    to: Address,
    value: U256,
    gas_limit: u64,
    data: Bytes,
}

impl EvmTransactionBuilder {
    pub fn new(node: Arc<dyn NodeClient>, assets: Arc<AssetRegistry>) -> Self {
        Self { node, assets }
    }

    async fn quote(&self, request: &TransferRequest, from: Address) -> TransferResult<FeeQuote> {
        let chain_id = self
            .node
            .chain_id()
            .await
            .map_err(|e| TransferError::node("retrieve chain ID", e))?;

        let nonce = self.node.pending_nonce(from).await.map_err(|e| {
            TransferError::node(
                format!("retrieve nonce for address ({})", request.source_address),
                e,
            )
        })?;

        let gas_price = self
            .node
            .suggest_gas_price()
            .await
            .map_err(|e| TransferError::node("retrieve gas price", e))?;

        Ok(FeeQuote {
            chain_id,
            nonce,
            gas_price,
        })
    }

    async fn plan(
        &self,
        request: &TransferRequest,
        asset: &NetworkCurrency,
        from: Address,
        to: Address,
        amount: U256,
    ) -> TransferResult<CallPlan> {
        if asset.is_native() {
            return Ok(CallPlan {
                to,
                value: amount,
                gas_limit: NATIVE_TRANSFER_GAS_LIMIT,
                data: Bytes::new(),
            });
        }

        let contract = parse_address(&asset.contract_address)?;
        let data = encode_token_transfer(to, amount);
        let gas_limit = self
            .node
            .estimate_gas(GasEstimateCall {
                from,
                to: contract,
                data: data.clone(),
            })
            .await
            .map_err(|e| {
                TransferError::node(
                    format!(
                        "estimate gas for currency({}), from({}) and to({}) via contract({})",
                        asset.id, request.source_address, request.destination_address, contract
                    ),
                    e,
                )
            })?;

        Ok(CallPlan {
            to: contract,
            value: U256::ZERO,
            gas_limit,
            data,
        })
    }
}

fn assemble(quote: FeeQuote, plan: CallPlan) -> TxEip1559 {
    TxEip1559 {
        chain_id: quote.chain_id,
        nonce: quote.nonce,
        gas_limit: plan.gas_limit,
        // No priority-fee strategy: tip and cap both take the node's suggestion.
        max_fee_per_gas: quote.gas_price,
        max_priority_fee_per_gas: quote.gas_price,
        to: TxKind::Call(plan.to),
        value: plan.value,
        access_list: Default::default(),
        input: plan.data,
    }
}

#[async_trait]
impl Builder for EvmTransactionBuilder {
    async fn build(&self, request: Arc<TransferRequest>) -> TransferResult<TransferPayload> {
        let asset = self.assets.resolve(&request.asset_id)?;
        let amount = to_base_units(request.amount, asset.scale)?;
        let from = parse_address(&request.source_address)?;
        let to = parse_address(&request.destination_address)?;

        let quote = self.quote(&request, from).await?;
        let plan = self.plan(&request, &asset, from, to, amount).await?;

        tracing::debug!(
            asset = %asset.id,
            chain_id = quote.chain_id,
            nonce = quote.nonce,
            gas_limit = plan.gas_limit,
            value = %plan.value,
            "Transaction built"
        );

        let raw = codec::encode_unsigned(&assemble(quote, plan));
        Ok(TransferPayload::new(request, raw))
    }
}

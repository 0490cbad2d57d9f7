//! Demo API handlers.

use std::str::FromStr;
use std::sync::Arc;

use alloy::primitives::TxHash;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::{Form, Json};
use rust_decimal::Decimal;
use serde_json::json;

use crate::http::request::{request_id, NetworkQuery, PayoutForm, TransactionQuery};
use crate::http::response::{AddressView, ApiError, CurrencyView, NetworkView, PayoutView, TransactionView};
use crate::http::server::AppState;
use crate::transfer::{TransferRequest, Transferor};

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Currencies and source addresses of a network.
pub async fn get_network(
    State(state): State<AppState>,
    Query(query): Query<NetworkQuery>,
) -> Result<Json<NetworkView>, ApiError> {
    let services = &state.services;
    let currencies = services
        .assets
        .list_assets(&query.network)?
        .into_iter()
        .map(|asset| CurrencyView {
            id: asset.id,
            label: asset.currency,
        })
        .collect();

    let mut addresses = Vec::new();
    for address in services.addresses.get_addresses_by_network(&query.network).await? {
        let wallet = services.wallets.get_wallet(address.wallet_id).await?;
        addresses.push(AddressView {
            id: address.id,
            address: address.address,
            network_code: address.network_code,
            wallet_id: address.wallet_id,
            provider_id: wallet.provider_id,
        });
    }

    Ok(Json(NetworkView {
        currencies,
        addresses,
    }))
}

/// Submit a payout and return its transaction link.
pub async fn create_payout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<PayoutForm>,
) -> Result<Json<PayoutView>, ApiError> {
    let request_id = request_id(&headers);
    let amount = Decimal::from_str(form.amount.trim())
        .map_err(|e| ApiError::bad_request(format!("failed to parse amount: {e}")))?;

    let request = Arc::new(TransferRequest {
        source_address: form.from,
        destination_address: form.to,
        amount,
        asset_id: form.currency,
    });

    let payload = match state.services.manager.transfer(request).await {
        Ok(payload) => payload,
        Err(err) => {
            tracing::error!(request_id, error = %err, kind = err.kind().as_str(), "Failed to create transfer");
            return Err(err.into());
        }
    };

    let id = payload.id().unwrap_or_default().to_string();
    Ok(Json(PayoutView {
        url: format!("{}{}", state.services.explorer_url_prefix, id),
        provider_id: payload.provider_id().unwrap_or_default().to_string(),
        id,
    }))
}

/// Look a transaction up on the node of its network.
pub async fn get_transaction(
    State(state): State<AppState>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<TransactionView>, ApiError> {
    let hash = TxHash::from_str(query.tid.trim())
        .map_err(|e| ApiError::bad_request(format!("invalid transaction id {}: {e}", query.tid)))?;

    let nodes = &state.services.nodes;
    let node = match &query.network {
        Some(network) => nodes.get(network),
        None => nodes.values().next(),
    }
    .ok_or_else(|| ApiError::not_found(format!("no node for network {}", query.network.as_deref().unwrap_or("*"))))?;

    let info = node
        .transaction_by_hash(hash)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("transaction {} not found", query.tid)))?;

    Ok(Json(TransactionView {
        id: info.hash.to_string(),
        chain_id: info.chain_id,
        nonce: info.nonce,
        gas: info.gas_limit,
        gas_price: info.gas_price,
        block_number: info.block_number,
    }))
}

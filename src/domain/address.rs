//! Address records.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An on-chain address owned by a wallet on one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: Uuid,
    pub address: String,
    pub network_code: String,
    pub wallet_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAddressPayload {
    pub address: String,
    pub network_code: String,
    pub wallet_id: Uuid,
}

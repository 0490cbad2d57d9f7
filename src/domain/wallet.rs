//! Wallet records.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A custody wallet. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: Uuid,
    /// Custody provider holding the wallet's keys.
    pub provider_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWalletPayload {
    /// Wallet id to use; a fresh one is generated when `None`.
    pub id: Option<Uuid>,
    pub provider_id: String,
}

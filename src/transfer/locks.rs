//! Per-address serialisation of transfers.
//!
//! Two concurrent transfers from one source address would both read the
//! same pending nonce. Holding a lock per `(network, address)` across
//! build, sign and broadcast keeps them apart; transfers from different
//! addresses still run in parallel.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Async mutex per `(network code, source address)`.
#[derive(Debug, Default)]
pub struct AddressLocks {
    locks: DashMap<(String, String), Arc<Mutex<()>>>,
}

impl AddressLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive use of an address on a network.
    pub async fn acquire(&self, network_code: &str, address: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry((network_code.to_string(), address.to_string()))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Number of addresses that have been locked at least once.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_address_is_exclusive() {
        let locks = Arc::new(AddressLocks::new());
        let guard = locks.acquire("TestEth", "0xA").await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire("TestEth", "0xA").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let locks = AddressLocks::new();
        let _a = locks.acquire("TestEth", "0xA").await;
        let _b = tokio::time::timeout(Duration::from_millis(100), locks.acquire("TestEth", "0xB"))
            .await
            .unwrap();
        let _c = tokio::time::timeout(Duration::from_millis(100), locks.acquire("Sepolia", "0xA"))
            .await
            .unwrap();
        assert_eq!(locks.len(), 3);
    }
}

//! In-memory repositories.
//!
//! Both stores wrap an `Arc<DashMap>` so clones share state and lookups
//! never block the async runtime for long. Records are only ever inserted.

pub mod address;
pub mod wallet;

pub use address::InMemoryAddressRepository;
pub use wallet::InMemoryWalletRepository;

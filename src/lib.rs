//! Custody transfer gateway library.

pub mod blockchain;
pub mod config;
pub mod domain;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod repo;
pub mod transfer;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use transfer::{TransactionManager, TransferError, TransferPayload, TransferRequest, Transferor};

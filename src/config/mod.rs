//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → lifecycle::startup wires registries and repositories from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All sections have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AddressConfig, AppConfig, AssetConfig, ListenerConfig, LogFormat, NetworkPipelineConfig, NodeConfig,
    ObservabilityConfig, ProviderConfig, TransferConfig, WalletConfig,
};
pub use validation::{validate_config, ConfigIssue};

//! Transfer gateway demo server.
//!
//! # Architecture Overview
//!
//! ```text
//!   POST /demo/payouts
//!          │
//!          ▼
//!   ┌──────────────┐   address → wallet → provider   ┌───────────────────┐
//!   │ Transaction  │────────────────────────────────▶│ ProviderTransferor │
//!   │   Manager    │                                 │  (per provider)    │
//!   └──────────────┘                                 └─────────┬─────────┘
//!                                                              │ network code
//!                                                              ▼
//!                                  ┌─────────┐   ┌────────┐   ┌─────────────┐
//!                                  │ Builder │──▶│ Signer │──▶│ Broadcaster │──▶ node
//!                                  └─────────┘   └────────┘   └─────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use transfer_gateway::config::{load_config, AppConfig};
use transfer_gateway::http::HttpServer;
use transfer_gateway::lifecycle::{bootstrap, signals, Shutdown};
use transfer_gateway::observability::{init_logging, init_metrics};

#[derive(Parser)]
#[command(name = "transfer-gateway", version, about = "Custody transfer gateway")]
struct Args {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    init_logging(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "transfer-gateway starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        providers = config.providers.len(),
        serialize_per_address = config.transfer.serialize_per_address,
        transfer_timeout_secs = config.transfer.timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let services = bootstrap(&config).await?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    HttpServer::new(services, &config.listener)
        .run(listener, shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "transfer-cli")]
#[command(about = "Client for the transfer gateway demo API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List currencies and source addresses of a network
    Networks {
        #[arg(short, long, default_value = "TestEth")]
        network: String,
    },
    /// Send a payout
    Payout {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Amount in display units, e.g. 1.5
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "TEST_ETH")]
        currency: String,
    },
    /// Look up a submitted transaction
    Tx {
        /// Transaction hash
        tid: String,
        #[arg(short, long)]
        network: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let res = match cli.command {
        Commands::Networks { network } => {
            client
                .get(format!("{}/demo/networks", cli.url))
                .query(&[("network", network)])
                .send()
                .await?
        }
        Commands::Payout {
            from,
            to,
            amount,
            currency,
        } => {
            client
                .post(format!("{}/demo/payouts", cli.url))
                .form(&[("from", from), ("to", to), ("amount", amount), ("currency", currency)])
                .send()
                .await?
        }
        Commands::Tx { tid, network } => {
            let mut query = vec![("tid", tid)];
            if let Some(network) = network {
                query.push(("network", network));
            }
            client
                .get(format!("{}/demo/transactions", cli.url))
                .query(&query)
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

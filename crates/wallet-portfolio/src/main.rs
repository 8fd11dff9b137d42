//! CLI entry point: print a wallet's token portfolio report

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use wallet_portfolio::config::{Config, FileConfig};

#[derive(Parser)]
#[command(name = "wallet-portfolio", version, about = "Token portfolio valuation for a Solana wallet")]
struct Args {
    /// Wallet address (base58)
    address: String,

    /// Path to an optional config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the ledger RPC endpoint
    #[arg(long)]
    rpc_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let file_config = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let config = Config::from_file(&file_config, args.rpc_url);

    let report = wallet_portfolio::wallet_report(&args.address, &config).await?;
    println!("{}", report);

    Ok(())
}

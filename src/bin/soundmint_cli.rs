use std::sync::Arc;

use alloy::primitives::{utils::parse_ether, U256};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use soundmint::config::{CliArgs, PlatformConfig};
use soundmint::contract_client::{ContractConfig, PlatformClient, RpcWallet};
use soundmint::gas::GasEstimator;
use soundmint::manager::NftManager;
use soundmint::status::StatusResolver;
use soundmint::submitter::TransactionSubmitter;
use soundmint::wallet::{check_balance, display_wallet_status, load_wallet, WalletStatus};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Soundmint CLI - mint, list and unlist music-track NFTs
#[derive(Parser)]
#[command(name = "soundmint_cli")]
#[command(about = "Soundmint CLI - mint, list and unlist music-track NFTs", long_about = None)]
struct Cli {
    #[command(flatten)]
    args: CliArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a track's on-chain status and the action it permits
    Status {
        /// Logical track id
        track_id: u64,
    },

    /// Mint a track as an NFT
    Mint {
        track_id: u64,
        /// Metadata URI (e.g. ipfs://...)
        metadata_uri: String,
    },

    /// List a minted track on the marketplace
    List {
        track_id: u64,
        /// Price in ETH
        price_eth: String,
    },

    /// Remove a track's active listing
    Unlist { track_id: u64 },

    /// Show the configured wallet and its balance
    Wallet,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    let config = PlatformConfig::load(cli.args).await?;

    let contract_config = ContractConfig::new(
        config.rpc_url.clone(),
        config.nft_contract_address,
        config.marketplace_contract_address,
    );

    let wallet = Arc::new(RpcWallet::connect(&config.rpc_url, &config.private_key).await?);
    let reader = Arc::new(PlatformClient::with_provider(
        &contract_config,
        wallet.provider(),
    ));

    let submitter = TransactionSubmitter::new(
        wallet.clone(),
        GasEstimator::new(config.profile.clone()),
    );
    let manager = NftManager::new(
        StatusResolver::new(reader),
        submitter,
        wallet,
        config.nft_contract_address,
        config.marketplace_contract_address,
    );

    match cli.command {
        Commands::Status { track_id } => {
            let snapshot = manager.snapshot(track_id).await;
            let action = manager.next_action(&snapshot);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            info!(action = ?action.action, enabled = action.enabled, "permitted action");
        }
        Commands::Mint {
            track_id,
            metadata_uri,
        } => {
            let hash = manager.mint(track_id, &metadata_uri).await?;
            println!("mint confirmed: {hash:?}");
        }
        Commands::List { track_id, price_eth } => {
            let price: U256 = parse_ether(&price_eth)
                .with_context(|| format!("Invalid ETH amount: {price_eth}"))?;
            let hash = manager.list(track_id, price).await?;
            println!("listing confirmed: {hash:?}");
        }
        Commands::Unlist { track_id } => {
            let hash = manager.unlist(track_id).await?;
            println!("delisting confirmed: {hash:?}");
        }
        Commands::Wallet => {
            let signer = load_wallet(&config.private_key)?;
            let balance = check_balance(&config.rpc_url, signer.address()).await?;
            display_wallet_status(
                WalletStatus::Ready,
                signer.address(),
                &config.rpc_url,
                balance,
            );
        }
    }

    Ok(())
}

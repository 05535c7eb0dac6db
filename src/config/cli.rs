//! CLI/env configuration loading with the priority
//! CLI/env -> state file -> defaults, plus first-run wallet provisioning.

use alloy::primitives::{Address, U256};
use anyhow::{Context, Result};
use clap::Parser;
use std::collections::BTreeMap;
use tracing::info;

use crate::config::chain::ChainProfile;
use crate::config::consts::{
    DEFAULT_MARKETPLACE_CONTRACT_ADDRESS, DEFAULT_NFT_CONTRACT_ADDRESS, DEFAULT_RPC_URL,
    STATE_FILE_CLI,
};
use crate::state::StateFile;
use crate::wallet::{
    check_balance, display_wallet_status, generate_wallet, load_wallet, WalletStatus,
};

/// CLI arguments shared by every soundmint command.
#[derive(Parser, Debug, Default)]
pub struct CliArgs {
    /// Ethereum RPC endpoint
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// MusicNft contract address
    #[arg(long, env = "NFT_CONTRACT_ADDRESS")]
    pub nft_contract_address: Option<String>,

    /// Marketplace contract address
    #[arg(long, env = "MARKETPLACE_CONTRACT_ADDRESS")]
    pub marketplace_contract_address: Option<String>,

    /// Private key for contract interactions
    #[arg(long, env = "PRIVATE_KEY")]
    pub private_key: Option<String>,

    /// Path to a TOML chain fee profile; defaults to the Anvil profile
    #[arg(long, env = "CHAIN_PROFILE")]
    pub chain_profile: Option<String>,
}

/// Fully-resolved configuration.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub rpc_url: String,
    pub nft_contract_address: Address,
    pub marketplace_contract_address: Address,
    pub private_key: String,
    pub profile: ChainProfile,
}

enum WalletState {
    Created(Address),
    NeedsFunding(Address),
    Ready { address: Address, balance: U256 },
}

impl WalletState {
    fn ensure_ready(self, rpc_url: &str) -> Result<()> {
        match self {
            WalletState::Created(address) => {
                display_wallet_status(WalletStatus::Created, address, rpc_url, U256::ZERO);
                anyhow::bail!(
                    "Account created successfully. Please fund the address with ETH to continue."
                );
            }
            WalletState::NeedsFunding(address) => {
                display_wallet_status(
                    WalletStatus::InsufficientFunds,
                    address,
                    rpc_url,
                    U256::ZERO,
                );
                anyhow::bail!("Insufficient funds. Please load ETH to the address and try again.");
            }
            WalletState::Ready { address, balance } => {
                display_wallet_status(WalletStatus::Ready, address, rpc_url, balance);
                Ok(())
            }
        }
    }
}

impl PlatformConfig {
    /// Load configuration with priority: CLI/env -> state file -> defaults.
    /// Generates a new wallet if none exists and checks balance before
    /// allowing state-changing commands.
    pub async fn load(cli_args: CliArgs) -> Result<Self> {
        let state_file = StateFile::new(STATE_FILE_CLI);

        let rpc_url = cli_args
            .rpc_url
            .or_else(|| state_file.load_value("RPC_URL"))
            .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());

        let nft_contract_address_str = cli_args
            .nft_contract_address
            .or_else(|| state_file.load_value("NFT_CONTRACT_ADDRESS"))
            .unwrap_or_else(|| DEFAULT_NFT_CONTRACT_ADDRESS.to_string());

        let marketplace_contract_address_str = cli_args
            .marketplace_contract_address
            .or_else(|| state_file.load_value("MARKETPLACE_CONTRACT_ADDRESS"))
            .unwrap_or_else(|| DEFAULT_MARKETPLACE_CONTRACT_ADDRESS.to_string());

        let mut wallet_was_created = false;

        let private_key = match cli_args
            .private_key
            .or_else(|| state_file.load_value("PRIVATE_KEY"))
        {
            Some(pk) => pk,
            None => {
                info!("No private key found. Generating new wallet...");
                let wallet = generate_wallet();
                let private_key = format!("0x{}", hex::encode(wallet.to_bytes()));
                let public_key = format!("{:?}", wallet.address());

                let mut state = BTreeMap::new();
                state.insert("PRIVATE_KEY".to_string(), private_key.clone());
                state.insert("PUBLIC_KEY".to_string(), public_key.clone());
                state.insert("RPC_URL".to_string(), rpc_url.clone());
                state.insert(
                    "NFT_CONTRACT_ADDRESS".to_string(),
                    nft_contract_address_str.clone(),
                );
                state.insert(
                    "MARKETPLACE_CONTRACT_ADDRESS".to_string(),
                    marketplace_contract_address_str.clone(),
                );
                state_file.save_all(&state)?;

                info!("New wallet generated and saved to {}", STATE_FILE_CLI);
                info!("Address: {}", public_key);
                wallet_was_created = true;

                private_key
            }
        };

        let nft_contract_address = nft_contract_address_str.parse::<Address>()?;
        let marketplace_contract_address = marketplace_contract_address_str.parse::<Address>()?;

        let profile = match &cli_args.chain_profile {
            Some(path) => ChainProfile::load_from_path(path)
                .with_context(|| format!("Failed to load chain profile from {path}"))?,
            None => ChainProfile::anvil(),
        };

        let wallet = load_wallet(&private_key)?;
        let address = wallet.address();

        info!("Checking balance for address: {:?}", address);
        let balance = check_balance(&rpc_url, address)
            .await
            .context("Failed to check balance")?;

        let wallet_state = if wallet_was_created {
            WalletState::Created(address)
        } else if balance.is_zero() {
            WalletState::NeedsFunding(address)
        } else {
            WalletState::Ready { address, balance }
        };

        wallet_state.ensure_ready(&rpc_url)?;

        info!(
            "Loaded PlatformConfig: rpc_url={}, nft_contract_address={}",
            rpc_url, nft_contract_address
        );
        Ok(PlatformConfig {
            rpc_url,
            nft_contract_address,
            marketplace_contract_address,
            private_key,
            profile,
        })
    }
}

//! Alloy-backed production implementations of the provider seams.

use alloy::{
    primitives::{Address, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
};
use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::provider::{ChainReader, Listing};

pub mod marketplace;
pub mod music_nft;
pub mod signer;

pub use marketplace::{Marketplace, MarketplaceClient};
pub use music_nft::{MusicNft, MusicNftClient};
pub use signer::RpcWallet;

/// Configuration for connecting to the platform contracts.
#[derive(Clone, Debug)]
pub struct ContractConfig {
    pub nft_contract_address: Address,
    pub marketplace_contract_address: Address,
    pub rpc_url: String,
}

impl ContractConfig {
    pub fn new(
        rpc_url: String,
        nft_contract_address: Address,
        marketplace_contract_address: Address,
    ) -> Self {
        Self {
            nft_contract_address,
            marketplace_contract_address,
            rpc_url,
        }
    }

    /// Anvil local testnet defaults, deployment order MusicNft -> Marketplace.
    pub fn anvil_config() -> Self {
        Self {
            nft_contract_address: crate::config::consts::DEFAULT_NFT_CONTRACT_ADDRESS
                .parse::<Address>()
                .expect("Invalid NFT contract address"),
            marketplace_contract_address:
                crate::config::consts::DEFAULT_MARKETPLACE_CONTRACT_ADDRESS
                    .parse::<Address>()
                    .expect("Invalid marketplace contract address"),
            rpc_url: crate::config::consts::DEFAULT_RPC_URL.to_string(),
        }
    }
}

/// Read-only client over both platform contracts; the production
/// [`ChainReader`].
#[derive(Clone)]
pub struct PlatformClient {
    nft: MusicNftClient,
    marketplace: MarketplaceClient,
    provider: DynProvider,
}

impl PlatformClient {
    /// Connect with a fresh read-only provider.
    pub async fn connect(config: &ContractConfig) -> Result<Self> {
        let provider: DynProvider = ProviderBuilder::new()
            .connect(&config.rpc_url)
            .await
            .context("Failed to connect to RPC endpoint")?
            .erased();
        Ok(Self::with_provider(config, provider))
    }

    /// Build over an existing provider (e.g. the signing wallet's).
    pub fn with_provider(config: &ContractConfig, provider: DynProvider) -> Self {
        let nft = MusicNftClient::new(config.nft_contract_address, provider.clone());
        let marketplace =
            MarketplaceClient::new(config.marketplace_contract_address, provider.clone());
        Self {
            nft,
            marketplace,
            provider,
        }
    }

    pub fn nft(&self) -> &MusicNftClient {
        &self.nft
    }

    pub fn marketplace(&self) -> &MarketplaceClient {
        &self.marketplace
    }

    pub async fn get_balance(&self, address: Address) -> Result<U256> {
        Ok(self.provider.get_balance(address).await?)
    }
}

#[async_trait]
impl ChainReader for PlatformClient {
    async fn token_of_track(&self, track_id: u64) -> Result<Option<U256>> {
        self.nft.track_token_id(track_id).await
    }

    async fn owner_of(&self, token_id: U256) -> Result<Address> {
        self.nft.owner_of(token_id).await
    }

    async fn listing_of(&self, token_id: U256) -> Result<Option<Listing>> {
        self.marketplace.get_listing(self.nft.address(), token_id).await
    }
}

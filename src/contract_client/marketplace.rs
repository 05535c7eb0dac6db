use alloy::{
    primitives::{Address, U256},
    providers::DynProvider,
    sol,
};

use crate::provider::Listing;

// Type-safe bindings for the Marketplace contract
sol!(
    #[sol(rpc)]
    #[derive(Debug)]
    contract Marketplace {
        function getListing(address nftContract, uint256 tokenId)
            external view returns (address seller, uint256 price, bool active);
        function listItem(address nftContract, uint256 tokenId, uint256 price) external;
        function delistItem(address nftContract, uint256 tokenId) external;
        function buyItem(address nftContract, uint256 tokenId) external payable;
    }
);

use Marketplace::MarketplaceInstance;

/// Client for the Marketplace contract.
#[derive(Clone)]
pub struct MarketplaceClient {
    contract: MarketplaceInstance<DynProvider>,
}

impl MarketplaceClient {
    pub fn new(address: Address, provider: DynProvider) -> Self {
        Self {
            contract: MarketplaceInstance::new(address, provider),
        }
    }

    pub fn address(&self) -> Address {
        *self.contract.address()
    }

    /// Active listing for a token, None when no active listing exists.
    pub async fn get_listing(
        &self,
        nft_contract: Address,
        token_id: U256,
    ) -> anyhow::Result<Option<Listing>> {
        // Solidity: function getListing(address, uint256)
        //     external view returns (address seller, uint256 price, bool active)
        let result = self.contract.getListing(nft_contract, token_id).call().await?;
        Ok(result.active.then_some(Listing {
            seller: result.seller,
            price: result.price,
        }))
    }
}

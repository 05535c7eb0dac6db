use alloy::{
    primitives::{Address, U256},
    providers::DynProvider,
    sol,
};

// Type-safe bindings for the MusicNft ERC-721 contract
sol!(
    #[sol(rpc)]
    #[derive(Debug)]
    contract MusicNft {
        function trackTokenId(uint256 trackId) external view returns (uint256);
        function ownerOf(uint256 tokenId) external view returns (address);
        function mintTrack(uint256 trackId, string metadataURI) external returns (uint256);
        function tokenURI(uint256 tokenId) external view returns (string);
        function approve(address to, uint256 tokenId) external;
    }
);

use MusicNft::MusicNftInstance;

/// Client for the MusicNft contract.
#[derive(Clone)]
pub struct MusicNftClient {
    contract: MusicNftInstance<DynProvider>,
}

impl MusicNftClient {
    pub fn new(address: Address, provider: DynProvider) -> Self {
        Self {
            contract: MusicNftInstance::new(address, provider),
        }
    }

    pub fn address(&self) -> Address {
        *self.contract.address()
    }

    /// Token id minted for a logical track. Token ids start at 1;
    /// zero means the track has not been minted.
    pub async fn track_token_id(&self, track_id: u64) -> anyhow::Result<Option<U256>> {
        // Solidity: function trackTokenId(uint256) external view returns (uint256)
        let token_id = self.contract.trackTokenId(U256::from(track_id)).call().await?;
        Ok((!token_id.is_zero()).then_some(token_id))
    }

    /// Current owner of a minted token.
    pub async fn owner_of(&self, token_id: U256) -> anyhow::Result<Address> {
        // Solidity: function ownerOf(uint256) external view returns (address)
        Ok(self.contract.ownerOf(token_id).call().await?)
    }

    /// Metadata URI of a minted token.
    pub async fn token_uri(&self, token_id: U256) -> anyhow::Result<String> {
        // Solidity: function tokenURI(uint256) external view returns (string)
        Ok(self.contract.tokenURI(token_id).call().await?)
    }
}

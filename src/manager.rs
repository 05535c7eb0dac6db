//! Orchestration of resolve -> select -> submit for one track.
//!
//! The manager owns the per-action in-flight guard: while its submitter is
//! between broadcast and receipt, every action it reports is disabled and
//! every state-changing call is refused. This replaces the hidden
//! module-level "in progress" flag pattern with state the caller can see
//! and tests can construct in isolation.

use std::sync::Arc;

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::sol_types::SolCall;
use anyhow::{bail, Result};
use tracing::info;

use crate::action::{select, ActionConfig, TrackAction};
use crate::contract_client::{Marketplace, MusicNft};
use crate::provider::{ChainReader, TxRequest, WalletProvider};
use crate::status::{StatusResolver, TrackSnapshot};
use crate::submitter::{TransactionSubmitter, TxState};

/// Ties a status resolver and a transaction submitter to the platform
/// contract addresses.
pub struct NftManager<R, W> {
    resolver: StatusResolver<R>,
    submitter: TransactionSubmitter<W>,
    wallet: Arc<W>,
    nft_contract: Address,
    marketplace_contract: Address,
}

impl<R: ChainReader, W: WalletProvider> NftManager<R, W> {
    pub fn new(
        resolver: StatusResolver<R>,
        submitter: TransactionSubmitter<W>,
        wallet: Arc<W>,
        nft_contract: Address,
        marketplace_contract: Address,
    ) -> Self {
        Self {
            resolver,
            submitter,
            wallet,
            nft_contract,
            marketplace_contract,
        }
    }

    /// Point-in-time snapshot of a track for the connected wallet.
    /// Without a wallet the zero address is compared, so ownership never
    /// matches and browsing still works.
    pub async fn snapshot(&self, track_id: u64) -> TrackSnapshot {
        let wallet = self.wallet.address().unwrap_or(Address::ZERO);
        self.resolver.resolve(track_id, wallet).await
    }

    /// The single action to offer for a snapshot, disabled while a
    /// transaction is in flight.
    pub fn next_action(&self, snapshot: &TrackSnapshot) -> ActionConfig {
        let mut config = select(snapshot.status, snapshot.is_owner, snapshot.is_listed());
        if self.submitter.is_in_flight() {
            config.enabled = false;
        }
        config
    }

    /// Observable state of the current/last submission.
    pub fn tx_state(&self) -> TxState {
        self.submitter.state()
    }

    /// Clear a terminal submission state so a fresh action can run.
    pub fn reset(&self) {
        self.submitter.reset();
    }

    /// Mint the track's NFT. Permitted only when the track is unminted.
    pub async fn mint(&self, track_id: u64, metadata_uri: &str) -> Result<B256> {
        self.ensure_permitted(track_id, TrackAction::Mint).await?;

        let calldata = MusicNft::mintTrackCall {
            trackId: U256::from(track_id),
            metadataURI: metadata_uri.to_string(),
        }
        .abi_encode();

        let hash = self
            .submitter
            .submit(TxRequest::new(
                self.nft_contract,
                "mintTrack",
                Bytes::from(calldata),
            ))
            .await?;
        info!(track_id, tx_hash = ?hash, "track minted");
        Ok(hash)
    }

    /// List the track's token at a price in wei. Owner only.
    pub async fn list(&self, track_id: u64, price: U256) -> Result<B256> {
        let snapshot = self.ensure_permitted(track_id, TrackAction::List).await?;
        let token_id = snapshot
            .token_id
            .expect("list permitted implies a minted token");

        let calldata = Marketplace::listItemCall {
            nftContract: self.nft_contract,
            tokenId: token_id,
            price,
        }
        .abi_encode();

        let hash = self
            .submitter
            .submit(TxRequest::new(
                self.marketplace_contract,
                "listItem",
                Bytes::from(calldata),
            ))
            .await?;
        info!(track_id, token_id = %token_id, price = %price, tx_hash = ?hash, "track listed");
        Ok(hash)
    }

    /// Remove the track's active listing. Owner only.
    pub async fn unlist(&self, track_id: u64) -> Result<B256> {
        let snapshot = self.ensure_permitted(track_id, TrackAction::Unlist).await?;
        let token_id = snapshot
            .token_id
            .expect("unlist permitted implies a minted token");

        let calldata = Marketplace::delistItemCall {
            nftContract: self.nft_contract,
            tokenId: token_id,
        }
        .abi_encode();

        let hash = self
            .submitter
            .submit(TxRequest::new(
                self.marketplace_contract,
                "delistItem",
                Bytes::from(calldata),
            ))
            .await?;
        info!(track_id, token_id = %token_id, tx_hash = ?hash, "track unlisted");
        Ok(hash)
    }

    /// Re-resolve and verify the selector permits the requested action.
    async fn ensure_permitted(
        &self,
        track_id: u64,
        requested: TrackAction,
    ) -> Result<TrackSnapshot> {
        let snapshot = self.snapshot(track_id).await;
        let permitted = self.next_action(&snapshot);
        if permitted.action != requested || !permitted.enabled {
            bail!(
                "{requested:?} is not available for track {track_id} (status {:?})",
                snapshot.status
            );
        }
        Ok(snapshot)
    }
}

//! On-chain NFT status resolution for logical tracks.
//!
//! The status is derived, never stored: every call re-reads the chain and
//! returns a point-in-time snapshot. Callers re-resolve after any
//! state-changing transaction; mixing facts from two read cycles is what
//! the snapshot type exists to prevent.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use serde::Serialize;
use tracing::warn;

use crate::provider::{ChainReader, Listing};
use crate::retry::{retry, RetryConfig};

/// Classification of a track's on-chain NFT state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NftStatus {
    NotMinted,
    MintedNotOwner,
    MintedNotListed,
    MintedListed,
    /// A critical read (token id or owner) failed.
    Error,
}

/// One consistent read cycle over a track's on-chain facts.
#[derive(Debug, Clone, Serialize)]
pub struct TrackSnapshot {
    pub track_id: u64,
    pub status: NftStatus,
    pub token_id: Option<U256>,
    pub owner: Option<Address>,
    /// Whether `owner` matches the wallet the snapshot was taken for.
    pub is_owner: bool,
    pub listing: Option<Listing>,
}

impl TrackSnapshot {
    pub fn is_listed(&self) -> bool {
        self.listing.is_some()
    }

    fn error(track_id: u64) -> Self {
        Self {
            track_id,
            status: NftStatus::Error,
            token_id: None,
            owner: None,
            is_owner: false,
            listing: None,
        }
    }
}

/// Derives [`NftStatus`] from on-chain reads through a [`ChainReader`].
pub struct StatusResolver<R> {
    reader: Arc<R>,
    retry: RetryConfig,
}

impl<R: ChainReader> StatusResolver<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            reader,
            retry: RetryConfig::for_reads(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Resolve a track's status for the given wallet. Total: read failures
    /// degrade to the best determinable status instead of propagating.
    ///
    /// Decision table, first match wins:
    /// 1. no token id            -> not-minted
    /// 2. owner != wallet        -> minted-not-owner
    /// 3. owner, no listing      -> minted-not-listed
    /// 4. owner, active listing  -> minted-listed
    /// 5. critical read failed   -> error
    pub async fn resolve(&self, track_id: u64, wallet: Address) -> TrackSnapshot {
        let reader = &self.reader;

        let token_id = match retry(self.retry.clone(), "token_of_track", || {
            let reader = reader.clone();
            async move { reader.token_of_track(track_id).await }
        })
        .await
        {
            Ok(token_id) => token_id,
            Err(e) => {
                warn!(track_id, error = %e, "token lookup failed");
                return TrackSnapshot::error(track_id);
            }
        };

        let Some(token_id) = token_id else {
            return TrackSnapshot {
                track_id,
                status: NftStatus::NotMinted,
                token_id: None,
                owner: None,
                is_owner: false,
                listing: None,
            };
        };

        let owner = match retry(self.retry.clone(), "owner_of", || {
            let reader = reader.clone();
            async move { reader.owner_of(token_id).await }
        })
        .await
        {
            Ok(owner) => owner,
            Err(e) => {
                warn!(track_id, error = %e, "ownership lookup failed");
                return TrackSnapshot::error(track_id);
            }
        };

        // Listing is non-critical: a failed read degrades to "no listing"
        // rather than poisoning the whole snapshot.
        let listing = match retry(self.retry.clone(), "listing_of", || {
            let reader = reader.clone();
            async move { reader.listing_of(token_id).await }
        })
        .await
        {
            Ok(listing) => listing,
            Err(e) => {
                warn!(track_id, error = %e, "listing lookup failed, assuming unlisted");
                None
            }
        };

        let is_owner = owner == wallet;
        let status = if !is_owner {
            NftStatus::MintedNotOwner
        } else if listing.is_some() {
            NftStatus::MintedListed
        } else {
            NftStatus::MintedNotListed
        };

        TrackSnapshot {
            track_id,
            status,
            token_id: Some(token_id),
            owner: Some(owner),
            is_owner,
            listing,
        }
    }
}

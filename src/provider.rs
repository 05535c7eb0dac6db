//! Trait seams around the wallet provider and the chain reader.
//!
//! The core state machines depend only on these traits; the alloy-backed
//! production implementations live in [`crate::contract_client`] and tests
//! substitute in-memory mocks.

use alloy::primitives::{Address, Bytes, B256, U256};
use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::gas::GasSettings;

/// A contract write about to be signed and broadcast.
#[derive(Debug, Clone)]
pub struct TxRequest {
    pub to: Address,
    /// Contract function name; keys the static gas table and log lines.
    pub function: String,
    pub calldata: Bytes,
    pub value: U256,
}

impl TxRequest {
    pub fn new(to: Address, function: impl Into<String>, calldata: Bytes) -> Self {
        Self {
            to,
            function: function.into(),
            calldata,
            value: U256::ZERO,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

/// Receipt summary for a confirmed transaction.
#[derive(Debug, Clone)]
pub struct TxOutcome {
    pub tx_hash: B256,
    /// False means the transaction reverted on-chain.
    pub success: bool,
    pub gas_used: u64,
    pub effective_gas_price: u128,
}

/// An active marketplace listing for a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub seller: Address,
    pub price: U256,
}

/// Signing and broadcast surface of a connected wallet.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// The signer address, or None when no wallet is connected.
    fn address(&self) -> Option<Address>;

    /// Best-effort live gas estimate for the request. Failure here never
    /// aborts a submission; the caller falls back to the static table.
    async fn estimate_gas(&self, req: &TxRequest) -> Result<u64>;

    /// Sign and broadcast; returns the transaction hash once accepted by
    /// the node. Does not wait for inclusion.
    async fn sign_and_send(&self, req: &TxRequest, gas: &GasSettings) -> Result<B256>;

    /// Fetch the receipt for a broadcast transaction, None while pending.
    async fn receipt(&self, tx_hash: B256) -> Result<Option<TxOutcome>>;
}

/// Read-only contract state needed to classify a track.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Token id minted for a logical track, None when not minted.
    async fn token_of_track(&self, track_id: u64) -> Result<Option<U256>>;

    /// Current owner of a minted token.
    async fn owner_of(&self, token_id: U256) -> Result<Address>;

    /// Active marketplace listing for a token, None when unlisted.
    async fn listing_of(&self, token_id: U256) -> Result<Option<Listing>>;
}

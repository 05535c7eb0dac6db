//! Client-side transaction core for the soundmint music-NFT platform:
//! gas estimation, transaction submission with an observable lifecycle,
//! on-chain NFT status resolution and status-to-action selection.

pub mod action;
pub mod config;
pub mod contract_client;
pub mod errors;
pub mod gas;
pub mod manager;
pub mod provider;
pub mod retry;
pub mod state;
pub mod status;
pub mod submitter;
pub mod wallet;

pub use action::{select, ActionConfig, TrackAction};
pub use errors::{TxError, TxErrorKind};
pub use gas::{GasEstimator, GasSettings};
pub use manager::NftManager;
pub use provider::{ChainReader, Listing, TxOutcome, TxRequest, WalletProvider};
pub use status::{NftStatus, StatusResolver, TrackSnapshot};
pub use submitter::{TransactionSubmitter, TxPhase, TxState};

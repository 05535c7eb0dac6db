//! Centralized constants for gas pricing, confirmation tracking and CLI defaults.

// =============================================================================
// State File Names
// =============================================================================

pub const STATE_FILE_CLI: &str = "soundmint.env";

// =============================================================================
// Network Defaults
// =============================================================================

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Anvil deterministic addresses for deployer account #0,
/// deployment order: MusicNft -> Marketplace
pub const DEFAULT_NFT_CONTRACT_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
pub const DEFAULT_MARKETPLACE_CONTRACT_ADDRESS: &str =
    "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512";

// =============================================================================
// Gas Estimation
// =============================================================================

/// Baseline gas units per known contract function. Unknown functions fall
/// through to [`UNKNOWN_FUNCTION_GAS`].
pub const GAS_BASELINES: &[(&str, u64)] = &[
    ("transfer", 65_000),
    ("approve", 55_000),
    ("mint", 150_000),
    ("mintTrack", 150_000),
    ("createProfile", 150_000),
    ("updateProfile", 100_000),
    ("stake", 120_000),
    ("unstake", 120_000),
    ("listItem", 130_000),
    ("delistItem", 85_000),
    ("buyItem", 200_000),
];

/// Conservative baseline for function names not in [`GAS_BASELINES`].
pub const UNKNOWN_FUNCTION_GAS: u64 = 300_000;

/// Hardcoded limit returned when estimation itself cannot produce a value.
/// Overestimating is safer than blocking the transaction.
pub const FALLBACK_GAS_LIMIT: u64 = 500_000;

/// Safety multiplier applied to every baseline and live estimate.
pub const GAS_SAFETY_MULTIPLIER: f64 = 1.2;

/// Legacy minimum transfer cost; no valid transaction can need less.
pub const MIN_GAS_LIMIT: u64 = 21_000;

/// Ceiling to avoid pathological estimates.
pub const MAX_GAS_LIMIT: u64 = 1_000_000;

// =============================================================================
// Confirmation Tracking
// =============================================================================

/// How often to poll for a transaction receipt.
pub const CONFIRM_POLL_INTERVAL_SECS: u64 = 2;

/// Stop watching a broadcast transaction after this long without a receipt.
/// The transaction itself cannot be recalled; the client just stops waiting.
pub const CONFIRM_TIMEOUT_SECS: u64 = 300;

// =============================================================================
// Retry Settings
// =============================================================================

pub const DEFAULT_MAX_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 5;
pub const DEFAULT_READ_RETRY_DELAY_SECS: u64 = 1;

// =============================================================================
// Error Decoding
// =============================================================================

/// Solidity Error(string) function selector, used for decoding revert
/// messages from contract calls.
pub const ERROR_STRING_SELECTOR: &str = "08c379a0";

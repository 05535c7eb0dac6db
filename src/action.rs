//! Mapping from NFT status to the single permitted user action.
//!
//! Pure and total: safe to call on every render, handles every status
//! including error/inconsistent inputs by disabling the action.

use crate::status::NftStatus;

/// The one action a user may take on a track, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackAction {
    Mint,
    List,
    Unlist,
    None,
}

/// Selector output: which action, and whether it is currently permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionConfig {
    pub action: TrackAction,
    pub enabled: bool,
}

impl ActionConfig {
    const fn none() -> Self {
        Self {
            action: TrackAction::None,
            enabled: false,
        }
    }

    const fn allow(action: TrackAction) -> Self {
        Self {
            action,
            enabled: true,
        }
    }
}

/// Select the action for a `(status, is_owner, is_listed)` triple.
///
/// The flags come from the same snapshot that produced the status;
/// combinations the resolver can never emit (e.g. `minted-listed` without
/// `is_listed`) are treated as undecidable and disabled.
pub fn select(status: NftStatus, is_owner: bool, is_listed: bool) -> ActionConfig {
    match status {
        NftStatus::NotMinted => ActionConfig::allow(TrackAction::Mint),
        NftStatus::MintedNotListed if is_owner && !is_listed => {
            ActionConfig::allow(TrackAction::List)
        }
        NftStatus::MintedListed if is_owner && is_listed => {
            ActionConfig::allow(TrackAction::Unlist)
        }
        // Non-owners only browse; errors and inconsistent flag
        // combinations render a disabled button.
        NftStatus::MintedNotOwner
        | NftStatus::MintedNotListed
        | NftStatus::MintedListed
        | NftStatus::Error => ActionConfig::none(),
    }
}

//! Gas limit and fee estimation for contract writes.
//!
//! Two tiers: a static per-function baseline table (authoritative) and an
//! optional live node estimate that the caller may feed in via [`GasEstimator::refine`].
//! Both tiers go through the same safety multiplier and clamping, and both
//! attach fee fields from the chain's static [`ChainProfile`] defaults.
//! Estimation never fails; failing open (overestimating) is safer than
//! blocking the transaction.

use tracing::debug;

use crate::config::chain::ChainProfile;
use crate::config::consts::{FALLBACK_GAS_LIMIT, GAS_BASELINES, UNKNOWN_FUNCTION_GAS};

/// How a transaction should be priced. Constructed fresh on every
/// estimation call and immutable once returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasSettings {
    /// Maximum gas units authorized for the call.
    pub gas_limit: u64,
    /// EIP-1559 fee cap in wei; None under legacy pricing.
    pub max_fee_per_gas: Option<u128>,
    /// EIP-1559 priority fee in wei; None under legacy pricing.
    pub max_priority_fee_per_gas: Option<u128>,
    /// Flat gas price in wei; None under fee-market pricing.
    pub gas_price: Option<u128>,
    /// Upper bound on spend in wei: `gas_limit * fee_rate`. Not actual spend.
    pub estimated_cost: u128,
    /// Which pricing model produced these settings.
    pub is_eip1559: bool,
}

/// Estimates gas limits and fees against one chain profile.
#[derive(Debug, Clone)]
pub struct GasEstimator {
    profile: ChainProfile,
}

impl GasEstimator {
    pub fn new(profile: ChainProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &ChainProfile {
        &self.profile
    }

    /// Estimate from the static baseline table. Unknown function names get
    /// the conservative default rather than failing.
    pub fn estimate(&self, function_name: &str) -> GasSettings {
        let baseline = GAS_BASELINES
            .iter()
            .find(|(name, _)| *name == function_name)
            .map(|(_, gas)| *gas)
            .unwrap_or_else(|| {
                debug!(
                    function = function_name,
                    "no gas baseline for function, using conservative default"
                );
                UNKNOWN_FUNCTION_GAS
            });
        self.settings_for(baseline)
    }

    /// Apply the same multiplier and clamps to a live node estimate.
    /// `function_name` is only used for logging.
    pub fn refine(&self, function_name: &str, live_estimate: u64) -> GasSettings {
        debug!(
            function = function_name,
            live_estimate, "refining gas limit from live estimate"
        );
        self.settings_for(live_estimate)
    }

    /// Hardcoded conservative settings for when estimation itself breaks.
    pub fn fallback(&self) -> GasSettings {
        self.settings_for_limit(FALLBACK_GAS_LIMIT)
    }

    fn settings_for(&self, baseline: u64) -> GasSettings {
        let buffered = (baseline as f64 * self.profile.safety_multiplier) as u64;
        // Manual ordering stays total for profiles loaded with inverted
        // bounds; the ceiling wins.
        let limited = buffered
            .max(self.profile.min_gas_limit)
            .min(self.profile.max_gas_limit);
        self.settings_for_limit(limited)
    }

    fn settings_for_limit(&self, gas_limit: u64) -> GasSettings {
        let fee_rate = self.profile.fee_rate();
        let estimated_cost = gas_limit as u128 * fee_rate;

        if self.profile.eip1559 {
            GasSettings {
                gas_limit,
                max_fee_per_gas: Some(fee_rate),
                max_priority_fee_per_gas: Some(self.profile.priority_fee_per_gas),
                gas_price: None,
                estimated_cost,
                is_eip1559: true,
            }
        } else {
            GasSettings {
                gas_limit,
                max_fee_per_gas: None,
                max_priority_fee_per_gas: None,
                gas_price: Some(fee_rate),
                estimated_cost,
                is_eip1559: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::consts::{MAX_GAS_LIMIT, MIN_GAS_LIMIT};

    fn estimator() -> GasEstimator {
        GasEstimator::new(ChainProfile::default())
    }

    #[test]
    fn test_known_functions_within_bounds() {
        let estimator = estimator();
        for (name, _) in GAS_BASELINES {
            let settings = estimator.estimate(name);
            assert!(settings.gas_limit >= MIN_GAS_LIMIT, "{name} below min");
            assert!(settings.gas_limit <= MAX_GAS_LIMIT, "{name} above max");
            assert_eq!(
                settings.estimated_cost,
                settings.gas_limit as u128 * settings.max_fee_per_gas.unwrap()
            );
        }
    }

    #[test]
    fn test_mint_applies_safety_multiplier() {
        let settings = estimator().estimate("mintTrack");
        // 150_000 * 1.2
        assert_eq!(settings.gas_limit, 180_000);
    }

    #[test]
    fn test_unknown_function_uses_conservative_default() {
        let settings = estimator().estimate("somethingNovel");
        assert_eq!(
            settings.gas_limit,
            (UNKNOWN_FUNCTION_GAS as f64 * 1.2) as u64
        );
    }

    #[test]
    fn test_empty_function_name_does_not_panic() {
        let settings = estimator().estimate("");
        assert!(settings.gas_limit >= MIN_GAS_LIMIT);
        assert!(settings.gas_limit <= MAX_GAS_LIMIT);
    }

    #[test]
    fn test_refine_clamps_pathological_live_estimate() {
        let settings = estimator().refine("mintTrack", 10_000_000);
        assert_eq!(settings.gas_limit, MAX_GAS_LIMIT);

        let settings = estimator().refine("transfer", 100);
        assert_eq!(settings.gas_limit, MIN_GAS_LIMIT);
    }

    #[test]
    fn test_inverted_profile_bounds_do_not_panic() {
        let profile = ChainProfile {
            min_gas_limit: 900_000,
            max_gas_limit: 50_000,
            ..ChainProfile::default()
        };
        let settings = GasEstimator::new(profile).estimate("mintTrack");
        assert_eq!(settings.gas_limit, 50_000);
    }

    #[test]
    fn test_eip1559_fee_fields() {
        let profile = ChainProfile::default();
        let settings = GasEstimator::new(profile.clone()).estimate("transfer");
        assert!(settings.is_eip1559);
        assert_eq!(
            settings.max_fee_per_gas,
            Some(profile.base_fee_per_gas + profile.priority_fee_per_gas)
        );
        assert_eq!(
            settings.max_priority_fee_per_gas,
            Some(profile.priority_fee_per_gas)
        );
        assert_eq!(settings.gas_price, None);
    }

    #[test]
    fn test_legacy_fee_fields() {
        let settings =
            GasEstimator::new(ChainProfile::legacy(56, 5_000_000_000)).estimate("transfer");
        assert!(!settings.is_eip1559);
        assert_eq!(settings.gas_price, Some(5_000_000_000));
        assert_eq!(settings.max_fee_per_gas, None);
        assert_eq!(settings.estimated_cost, settings.gas_limit as u128 * 5_000_000_000);
    }

    #[test]
    fn test_fallback_is_conservative() {
        let settings = estimator().fallback();
        assert_eq!(settings.gas_limit, FALLBACK_GAS_LIMIT);
        assert!(settings.estimated_cost > 0);
    }
}

//! Static fee profiles per target chain.
//!
//! These are network-wide defaults, not a live fee oracle. The estimator
//! attaches them to every write; actual spend is bounded by the limit and
//! settles at the effective price the chain charges.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::config::consts::{GAS_SAFETY_MULTIPLIER, MAX_GAS_LIMIT, MIN_GAS_LIMIT};

/// Fee-market parameters for one chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainProfile {
    pub chain_id: u64,
    /// Whether the chain uses EIP-1559 fee-market pricing.
    pub eip1559: bool,
    /// Static base-fee default in wei (EIP-1559 chains).
    #[serde(default = "default_base_fee")]
    pub base_fee_per_gas: u128,
    /// Static priority-fee default in wei (EIP-1559 chains).
    #[serde(default = "default_priority_fee")]
    pub priority_fee_per_gas: u128,
    /// Flat gas price in wei (legacy chains).
    #[serde(default = "default_gas_price")]
    pub gas_price: u128,
    #[serde(default = "default_min_gas_limit")]
    pub min_gas_limit: u64,
    #[serde(default = "default_max_gas_limit")]
    pub max_gas_limit: u64,
    #[serde(default = "default_safety_multiplier")]
    pub safety_multiplier: f64,
}

impl Default for ChainProfile {
    fn default() -> Self {
        Self {
            chain_id: 1,
            eip1559: true,
            base_fee_per_gas: default_base_fee(),
            priority_fee_per_gas: default_priority_fee(),
            gas_price: default_gas_price(),
            min_gas_limit: default_min_gas_limit(),
            max_gas_limit: default_max_gas_limit(),
            safety_multiplier: default_safety_multiplier(),
        }
    }
}

impl ChainProfile {
    /// Profile for a local Anvil devnet.
    pub fn anvil() -> Self {
        Self {
            chain_id: 31337,
            eip1559: true,
            base_fee_per_gas: 1_000_000_000, // 1 gwei
            priority_fee_per_gas: 0,
            ..Self::default()
        }
    }

    /// Profile for a chain without fee-market pricing.
    pub fn legacy(chain_id: u64, gas_price: u128) -> Self {
        Self {
            chain_id,
            eip1559: false,
            gas_price,
            ..Self::default()
        }
    }

    /// The fee rate an upper-bound cost estimate should use.
    pub fn fee_rate(&self) -> u128 {
        if self.eip1559 {
            self.base_fee_per_gas + self.priority_fee_per_gas
        } else {
            self.gas_price
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        let profile: ChainProfile = toml::from_str(&s)?;
        Ok(profile)
    }
}

fn default_base_fee() -> u128 {
    30_000_000_000 // 30 gwei
}

fn default_priority_fee() -> u128 {
    1_500_000_000 // 1.5 gwei
}

fn default_gas_price() -> u128 {
    30_000_000_000
}

fn default_min_gas_limit() -> u64 {
    MIN_GAS_LIMIT
}

fn default_max_gas_limit() -> u64 {
    MAX_GAS_LIMIT
}

fn default_safety_multiplier() -> f64 {
    GAS_SAFETY_MULTIPLIER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_rate_eip1559() {
        let profile = ChainProfile::default();
        assert_eq!(
            profile.fee_rate(),
            profile.base_fee_per_gas + profile.priority_fee_per_gas
        );
    }

    #[test]
    fn test_fee_rate_legacy() {
        let profile = ChainProfile::legacy(56, 5_000_000_000);
        assert_eq!(profile.fee_rate(), 5_000_000_000);
    }

    #[test]
    fn test_profile_from_toml_applies_defaults() {
        let profile: ChainProfile = toml::from_str("chain_id = 8453\neip1559 = true\n").unwrap();
        assert_eq!(profile.chain_id, 8453);
        assert_eq!(profile.min_gas_limit, MIN_GAS_LIMIT);
        assert_eq!(profile.max_gas_limit, MAX_GAS_LIMIT);
    }
}

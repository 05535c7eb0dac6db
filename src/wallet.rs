//! Local signer management: generation, loading, balance checks and the
//! startup status banner.

use alloy::{
    primitives::{utils::format_ether, Address, U256},
    providers::{Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
};
use anyhow::{Context, Result};
use term_table::row::Row;
use term_table::table_cell::{Alignment as CellAlignment, TableCell};
use term_table::{Table, TableStyle};
use tracing::{info, warn};

/// Wallet validation status at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletStatus {
    /// Wallet was just created, needs funding.
    Created,
    /// Wallet has no ETH balance.
    InsufficientFunds,
    /// Wallet is ready to operate.
    Ready,
}

/// Generate a new random signer.
pub fn generate_wallet() -> PrivateKeySigner {
    PrivateKeySigner::random()
}

/// Load a signer from a private key string (with or without 0x prefix).
pub fn load_wallet(private_key: &str) -> Result<PrivateKeySigner> {
    private_key
        .trim_start_matches("0x")
        .parse::<PrivateKeySigner>()
        .context("Failed to parse private key")
}

/// Fetch the ETH balance of an address from the given RPC endpoint.
pub async fn check_balance(rpc_url: &str, address: Address) -> Result<U256> {
    let provider = ProviderBuilder::new()
        .connect(rpc_url)
        .await
        .context("Failed to connect to RPC endpoint")?;
    provider
        .get_balance(address)
        .await
        .context("Failed to fetch balance")
}

/// Render the wallet status banner shown before any command runs.
pub fn display_wallet_status(
    status: WalletStatus,
    address: Address,
    rpc_url: &str,
    eth_balance: U256,
) {
    let mut table = Table::new();
    table.style = TableStyle::extended();

    let (header, use_warn) = match status {
        WalletStatus::Created => ("✅  Account Created Successfully ✅", true),
        WalletStatus::InsufficientFunds => ("❌  INSUFFICIENT FUNDS  ❌", true),
        WalletStatus::Ready => ("🎉 WALLET LOADED SUCCESSFULLY 🎉", false),
    };
    table.add_row(Row::new(vec![TableCell::builder(header)
        .col_span(2)
        .alignment(CellAlignment::Center)
        .build()]));

    table.add_row(Row::new(vec![
        TableCell::builder("Address")
            .alignment(CellAlignment::Right)
            .build(),
        TableCell::builder(format!("{address:?}"))
            .alignment(CellAlignment::Left)
            .build(),
    ]));

    table.add_row(Row::new(vec![
        TableCell::builder("ETH Balance")
            .alignment(CellAlignment::Right)
            .build(),
        TableCell::builder(format!("{} ETH", format_ether(eth_balance)))
            .alignment(CellAlignment::Left)
            .build(),
    ]));

    table.add_row(Row::new(vec![
        TableCell::builder("RPC URL")
            .alignment(CellAlignment::Right)
            .build(),
        TableCell::builder(rpc_url.to_owned())
            .alignment(CellAlignment::Left)
            .build(),
    ]));

    let status_message = match status {
        WalletStatus::Created | WalletStatus::InsufficientFunds => {
            "❗ Please fund this address with ETH to mint and trade tracks ❗"
        }
        WalletStatus::Ready => "✅ Ready to mint and trade",
    };
    table.add_row(Row::new(vec![TableCell::builder(status_message)
        .col_span(2)
        .alignment(CellAlignment::Center)
        .build()]));

    if use_warn {
        warn!("\n{}", table.render());
    } else {
        info!("\n{}", table.render());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_wallet() {
        let a = generate_wallet();
        let b = generate_wallet();
        assert_ne!(a.address(), b.address());
    }

    #[test]
    fn test_load_wallet() {
        // Anvil well-known test account #1
        let private_key = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
        let wallet = load_wallet(private_key).unwrap();

        let expected = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
            .parse::<Address>()
            .unwrap();
        assert_eq!(wallet.address(), expected);
    }

    #[test]
    fn test_load_wallet_without_prefix() {
        let private_key = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
        let wallet = load_wallet(private_key).unwrap();

        let expected = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
            .parse::<Address>()
            .unwrap();
        assert_eq!(wallet.address(), expected);
    }

    #[test]
    fn test_load_wallet_rejects_garbage() {
        assert!(load_wallet("not-a-key").is_err());
    }
}

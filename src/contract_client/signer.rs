//! [`WalletProvider`] implementation over an alloy signer-filled provider.

use alloy::{
    network::{EthereumWallet, TransactionBuilder},
    primitives::{Address, B256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;

use crate::errors::decode_any_error;
use crate::gas::GasSettings;
use crate::provider::{TxOutcome, TxRequest, WalletProvider};

/// A connected signing wallet backed by an RPC node.
#[derive(Clone)]
pub struct RpcWallet {
    provider: DynProvider,
    address: Address,
}

impl RpcWallet {
    /// Connect to the RPC endpoint with a local private-key signer.
    pub async fn connect(rpc_url: &str, private_key: &str) -> Result<Self> {
        let signer: PrivateKeySigner = private_key
            .trim_start_matches("0x")
            .parse()
            .context("Failed to parse private key")?;
        let address = signer.address();
        let wallet = EthereumWallet::from(signer);

        let provider: DynProvider = ProviderBuilder::new()
            .wallet(wallet)
            .connect(rpc_url)
            .await
            .context("Failed to connect to RPC endpoint")?
            .erased();

        Ok(Self { provider, address })
    }

    pub fn provider(&self) -> DynProvider {
        self.provider.clone()
    }

    fn build_tx(&self, req: &TxRequest, gas: Option<&GasSettings>) -> TransactionRequest {
        let mut tx = TransactionRequest::default()
            .with_from(self.address)
            .with_to(req.to)
            .with_input(req.calldata.clone())
            .with_value(req.value);

        if let Some(gas) = gas {
            tx = tx.with_gas_limit(gas.gas_limit);
            if gas.is_eip1559 {
                tx = tx
                    .with_max_fee_per_gas(gas.max_fee_per_gas.unwrap_or_default())
                    .with_max_priority_fee_per_gas(
                        gas.max_priority_fee_per_gas.unwrap_or_default(),
                    );
            } else {
                tx = tx.with_gas_price(gas.gas_price.unwrap_or_default());
            }
        }
        tx
    }
}

#[async_trait]
impl WalletProvider for RpcWallet {
    fn address(&self) -> Option<Address> {
        Some(self.address)
    }

    async fn estimate_gas(&self, req: &TxRequest) -> Result<u64> {
        let tx = self.build_tx(req, None);
        self.provider
            .estimate_gas(tx)
            .await
            .map_err(|e| anyhow!("failed to estimate gas: {}", decode_any_error(&e)))
    }

    async fn sign_and_send(&self, req: &TxRequest, gas: &GasSettings) -> Result<B256> {
        let tx = self.build_tx(req, Some(gas));
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| anyhow!("{}", decode_any_error(&e)))?;
        Ok(*pending.tx_hash())
    }

    async fn receipt(&self, tx_hash: B256) -> Result<Option<TxOutcome>> {
        let receipt = self.provider.get_transaction_receipt(tx_hash).await?;
        Ok(receipt.map(|r| TxOutcome {
            tx_hash: r.transaction_hash,
            success: r.status(),
            gas_used: r.gas_used,
            effective_gas_price: r.effective_gas_price,
        }))
    }
}
